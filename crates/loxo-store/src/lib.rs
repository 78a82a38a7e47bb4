//! Loxo Store - Feature collection storage port and adapters
//!
//! This crate defines the storage port the HTTP layer reads collections
//! through, plus an in-memory adapter keyed by database and dataset name.

pub mod memory;
pub mod ports;

pub use memory::MemoryFeatureStore;
pub use ports::FeatureStore;
