//! Loxo Core - Domain models, errors, and configuration
//!
//! This crate contains the feature collection model, query and statistic
//! descriptions, and the error type shared by every Loxo crate.

pub mod config;
pub mod error;
pub mod models;

pub use error::{ErrorKind, LoxoError, Result};
