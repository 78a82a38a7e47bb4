pub mod request;
pub mod response;

pub use request::{AttributeParams, CollectionParams, IdwParams, Selection};
pub use response::{CollectionInfo, HealthResponse, IngestResponse};
