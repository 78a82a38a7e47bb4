//! Error types for Loxo

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoxoError {
    // Engine errors
    #[error("Invalid argument '{argument}': {reason}")]
    InvalidArgument { argument: String, reason: String },

    #[error("{operation} requires at least {required} features, found {found}")]
    InsufficientData {
        operation: String,
        required: usize,
        found: usize,
    },

    #[error("Attribute '{attribute}' of feature {feature_index} is not numeric: {value}")]
    NonNumericAttribute {
        attribute: String,
        feature_index: usize,
        value: String,
    },

    #[error("Degenerate computation in {operation}: {reason}")]
    DegenerateComputation { operation: String, reason: String },

    // Store errors
    #[error("Collection not found: {database}/{dataset}")]
    CollectionNotFound { database: String, dataset: String },

    #[error("Feature not found: {id}")]
    FeatureNotFound { id: u64 },

    #[error("Invalid GeoJSON at {location}: {reason}")]
    InvalidGeoJson { location: String, reason: String },

    // Configuration errors
    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Coarse classification of [`LoxoError`] for callers that branch on the
/// failure category rather than the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    InsufficientData,
    NonNumericAttribute,
    DegenerateComputation,
    NotFound,
    InvalidInput,
    Config,
    Internal,
}

impl LoxoError {
    pub fn invalid_argument(argument: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument { argument: argument.into(), reason: reason.into() }
    }

    pub fn insufficient_data(operation: impl Into<String>, required: usize, found: usize) -> Self {
        Self::InsufficientData { operation: operation.into(), required, found }
    }

    pub fn degenerate(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DegenerateComputation { operation: operation.into(), reason: reason.into() }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            LoxoError::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            LoxoError::InsufficientData { .. } => ErrorKind::InsufficientData,
            LoxoError::NonNumericAttribute { .. } => ErrorKind::NonNumericAttribute,
            LoxoError::DegenerateComputation { .. } => ErrorKind::DegenerateComputation,
            LoxoError::CollectionNotFound { .. } | LoxoError::FeatureNotFound { .. } => {
                ErrorKind::NotFound
            }
            LoxoError::InvalidGeoJson { .. } => ErrorKind::InvalidInput,
            LoxoError::ConfigInvalid { .. } => ErrorKind::Config,
            LoxoError::Serialization(_) => ErrorKind::Internal,
        }
    }
}

impl From<serde_json::Error> for LoxoError {
    fn from(err: serde_json::Error) -> Self {
        LoxoError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LoxoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_numeric_message_names_value() {
        let err = LoxoError::NonNumericAttribute {
            attribute: "population".to_string(),
            feature_index: 4,
            value: "\"n/a\"".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("population"));
        assert!(message.contains("4"));
        assert!(message.contains("n/a"));
        assert_eq!(err.kind(), ErrorKind::NonNumericAttribute);
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(LoxoError::invalid_argument("k", "must be > 0").kind(), ErrorKind::InvalidArgument);
        assert_eq!(LoxoError::insufficient_data("Centroid", 1, 0).kind(), ErrorKind::InsufficientData);
        assert_eq!(LoxoError::degenerate("IDW", "zero distance").kind(), ErrorKind::DegenerateComputation);
        assert_eq!(LoxoError::FeatureNotFound { id: 3 }.kind(), ErrorKind::NotFound);
        assert_eq!(
            LoxoError::ConfigInvalid { key: "max_features".to_string(), reason: "zero".to_string() }.kind(),
            ErrorKind::Config
        );
        assert_eq!(LoxoError::Serialization("bad".to_string()).kind(), ErrorKind::Internal);
    }
}
