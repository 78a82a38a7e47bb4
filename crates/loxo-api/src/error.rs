use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use loxo_core::error::{ErrorKind, LoxoError};
use serde::Serialize;

/// Unified API error type
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<String>,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
            details: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
            details: None,
        }
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: message.into(),
            details: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message,
            details: self.details,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<LoxoError> for ApiError {
    fn from(err: LoxoError) -> Self {
        match err.kind() {
            ErrorKind::InvalidArgument | ErrorKind::NonNumericAttribute | ErrorKind::InvalidInput => {
                Self::bad_request(err.to_string())
            }
            ErrorKind::InsufficientData | ErrorKind::DegenerateComputation => {
                Self::unprocessable(err.to_string())
            }
            ErrorKind::NotFound => Self::not_found(err.to_string()),
            ErrorKind::Config | ErrorKind::Internal => {
                tracing::error!(error = %err, "Internal error");
                Self::internal("Internal error").with_details(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (LoxoError::invalid_argument("k", "must be positive"), StatusCode::BAD_REQUEST),
            (
                LoxoError::NonNumericAttribute {
                    attribute: "v".to_string(),
                    feature_index: 0,
                    value: "\"x\"".to_string(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                LoxoError::InvalidGeoJson { location: "features".to_string(), reason: "empty".to_string() },
                StatusCode::BAD_REQUEST,
            ),
            (LoxoError::insufficient_data("Centroid", 1, 0), StatusCode::UNPROCESSABLE_ENTITY),
            (LoxoError::degenerate("Moran's I", "zero variance"), StatusCode::UNPROCESSABLE_ENTITY),
            (LoxoError::FeatureNotFound { id: 4 }, StatusCode::NOT_FOUND),
            (LoxoError::Serialization("boom".to_string()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            let message = err.to_string();
            assert_eq!(ApiError::from(err).status, status, "{}", message);
        }
    }

    #[test]
    fn test_internal_errors_hide_message() {
        let err = ApiError::from(LoxoError::Serialization("boom".to_string()));
        assert_eq!(err.message, "Internal error");
        assert_eq!(err.details.as_deref(), Some("Serialization error: boom"));
    }
}
