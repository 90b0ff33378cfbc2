use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;
use crate::utils::validation::FieldErrors;

#[derive(Debug, Error)]
pub enum ApiError {
    /// One or more named inputs were rejected
    #[error("validation failed")]
    Validation(FieldErrors),

    /// The operation as a whole was rejected
    #[error("{0}")]
    Rule(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    /// Body or query string could not be parsed
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Rule(_) | ApiError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Store(StoreError::UniqueViolation(_)) => StatusCode::CONFLICT,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            ApiError::Validation(errors) => json!({
                "message": "Validation failed",
                "errors": errors,
            }),
            ApiError::Store(StoreError::UniqueViolation(key)) => {
                tracing::warn!(key = %key, "Unmapped unique key violation");
                json!({ "message": "Record conflicts with an existing one" })
            }
            ApiError::Store(e) => {
                tracing::error!(error = %e, "Storage failure");
                json!({ "message": "Internal Server Error" })
            }
            other => json!({ "message": other.to_string() }),
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}
