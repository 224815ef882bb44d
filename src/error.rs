//! HTTP-facing error type.
//!
//! Every failure reaching a handler is converted into [`AppError`], which renders
//! as a JSON body `{"error": "<message>", "code": "<code>"}` with an optional
//! `details` object.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::application::services::ResolveError;
use crate::domain::entities::GeoError;

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
    #[serde(skip_serializing_if = "Value::is_null")]
    details: Value,
}

#[derive(Debug)]
pub enum AppError {
    Validation { message: String, details: Value },
    NotFound { message: String, details: Value },
    Unavailable { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn unavailable(message: impl Into<String>, details: Value) -> Self {
        Self::Unavailable {
            message: message.into(),
            details,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, message, details) = match self {
            AppError::Validation { message, details } => ("invalid_request", message, details),
            AppError::NotFound { message, details } => ("not_found", message, details),
            AppError::Unavailable { message, details } => {
                ("service_unavailable", message, details)
            }
        };

        let body = ErrorBody {
            error: message,
            code,
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<ResolveError> for AppError {
    fn from(e: ResolveError) -> Self {
        match e {
            ResolveError::NotFound { .. } => {
                AppError::not_found("Destination not found", Value::Null)
            }
            // Store internals stay in the logs, not in the response.
            ResolveError::StoreUnavailable(_) => {
                AppError::unavailable("Link store unavailable", Value::Null)
            }
        }
    }
}

impl From<GeoError> for AppError {
    fn from(e: GeoError) -> Self {
        AppError::bad_request("Invalid geo metadata", json!({ "reason": e.to_string() }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::StoreError;

    #[test]
    fn test_resolve_error_mapping() {
        let not_found: AppError = ResolveError::NotFound {
            link_id: "x".to_string(),
        }
        .into();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let unavailable: AppError =
            ResolveError::StoreUnavailable(StoreError::Query(sqlx::Error::PoolTimedOut)).into();
        assert_eq!(unavailable.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_geo_error_is_bad_request() {
        let err: AppError = GeoError::InvalidCountry("usa".to_string()).into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
