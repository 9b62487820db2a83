//! JSON error responses: `{"error": "..."}` with a 4xx/5xx status. Server-side failures get
//! a generic message; the detail goes to the log.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use crate::content::ContentError;
use crate::payments::PaymentError;
use crate::plugins::PluginError;
use crate::updates::UpdateError;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized")
    }

    /// Logs `detail` and hides it behind `public` in the response.
    pub fn internal(public: &str, detail: impl std::fmt::Display) -> Self {
        error!(error = %detail, "{}", public);
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, public)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<storage::StorageError> for ApiError {
    fn from(e: storage::StorageError) -> Self {
        match e {
            storage::StorageError::InvalidValue(msg) => ApiError::bad_request(msg),
            other => ApiError::internal("Database error", other),
        }
    }
}

impl From<PluginError> for ApiError {
    fn from(e: PluginError) -> Self {
        match e {
            PluginError::NotFound(_) => ApiError::not_found("Plugin not found"),
            PluginError::Disabled(name) => {
                ApiError::new(StatusCode::CONFLICT, format!("Plugin {} is disabled", name))
            }
            other => ApiError::internal("Plugin operation failed", other),
        }
    }
}

impl From<UpdateError> for ApiError {
    fn from(e: UpdateError) -> Self {
        match e {
            UpdateError::NotFound(_) | UpdateError::NoBackup(_) => {
                ApiError::not_found("Backup not found")
            }
            UpdateError::InProgress => {
                ApiError::new(StatusCode::CONFLICT, "An update is already running")
            }
            other => ApiError::internal("Update operation failed", other),
        }
    }
}

impl From<PaymentError> for ApiError {
    fn from(e: PaymentError) -> Self {
        match e {
            PaymentError::UnknownProduct(_) => ApiError::bad_request("Invalid product"),
            PaymentError::NotConfigured => {
                ApiError::new(StatusCode::SERVICE_UNAVAILABLE, "Payments are not configured")
            }
            PaymentError::Signature(_) => ApiError::bad_request("Invalid signature"),
            PaymentError::Payload(_) => ApiError::bad_request("Invalid payload"),
            PaymentError::Storage(e) => ApiError::internal("Database error", e),
            other => {
                error!(error = %other, "Payment provider call failed");
                ApiError::new(StatusCode::BAD_GATEWAY, "Payment session creation failed")
            }
        }
    }
}

impl From<ContentError> for ApiError {
    fn from(e: ContentError) -> Self {
        ApiError::bad_request(e.to_string())
    }
}

impl From<minijinja::Error> for ApiError {
    fn from(e: minijinja::Error) -> Self {
        ApiError::internal("Template rendering failed", e)
    }
}
