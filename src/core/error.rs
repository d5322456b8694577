//! Typed error handling for shopfront
//!
//! Every failure a caller can observe is a named [`ShopError`] variant with
//! its own HTTP status and stable error code, so clients can match on the
//! condition instead of parsing messages.
//!
//! # Error Categories
//!
//! - Lifecycle: [`ShopError::NotFound`], [`ShopError::AlreadyDisabled`],
//!   [`ShopError::AlreadyEnabled`]
//! - Authorization: [`ShopError::Unauthenticated`], [`ShopError::Forbidden`]
//! - Input: [`ShopError::Validation`] wrapping a [`ValidationError`]
//! - Infrastructure: [`ShopError::Storage`] and [`ShopError::Internal`]
//!
//! # Example
//!
//! ```rust,ignore
//! match service.get(id, &caller).await {
//!     Ok(cart) => println!("found {}", cart.id()),
//!     Err(ShopError::NotFound { .. }) => println!("no such cart"),
//!     Err(ShopError::Forbidden { .. }) => println!("not yours"),
//!     Err(e) => eprintln!("other error: {}", e),
//! }
//! ```

use crate::core::resource::ResourceKind;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;
use validator::ValidationErrorsKind;

/// The main error type
#[derive(Debug, Error)]
pub enum ShopError {
    /// Resource absent, or inactive where an active one is required
    #[error("{kind} with id '{id}' not found")]
    NotFound { kind: ResourceKind, id: Uuid },

    /// Caller is neither the owner nor privileged
    #[error("caller may not {action} {kind}")]
    Forbidden {
        kind: ResourceKind,
        action: &'static str,
    },

    #[error("{kind} with id '{id}' is already disabled")]
    AlreadyDisabled { kind: ResourceKind, id: Uuid },

    #[error("{kind} with id '{id}' is already enabled")]
    AlreadyEnabled { kind: ResourceKind, id: Uuid },

    #[error("{kind} has no related collection '{related}'")]
    UnknownRelation { kind: ResourceKind, related: String },

    /// No identity was supplied for an operation that needs one
    #[error("authentication required")]
    Unauthenticated,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Opaque persistence failure, propagated unchanged
    #[error(transparent)]
    Storage(#[from] anyhow::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Errors raised for malformed input
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("validation failed: {}", describe_fields(.0))]
    FieldErrors(Vec<FieldValidationError>),

    #[error("invalid JSON: {message}")]
    InvalidJson { message: String },

    #[error("invalid id '{value}'")]
    InvalidId { value: String },

    #[error("invalid filter: {message}")]
    InvalidFilter { message: String },

    #[error("invalid header '{header}': {message}")]
    InvalidHeader { header: String, message: String },
}

/// A single field validation error
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

fn describe_fields(errors: &[FieldValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Flatten nested validation errors into `items[0].quantity` style paths
fn collect_field_errors(
    prefix: &str,
    errors: &validator::ValidationErrors,
    out: &mut Vec<FieldValidationError>,
) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };
        match kind {
            ValidationErrorsKind::Field(errs) => {
                out.extend(errs.iter().map(|e| FieldValidationError {
                    field: path.clone(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string()),
                }));
            }
            ValidationErrorsKind::Struct(inner) => collect_field_errors(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_field_errors(&format!("{}[{}]", path, index), inner, out);
                }
            }
        }
    }
}

impl From<validator::ValidationErrors> for ValidationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields = Vec::new();
        collect_field_errors("", &errors, &mut fields);

        // HashMap iteration order is unstable
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        ValidationError::FieldErrors(fields)
    }
}

impl From<validator::ValidationErrors> for ShopError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ShopError::Validation(errors.into())
    }
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ShopError {
    pub(crate) fn bad_header(header: &str, message: &str) -> Self {
        ShopError::Validation(ValidationError::InvalidHeader {
            header: header.to_string(),
            message: message.to_string(),
        })
    }

    pub(crate) fn invalid_filter(message: impl Into<String>) -> Self {
        ShopError::Validation(ValidationError::InvalidFilter {
            message: message.into(),
        })
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ShopError::NotFound { .. } => StatusCode::NOT_FOUND,
            ShopError::Forbidden { .. } => StatusCode::FORBIDDEN,
            ShopError::AlreadyDisabled { .. } => StatusCode::CONFLICT,
            ShopError::AlreadyEnabled { .. } => StatusCode::CONFLICT,
            ShopError::UnknownRelation { .. } => StatusCode::NOT_FOUND,
            ShopError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ShopError::Validation(e) => e.status_code(),
            ShopError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ShopError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ShopError::NotFound { .. } => "NOT_FOUND",
            ShopError::Forbidden { .. } => "FORBIDDEN",
            ShopError::AlreadyDisabled { .. } => "ALREADY_DISABLED",
            ShopError::AlreadyEnabled { .. } => "ALREADY_ENABLED",
            ShopError::UnknownRelation { .. } => "UNKNOWN_RELATION",
            ShopError::Unauthenticated => "UNAUTHENTICATED",
            ShopError::Validation(e) => e.error_code(),
            ShopError::Storage(_) => "STORAGE_ERROR",
            ShopError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        let message = match self {
            ShopError::Storage(_) => "storage failure".to_string(),
            ShopError::Internal(_) => "internal error".to_string(),
            other => other.to_string(),
        };

        ErrorResponse {
            code: self.error_code().to_string(),
            message,
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            ShopError::NotFound { kind, id }
            | ShopError::AlreadyDisabled { kind, id }
            | ShopError::AlreadyEnabled { kind, id } => Some(serde_json::json!({
                "kind": kind,
                "id": id.to_string(),
            })),
            ShopError::Validation(ValidationError::FieldErrors(errors)) => {
                Some(serde_json::json!({ "fields": errors }))
            }
            _ => None,
        }
    }
}

impl ValidationError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ValidationError::FieldErrors(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::FieldErrors(_) => "VALIDATION_FAILED",
            ValidationError::InvalidJson { .. } => "INVALID_JSON",
            ValidationError::InvalidId { .. } => "INVALID_ID",
            ValidationError::InvalidFilter { .. } => "INVALID_FILTER",
            ValidationError::InvalidHeader { .. } => "INVALID_HEADER",
        }
    }
}

impl IntoResponse for ShopError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(self.to_response())).into_response()
    }
}

impl From<serde_json::Error> for ShopError {
    fn from(err: serde_json::Error) -> Self {
        ShopError::Validation(ValidationError::InvalidJson {
            message: err.to_string(),
        })
    }
}

/// A specialized Result type for shopfront operations
pub type ShopResult<T> = Result<T, ShopError>;
