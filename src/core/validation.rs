//! Axum extractor for validated payloads
//!
//! `ValidatedJson<T>` deserializes the request body and runs the `validator`
//! rules derived on `T` before the handler sees it.

use crate::core::error::{FieldValidationError, ShopError, ValidationError};
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use validator::Validate;

/// Axum extractor that deserializes and validates a JSON payload
///
/// # Usage
///
/// ```rust,ignore
/// pub async fn create_address(
///     ValidatedJson(draft): ValidatedJson<AddressDraft>,
/// ) -> ShopResult<Json<Address>> {
///     // draft already satisfies its #[validate] rules
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate + Send,
{
    type Rejection = ShopError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<T>::from_request(req, state)
            .await
            .map_err(rejection_to_error)?;

        payload.validate()?;

        Ok(ValidatedJson(payload))
    }
}

fn rejection_to_error(rejection: JsonRejection) -> ShopError {
    match rejection {
        // Well-formed JSON of the wrong shape, including unknown fields
        JsonRejection::JsonDataError(e) => {
            ShopError::Validation(ValidationError::FieldErrors(vec![FieldValidationError {
                field: "body".to_string(),
                message: e.body_text(),
            }]))
        }
        other => ShopError::Validation(ValidationError::InvalidJson {
            message: other.body_text(),
        }),
    }
}
