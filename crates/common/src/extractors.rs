//! Request body extraction for the chat and video handlers

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::Error;

/// JSON body that has passed its `validator` rules.
///
/// A body that is missing, malformed, lacks a required field, or breaks a
/// rule such as a non-empty `room_name` is answered with 400
/// `VALIDATION_ERROR` before the handler runs, so no credentials are
/// resolved and no provider call is made.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

#[derive(Debug)]
pub enum ValidatedJsonRejection {
    /// The body did not deserialize into the request type
    Json(JsonRejection),
    /// The body deserialized but a field rule failed
    Validation(Error),
}

impl IntoResponse for ValidatedJsonRejection {
    fn into_response(self) -> Response {
        let error = match self {
            ValidatedJsonRejection::Json(e) => Error::Validation(e.body_text()),
            ValidatedJsonRejection::Validation(e) => e,
        };
        error.into_response()
    }
}

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidatedJsonRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(ValidatedJsonRejection::Json)?;
        value.validate().map_err(|e| {
            ValidatedJsonRejection::Validation(Error::Validation(format!(
                "Validation failed: {}",
                e
            )))
        })?;
        Ok(ValidatedJson(value))
    }
}
