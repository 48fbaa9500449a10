//! Request extractors that validate their payload before a handler runs.

use crate::error::AppError;
use axum::{
    Json,
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Query, Request, rejection::JsonRejection},
    http::{StatusCode, header::CONTENT_TYPE, request::Parts},
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON body deserialized and checked with [`Validate`].
///
/// Malformed JSON is a 400; a body of the wrong shape (missing required field,
/// unknown enum value) and failed validation rules are 422. A body sent without
/// a `Content-Type` header is read as JSON; any other non-JSON content type is
/// a 400.
pub struct ValidatedJson<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = if req.headers().contains_key(CONTENT_TYPE) {
            Json::<T>::from_request(req, state)
                .await
                .map_err(json_rejection_to_error)?
        } else {
            let bytes = Bytes::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(anyhow::anyhow!(e.body_text())))?;
            Json::<T>::from_bytes(&bytes).map_err(json_rejection_to_error)?
        };

        value.validate()?;

        Ok(ValidatedJson(value))
    }
}

/// Query string deserialized and checked with [`Validate`].
pub struct ValidatedQuery<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(anyhow::anyhow!(e.body_text())))?;

        value.validate()?;

        Ok(ValidatedQuery(value))
    }
}

fn json_rejection_to_error(rejection: JsonRejection) -> AppError {
    let message = anyhow::anyhow!(rejection.body_text());
    if rejection.status() == StatusCode::UNPROCESSABLE_ENTITY {
        AppError::UnprocessableEntity(message)
    } else {
        AppError::BadRequest(message)
    }
}
