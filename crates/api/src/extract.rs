//! Request extractors that reject with the JSON error envelope.
//!
//! axum's own `Query`, `Path` and `Json` answer malformed input with a
//! plain-text body. These wrappers run them unchanged and turn the
//! rejection into `VALIDATION_ERROR`.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use planboard_core::error::CoreError;
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// Query string deserialized into `T`.
#[derive(Debug)]
pub struct ApiQuery<T>(pub T);

/// Path parameters deserialized into `T`.
#[derive(Debug)]
pub struct ApiPath<T>(pub T);

/// JSON request body deserialized into `T`.
#[derive(Debug)]
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection: QueryRejection| invalid(rejection.body_text()))?;
        Ok(ApiQuery(value))
    }
}

impl<T, S> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection: PathRejection| invalid(rejection.body_text()))?;
        Ok(ApiPath(value))
    }
}

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| invalid(rejection.body_text()))?;
        Ok(ApiJson(value))
    }
}

fn invalid(message: String) -> AppError {
    tracing::debug!(%message, "Rejected malformed request");
    CoreError::Validation(message).into()
}
