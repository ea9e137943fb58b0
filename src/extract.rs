use axum::{body::Bytes, extract::{FromRequest, Request}};
use serde::de::DeserializeOwned;

use crate::AppError;

/// JSON body where an empty body reads as `T::default()`.
///
/// Bodies are typed with `Option` fields so handlers can report every
/// missing field at once; see [`AppError::check_fields`].
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|err| AppError::from(err.body_text()))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(JsonBody(T::default()));
        }

        Ok(JsonBody(serde_json::from_slice(&bytes)?))
    }
}

pub fn present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}
