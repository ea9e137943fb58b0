use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use serde::Serialize;

use crate::rooms::PolicyError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    MissingFields(Vec<&'static str>),
    NotFound(String),
    Forbidden(String),
    Unauthorized,
    BadRequest(anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(rename = "emptyFields", skip_serializing_if = "Option::is_none")]
    empty_fields: Option<Vec<&'static str>>,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        use AppError::*;
        match self {
            MissingFields(_) | BadRequest(_) => StatusCode::BAD_REQUEST,
            NotFound(_) => StatusCode::NOT_FOUND,
            Forbidden(_) => StatusCode::FORBIDDEN,
            Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }

    /// Fails with every name in `fields` whose value is absent.
    pub fn check_fields<const N: usize>(fields: [(&'static str, bool); N]) -> AppResult<()> {
        let empty: Vec<_> = fields
            .into_iter()
            .filter_map(|(name, present)| (!present).then_some(name))
            .collect();

        if empty.is_empty() {
            Ok(())
        } else {
            Err(AppError::MissingFields(empty))
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            AppError::MissingFields(fields) => ErrorBody {
                error: "Please fill in all the fields".to_owned(),
                empty_fields: Some(fields),
            },
            AppError::NotFound(msg) | AppError::Forbidden(msg) => ErrorBody {
                error: msg,
                empty_fields: None,
            },
            AppError::Unauthorized => ErrorBody {
                error: "Request is not authorized".to_owned(),
                empty_fields: None,
            },
            AppError::BadRequest(err) => {
                tracing::warn!(error = %err, "request failed");
                ErrorBody {
                    error: err.to_string(),
                    empty_fields: None,
                }
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<PolicyError> for AppError {
    fn from(err: PolicyError) -> Self {
        use PolicyError::*;
        match err {
            MissingFields(fields) => AppError::MissingFields(fields),
            NotFound(_) => AppError::NotFound(err.to_string()),
            Forbidden(_) => AppError::Forbidden(err.to_string()),
            InvalidRole(_) => AppError::BadRequest(anyhow::Error::from(err)),
        }
    }
}

impl From<String> for AppError {
    fn from(err: String) -> Self {
        Self::BadRequest(anyhow::Error::msg(err))
    }
}

impl From<&str> for AppError {
    fn from(err: &str) -> Self {
        Self::BadRequest(anyhow::Error::msg(err.to_owned()))
    }
}

macro_rules! apperr_impl {
    ($E:ty) => {
        impl From<$E> for AppError {
            fn from(err: $E) -> Self {
                Self::BadRequest(anyhow::Error::from(err))
            }
        }
    };
}

apperr_impl!(anyhow::Error);
apperr_impl!(serde_json::Error);
apperr_impl!(sqlx::Error);
apperr_impl!(tower_sessions::session::Error);
apperr_impl!(uuid::Error);
