use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use stockfolio_core::errors::Error as CoreError;
use stockfolio_core::indices::IndexError;
use thiserror::Error;

/// Failure of a page request. Rendered as a short plain-text body, never a
/// partially built page.
#[derive(Error, Debug)]
pub enum PageError {
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    /// A collaborator or index host failed; the message is shown as is.
    #[error("{0}")]
    Upstream(String),
    #[error("{0}")]
    Internal(String),
}

impl PageError {
    /// Wraps a core error raised while talking to a collaborator so the user
    /// sees `"<prefix>: <detail>"`.
    pub fn upstream(prefix: &str, err: CoreError) -> Self {
        match err {
            CoreError::Collaborator(e) => PageError::Upstream(format!("{}: {}", prefix, e.detail())),
            other => PageError::Core(other),
        }
    }

    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            PageError::Core(e) => match e {
                CoreError::Validation(inner) => (StatusCode::BAD_REQUEST, inner.to_string()),
                CoreError::NotFound(message) => (StatusCode::NOT_FOUND, message.clone()),
                CoreError::Index(inner @ IndexError::UnknownIndex(_)) => {
                    (StatusCode::BAD_REQUEST, inner.to_string())
                }
                CoreError::Index(inner) => (StatusCode::BAD_GATEWAY, inner.to_string()),
                CoreError::Collaborator(inner) => (StatusCode::BAD_GATEWAY, inner.detail()),
                CoreError::Database(_) | CoreError::Unexpected(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                ),
            },
            PageError::BadRequest(message) => (StatusCode::BAD_REQUEST, message.clone()),
            PageError::NotFound(message) => (StatusCode::NOT_FOUND, message.clone()),
            PageError::Upstream(message) => (StatusCode::BAD_GATEWAY, message.clone()),
            PageError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        }
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        if status.is_server_error() && status != StatusCode::BAD_GATEWAY {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::warn!("Request rejected ({}): {}", status.as_u16(), message);
        }
        (status, message).into_response()
    }
}

pub type PageResult<T> = Result<T, PageError>;
