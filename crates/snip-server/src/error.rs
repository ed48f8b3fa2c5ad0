use thiserror::Error;

use crate::assets::ResolveError;

/// Failures raised below the [`Router`](crate::Router).
///
/// None of these reach the caller as-is: the router turns every one of them
/// into a 500 envelope carrying the display message.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("{operation} is not supported on this route")]
    Unsupported { operation: &'static str },

    #[error("no handler registered for route `{0}`")]
    NoRoute(String),

    #[error("request body is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("request body must be a JSON object")]
    NotAnObject,

    #[error("the `code` field must be a string")]
    CodeNotString,

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("evaluation task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type Result<T, E = HandlerError> = std::result::Result<T, E>;
