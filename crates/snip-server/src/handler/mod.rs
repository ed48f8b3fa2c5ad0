//! Per-route request handlers.
//!
//! A handler supports at most two operations: read (GET) and submit (POST).
//! Both default to [`HandlerError::Unsupported`]; routes override what they
//! serve. [`dispatch`] picks the operation from the request method.

mod code;
mod files;

use async_trait::async_trait;
use axum::http::Method;

use crate::envelope::{Request, ResponseEnvelope};
use crate::error::{HandlerError, Result};

pub use code::CodeHandler;
pub use files::FilesHandler;

#[async_trait]
pub trait Handler: Send + Sync {
    async fn on_read(&self, _request: &Request) -> Result<ResponseEnvelope> {
        Err(HandlerError::Unsupported { operation: "read" })
    }

    async fn on_submit(&self, _request: &Request) -> Result<ResponseEnvelope> {
        Err(HandlerError::Unsupported {
            operation: "submit",
        })
    }
}

/// GET reads, POST submits, anything else is a 405.
pub async fn dispatch(handler: &dyn Handler, request: &Request) -> Result<ResponseEnvelope> {
    match request.method {
        Method::GET => handler.on_read(request).await,
        Method::POST => handler.on_submit(request).await,
        _ => Ok(ResponseEnvelope::method_not_allowed()),
    }
}
