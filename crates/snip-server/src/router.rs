//! Route table and failure boundary.

use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use axum::http::StatusCode;
use futures::FutureExt;
use snip_lib::Evaluator;
use tracing::{error, info};

use crate::assets::ResourceResolver;
use crate::envelope::{Request, ResponseEnvelope};
use crate::error::{HandlerError, Result};
use crate::handler::{CodeHandler, FilesHandler, Handler, dispatch};

pub const CODE_ROUTE: &str = "code";
pub const FILES_ROUTE: &str = "files";

/// Selects a [`Handler`] by the first path segment.
///
/// Requests without a segment, or with one nothing is registered under, go
/// to the fallback route. The table is fixed once the router is built.
pub struct Router {
    routes: HashMap<String, Arc<dyn Handler>>,
    fallback: String,
}

impl Router {
    pub fn new(fallback: impl Into<String>) -> Self {
        Self {
            routes: HashMap::new(),
            fallback: fallback.into(),
        }
    }

    /// `code` evaluates snippets, `files` (the fallback) serves resources.
    pub fn standard(evaluator: Arc<Evaluator>, resolver: Arc<dyn ResourceResolver>) -> Self {
        Self::new(FILES_ROUTE)
            .register(CODE_ROUTE, CodeHandler::new(evaluator))
            .register(FILES_ROUTE, FilesHandler::new(resolver))
    }

    pub fn register(mut self, key: impl Into<String>, handler: impl Handler + 'static) -> Self {
        self.routes.insert(key.into(), Arc::new(handler));
        self
    }

    pub fn routes(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }

    /// Produces exactly one envelope for the request.
    ///
    /// Handler errors and panics both end up as a 500 `{"error": ...}`.
    pub async fn route(&self, request: Request) -> ResponseEnvelope {
        let started = Instant::now();

        let outcome = AssertUnwindSafe(self.try_route(&request))
            .catch_unwind()
            .await
            .unwrap_or_else(|payload| Err(Failure::Panic(panic_message(payload.as_ref()))));
        let response = match outcome {
            Ok(response) => response,
            Err(failure) => {
                error!(
                    method = %request.method,
                    path = %request.path,
                    error = %failure,
                    "request failed"
                );
                ResponseEnvelope::error(StatusCode::INTERNAL_SERVER_ERROR, failure)
            }
        };

        info!(
            method = %request.method,
            path = %request.path,
            status = response.status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "handled request"
        );
        response
    }

    async fn try_route(&self, request: &Request) -> Result<ResponseEnvelope, Failure> {
        let key = request
            .route_key()
            .filter(|key| self.routes.contains_key(*key))
            .unwrap_or(self.fallback.as_str());
        let handler = self
            .routes
            .get(key)
            .ok_or_else(|| HandlerError::NoRoute(key.to_owned()))?;
        Ok(dispatch(handler.as_ref(), request).await?)
    }
}

#[derive(Debug, thiserror::Error)]
enum Failure {
    #[error(transparent)]
    Handler(#[from] HandlerError),

    #[error("{0}")]
    Panic(String),
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "handler panicked".to_owned()
    }
}
