use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;

use super::Handler;
use crate::assets::{ResolveError, ResourceResolver};
use crate::envelope::{Request, ResponseEnvelope};
use crate::error::Result;

/// Serves static resources. Also the router's fallback.
#[derive(Clone)]
pub struct FilesHandler {
    resolver: Arc<dyn ResourceResolver>,
}

impl FilesHandler {
    pub fn new(resolver: Arc<dyn ResourceResolver>) -> Self {
        Self { resolver }
    }
}

#[async_trait]
impl Handler for FilesHandler {
    async fn on_read(&self, request: &Request) -> Result<ResponseEnvelope> {
        match self.resolver.resolve(&request.path) {
            Ok(resource) => Ok(ResponseEnvelope::resource(resource)),
            Err(err @ ResolveError::NotFound(_)) => {
                Ok(ResponseEnvelope::error(StatusCode::NOT_FOUND, err))
            }
            Err(err) => Err(err.into()),
        }
    }
}
