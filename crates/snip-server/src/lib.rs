//! HTTP front end for snippet evaluation.
//!
//! A [`Router`] picks a [`Handler`] by the first path segment of each
//! request. Two routes ship by default: `code` evaluates snippets submitted
//! as JSON, `files` serves the embedded web UI and is also the fallback for
//! unknown paths.
//!
//! The router can be driven directly, without a socket:
//!
//! ```
//! use std::sync::Arc;
//!
//! use snip_lib::{Evaluator, EvaluatorConfig};
//! use snip_server::{AssetTable, Request, Router};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let evaluator = Arc::new(Evaluator::new(EvaluatorConfig::default()));
//! let router = Router::standard(evaluator, Arc::new(AssetTable::embedded()));
//!
//! let response = router.route(Request::post("/code", r#"{"code": "return 2 + 2;"}"#)).await;
//! assert_eq!(response.status, 200);
//! # });
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod assets;
mod config;
mod envelope;
mod error;
pub mod handler;
mod router;
mod server;

#[cfg(test)]
mod envelope_tests;

pub use assets::{AssetTable, ResolveError, Resource, ResourceResolver};
pub use config::{DEFAULT_HOST, DEFAULT_MAX_BODY, DEFAULT_PORT, ServerConfig};
pub use envelope::{JSON_CONTENT_TYPE, Request, ResponseEnvelope};
pub use error::{HandlerError, Result};
pub use handler::{CodeHandler, FilesHandler, Handler, dispatch};
pub use router::{CODE_ROUTE, FILES_ROUTE, Router};
pub use server::{Server, shutdown_signal};
