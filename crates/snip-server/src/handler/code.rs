use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use serde::Serialize;
use serde_json::Value as Json;
use snip_lib::Evaluator;
use tracing::debug;

use super::Handler;
use crate::envelope::{Request, ResponseEnvelope};
use crate::error::{HandlerError, Result};

#[derive(Serialize)]
struct Placeholder {
    success: bool,
    message: &'static str,
}

#[derive(Serialize)]
struct Rejection {
    success: bool,
    error: &'static str,
}

/// The evaluation route.
///
/// Submissions carry `{"code": "..."}`; the field name is matched without
/// regard to case. Compile and runtime failures are reported with status 200
/// and `"success": false`, a missing snippet with 400.
#[derive(Debug, Clone)]
pub struct CodeHandler {
    evaluator: Arc<Evaluator>,
}

impl CodeHandler {
    pub fn new(evaluator: Arc<Evaluator>) -> Self {
        Self { evaluator }
    }
}

#[async_trait]
impl Handler for CodeHandler {
    async fn on_read(&self, _request: &Request) -> Result<ResponseEnvelope> {
        ResponseEnvelope::json(
            StatusCode::OK,
            &Placeholder {
                success: true,
                message: "Soon",
            },
        )
    }

    async fn on_submit(&self, request: &Request) -> Result<ResponseEnvelope> {
        let Some(code) = code_field(request.body_text()?)? else {
            return ResponseEnvelope::json(
                StatusCode::BAD_REQUEST,
                &Rejection {
                    success: false,
                    error: "Code field is required",
                },
            );
        };

        debug!(bytes = code.len(), "evaluating snippet");
        let evaluator = Arc::clone(&self.evaluator);
        let evaluation =
            tokio::task::spawn_blocking(move || evaluator.evaluate_traced(&code)).await?;
        debug!(
            unit = evaluation.unit.as_deref().unwrap_or("-"),
            outcome = evaluation.result.outcome(),
            "snippet evaluated"
        );

        ResponseEnvelope::json(StatusCode::OK, &evaluation.result)
    }
}

/// The non-empty `code` property of a JSON body, if any.
fn code_field(body: &str) -> Result<Option<String>> {
    let fields = match serde_json::from_str(body)? {
        Json::Object(fields) => fields,
        Json::Null => return Ok(None),
        _ => return Err(HandlerError::NotAnObject),
    };

    let value = fields
        .into_iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("code"))
        .map(|(_, value)| value);

    match value {
        None | Some(Json::Null) => Ok(None),
        Some(Json::String(code)) if code.is_empty() => Ok(None),
        Some(Json::String(code)) => Ok(Some(code)),
        Some(_) => Err(HandlerError::CodeNotString),
    }
}
