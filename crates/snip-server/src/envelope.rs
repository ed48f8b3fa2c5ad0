//! Request and response values exchanged between the router and handlers.

use std::fmt;

use axum::body::Bytes;
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::assets::Resource;
use crate::error::Result;

pub const JSON_CONTENT_TYPE: &str = "application/json";

const ALLOWED_METHODS: &str = "GET, POST";

/// An inbound request, fully buffered.
#[derive(Clone, Debug)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub body: Bytes,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self {
            method,
            path: path.into(),
            body: body.into(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path, Bytes::new())
    }

    pub fn post(path: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self::new(Method::POST, path, body)
    }

    /// First non-empty path segment.
    pub fn route_key(&self) -> Option<&str> {
        self.path.split('/').find(|segment| !segment.is_empty())
    }

    pub fn body_text(&self) -> Result<&str> {
        Ok(std::str::from_utf8(&self.body)?)
    }
}

/// The single response produced for a request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResponseEnvelope {
    pub status: StatusCode,
    pub content_type: &'static str,
    /// Value of the `Allow` header, set on 405 responses only.
    pub allow: Option<&'static str>,
    pub body: Bytes,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl ResponseEnvelope {
    /// Pretty-printed JSON body. Field order follows `Serialize`.
    pub fn json<T: Serialize + ?Sized>(status: StatusCode, body: &T) -> Result<Self> {
        let body = serde_json::to_vec_pretty(body)?;
        Ok(Self {
            status,
            content_type: JSON_CONTENT_TYPE,
            allow: None,
            body: Bytes::from(body),
        })
    }

    /// `{"error": message}`. Never fails.
    pub fn error(status: StatusCode, message: impl fmt::Display) -> Self {
        let message = message.to_string();
        let body = serde_json::to_vec_pretty(&ErrorBody { error: &message }).unwrap_or_default();
        Self {
            status,
            content_type: JSON_CONTENT_TYPE,
            allow: None,
            body: Bytes::from(body),
        }
    }

    pub fn method_not_allowed() -> Self {
        Self {
            allow: Some(ALLOWED_METHODS),
            ..Self::error(
                StatusCode::METHOD_NOT_ALLOWED,
                "Only GET and POST methods supported",
            )
        }
    }

    pub fn resource(resource: Resource) -> Self {
        Self {
            status: StatusCode::OK,
            content_type: resource.content_type,
            allow: None,
            body: resource.bytes,
        }
    }
}

impl IntoResponse for ResponseEnvelope {
    fn into_response(self) -> Response {
        let mut response =
            (self.status, [(header::CONTENT_TYPE, self.content_type)], self.body).into_response();
        if let Some(allow) = self.allow {
            response
                .headers_mut()
                .insert(header::ALLOW, HeaderValue::from_static(allow));
        }
        response
    }
}
