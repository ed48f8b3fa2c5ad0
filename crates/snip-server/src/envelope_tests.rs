use axum::http::{Method, StatusCode, header};
use axum::response::IntoResponse;

use crate::envelope::{Request, ResponseEnvelope};

fn text(envelope: &ResponseEnvelope) -> &str {
    std::str::from_utf8(&envelope.body).unwrap()
}

#[test]
fn route_key_is_first_non_empty_segment() {
    assert_eq!(Request::get("/code").route_key(), Some("code"));
    assert_eq!(Request::get("//files/app.js").route_key(), Some("files"));
    assert_eq!(Request::get("/code/").route_key(), Some("code"));
    assert_eq!(Request::get("/").route_key(), None);
    assert_eq!(Request::get("").route_key(), None);
}

#[test]
fn body_must_be_utf8() {
    let request = Request::new(Method::POST, "/code", vec![0xff, 0xfe]);

    let err = request.body_text().unwrap_err();

    assert!(err.to_string().starts_with("request body is not valid UTF-8"));
}

#[test]
fn error_envelope_is_pretty_json() {
    let envelope = ResponseEnvelope::error(StatusCode::NOT_FOUND, "Resource not found: x");

    assert_eq!(envelope.status, StatusCode::NOT_FOUND);
    assert_eq!(envelope.content_type, "application/json");
    insta::assert_snapshot!(text(&envelope), @r#"
    {
      "error": "Resource not found: x"
    }
    "#);
}

#[test]
fn method_not_allowed_lists_get_and_post() {
    let envelope = ResponseEnvelope::method_not_allowed();

    assert_eq!(envelope.status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(envelope.allow, Some("GET, POST"));
    insta::assert_snapshot!(text(&envelope), @r#"
    {
      "error": "Only GET and POST methods supported"
    }
    "#);
}

#[test]
fn into_response_carries_headers() {
    let response = ResponseEnvelope::method_not_allowed().into_response();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    assert_eq!(response.headers()[header::ALLOW], "GET, POST");
}
