use std::sync::Arc;

use async_trait::async_trait;
use axum::http::{Method, StatusCode};
use snip_lib::{Evaluator, EvaluatorConfig, FuelLimits};
use snip_server::{
    AssetTable, FILES_ROUTE, Handler, Request, ResponseEnvelope, Result, Router,
};

fn setup(config: EvaluatorConfig) -> (Arc<Evaluator>, Router) {
    let evaluator = Arc::new(Evaluator::new(config));
    let assets = AssetTable::new()
        .with("index.html", "<html>snip</html>")
        .with("app.js", "run();");
    let router = Router::standard(Arc::clone(&evaluator), Arc::new(assets));
    (evaluator, router)
}

fn router() -> Router {
    setup(EvaluatorConfig::default()).1
}

fn text(response: &ResponseEnvelope) -> &str {
    std::str::from_utf8(&response.body).expect("utf-8 body")
}

fn submit(code: &str) -> Request {
    Request::post("/code", serde_json::json!({ "code": code }).to_string())
}

#[tokio::test]
async fn evaluates_a_snippet() {
    let response = router().route(submit("return 2 + 2;")).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.content_type, "application/json");
    insta::assert_snapshot!(text(&response), @r#"
    {
      "success": true,
      "result": 4
    }
    "#);
}

#[tokio::test]
async fn code_field_is_case_insensitive() {
    let response = router()
        .route(Request::post("/code", r#"{"CODE": "return \"hi\";"}"#))
        .await;

    insta::assert_snapshot!(text(&response), @r#"
    {
      "success": true,
      "result": "hi"
    }
    "#);
}

#[tokio::test]
async fn missing_code_is_rejected_before_evaluation() {
    let (evaluator, router) = setup(EvaluatorConfig::default());

    for body in [r#"{}"#, r#"{"code": ""}"#, r#"{"code": null}"#, "null"] {
        let response = router.route(Request::post("/code", body)).await;

        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{body}");
        insta::allow_duplicates! {
            insta::assert_snapshot!(text(&response), @r#"
            {
              "success": false,
              "error": "Code field is required"
            }
            "#);
        }
    }
    assert_eq!(evaluator.units_compiled(), 0);
}

#[tokio::test]
async fn compile_failure_is_reported_with_ok_status() {
    let response = router().route(submit("return y")).await;

    assert_eq!(response.status, StatusCode::OK);
    insta::assert_snapshot!(text(&response), @r#"
    {
      "success": false,
      "error": "Compilation failed",
      "details": [
        "(1,9): error: expected `;`"
      ]
    }
    "#);
}

#[tokio::test]
async fn runtime_failure_is_reported_with_ok_status() {
    let response = router()
        .route(submit(r#"throw new Exception("boom");"#))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    insta::assert_snapshot!(text(&response), @r#"
    {
      "success": false,
      "error": "Runtime error",
      "details": "boom"
    }
    "#);
}

#[tokio::test]
async fn infinite_loop_runs_out_of_fuel() {
    let config = EvaluatorConfig::new().limits(FuelLimits::new().exec_fuel(10_000));
    let (_, router) = setup(config);

    let response = router.route(submit("while (true) { }")).await;

    insta::assert_snapshot!(text(&response), @r#"
    {
      "success": false,
      "error": "Runtime error",
      "details": "execution limit exceeded (10000 steps)"
    }
    "#);
}

#[tokio::test]
async fn read_on_code_route_is_a_placeholder() {
    let response = router().route(Request::get("/code")).await;

    assert_eq!(response.status, StatusCode::OK);
    insta::assert_snapshot!(text(&response), @r#"
    {
      "success": true,
      "message": "Soon"
    }
    "#);
}

#[tokio::test]
async fn root_serves_index() {
    let response = router().route(Request::get("/")).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.content_type, "text/html");
    assert_eq!(text(&response), "<html>snip</html>");
}

#[tokio::test]
async fn files_route_serves_resources() {
    let response = router().route(Request::get("/files/App.js")).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.content_type, "text/javascript");
    assert_eq!(text(&response), "run();");
}

#[tokio::test]
async fn unknown_route_falls_back_to_resources() {
    let response = router().route(Request::get("/nonexistent/path")).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    insta::assert_snapshot!(text(&response), @r#"
    {
      "error": "Resource not found: nonexistent/path"
    }
    "#);
}

#[tokio::test]
async fn unsupported_methods_are_rejected_on_every_route() {
    let router = router();

    for path in ["/code", "/files/app.js", "/", "/nonexistent"] {
        for method in [Method::DELETE, Method::PUT, Method::PATCH] {
            let response = router.route(Request::new(method, path, "")).await;

            assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED, "{path}");
            assert_eq!(response.allow, Some("GET, POST"));
            assert_eq!(
                text(&response),
                "{\n  \"error\": \"Only GET and POST methods supported\"\n}"
            );
        }
    }
}

#[tokio::test]
async fn submit_on_files_route_is_unsupported() {
    let response = router().route(Request::post("/files/app.js", "x")).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    insta::assert_snapshot!(text(&response), @r#"
    {
      "error": "submit is not supported on this route"
    }
    "#);
}

#[tokio::test]
async fn malformed_bodies_reach_the_failure_boundary() {
    let router = router();

    let response = router.route(Request::post("/code", "{")).await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(text(&response).contains("EOF while parsing"), "{}", text(&response));

    let response = router.route(Request::post("/code", r#"{"code": 42}"#)).await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    insta::assert_snapshot!(text(&response), @r#"
    {
      "error": "the `code` field must be a string"
    }
    "#);

    let response = router.route(Request::post("/code", "[1, 2]")).await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    insta::assert_snapshot!(text(&response), @r#"
    {
      "error": "request body must be a JSON object"
    }
    "#);

    let response = router.route(Request::post("/code", vec![0xc3, 0x28])).await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(text(&response).contains("not valid UTF-8"));
}

#[tokio::test]
async fn path_traversal_is_an_internal_error() {
    let response = router().route(Request::get("/files/../Cargo.toml")).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    insta::assert_snapshot!(text(&response), @r#"
    {
      "error": "invalid resource path: /files/../Cargo.toml"
    }
    "#);
}

struct Exploding;

#[async_trait]
impl Handler for Exploding {
    async fn on_read(&self, _request: &Request) -> Result<ResponseEnvelope> {
        panic!("kaboom");
    }
}

#[tokio::test]
async fn panicking_handler_becomes_internal_error() {
    let router = Router::new(FILES_ROUTE).register("explode", Exploding);

    let response = router.route(Request::get("/explode")).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    insta::assert_snapshot!(text(&response), @r#"
    {
      "error": "kaboom"
    }
    "#);
}

#[tokio::test]
async fn missing_fallback_handler_becomes_internal_error() {
    let router = Router::new(FILES_ROUTE).register("explode", Exploding);

    let response = router.route(Request::get("/elsewhere")).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    insta::assert_snapshot!(text(&response), @r#"
    {
      "error": "no handler registered for route `files`"
    }
    "#);
}

#[tokio::test]
async fn same_snippet_twice_compiles_two_units() {
    let (evaluator, router) = setup(EvaluatorConfig::default());

    let first = router.route(submit("return 6 * 7;")).await;
    let second = router.route(submit("return 6 * 7;")).await;

    assert_eq!(first, second);
    assert_eq!(evaluator.units_compiled(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_submissions_get_their_own_results() {
    let router = Arc::new(router());

    let requests = (0..8i64).map(|i| {
        let router = Arc::clone(&router);
        async move {
            let response = router.route(submit(&format!("return {i} * {i};"))).await;
            (i, response)
        }
    });
    let responses = futures::future::join_all(requests).await;

    for (i, response) in responses {
        let body: serde_json::Value = serde_json::from_slice(&response.body).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["result"], i * i);
    }
}
