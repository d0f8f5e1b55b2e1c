mod common;

use anyhow::Result;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    middleware::from_fn_with_state,
    routing::get,
    Router,
};
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;

use bilemo_api::middleware::{panic_response, translate_errors};
use common::TestApp;

#[tokio::test]
async fn unknown_api_route_gets_recovery_links() -> Result<()> {
    let app = TestApp::new();
    let res = app.get("/api/does-not-exist", None).await?;

    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.body["success"], false);
    assert_eq!(res.body["message"], "Resource not found");
    assert_eq!(res.link("api_root"), Some("/api"));
    assert_eq!(res.link("products"), Some("/api/products"));
    assert_eq!(res.link("client_profile"), Some("/api/clients"));
    assert_eq!(res.link("client_users"), Some("/api/clients/users"));
    Ok(())
}

#[tokio::test]
async fn paths_outside_the_api_are_left_alone() -> Result<()> {
    let app = TestApp::new();
    let res = app.get("/elsewhere", None).await?;

    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.body["message"], "Resource not found");
    assert!(res.body.get("_links").is_none());
    Ok(())
}

#[tokio::test]
async fn wrong_method_becomes_an_envelope() -> Result<()> {
    let app = TestApp::new();
    let res = app.send(Method::DELETE, "/api/products", None, None).await?;

    assert_eq!(res.status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(res.body["success"], false);
    assert_eq!(res.body["message"], "Method not allowed");
    assert!(res.headers.get(header::ALLOW).is_some());
    assert!(res.body.get("_links").is_none());
    Ok(())
}

#[tokio::test]
async fn panics_are_redacted_with_a_status_link() -> Result<()> {
    let state = TestApp::new().state;
    let router = Router::new()
        .route("/api/boom", get(|| async { panic!("connection string leaked") as () }))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(from_fn_with_state(state.clone(), translate_errors))
        .with_state(state);

    let request = Request::builder().uri("/api/boom").body(Body::empty())?;
    let response = router.oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: serde_json::Value = serde_json::from_slice(&to_bytes(response.into_body(), usize::MAX).await?)?;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "An unexpected error occurred");
    assert_eq!(body["_links"]["api_status"]["href"], "/api/status");
    assert!(!body.to_string().contains("leaked"));
    Ok(())
}
