use super::common::*;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use tower::ServiceExt;

use crate::analysis::analysis_router;

fn analyze_request(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

#[tokio::test]
async fn analyze_returns_the_site_report() {
    let app = analysis_router(Arc::new(reference_service()));

    let response = app
        .oneshot(analyze_request(
            "/api/v1/sites/analyze",
            r#"{"address":"400 S State St"}"#,
        ))
        .await
        .expect("router responds");

    let (status, body) = json_body(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["slope_analysis"]["classification"], "gentle");
    assert_eq!(body["risk"]["score"], 2);
    assert_eq!(body["flood"]["zone"], "Data unavailable");
    assert_eq!(body["report_document"]["encoding"], "base64");
}

#[tokio::test]
async fn short_analyze_path_is_an_alias() {
    let app = analysis_router(Arc::new(reference_service()));

    let response = app
        .oneshot(analyze_request("/analyze", r#"{"address":"400 S State St"}"#))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn blank_address_is_unprocessable() {
    let app = analysis_router(Arc::new(reference_service()));

    let response = app
        .oneshot(analyze_request("/analyze", r#"{"address":"  "}"#))
        .await
        .expect("router responds");

    let (status, body) = json_body(response).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "address must not be blank");
}

#[tokio::test]
async fn unknown_address_is_not_found() {
    let service = service_with(
        Arc::new(MissingGeocoder),
        reference_aggregator(unavailable_providers()),
    );
    let app = analysis_router(Arc::new(service));

    let response = app
        .oneshot(analyze_request("/analyze", r#"{"address":"1 Nowhere Ln"}"#))
        .await
        .expect("router responds");

    let (status, body) = json_body(response).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"]
        .as_str()
        .expect("error message")
        .contains("1 Nowhere Ln"));
}

#[tokio::test]
async fn banner_lists_the_endpoints() {
    let app = analysis_router(Arc::new(reference_service()));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router responds");

    let (status, body) = json_body(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"], "site-analyzer");
}
