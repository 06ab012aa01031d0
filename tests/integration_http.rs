//! HTTP client tests against a local fixture server.

mod common;

use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use serde_json::json;

use smartgrid_dash::client::{EvaluationSource, FetchError, HttpSource};
use smartgrid_dash::controller::{CONNECTION_FAILURE_NOTICE, Dashboard, Settlement};
use smartgrid_dash::model::EvaluationResponse;

use common::sample_result;

/// Serves `app` on an ephemeral port and returns its address.
async fn spawn_server(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fixture server");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

fn source_for(addr: SocketAddr) -> HttpSource {
    HttpSource::new(
        format!("http://{addr}/api/evaluate"),
        Duration::from_secs(5),
    )
}

/// Runs the blocking client off the async runtime.
async fn fetch(source: HttpSource) -> Result<EvaluationResponse, FetchError> {
    tokio::task::spawn_blocking(move || source.fetch())
        .await
        .expect("fetch task panicked")
}

#[tokio::test(flavor = "multi_thread")]
async fn completed_result_is_decoded() {
    let expected = sample_result();
    let body = serde_json::to_value(&expected).expect("serialize fixture");
    let app = Router::new().route(
        "/api/evaluate",
        get(move || {
            let body = body.clone();
            async move { axum::Json(body) }
        }),
    );
    let addr = spawn_server(app).await;

    let resp = fetch(source_for(addr)).await;
    let Ok(EvaluationResponse::Completed(result)) = resp else {
        panic!("expected a completed result, got {resp:?}");
    };
    assert_eq!(result.timestamps, expected.timestamps);
    for ((name, got), (_, want)) in result.series().into_iter().zip(expected.series()) {
        assert_eq!(got.len(), want.len(), "{name} length");
        assert!(
            got.iter().zip(want).all(|(a, b)| (a - b).abs() < 1e-9),
            "{name} values differ"
        );
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn error_body_with_404_is_application_error() {
    let app = Router::new().route(
        "/api/evaluate",
        get(|| async {
            (
                StatusCode::NOT_FOUND,
                axum::Json(json!({"error": "Model not found. Please train the agent first."})),
            )
        }),
    );
    let addr = spawn_server(app).await;

    let resp = fetch(source_for(addr)).await;
    assert!(matches!(
        resp,
        Ok(EvaluationResponse::Failed(ref m)) if m == "Model not found. Please train the agent first."
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn error_body_with_200_is_application_error() {
    let app = Router::new().route(
        "/api/evaluate",
        get(|| async { axum::Json(json!({"error": "bad config"})) }),
    );
    let addr = spawn_server(app).await;

    let resp = fetch(source_for(addr)).await;
    assert!(matches!(resp, Ok(EvaluationResponse::Failed(ref m)) if m == "bad config"));
}

#[tokio::test(flavor = "multi_thread")]
async fn non_json_500_is_status_error() {
    let app = Router::new().route(
        "/api/evaluate",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error") }),
    );
    let addr = spawn_server(app).await;

    let resp = fetch(source_for(addr)).await;
    assert!(matches!(resp, Err(FetchError::Status { status: 500, .. })));
}

#[tokio::test(flavor = "multi_thread")]
async fn malformed_200_is_parse_error() {
    let app = Router::new().route(
        "/api/evaluate",
        get(|| async { "{\"timestamps\": [0, 1], \"load\": [" }),
    );
    let addr = spawn_server(app).await;

    let resp = fetch(source_for(addr)).await;
    assert!(matches!(resp, Err(FetchError::Parse(_))));
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_route_is_status_error() {
    let addr = spawn_server(Router::new()).await;

    let resp = fetch(source_for(addr)).await;
    assert!(matches!(resp, Err(FetchError::Status { status: 404, .. })));
}

#[tokio::test(flavor = "multi_thread")]
async fn refused_connection_is_transport_error() {
    // Bind then drop to obtain a port with nothing listening.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind probe");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let resp = fetch(source_for(addr)).await;
    assert!(matches!(resp, Err(FetchError::Transport { .. })));
}

#[tokio::test(flavor = "multi_thread")]
async fn dashboard_over_http_surfaces_generic_notice() {
    let addr = spawn_server(Router::new()).await;
    let source = source_for(addr);

    let (settlement, notice) = tokio::task::spawn_blocking(move || {
        let mut dashboard = Dashboard::initialize();
        let s = dashboard.run_evaluation(&source);
        (s, dashboard.notice().map(str::to_string))
    })
    .await
    .expect("dashboard task panicked");

    assert_eq!(settlement, Settlement::Failed);
    assert_eq!(notice.as_deref(), Some(CONNECTION_FAILURE_NOTICE));
}
