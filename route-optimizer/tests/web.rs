//! HTTP API tests against the bundled fixture.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use route_optimizer::cache::CacheConfig;
use route_optimizer::domain::StopCode;
use route_optimizer::graph::{MockGraphClient, PathEngine};
use route_optimizer::planner::PlannerConfig;
use route_optimizer::web::{AppState, create_router};
use serde_json::Value;
use tower::Service;

fn test_state(config: PlannerConfig) -> AppState {
    let engine = PathEngine::from(MockGraphClient::from_file("data/mock_paths.json").unwrap());
    AppState::new(
        engine,
        &CacheConfig::default(),
        config,
        StopCode::parse("DFW").unwrap(),
    )
}

fn submit(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/submit-airports")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_is_ok() {
    let mut app = create_router(test_state(PlannerConfig::default()));

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = app.call(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn airport_catalog_lists_fixture_airports() {
    let mut app = create_router(test_state(PlannerConfig::default()));

    let request = Request::builder()
        .uri("/api/data/airport")
        .body(Body::empty())
        .unwrap();
    let response = app.call(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    let airports = json.as_array().unwrap();
    assert_eq!(airports.len(), 4);
    assert_eq!(airports[1]["code"], "DFW");
    assert_eq!(airports[1]["country"], "United States");
    assert_eq!(airports[1]["city"], "Dallas-Fort Worth");
    assert!(airports[1]["latitude"].is_f64());
    assert!(airports[1]["longitude"].is_f64());
}

#[tokio::test]
async fn submit_plans_from_default_origin() {
    let mut app = create_router(test_state(PlannerConfig::default()));

    let response = app
        .call(submit(r#"{"selectedCodes": ["IAH", "YYZ", "AMS"]}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    let route = json["route"].as_array().unwrap();
    assert_eq!(route.len(), 3);
    assert_eq!(route[0][0], "DFW");
    assert!(json["total_duration"].as_f64().unwrap() <= 14.25);
    assert!(json["total_value"].is_f64());
}

#[tokio::test]
async fn submit_honours_origin_override() {
    let mut app = create_router(test_state(PlannerConfig::default()));

    let response = app
        .call(submit(r#"{"selectedCodes": ["DFW"], "origin": "IAH"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["route"][0][0], "IAH");
}

#[tokio::test]
async fn invalid_selection_is_bad_request() {
    let mut app = create_router(test_state(PlannerConfig::default()));

    let response = app
        .call(submit(r#"{"selectedCodes": ["IAH", "IAH"]}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert!(json["error"].as_str().unwrap().starts_with("invalid input"));
    assert!(json.get("route").is_none());
}

#[tokio::test]
async fn empty_selection_is_bad_request() {
    let mut app = create_router(test_state(PlannerConfig::default()));

    let response = app.call(submit(r#"{"selectedCodes": []}"#)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn tight_budget_is_unprocessable() {
    let config = PlannerConfig::default().with_max_duration(0.5);
    let mut app = create_router(test_state(config));

    let response = app
        .call(submit(r#"{"selectedCodes": ["IAH", "AMS"]}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = json_body(response).await;
    assert!(
        json["error"]
            .as_str()
            .unwrap()
            .starts_with("no route found that meets the constraints")
    );
}

#[tokio::test]
async fn oversized_search_is_payload_too_large() {
    let config = PlannerConfig::default().with_max_itineraries(1);
    let mut app = create_router(test_state(config));

    let response = app
        .call(submit(r#"{"selectedCodes": ["IAH", "AMS"]}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn repeated_submissions_share_the_path_cache() {
    let state = test_state(PlannerConfig::default());
    let mut app = create_router(state.clone());

    let body = r#"{"selectedCodes": ["IAH", "YYZ"]}"#;
    let first = json_body(app.call(submit(body)).await.unwrap()).await;
    let second = json_body(app.call(submit(body)).await.unwrap()).await;
    assert_eq!(first, second);

    // DFW-IAH, DFW-YYZ, IAH-YYZ, YYZ-IAH
    state.paths.run_pending_tasks().await;
    assert_eq!(state.paths.entry_count(), 4);
}
