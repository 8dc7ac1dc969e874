//! Integration tests for the REST API feature.

#![cfg(feature = "api")]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::util::ServiceExt;

use pv_designer::api::{AppState, router};
use pv_designer::config::ProjectConfig;
use pv_designer::pipeline::compute;

fn build_api_state(config: ProjectConfig) -> Arc<AppState> {
    let result = compute(&config);
    Arc::new(AppState { config, result })
}

async fn get_json(state: Arc<AppState>, uri: &str) -> (StatusCode, serde_json::Value) {
    let app = router(state);
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn design_endpoint_matches_pipeline() {
    let state = build_api_state(ProjectConfig::ppa_itc());
    let expected = state.result.design.array;

    let (status, json) = get_json(Arc::clone(&state), "/design").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["array"]["series_modules"], expected.series_modules);
    assert_eq!(json["array"]["parallel_strings"], expected.parallel_strings);
    assert_eq!(json["array"]["total_modules"], expected.total_modules);
    assert_eq!(json["inverter_count"], state.result.design.inverter_count);
}

#[tokio::test]
async fn simulation_endpoint_reports_ppa_economics() {
    let state = build_api_state(ProjectConfig::ppa_itc());
    let (status, json) = get_json(Arc::clone(&state), "/simulation").await;
    assert_eq!(status, StatusCode::OK);

    let roi = json["kpi"]["roi"].as_f64().unwrap();
    assert!((roi - state.result.simulation.kpis.roi).abs() < 1e-9);
    assert_eq!(json["config"]["economic"]["ppa_enabled"], true);
    assert_eq!(json["sensitivity"].as_array().map(Vec::len), Some(3));
    assert_eq!(
        json["loss_waterfall"][0]["label"],
        serde_json::Value::from("Nominal")
    );
}

#[tokio::test]
async fn monthly_project_reports_monthly_mode() {
    let state = build_api_state(ProjectConfig::monthly());
    let (status, json) = get_json(state, "/simulation").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["generation_mode"], "monthly");
    assert_eq!(json["monthly_generation"].as_array().map(Vec::len), Some(12));
}

#[tokio::test]
async fn yearly_open_ended_range() {
    let state = build_api_state(ProjectConfig::baseline());
    let (status, json) = get_json(state, "/yearly?from=18").await;
    assert_eq!(status, StatusCode::OK);
    let years: Vec<u64> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|y| y["year"].as_u64().unwrap())
        .collect();
    assert_eq!(years, vec![18, 19, 20]);
}

#[tokio::test]
async fn yearly_cumulative_matches_final_cash_flow() {
    let state = build_api_state(ProjectConfig::baseline());
    let expected = state.result.simulation.final_cumulative_cash_flow();
    let (_, json) = get_json(state, "/yearly?from=20&to=20").await;
    let last = json[0]["cumulative_cash_flow"].as_f64().unwrap();
    assert!((last - expected).abs() < 1e-6);
}

#[tokio::test]
async fn yearly_reversed_range_is_rejected() {
    let state = build_api_state(ProjectConfig::baseline());
    let (status, json) = get_json(state, "/yearly?from=12&to=3").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("from"));
}

#[tokio::test]
async fn unknown_route_is_404() {
    let app = router(build_api_state(ProjectConfig::baseline()));
    let req = Request::builder().uri("/nope").body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
