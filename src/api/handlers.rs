//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::AppState;
use super::types::{DesignResponse, ErrorResponse, SimulationResponse, YearlyQuery};
use crate::sim::types::YearlyPrediction;

/// Returns the array design and safety verdict.
///
/// `GET /design` → 200 + `DesignResponse` JSON
pub async fn get_design(State(state): State<Arc<AppState>>) -> Json<DesignResponse> {
    Json(DesignResponse::from(&state.result.design))
}

/// Returns the economic summary and KPIs.
///
/// `GET /simulation` → 200 + `SimulationResponse` JSON
pub async fn get_simulation(State(state): State<Arc<AppState>>) -> Json<SimulationResponse> {
    Json(SimulationResponse::new(&state.result.simulation, &state.config))
}

/// Returns yearly predictions, optionally filtered by year range.
///
/// `GET /yearly` → 200 + `Vec<YearlyPrediction>` JSON
/// `GET /yearly?from=N&to=M` → filtered range (inclusive)
/// `GET /yearly?from=10&to=5` → 400 + `ErrorResponse`
pub async fn get_yearly(
    State(state): State<Arc<AppState>>,
    Query(query): Query<YearlyQuery>,
) -> impl IntoResponse {
    let from = query.from.unwrap_or(1);
    let to = query.to.unwrap_or(u32::MAX);

    if from > to {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("`from` ({from}) must be <= `to` ({to})"),
            }),
        ));
    }

    let records: Vec<YearlyPrediction> = state
        .result
        .simulation
        .yearly
        .iter()
        .filter(|y| y.year >= from && y.year <= to)
        .cloned()
        .collect();

    Ok(Json(records))
}
