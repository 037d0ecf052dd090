use axum::extract::{Query, State};
use axum::response::Json;
use serde::Deserialize;

use crate::services::aggregate::{
    self, CategoryTotal, DailyCashFlow, DerivedStats, DAILY_SERIES_WINDOW,
};
use crate::state::AppState;

pub async fn stats(State(state): State<AppState>) -> Json<DerivedStats> {
    Json(aggregate::stats(&state.ledger.snapshot()))
}

pub async fn category_breakdown(State(state): State<AppState>) -> Json<Vec<CategoryTotal>> {
    Json(aggregate::category_breakdown(&state.ledger.snapshot()))
}

#[derive(Debug, Deserialize)]
pub struct DailyCashFlowParams {
    pub window: Option<usize>,
}

pub async fn daily_cashflow(
    State(state): State<AppState>,
    Query(params): Query<DailyCashFlowParams>,
) -> Json<Vec<DailyCashFlow>> {
    let window = params.window.unwrap_or(DAILY_SERIES_WINDOW);
    Json(aggregate::daily_series(&state.ledger.snapshot(), window))
}
