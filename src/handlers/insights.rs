use axum::extract::State;
use axum::response::Json;

use crate::models::InsightState;
use crate::state::AppState;

pub async fn show(State(state): State<AppState>) -> Json<InsightState> {
    Json(state.insights.state())
}
