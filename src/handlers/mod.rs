pub mod analytics;
pub mod insights;
pub mod transactions;

use axum::routing::{delete, get, post};
use axum::Router;

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        // Ledger CRUD
        .route("/api/transactions", get(transactions::list))
        .route("/api/transactions", post(transactions::create))
        .route("/api/transactions", delete(transactions::clear))
        .route("/api/transactions/:id", delete(transactions::remove))
        // Derived aggregates (JSON for charts)
        .route("/api/stats", get(analytics::stats))
        .route(
            "/api/analytics/category-breakdown",
            get(analytics::category_breakdown),
        )
        .route(
            "/api/analytics/daily-cashflow",
            get(analytics::daily_cashflow),
        )
        // AI advisor panel
        .route("/api/insights", get(insights::show))
        // Health check
        .route("/health", get(health))
}

async fn health() -> &'static str {
    "OK"
}
