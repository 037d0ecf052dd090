use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::models::{NewTransaction, Transaction};
use crate::state::AppState;

pub async fn list(State(state): State<AppState>) -> Json<Vec<Transaction>> {
    Json(state.ledger.snapshot())
}

/// Record a new transaction. The category comes from the caller when given,
/// otherwise from the AI categorizer (which resolves to a per-type fallback
/// on any remote failure, so this handler never fails on AI trouble).
pub async fn create(
    State(state): State<AppState>,
    Json(draft): Json<NewTransaction>,
) -> AppResult<(StatusCode, Json<Transaction>)> {
    if draft.description.trim().is_empty() {
        return Err(AppError::Validation(
            "Description must not be empty".into(),
        ));
    }
    if !draft.amount.is_finite() || draft.amount <= 0.0 {
        return Err(AppError::Validation(
            "Amount must be a positive number".into(),
        ));
    }

    let category = match draft.category.as_deref().map(str::trim) {
        Some(category) if !category.is_empty() => category.to_string(),
        _ => state.ai.categorize(&draft.description, draft.kind).await,
    };

    let transaction = state.ledger.add(draft, category);
    info!(
        id = %transaction.id,
        category = %transaction.category,
        kind = transaction.kind.as_str(),
        "Recorded transaction"
    );

    Ok((StatusCode::CREATED, Json(transaction)))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    if state.ledger.remove(&id) {
        info!(%id, "Deleted transaction");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("No transaction with id {}", id)))
    }
}

pub async fn clear(State(state): State<AppState>) -> StatusCode {
    state.ledger.clear();
    info!("Cleared all transactions");
    StatusCode::NO_CONTENT
}
