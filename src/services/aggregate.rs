//! Pure aggregate computations over a ledger snapshot.
//!
//! Everything here is recomputed from scratch on every call. The dataset is
//! a personal ledger; there is nothing to cache.

use crate::models::{Transaction, TransactionType};
use serde::Serialize;

/// Default number of trailing transactions in the daily cash-flow series.
pub const DAILY_SERIES_WINDOW: usize = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DerivedStats {
    pub balance_cents: i64,
    pub total_income_cents: i64,
    pub total_expense_cents: i64,
}

pub fn stats(transactions: &[Transaction]) -> DerivedStats {
    let mut stats = DerivedStats::default();
    for t in transactions {
        match t.kind {
            TransactionType::Income => stats.total_income_cents += t.amount_cents,
            TransactionType::Expense => stats.total_expense_cents += t.amount_cents,
        }
    }
    stats.balance_cents = stats.total_income_cents - stats.total_expense_cents;
    stats
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total_cents: i64,
}

/// Expense totals grouped by category, in first-seen category order.
pub fn category_breakdown(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();

    for t in transactions {
        if t.kind != TransactionType::Expense {
            continue;
        }
        match totals.iter_mut().find(|c| c.category == t.category) {
            Some(entry) => entry.total_cents += t.amount_cents,
            None => totals.push(CategoryTotal {
                category: t.category.clone(),
                total_cents: t.amount_cents,
            }),
        }
    }

    totals
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyCashFlow {
    pub date: String,
    pub income_cents: i64,
    pub expense_cents: i64,
}

/// Income/expense sums per calendar day over the trailing `window` entries
/// of the ledger sequence. Day buckets appear in the order their first
/// contributing transaction is encountered in that slice.
pub fn daily_series(transactions: &[Transaction], window: usize) -> Vec<DailyCashFlow> {
    let start = transactions.len().saturating_sub(window);
    let mut series: Vec<DailyCashFlow> = Vec::new();

    for t in &transactions[start..] {
        let label = t.day_label();
        let idx = match series.iter().position(|d| d.date == label) {
            Some(idx) => idx,
            None => {
                series.push(DailyCashFlow {
                    date: label,
                    income_cents: 0,
                    expense_cents: 0,
                });
                series.len() - 1
            }
        };
        let entry = &mut series[idx];
        match t.kind {
            TransactionType::Income => entry.income_cents += t.amount_cents,
            TransactionType::Expense => entry.expense_cents += t.amount_cents,
        }
    }

    series
}
