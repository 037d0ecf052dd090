use chrono::DateTime;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Category used when the AI cannot produce one.
    pub fn fallback_category(&self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Expense => "General",
        }
    }
}

impl FromStr for TransactionType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(()),
        }
    }
}

/// A single ledger entry. Immutable once created; amounts are stored as
/// non-negative integer cents, with the direction carried by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub amount_cents: i64,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub category: String,
    /// RFC 3339 creation timestamp.
    pub date: String,
}

impl Transaction {
    /// Amount with the sign implied by the transaction type.
    pub fn signed_cents(&self) -> i64 {
        match self.kind {
            TransactionType::Income => self.amount_cents,
            TransactionType::Expense => -self.amount_cents,
        }
    }

    pub fn amount_display(&self) -> String {
        format_cents(self.amount_cents)
    }

    /// Day-granularity label for chart bucketing, e.g. "Jan 5".
    pub fn day_label(&self) -> String {
        match DateTime::parse_from_rfc3339(&self.date) {
            Ok(dt) => dt.format("%b %-d").to_string(),
            // Unparseable timestamps keep their calendar-date prefix so they
            // still bucket consistently.
            Err(_) => self.date.chars().take(10).collect(),
        }
    }
}

/// Caller-submitted draft: everything but the id, timestamp and (optionally)
/// the category, which are resolved at creation time.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTransaction {
    pub amount: f64,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// User override; when absent the categorizer decides.
    #[serde(default)]
    pub category: Option<String>,
}

impl NewTransaction {
    pub fn amount_cents(&self) -> i64 {
        (self.amount * 100.0).round() as i64
    }
}

pub fn format_cents(cents: i64) -> String {
    let is_negative = cents < 0;
    let abs_cents = cents.abs();
    let dollars = abs_cents / 100;
    let remainder = abs_cents % 100;

    if is_negative {
        format!("-{}.{:02}", dollars, remainder)
    } else {
        format!("{}.{:02}", dollars, remainder)
    }
}
