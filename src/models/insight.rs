use serde::Serialize;

/// Shown until the first insight cycle has run.
pub const INITIAL_INSIGHT_TEXT: &str = "Analyzing your financial data...";

/// Shown whenever the ledger is empty; no fetch happens in that case.
pub const EMPTY_LEDGER_INSIGHT_TEXT: &str = "Add some transactions to see AI financial insights!";

/// The AI advisor panel state. A single instance exists per application,
/// owned and mutated only by the insight scheduler.
#[derive(Debug, Clone, Serialize)]
pub struct InsightState {
    pub text: String,
    pub loading: bool,
}

impl Default for InsightState {
    fn default() -> Self {
        Self {
            text: INITIAL_INSIGHT_TEXT.into(),
            loading: false,
        }
    }
}
