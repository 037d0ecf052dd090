//! Gemini-backed categorization and insight generation.
//!
//! Both calls are single best-effort attempts with a hard timeout. Failures
//! never leave this module: the public methods resolve every error to a
//! deterministic fallback string, so callers cannot observe a remote outage
//! as anything but a generic category or an apology line.

use crate::error::{AppError, AppResult};
use crate::models::{Transaction, TransactionType};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Number of trailing transactions included in the insight prompt.
pub const INSIGHT_HISTORY_LIMIT: usize = 20;

/// Returned when insight generation fails for any reason.
pub const INSIGHT_FALLBACK_TEXT: &str = "Unable to generate insights at the moment.";

const CATEGORY_MAX_OUTPUT_TOKENS: i32 = 20;
const CATEGORY_TEMPERATURE: f64 = 0.1;

#[derive(Debug, Error)]
enum AiError {
    #[error("API key is not configured")]
    Unconfigured,

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("empty or unusable response")]
    EmptyResponse,
}

#[derive(Debug, Clone)]
pub struct AiSettings {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

impl AiSettings {
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

#[derive(Clone)]
pub struct AiClient {
    client: Client,
    settings: AiSettings,
}

impl AiClient {
    pub fn new(settings: AiSettings) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client, settings })
    }

    /// Map a free-text description to a short category label. Any failure
    /// (unconfigured key, network, non-2xx, unusable response) resolves to
    /// the per-type fallback; this never errors and never retries.
    pub async fn categorize(&self, description: &str, kind: TransactionType) -> String {
        match self.try_categorize(description, kind).await {
            Ok(category) => category,
            Err(e) => {
                warn!(error = %e, kind = kind.as_str(), "Categorization failed, using fallback");
                kind.fallback_category().to_string()
            }
        }
    }

    async fn try_categorize(
        &self,
        description: &str,
        kind: TransactionType,
    ) -> Result<String, AiError> {
        let prompt = format!(
            "Categorize this {} transaction description into a single short English word \
             (e.g., Food, Transport, Salary, Rent, Shopping, Entertainment, Healthcare, Bills): \
             \"{}\". Return only the category name.",
            kind.as_str(),
            description
        );

        let text = self
            .generate(
                &prompt,
                Some(GenerationConfig {
                    max_output_tokens: CATEGORY_MAX_OUTPUT_TOKENS,
                    temperature: CATEGORY_TEMPERATURE,
                }),
            )
            .await?;

        let category = sanitize_category(&text);
        if category.is_empty() {
            return Err(AiError::EmptyResponse);
        }
        Ok(category)
    }

    /// Summarize the trailing transactions into at most three sentences plus
    /// one savings tip. Same failure contract as [`categorize`]: a fixed
    /// apology string comes back instead of an error.
    ///
    /// [`categorize`]: AiClient::categorize
    pub async fn insights(&self, transactions: &[Transaction]) -> String {
        match self.try_insights(transactions).await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "Insight generation failed, using fallback");
                INSIGHT_FALLBACK_TEXT.to_string()
            }
        }
    }

    async fn try_insights(&self, transactions: &[Transaction]) -> Result<String, AiError> {
        let prompt = format!(
            "Act as a professional financial advisor. Analyze the following recent transaction \
             history and provide a concise summary (max 3 sentences) of spending habits and one \
             specific tip for saving money. Answer in English.\nHistory:\n{}",
            history_block(transactions)
        );

        self.generate(&prompt, None).await
    }

    async fn generate(
        &self,
        prompt: &str,
        generation_config: Option<GenerationConfig>,
    ) -> Result<String, AiError> {
        if !self.settings.is_configured() {
            return Err(AiError::Unconfigured);
        }

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.settings.base_url.trim_end_matches('/'),
            self.settings.model
        );

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config,
        };

        debug!(model = %self.settings.model, "Sending generateContent request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.settings.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::Status { status, body });
        }

        let response: GenerateResponse = response.json().await?;
        let text = response
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| {
                c.parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default();

        let text = text.trim();
        if text.is_empty() {
            return Err(AiError::EmptyResponse);
        }
        Ok(text.to_string())
    }
}

/// One line per transaction, trailing `INSIGHT_HISTORY_LIMIT` entries of the
/// ledger sequence: `{date}: {+|-}{amount} ({description} - {category})`.
fn history_block(transactions: &[Transaction]) -> String {
    let start = transactions.len().saturating_sub(INSIGHT_HISTORY_LIMIT);
    transactions[start..]
        .iter()
        .map(|t| {
            let sign = match t.kind {
                TransactionType::Income => '+',
                TransactionType::Expense => '-',
            };
            format!(
                "{}: {}{} ({} - {})",
                t.date,
                sign,
                t.amount_display(),
                t.description,
                t.category
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Keep only word characters and inner whitespace; the model occasionally
/// wraps the category in quotes or trailing punctuation.
fn sanitize_category(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '_')
        .collect::<String>()
        .trim()
        .to_string()
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: i32,
    temperature: f64,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unconfigured_client() -> AiClient {
        AiClient::new(AiSettings {
            api_key: String::new(),
            base_url: "http://127.0.0.1:1".into(),
            model: "test-model".into(),
        })
        .unwrap()
    }

    fn transaction(kind: TransactionType, cents: i64, description: &str) -> Transaction {
        Transaction {
            id: "t1".into(),
            amount_cents: cents,
            description: description.into(),
            kind,
            category: "Food".into(),
            date: "2024-03-05T09:00:00+00:00".into(),
        }
    }

    #[tokio::test]
    async fn categorize_falls_back_when_remote_always_fails() {
        let client = unconfigured_client();
        assert_eq!(
            client.categorize("coffee", TransactionType::Expense).await,
            "General"
        );
        assert_eq!(
            client.categorize("bonus", TransactionType::Income).await,
            "Income"
        );
    }

    #[tokio::test]
    async fn insights_fall_back_when_remote_always_fails() {
        let client = unconfigured_client();
        let ledger = vec![transaction(TransactionType::Expense, 450, "Coffee")];
        assert_eq!(client.insights(&ledger).await, INSIGHT_FALLBACK_TEXT);
    }

    #[test]
    fn sanitize_strips_punctuation_and_whitespace() {
        assert_eq!(sanitize_category("  \"Food.\"\n"), "Food");
        assert_eq!(sanitize_category("Food & Drink"), "Food  Drink");
        assert_eq!(sanitize_category("!?."), "");
    }

    #[test]
    fn history_block_formats_signed_amounts() {
        let ledger = vec![
            transaction(TransactionType::Income, 200000, "Salary"),
            transaction(TransactionType::Expense, 450, "Coffee"),
        ];
        let block = history_block(&ledger);
        assert!(block.contains("+2000.00 (Salary - Food)"));
        assert!(block.contains("-4.50 (Coffee - Food)"));
    }

    #[test]
    fn history_block_limits_to_trailing_window() {
        let ledger: Vec<Transaction> = (0..30)
            .map(|i| transaction(TransactionType::Expense, 100 + i, &format!("item-{i}")))
            .collect();
        let block = history_block(&ledger);
        assert_eq!(block.lines().count(), INSIGHT_HISTORY_LIMIT);
        assert!(block.contains("item-29"));
        assert!(!block.contains("item-9 "));
    }
}
