use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::services::ai_client::AiSettings;

/// Default Gemini model used for categorization and insights.
pub const DEFAULT_AI_MODEL: &str = "gemini-3-flash-preview";

/// Default endpoint for the Gemini REST API.
pub const DEFAULT_AI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Quiet period after the last ledger change before insights are regenerated.
pub const DEFAULT_INSIGHT_DEBOUNCE_MS: u64 = 2000;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
    pub migrations_path: PathBuf,
    pub static_path: PathBuf,
    pub ai_api_key: String,
    pub ai_base_url: String,
    pub ai_model: String,
    pub insight_debounce: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: env::var("SMARTLEDGER_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("SMARTLEDGER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(7080),
            database_path: env::var("SMARTLEDGER_DATABASE_URL")
                .map(|v| {
                    PathBuf::from(
                        v.strip_prefix("sqlite://")
                            .or_else(|| v.strip_prefix("sqlite:"))
                            .unwrap_or(&v),
                    )
                })
                .unwrap_or_else(|_| PathBuf::from("data/smartledger.db")),
            migrations_path: env::var("SMARTLEDGER_MIGRATIONS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("migrations")),
            static_path: env::var("SMARTLEDGER_STATIC_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("static")),
            // An absent key is allowed: every AI call then resolves to its
            // deterministic fallback instead of going over the network.
            ai_api_key: env::var("GEMINI_API_KEY").unwrap_or_default(),
            ai_base_url: env::var("SMARTLEDGER_AI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_AI_BASE_URL.into()),
            ai_model: env::var("SMARTLEDGER_AI_MODEL")
                .unwrap_or_else(|_| DEFAULT_AI_MODEL.into()),
            insight_debounce: Duration::from_millis(
                env::var("SMARTLEDGER_INSIGHT_DEBOUNCE_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_INSIGHT_DEBOUNCE_MS),
            ),
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn ai_settings(&self) -> AiSettings {
        AiSettings {
            api_key: self.ai_api_key.clone(),
            base_url: self.ai_base_url.clone(),
            model: self.ai_model.clone(),
        }
    }
}
