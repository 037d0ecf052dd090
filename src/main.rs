use axum::Router;
use smartledger::config::Config;
use smartledger::db::{create_pool, migrations};
use smartledger::handlers;
use smartledger::ledger::LedgerStore;
use smartledger::services::ai_client::AiClient;
use smartledger::services::insight_scheduler::InsightScheduler;
use smartledger::state::AppState;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "smartledger=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    tracing::info!(
        "Starting Smartledger v{} on {}",
        smartledger::VERSION,
        config.address()
    );

    let db = create_pool(&config.database_path).expect("Failed to create database pool");

    {
        let conn = db.get().expect("Failed to get database connection");
        migrations::run_migrations(&conn, &config.migrations_path)
            .expect("Failed to run migrations");
    }

    let ledger = LedgerStore::load(db.clone());
    tracing::info!(transactions = ledger.len(), "Ledger ready");

    if config.ai_api_key.is_empty() {
        tracing::warn!("GEMINI_API_KEY not set; AI categories and insights will use fallbacks");
    }

    let ai = AiClient::new(config.ai_settings()).expect("Failed to create AI client");
    let insights = InsightScheduler::spawn(
        ledger.subscribe(),
        Arc::new(ai.clone()),
        config.insight_debounce,
    );

    let state = AppState {
        db,
        config: Arc::new(config.clone()),
        ledger,
        ai,
        insights,
    };

    let app = Router::new()
        .merge(handlers::routes())
        .nest_service("/static", ServeDir::new(&config.static_path))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = TcpListener::bind(config.address())
        .await
        .expect("Failed to bind address");

    tracing::info!("Listening on http://{}", config.address());

    axum::serve(listener, app).await.expect("Server error");
}
