use crate::config::Config;
use crate::db::DbPool;
use crate::ledger::LedgerStore;
use crate::services::ai_client::AiClient;
use crate::services::insight_scheduler::InsightScheduler;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: Arc<Config>,
    pub ledger: LedgerStore,
    pub ai: AiClient,
    pub insights: InsightScheduler,
}
