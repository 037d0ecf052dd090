pub mod aggregate;
pub mod ai_client;
pub mod insight_scheduler;
