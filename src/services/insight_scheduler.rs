//! Debounced, cancelable regeneration of the AI advisor text.
//!
//! A single spawned task subscribes to ledger snapshots and drives a small
//! state machine: wait for a change, debounce it, fetch insights, publish
//! the text. Every incoming snapshot supersedes whatever the task was doing:
//! a running debounce timer restarts, and an in-flight fetch future is
//! dropped before its result can be written. Because the task is the only
//! writer of [`InsightState`], a stale fetch can never clobber a newer one.

use crate::models::insight::EMPTY_LEDGER_INSIGHT_TEXT;
use crate::models::{InsightState, Transaction};
use crate::services::ai_client::AiClient;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::debug;

/// Source of the advisor text. Abstracted so tests can substitute a
/// deterministic fake; the production impl is [`AiClient`].
pub trait InsightSource: Send + Sync + 'static {
    fn generate(
        &self,
        transactions: Vec<Transaction>,
    ) -> Pin<Box<dyn Future<Output = String> + Send>>;
}

impl InsightSource for AiClient {
    fn generate(
        &self,
        transactions: Vec<Transaction>,
    ) -> Pin<Box<dyn Future<Output = String> + Send>> {
        let client = self.clone();
        Box::pin(async move { client.insights(&transactions).await })
    }
}

#[derive(Clone)]
pub struct InsightScheduler {
    state: Arc<Mutex<InsightState>>,
    task: Arc<JoinHandle<()>>,
}

impl InsightScheduler {
    /// Spawn the scheduler task. The snapshot already present on the channel
    /// is processed like a change, so a ledger hydrated at startup gets an
    /// initial insight cycle.
    pub fn spawn(
        changes: watch::Receiver<Vec<Transaction>>,
        source: Arc<dyn InsightSource>,
        debounce: Duration,
    ) -> Self {
        let state = Arc::new(Mutex::new(InsightState::default()));
        let task_state = Arc::clone(&state);
        let task = tokio::spawn(run(changes, source, task_state, debounce));

        Self {
            state,
            task: Arc::new(task),
        }
    }

    pub fn state(&self) -> InsightState {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Stop the scheduler task. Any pending timer or in-flight fetch is
    /// dropped with it. The task also ends on its own once the ledger store
    /// (the watch sender) is gone.
    pub fn shutdown(&self) {
        self.task.abort();
    }
}

async fn run(
    mut changes: watch::Receiver<Vec<Transaction>>,
    source: Arc<dyn InsightSource>,
    state: Arc<Mutex<InsightState>>,
    debounce: Duration,
) {
    let mut pending = Some(changes.borrow_and_update().clone());

    loop {
        let snapshot = match pending.take() {
            Some(snapshot) => snapshot,
            None => {
                if changes.changed().await.is_err() {
                    return;
                }
                changes.borrow_and_update().clone()
            }
        };

        if snapshot.is_empty() {
            let mut state = state.lock().unwrap_or_else(|e| e.into_inner());
            state.text = EMPTY_LEDGER_INSIGHT_TEXT.into();
            state.loading = false;
            continue;
        }

        // Debounce: a change landing before the timer fires restarts the
        // cycle with the newer snapshot.
        tokio::select! {
            _ = sleep(debounce) => {}
            changed = changes.changed() => {
                if changed.is_err() {
                    return;
                }
                pending = Some(changes.borrow_and_update().clone());
                continue;
            }
        }

        state.lock().unwrap_or_else(|e| e.into_inner()).loading = true;
        debug!(transactions = snapshot.len(), "Fetching AI insights");

        // A change during the fetch supersedes it; the fetch future is
        // dropped here and its result is never written.
        tokio::select! {
            text = source.generate(snapshot) => {
                let mut state = state.lock().unwrap_or_else(|e| e.into_inner());
                state.text = text;
                state.loading = false;
            }
            changed = changes.changed() => {
                if changed.is_err() {
                    return;
                }
                pending = Some(changes.borrow_and_update().clone());
            }
        }
    }
}
