//! In-memory transaction list with write-through persistence.
//!
//! The ledger is held newest-first behind a mutex and mirrored into a single
//! key-value record on every mutation, so a crash right after a mutation
//! loses nothing. Each mutation also publishes the new snapshot on a watch
//! channel; the insight scheduler subscribes to it.

use crate::db::{queries, DbPool};
use crate::error::AppResult;
use crate::models::{NewTransaction, Transaction};
use chrono::Utc;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tracing::{debug, error, warn};
use uuid::Uuid;

#[derive(Clone)]
pub struct LedgerStore {
    db: DbPool,
    inner: Arc<Mutex<Vec<Transaction>>>,
    changes: Arc<watch::Sender<Vec<Transaction>>>,
}

impl LedgerStore {
    /// Hydrate the ledger from the persisted record. A missing record or a
    /// record that fails to parse yields an empty ledger and a diagnostic
    /// log; startup never fails on bad persisted state.
    pub fn load(db: DbPool) -> Self {
        let transactions = match Self::read_persisted(&db) {
            Ok(Some(transactions)) => {
                debug!(count = transactions.len(), "Hydrated ledger from storage");
                transactions
            }
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "Failed to load persisted ledger, starting empty");
                Vec::new()
            }
        };

        let (changes, _) = watch::channel(transactions.clone());
        Self {
            db,
            inner: Arc::new(Mutex::new(transactions)),
            changes: Arc::new(changes),
        }
    }

    fn read_persisted(db: &DbPool) -> AppResult<Option<Vec<Transaction>>> {
        let conn = db.get()?;
        match queries::ledger::load(&conn)? {
            Some(json) => match serde_json::from_str(&json) {
                Ok(transactions) => Ok(Some(transactions)),
                Err(e) => {
                    warn!(error = %e, "Persisted ledger record is not valid JSON");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// Subscribe to ledger snapshots. The receiver starts with the current
    /// state and sees every subsequent mutation (last-write-wins).
    pub fn subscribe(&self) -> watch::Receiver<Vec<Transaction>> {
        self.changes.subscribe()
    }

    pub fn snapshot(&self) -> Vec<Transaction> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Prepend a new transaction built from the draft. The store assigns the
    /// id and timestamp; the caller has already resolved the category and
    /// validated the draft.
    pub fn add(&self, draft: NewTransaction, category: String) -> Transaction {
        let transaction = Transaction {
            id: Uuid::new_v4().to_string(),
            amount_cents: draft.amount_cents(),
            description: draft.description,
            kind: draft.kind,
            category,
            date: Utc::now().to_rfc3339(),
        };

        // Persist and publish under the lock so concurrent mutations cannot
        // reach storage or subscribers out of order.
        let mut ledger = self.lock();
        ledger.insert(0, transaction.clone());
        self.persist(&ledger);
        self.publish(ledger.clone());
        transaction
    }

    /// Remove the transaction with the given id. Returns false if no such
    /// transaction exists, in which case nothing is persisted or published.
    pub fn remove(&self, id: &str) -> bool {
        let mut ledger = self.lock();
        let Some(pos) = ledger.iter().position(|t| t.id == id) else {
            return false;
        };
        ledger.remove(pos);
        self.persist(&ledger);
        self.publish(ledger.clone());
        true
    }

    /// Empty the ledger and delete the persisted record. Idempotent.
    pub fn clear(&self) {
        let mut ledger = self.lock();
        ledger.clear();

        match self.db.get() {
            Ok(conn) => {
                if let Err(e) = queries::ledger::delete(&conn) {
                    error!(error = %e, "Failed to delete persisted ledger");
                }
            }
            Err(e) => error!(error = %e, "Failed to get connection for ledger clear"),
        }
        self.publish(Vec::new());
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Transaction>> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    // Write errors are logged and absorbed: there is no sensible in-app
    // recovery for a broken local store, and the in-memory state stays
    // authoritative for the rest of the session.
    fn persist(&self, snapshot: &[Transaction]) {
        let json = match serde_json::to_string(snapshot) {
            Ok(json) => json,
            Err(e) => {
                error!(error = %e, "Failed to serialize ledger");
                return;
            }
        };

        match self.db.get() {
            Ok(conn) => {
                if let Err(e) = queries::ledger::save(&conn, &json) {
                    error!(error = %e, "Failed to persist ledger");
                }
            }
            Err(e) => error!(error = %e, "Failed to get connection for ledger write"),
        }
    }

    fn publish(&self, snapshot: Vec<Transaction>) {
        self.changes.send_replace(snapshot);
    }
}
