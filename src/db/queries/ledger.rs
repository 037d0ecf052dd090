//! The persisted ledger is a single key-value record: the whole transaction
//! list serialized as one JSON array, overwritten wholesale on every
//! mutation. At this scale a row-per-transaction schema buys nothing.

use rusqlite::{params, Connection, OptionalExtension};

/// Key under which the serialized ledger is stored.
pub const LEDGER_KEY: &str = "transactions";

pub fn load(conn: &Connection) -> rusqlite::Result<Option<String>> {
    conn.query_row(
        "SELECT value FROM kv_store WHERE key = ?",
        [LEDGER_KEY],
        |row| row.get(0),
    )
    .optional()
}

pub fn save(conn: &Connection, json: &str) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO kv_store (key, value, updated_at)
         VALUES (?, ?, datetime('now'))
         ON CONFLICT(key) DO UPDATE SET
             value = excluded.value,
             updated_at = excluded.updated_at",
        params![LEDGER_KEY, json],
    )?;
    Ok(())
}

pub fn delete(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute("DELETE FROM kv_store WHERE key = ?", [LEDGER_KEY])?;
    Ok(())
}
