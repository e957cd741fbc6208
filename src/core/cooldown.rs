//! Time gate pacing remote sync attempts.
//!
//! The attempt timestamp is recorded before the remote call is made, so a
//! failed fetch still consumes the window and repeated caller-driven polls
//! cannot storm the remote endpoint.

use crate::core::broker::DbBroker;
use crate::core::db;
use crate::core::error;
use crate::core::store::Store;
use rusqlite::{OptionalExtension, params};

/// Minimum seconds between non-forced remote sync attempts.
pub const API_SYNC_COOLDOWN_SECS: i64 = 10;

const LAST_SYNC_KEY: &str = "last_api_sync_time";

/// Timestamp of the last sync attempt (successful or not); 0 if none.
pub fn last_attempt(store: &Store) -> Result<i64, error::PromptSyncError> {
    let broker = DbBroker::new(&store.root);
    let db_path = db::instructions_db_path(&store.root);

    broker.with_conn(&db_path, "promptsync", "cooldown.read", |conn| {
        conn.execute_batch(db::INSTRUCTIONS_DB_SCHEMA)?;
        let value: Option<i64> = conn
            .query_row(
                "SELECT value FROM sync_state WHERE key = ?1",
                params![LAST_SYNC_KEY],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value.unwrap_or(0))
    })
}

/// Unconditionally store `now` as the last attempt time.
pub fn record_attempt(store: &Store, now: i64) -> Result<(), error::PromptSyncError> {
    let broker = DbBroker::new(&store.root);
    let db_path = db::instructions_db_path(&store.root);

    broker.with_conn(&db_path, "promptsync", "cooldown.record", |conn| {
        conn.execute_batch(db::INSTRUCTIONS_DB_SCHEMA)?;
        conn.execute(
            "INSERT INTO sync_state(key, value) VALUES(?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![LAST_SYNC_KEY, now],
        )?;
        Ok(())
    })
}

/// Whether a sync attempt is currently permitted.
pub fn should_sync(store: &Store, force: bool, now: i64) -> Result<bool, error::PromptSyncError> {
    if force {
        return Ok(true);
    }
    Ok(now - last_attempt(store)? >= API_SYNC_COOLDOWN_SECS)
}

/// Seconds left before the gate reopens, floored at 0.
pub fn remaining_secs(store: &Store, now: i64) -> Result<i64, error::PromptSyncError> {
    let elapsed = now - last_attempt(store)?;
    Ok((API_SYNC_COOLDOWN_SECS - elapsed).max(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_gate_opens_after_cooldown() {
        let tmp = tempdir().unwrap();
        let store = Store::new(tmp.path());

        // Empty store: gate is open.
        assert!(should_sync(&store, false, 1000).unwrap());

        record_attempt(&store, 1000).unwrap();
        assert!(!should_sync(&store, false, 1003).unwrap());
        assert_eq!(remaining_secs(&store, 1003).unwrap(), 7);

        assert!(should_sync(&store, false, 1010).unwrap());
        assert_eq!(remaining_secs(&store, 1010).unwrap(), 0);
    }

    #[test]
    fn test_force_bypasses_gate() {
        let tmp = tempdir().unwrap();
        let store = Store::new(tmp.path());

        record_attempt(&store, 1000).unwrap();
        assert!(should_sync(&store, true, 1001).unwrap());
    }

    #[test]
    fn test_record_overwrites_previous_attempt() {
        let tmp = tempdir().unwrap();
        let store = Store::new(tmp.path());

        record_attempt(&store, 1000).unwrap();
        record_attempt(&store, 2000).unwrap();
        assert_eq!(last_attempt(&store).unwrap(), 2000);
    }
}
