use crate::core::broker::DbBroker;
use crate::core::error;
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};

pub const INSTRUCTIONS_DB_NAME: &str = "instructions.db";

/// Version history plus the single-row-per-key sync state table.
///
/// `AUTOINCREMENT` keeps version numbers strictly increasing and never
/// reused, even after row deletion.
pub const INSTRUCTIONS_DB_SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS instruction_versions (
    version INTEGER PRIMARY KEY AUTOINCREMENT,
    instructions TEXT NOT NULL,
    notes TEXT NOT NULL DEFAULT '',
    created_date INTEGER NOT NULL,
    created_by TEXT NOT NULL,
    is_active INTEGER NOT NULL DEFAULT 0
);
CREATE TABLE IF NOT EXISTS sync_state (
    key TEXT PRIMARY KEY,
    value INTEGER NOT NULL
);
";

pub fn db_connect(db_path: &str) -> Result<Connection, error::PromptSyncError> {
    let conn = Connection::open(db_path)?;
    conn.busy_timeout(std::time::Duration::from_secs(5))
        .map_err(error::PromptSyncError::RusqliteError)?;
    conn.query_row("PRAGMA journal_mode=WAL;", [], |_| Ok(()))
        .map_err(error::PromptSyncError::RusqliteError)?;
    conn.execute("PRAGMA foreign_keys=ON;", [])
        .map_err(error::PromptSyncError::RusqliteError)?;
    Ok(conn)
}

pub fn instructions_db_path(root: &Path) -> PathBuf {
    root.join(INSTRUCTIONS_DB_NAME)
}

pub fn initialize_instructions_db(root: &Path) -> Result<(), error::PromptSyncError> {
    let db_path = instructions_db_path(root);
    let parent_dir = db_path.parent().ok_or_else(|| {
        error::PromptSyncError::DatabaseInitializationError(format!(
            "no parent directory for {}",
            db_path.display()
        ))
    })?;
    fs::create_dir_all(parent_dir).map_err(error::PromptSyncError::IoError)?;

    let broker = DbBroker::new(root);
    broker.with_conn(&db_path, "promptsync", "instructions.init", |conn| {
        conn.execute_batch(INSTRUCTIONS_DB_SCHEMA)?;
        Ok(())
    })?;
    Ok(())
}
