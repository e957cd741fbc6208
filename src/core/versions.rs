//! Versioned instruction history with a single active pointer.
//!
//! Append-only: versions are never mutated or deleted, and version numbers
//! are never reused. Exactly zero or one version is active at any time.
//! Reverting repoints the active flag; it does not grow the history.

use crate::core::broker::DbBroker;
use crate::core::clock::{Clock, SystemClock};
use crate::core::db;
use crate::core::error;
use crate::core::store::Store;
use log::warn;
use rusqlite::{Connection, OptionalExtension, params};
use serde::{Deserialize, Serialize};

/// Author id recorded on versions created by an automated API sync.
pub const SYSTEM_ACTOR: &str = "system";

/// Default author id for human-initiated saves.
pub const ADMIN_ACTOR: &str = "admin";

/// Soft limit on instruction length. Exceeding it logs a warning but never
/// blocks the save.
pub const RECOMMENDED_MAX_CHARS: usize = 4000;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct InstructionVersion {
    pub version: i64,
    pub instructions: String,
    pub notes: String,
    pub created_date: i64,
    pub created_by: String,
    pub is_active: bool,
}

fn ensure_schema(conn: &Connection) -> Result<(), error::PromptSyncError> {
    conn.execute_batch(db::INSTRUCTIONS_DB_SCHEMA)?;
    Ok(())
}

fn row_to_version(row: &rusqlite::Row<'_>) -> rusqlite::Result<InstructionVersion> {
    Ok(InstructionVersion {
        version: row.get(0)?,
        instructions: row.get(1)?,
        notes: row.get(2)?,
        created_date: row.get(3)?,
        created_by: row.get(4)?,
        is_active: row.get::<_, i64>(5)? != 0,
    })
}

const VERSION_COLUMNS: &str =
    "version, instructions, notes, created_date, created_by, is_active";

/// Append a new version, mark it active, and demote the previous active
/// version. Returns the assigned version number.
///
/// Deduplication is the caller's job (see [`are_instructions_different`]);
/// the store appends whatever it is given.
pub fn create_version(
    store: &Store,
    instructions: &str,
    notes: &str,
    created_by: &str,
) -> Result<i64, error::PromptSyncError> {
    if instructions.chars().count() > RECOMMENDED_MAX_CHARS {
        warn!(
            "instruction text is {} characters, above the recommended {}",
            instructions.chars().count(),
            RECOMMENDED_MAX_CHARS
        );
    }

    let broker = DbBroker::new(&store.root);
    let db_path = db::instructions_db_path(&store.root);
    let now = SystemClock.now_epoch();

    broker.with_conn(&db_path, created_by, "versions.create", |conn| {
        ensure_schema(conn)?;
        let tx = conn.unchecked_transaction()?;
        tx.execute(
            "UPDATE instruction_versions SET is_active = 0 WHERE is_active = 1",
            [],
        )?;
        tx.execute(
            "INSERT INTO instruction_versions(instructions, notes, created_date, created_by, is_active)
             VALUES(?1, ?2, ?3, ?4, 1)",
            params![instructions, notes, now, created_by],
        )?;
        let version = tx.last_insert_rowid();
        tx.commit()?;
        Ok(version)
    })
}

pub fn get_active_instructions(
    store: &Store,
) -> Result<Option<InstructionVersion>, error::PromptSyncError> {
    let broker = DbBroker::new(&store.root);
    let db_path = db::instructions_db_path(&store.root);

    broker.with_conn(&db_path, "promptsync", "versions.get_active", |conn| {
        ensure_schema(conn)?;
        let row = conn
            .query_row(
                &format!(
                    "SELECT {} FROM instruction_versions WHERE is_active = 1",
                    VERSION_COLUMNS
                ),
                [],
                row_to_version,
            )
            .optional()?;
        Ok(row)
    })
}

pub fn get_version(
    store: &Store,
    version: i64,
) -> Result<Option<InstructionVersion>, error::PromptSyncError> {
    let broker = DbBroker::new(&store.root);
    let db_path = db::instructions_db_path(&store.root);

    broker.with_conn(&db_path, "promptsync", "versions.get", |conn| {
        ensure_schema(conn)?;
        let row = conn
            .query_row(
                &format!(
                    "SELECT {} FROM instruction_versions WHERE version = ?1",
                    VERSION_COLUMNS
                ),
                params![version],
                row_to_version,
            )
            .optional()?;
        Ok(row)
    })
}

/// Repoint the active flag to `version`. Fails with `NotFound` if the
/// version does not exist; version content is never touched.
pub fn set_active_version(store: &Store, version: i64) -> Result<(), error::PromptSyncError> {
    let broker = DbBroker::new(&store.root);
    let db_path = db::instructions_db_path(&store.root);

    broker.with_conn(&db_path, "promptsync", "versions.set_active", |conn| {
        ensure_schema(conn)?;
        let tx = conn.unchecked_transaction()?;
        let exists: i64 = tx.query_row(
            "SELECT COUNT(*) FROM instruction_versions WHERE version = ?1",
            params![version],
            |row| row.get(0),
        )?;
        if exists == 0 {
            return Err(error::PromptSyncError::NotFound(format!(
                "instruction version {}",
                version
            )));
        }
        tx.execute(
            "UPDATE instruction_versions SET is_active = 0 WHERE is_active = 1",
            [],
        )?;
        tx.execute(
            "UPDATE instruction_versions SET is_active = 1 WHERE version = ?1",
            params![version],
        )?;
        tx.commit()?;
        Ok(())
    })
}

/// All versions in creation order.
pub fn get_all_versions(
    store: &Store,
) -> Result<Vec<InstructionVersion>, error::PromptSyncError> {
    let broker = DbBroker::new(&store.root);
    let db_path = db::instructions_db_path(&store.root);

    broker.with_conn(&db_path, "promptsync", "versions.list", |conn| {
        ensure_schema(conn)?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM instruction_versions ORDER BY version ASC",
            VERSION_COLUMNS
        ))?;
        let rows = stmt.query_map([], row_to_version)?;
        let mut results = Vec::new();
        for r in rows {
            results.push(r?);
        }
        Ok(results)
    })
}

pub fn get_version_count(store: &Store) -> Result<i64, error::PromptSyncError> {
    let broker = DbBroker::new(&store.root);
    let db_path = db::instructions_db_path(&store.root);

    broker.with_conn(&db_path, "promptsync", "versions.count", |conn| {
        ensure_schema(conn)?;
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM instruction_versions", [], |row| {
                row.get(0)
            })?;
        Ok(count)
    })
}

/// True when there is no active version, or the active version's text
/// differs byte-for-byte from `instructions`.
pub fn are_instructions_different(
    store: &Store,
    instructions: &str,
) -> Result<bool, error::PromptSyncError> {
    match get_active_instructions(store)? {
        Some(active) => Ok(active.instructions != instructions),
        None => Ok(true),
    }
}
