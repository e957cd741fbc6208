//! Orchestration of local version history against the remote API.
//!
//! The manager owns no persistent state. It composes the cooldown gate,
//! the remote client, the version store, and the format detector, and
//! reports structured outcomes that distinguish local from remote
//! success so a UI can show "saved locally but not synced" instead of a
//! blanket failure. Remote failures never escalate; storage failures
//! always propagate as `Err`.

use crate::core::clock::Clock;
use crate::core::cooldown;
use crate::core::error::PromptSyncError;
use crate::core::format;
use crate::core::remote::RemoteInstructionClient;
use crate::core::store::Store;
use crate::core::versions::{self, ADMIN_ACTOR, InstructionVersion, SYSTEM_ACTOR};
use log::{error, info, warn};
use serde::Serialize;

/// Outcome of [`InstructionSyncManager::sync_from_api`].
#[derive(Debug, Clone, Serialize)]
pub struct SyncOutcome {
    pub success: bool,
    pub local_success: bool,
    pub api_success: bool,
    pub skipped: bool,
    pub message: String,
    pub version: Option<i64>,
    pub api_error: Option<String>,
}

/// Outcome of [`InstructionSyncManager::save_instructions`].
#[derive(Debug, Clone, Serialize)]
pub struct SaveOutcome {
    pub success: bool,
    pub local_success: bool,
    pub api_success: bool,
    pub message: String,
    pub version: Option<i64>,
    pub api_error: Option<String>,
}

/// Active instruction text prepared for display.
#[derive(Debug, Clone, Serialize)]
pub struct CurrentInstructions {
    pub instructions: String,
    pub version: i64,
    pub synced: bool,
    pub sync_error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RevertOutcome {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct VersionStats {
    pub total_versions: i64,
    pub active_version: i64,
    pub active_created: i64,
}

pub struct InstructionSyncManager {
    store: Store,
    remote: Box<dyn RemoteInstructionClient>,
    clock: Box<dyn Clock>,
}

impl InstructionSyncManager {
    pub fn new(
        store: Store,
        remote: Box<dyn RemoteInstructionClient>,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            store,
            remote,
            clock,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    fn active_version_number(&self) -> Result<Option<i64>, PromptSyncError> {
        Ok(versions::get_active_instructions(&self.store)?.map(|v| v.version))
    }

    /// Fetch remote instructions and create a new local version if they
    /// differ from the active one.
    ///
    /// Without `force`, attempts inside the cooldown window are skipped
    /// and reported as a no-op success. The attempt timestamp is recorded
    /// before the fetch, so a failed fetch still consumes the window.
    pub fn sync_from_api(&self, force: bool) -> Result<SyncOutcome, PromptSyncError> {
        let now = self.clock.now_epoch();

        if !force && !cooldown::should_sync(&self.store, false, now)? {
            let remaining = cooldown::remaining_secs(&self.store, now)?;
            return Ok(SyncOutcome {
                success: true,
                local_success: true,
                api_success: true,
                skipped: true,
                message: format!(
                    "API sync skipped. Please wait {} more seconds before syncing again.",
                    remaining
                ),
                version: self.active_version_number()?,
                api_error: None,
            });
        }

        cooldown::record_attempt(&self.store, now)?;

        let fetched = match self.remote.fetch() {
            Ok(text) => text,
            Err(err) => {
                warn!("API sync failed: {}", err);
                return Ok(SyncOutcome {
                    success: false,
                    local_success: true,
                    api_success: false,
                    skipped: false,
                    message: format!("Could not sync with API: {} (using local version)", err),
                    version: self.active_version_number()?,
                    api_error: Some(err.to_string()),
                });
            }
        };

        if !versions::are_instructions_different(&self.store, &fetched)? {
            return Ok(SyncOutcome {
                success: true,
                local_success: true,
                api_success: true,
                skipped: false,
                message: "Instructions are already up to date.".to_string(),
                version: self.active_version_number()?,
                api_error: None,
            });
        }

        let formatted = format::format_text(&fetched, None);
        let new_version =
            versions::create_version(&self.store, &formatted, "Synced from API", SYSTEM_ACTOR)?;
        info!("system instructions synced from API, new version {}", new_version);

        Ok(SyncOutcome {
            success: true,
            local_success: true,
            api_success: true,
            skipped: false,
            message: format!("Instructions synced successfully. New version: {}", new_version),
            version: Some(new_version),
            api_error: None,
        })
    }

    /// Save instructions locally, then push them to the remote API.
    ///
    /// The local write always happens first and is never rolled back on a
    /// push failure; the partial result is surfaced instead. Identical
    /// text is a no-op that creates no version.
    pub fn save_instructions(
        &self,
        instructions: &str,
        notes: &str,
    ) -> Result<SaveOutcome, PromptSyncError> {
        if !versions::are_instructions_different(&self.store, instructions)? {
            return Ok(SaveOutcome {
                success: true,
                local_success: true,
                api_success: true,
                message: "No changes detected. Instructions not saved.".to_string(),
                version: self.active_version_number()?,
                api_error: None,
            });
        }

        let new_version =
            versions::create_version(&self.store, instructions, notes, ADMIN_ACTOR)?;

        if let Err(err) = self.remote.push(instructions) {
            error!("failed to save system instructions to API: {}", err);
            return Ok(SaveOutcome {
                success: false,
                local_success: true,
                api_success: false,
                message: format!("Local version saved but API update failed: {}", err),
                version: Some(new_version),
                api_error: Some(err.to_string()),
            });
        }

        info!("system instructions saved, version {}", new_version);
        Ok(SaveOutcome {
            success: true,
            local_success: true,
            api_success: true,
            message: format!("Instructions saved successfully. Version: {}", new_version),
            version: Some(new_version),
            api_error: None,
        })
    }

    /// Active instructions for display, preceded by a non-forced sync
    /// (which may be a cooldown no-op). An empty store reads as version 0
    /// with empty text.
    pub fn get_current_instructions(&self) -> Result<CurrentInstructions, PromptSyncError> {
        let sync = self.sync_from_api(false)?;
        let sync_error = if sync.success {
            String::new()
        } else {
            sync.message.clone()
        };

        match versions::get_active_instructions(&self.store)? {
            Some(active) => Ok(CurrentInstructions {
                instructions: format::format_text(&active.instructions, None),
                version: active.version,
                synced: sync.success,
                sync_error,
            }),
            None => Ok(CurrentInstructions {
                instructions: String::new(),
                version: 0,
                synced: sync.success,
                sync_error,
            }),
        }
    }

    /// Repoint the active version and push its raw text to the remote.
    /// History does not grow; a remote failure leaves the local repoint in
    /// place and is reported in the message.
    pub fn revert_to_version(&self, version: i64) -> Result<RevertOutcome, PromptSyncError> {
        let Some(target) = versions::get_version(&self.store, version)? else {
            return Ok(RevertOutcome {
                success: false,
                message: format!("Version {} not found.", version),
            });
        };

        versions::set_active_version(&self.store, version)?;

        if let Err(err) = self.remote.push(&target.instructions) {
            error!("failed to revert system instructions in API: {}", err);
            return Ok(RevertOutcome {
                success: false,
                message: format!("Local version reverted but API update failed: {}", err),
            });
        }

        info!("system instructions reverted to version {}", version);
        Ok(RevertOutcome {
            success: true,
            message: format!("Successfully reverted to version {}", version),
        })
    }

    /// All versions in creation order, for admin display.
    pub fn get_all_versions(&self) -> Result<Vec<InstructionVersion>, PromptSyncError> {
        versions::get_all_versions(&self.store)
    }

    pub fn get_version_stats(&self) -> Result<VersionStats, PromptSyncError> {
        let active = versions::get_active_instructions(&self.store)?;
        Ok(VersionStats {
            total_versions: versions::get_version_count(&self.store)?,
            active_version: active.as_ref().map(|v| v.version).unwrap_or(0),
            active_created: active.as_ref().map(|v| v.created_date).unwrap_or(0),
        })
    }
}
