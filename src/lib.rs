//! promptsync: local-first versioning and remote sync for AI system instructions
//!
//! **promptsync keeps an append-only, versioned history of an assistant's
//! system instructions and reconciles it with a remote deployment.**
//!
//! Admin surfaces (save / sync / force-sync / revert) call into
//! [`InstructionSyncManager`], the single orchestration entry point.
//!
//! # Core Principles
//!
//! - **Local-first**: every save lands in the local history before any
//!   remote call; a remote failure never rolls a local write back
//! - **Auditable**: all mutations route through a serialized broker that
//!   appends a JSONL audit event per operation
//! - **Paced**: remote sync attempts sit behind a 10-second cooldown gate,
//!   bypassable with an explicit force flag
//! - **Honest failure**: every operation reports local and remote success
//!   separately, so partial failures surface instead of disappearing
//!
//! # Architecture
//!
//! ## Version history
//!
//! Versions are never mutated, deleted, or renumbered. Exactly zero or one
//! version is active; reverting repoints the active flag without growing
//! the history.
//!
//! ## The sync flow
//!
//! `sync_from_api` checks the cooldown gate, records the attempt (failed
//! fetches still consume the window), fetches remote text, and creates a
//! new version only when the text actually changed — reformatted for
//! readability by the markdown/plain-text heuristic in [`core::format`].
//!
//! ## Modules
//!
//! - [`core::versions`]: versioned instruction store with active pointer
//! - [`core::cooldown`]: persisted sync-attempt gate
//! - [`core::format`]: markdown detection heuristic + display reformatting
//! - [`core::remote`] / [`core::remote_http`]: remote client trait and the
//!   Azure Function wire implementation
//! - [`core::manager`]: orchestration and structured outcomes
//! - [`core::broker`]: serialized DB access + audit log
//! - [`core::config`]: TOML settings for the remote endpoint

pub mod core;

pub use crate::core::clock::{Clock, SystemClock};
pub use crate::core::error::PromptSyncError;
pub use crate::core::format::{FormatDetection, TextFormat, detect_format, format_text};
pub use crate::core::manager::{
    CurrentInstructions, InstructionSyncManager, RevertOutcome, SaveOutcome, SyncOutcome,
    VersionStats,
};
pub use crate::core::remote::{RemoteError, RemoteInstructionClient};
pub use crate::core::remote_http::AzureFunctionClient;
pub use crate::core::store::Store;
pub use crate::core::versions::InstructionVersion;
