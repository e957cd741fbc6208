//! Remote side of instruction synchronization.
//!
//! The manager only sees this narrow interface; the concrete wire client
//! lives in [`crate::core::remote_http`]. Remote failures are values, not
//! fatal errors: the manager degrades to local-only outcomes.

use thiserror::Error;

/// Non-fatal remote failures. Never escalated to
/// [`crate::core::error::PromptSyncError`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    #[error("API configuration is incomplete.")]
    ConfigIncomplete,
    #[error("API request failed: {0}")]
    Unavailable(String),
    #[error("Invalid API response format: {0}")]
    BadResponse(String),
}

/// Fetch/store instruction text against the remote system.
///
/// Both operations are single-attempt with no internal retry; pacing is
/// the cooldown gate's job, driven by repeated caller-initiated syncs.
pub trait RemoteInstructionClient {
    /// Retrieve the current remote instruction text.
    fn fetch(&self) -> Result<String, RemoteError>;

    /// Write instruction text remotely.
    fn push(&self, instructions: &str) -> Result<(), RemoteError>;
}
