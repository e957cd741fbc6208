//! Azure Function wire client for instruction get/set.
//!
//! The remote contract is a single JSON POST endpoint taking
//! `{action, web_app_name, environment_variables}` authenticated with a
//! static `x-functions-key` header. A "get" response carries the
//! instruction text under `AZURE_OPENAI_SYSTEM_MESSAGE`; a "set" is
//! acknowledged by HTTP 200. One attempt per call, hard 30 s timeout.

use crate::core::config::{self, RemoteSettings};
use crate::core::error::PromptSyncError;
use crate::core::remote::{RemoteError, RemoteInstructionClient};
use log::error;
use serde_json::{Value, json};
use std::path::Path;
use std::time::Duration;

/// Hard cap on each remote call.
pub const API_TIMEOUT_SECS: u64 = 30;

/// Remote environment variable holding the instruction text.
const SYSTEM_MESSAGE_VAR: &str = "AZURE_OPENAI_SYSTEM_MESSAGE";

pub struct AzureFunctionClient {
    http: reqwest::blocking::Client,
    settings: Option<RemoteSettings>,
}

impl AzureFunctionClient {
    /// `settings: None` builds a client that reports `ConfigIncomplete`
    /// on every call, mirroring a disabled or half-configured install.
    pub fn new(settings: Option<RemoteSettings>) -> Result<Self, PromptSyncError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(API_TIMEOUT_SECS))
            .build()
            .map_err(|e| PromptSyncError::ConfigError(format!("HTTP client: {}", e)))?;
        Ok(Self { http, settings })
    }

    /// Build from a TOML settings file (see [`config::load_settings`]).
    pub fn from_config_file(path: &Path) -> Result<Self, PromptSyncError> {
        let settings = config::load_settings(path)?;
        Self::new(settings)
    }

    fn post(
        &self,
        settings: &RemoteSettings,
        payload: &Value,
    ) -> Result<reqwest::blocking::Response, RemoteError> {
        self.http
            .post(&settings.api_endpoint)
            .header("x-functions-key", &settings.api_key)
            .json(payload)
            .send()
            .map_err(|e| RemoteError::Unavailable(e.to_string()))
    }
}

impl RemoteInstructionClient for AzureFunctionClient {
    fn fetch(&self) -> Result<String, RemoteError> {
        let settings = self
            .settings
            .as_ref()
            .ok_or(RemoteError::ConfigIncomplete)?;

        let payload = json!({
            "action": "get",
            "web_app_name": settings.web_app_name,
            "environment_variables": [SYSTEM_MESSAGE_VAR],
        });

        let response = self.post(settings, &payload)?;
        let status = response.status();
        if status != reqwest::StatusCode::OK {
            error!("instruction fetch failed with status {}", status.as_u16());
            return Err(RemoteError::Unavailable(format!(
                "API returned status code: {}",
                status.as_u16()
            )));
        }

        let body: Value = response
            .json()
            .map_err(|e| RemoteError::BadResponse(e.to_string()))?;
        match body.get(SYSTEM_MESSAGE_VAR).and_then(Value::as_str) {
            Some(text) => Ok(text.to_string()),
            None => Err(RemoteError::BadResponse(format!(
                "response is missing {}",
                SYSTEM_MESSAGE_VAR
            ))),
        }
    }

    fn push(&self, instructions: &str) -> Result<(), RemoteError> {
        let settings = self
            .settings
            .as_ref()
            .ok_or(RemoteError::ConfigIncomplete)?;

        let payload = json!({
            "action": "set",
            "web_app_name": settings.web_app_name,
            "environment_variables": { SYSTEM_MESSAGE_VAR: instructions },
        });

        let response = self.post(settings, &payload)?;
        let status = response.status();
        if status != reqwest::StatusCode::OK {
            error!("instruction push failed with status {}", status.as_u16());
            return Err(RemoteError::Unavailable(format!(
                "API returned status code: {}",
                status.as_u16()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unconfigured_client_reports_config_incomplete() {
        let client = AzureFunctionClient::new(None).unwrap();
        assert_eq!(client.fetch(), Err(RemoteError::ConfigIncomplete));
        assert_eq!(client.push("text"), Err(RemoteError::ConfigIncomplete));
    }
}
