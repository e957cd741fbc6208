//! Remote endpoint settings.
//!
//! Settings live in a TOML file; the API key itself is resolved from an
//! environment variable named by the file, so secrets never sit next to
//! the endpoint config. A disabled or incomplete configuration resolves
//! to `None`, which the HTTP client reports per call as
//! `RemoteError::ConfigIncomplete`.

use crate::core::error::PromptSyncError;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

/// Fully resolved remote endpoint settings.
#[derive(Debug, Clone)]
pub struct RemoteSettings {
    pub api_endpoint: String,
    pub web_app_name: String,
    pub api_key: String,
}

#[derive(Debug, Deserialize, Default)]
struct RawSettings {
    enabled: Option<bool>,
    api_endpoint: Option<String>,
    web_app_name: Option<String>,
    /// Name of the environment variable holding the API key.
    api_key_env: Option<String>,
}

/// Load settings from a TOML file.
///
/// Returns `Ok(None)` when the feature is disabled or any field (endpoint,
/// app name, key variable, or the key value itself) is missing. A file
/// that exists but cannot be read or parsed is a configuration error.
pub fn load_settings(path: &Path) -> Result<Option<RemoteSettings>, PromptSyncError> {
    if !path.exists() {
        return Ok(None);
    }

    let raw_text = fs::read_to_string(path)?;
    let raw: RawSettings = toml::from_str(&raw_text)
        .map_err(|e| PromptSyncError::ConfigError(format!("{}: {}", path.display(), e)))?;

    Ok(resolve(raw))
}

fn resolve(raw: RawSettings) -> Option<RemoteSettings> {
    if !raw.enabled.unwrap_or(false) {
        return None;
    }

    let api_endpoint = raw.api_endpoint.filter(|s| !s.is_empty())?;
    let web_app_name = raw.web_app_name.filter(|s| !s.is_empty())?;
    let api_key_env = raw.api_key_env.filter(|s| !s.is_empty())?;
    let api_key = env::var(&api_key_env).ok().filter(|s| !s.is_empty())?;

    Some(RemoteSettings {
        api_endpoint,
        web_app_name,
        api_key,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_config_resolves_to_none() {
        let raw = RawSettings {
            enabled: Some(false),
            api_endpoint: Some("https://example.test/api".to_string()),
            web_app_name: Some("app".to_string()),
            api_key_env: Some("PROMPTSYNC_TEST_KEY_UNSET".to_string()),
        };
        assert!(resolve(raw).is_none());
    }

    #[test]
    fn test_missing_endpoint_resolves_to_none() {
        let raw = RawSettings {
            enabled: Some(true),
            api_endpoint: None,
            web_app_name: Some("app".to_string()),
            api_key_env: Some("PROMPTSYNC_TEST_KEY_UNSET".to_string()),
        };
        assert!(resolve(raw).is_none());
    }

    #[test]
    fn test_complete_config_resolves() {
        // SAFETY: test-local variable name, no concurrent reader depends on it.
        unsafe { env::set_var("PROMPTSYNC_TEST_KEY_SET", "secret") };
        let raw = RawSettings {
            enabled: Some(true),
            api_endpoint: Some("https://example.test/api".to_string()),
            web_app_name: Some("app".to_string()),
            api_key_env: Some("PROMPTSYNC_TEST_KEY_SET".to_string()),
        };
        let settings = resolve(raw).expect("settings should resolve");
        assert_eq!(settings.api_key, "secret");
        assert_eq!(settings.web_app_name, "app");
    }

    #[test]
    fn test_missing_file_is_none() {
        let out = load_settings(Path::new("/nonexistent/promptsync.toml")).unwrap();
        assert!(out.is_none());
    }
}
