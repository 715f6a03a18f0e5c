//! Warden configuration.
//!
//! One JSON file, loaded once at startup and then frozen behind an `Arc`.
//! Nothing in the sampling or verification paths ever mutates it.
//!
//! ```json
//! {
//!   "apiBaseUrl": "http://localhost:8000",
//!   "apiKey": "",
//!   "verifyTimeoutSeconds": 10,
//!   "enabled": true,
//!   "whitelist": ["Notch"],
//!   "anticheat": { "violationThreshold": 5, "exemptPlayers": [] }
//! }
//! ```
//!
//! Every key is optional; missing keys take their defaults.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use warden_movement::DetectorConfig;

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Errors from loading or validating a [`WardenConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

// ---------------------------------------------------------------------------
// Whitelist
// ---------------------------------------------------------------------------

/// A case-insensitive set of player names.
///
/// Names are lowercased once when the set is built; lookups lowercase the
/// queried name. Serializes as a plain JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Whitelist(BTreeSet<String>);

impl Whitelist {
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(&name.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for Whitelist {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|name| name.as_ref().trim().to_lowercase())
                .filter(|name| !name.is_empty())
                .collect(),
        )
    }
}

impl From<Vec<String>> for Whitelist {
    fn from(names: Vec<String>) -> Self {
        names.into_iter().collect()
    }
}

impl From<Whitelist> for Vec<String> {
    fn from(list: Whitelist) -> Self {
        list.0.into_iter().collect()
    }
}

// ---------------------------------------------------------------------------
// AntiCheatConfig
// ---------------------------------------------------------------------------

/// Movement sampling and enforcement settings (`"anticheat"` in JSON).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AntiCheatConfig {
    /// Turns the sampling pass off entirely.
    pub enabled: bool,

    /// Names never sampled. Independent of the verification whitelist.
    pub exempt_players: Whitelist,

    #[serde(flatten)]
    pub detector: DetectorConfig,

    /// Violations at which a session is kicked and reported.
    pub violation_threshold: u32,

    /// Disconnect notice for an anti-cheat kick.
    pub kick_message: String,
}

impl Default for AntiCheatConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            exempt_players: Whitelist::default(),
            detector: DetectorConfig::default(),
            violation_threshold: 5,
            kick_message: "[Warden] Abnormal movement detected, you have been removed from the server"
                .to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// WardenConfig
// ---------------------------------------------------------------------------

/// Top-level configuration. Keys are camelCase in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WardenConfig {
    /// Backend base URL, without the endpoint path.
    pub api_base_url: String,

    /// Shared secret sent as `X-Api-Key`. Empty sends no header.
    pub api_key: String,

    pub verify_timeout_seconds: u64,

    pub kick_message_not_verified: String,
    /// Kept for config file compatibility. Timeouts get `kick_message_error`.
    pub kick_message_timeout: String,
    pub kick_message_error: String,

    /// When `false`, every join is treated as verified without a call.
    pub enabled: bool,

    /// Names that skip join verification.
    pub whitelist: Whitelist,

    pub anticheat: AntiCheatConfig,
}

impl Default for WardenConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            api_key: String::new(),
            verify_timeout_seconds: 10,
            kick_message_not_verified: "[Warden] Please join through the official launcher"
                .to_string(),
            kick_message_timeout: "[Warden] Login verification timed out, please retry"
                .to_string(),
            kick_message_error: "[Warden] Verification service error, please try again later"
                .to_string(),
            enabled: true,
            whitelist: Whitelist::default(),
            anticheat: AntiCheatConfig::default(),
        }
    }
}

impl WardenConfig {
    /// Parses and validates a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_json::from_str(json)?;
        config.api_base_url = config.api_base_url.trim().trim_end_matches('/').to_string();
        config.validate()?;
        Ok(config)
    }

    /// Loads the config at `path`.
    ///
    /// A missing file is not an error: the defaults are written there
    /// (pretty-printed, parent directories created) and returned. A failure
    /// to write them is logged and the defaults are still returned.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        match fs::read_to_string(path) {
            Ok(json) => {
                let config = Self::from_json(&json)?;
                tracing::info!(path = %path.display(), "config loaded");
                Ok(config)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let config = Self::default();
                match config.write_to(path) {
                    Ok(()) => tracing::info!(path = %path.display(), "default config created"),
                    Err(e) => tracing::warn!(error = %e, "failed to save default config"),
                }
                Ok(config)
            }
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Writes this config as pretty JSON, creating parent directories.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(io_err)
    }

    /// Rejects values the core cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.verify_timeout_seconds == 0 {
            return Err(ConfigError::Invalid(
                "verifyTimeoutSeconds must be at least 1".into(),
            ));
        }
        if self.anticheat.violation_threshold == 0 {
            return Err(ConfigError::Invalid(
                "anticheat.violationThreshold must be at least 1".into(),
            ));
        }
        let detector = &self.anticheat.detector;
        if detector.check_interval_ticks == 0 {
            return Err(ConfigError::Invalid(
                "anticheat.checkIntervalTicks must be at least 1".into(),
            ));
        }
        for (key, value) in [
            ("maxHorizontalSpeed", detector.max_horizontal_speed),
            ("teleportThreshold", detector.teleport_threshold),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "anticheat.{key} must be a non-negative number, got {value}"
                )));
            }
        }
        if detector.max_horizontal_speed > detector.teleport_threshold {
            return Err(ConfigError::Invalid(format!(
                "anticheat.maxHorizontalSpeed ({}) exceeds teleportThreshold ({})",
                detector.max_horizontal_speed, detector.teleport_threshold
            )));
        }
        Ok(())
    }

    pub fn verify_timeout(&self) -> Duration {
        Duration::from_secs(self.verify_timeout_seconds)
    }

    /// Disconnect notice for an explicit rejection.
    pub fn not_verified_notice(&self, reason: &str) -> String {
        format!("{}\nReason: {reason}", self.kick_message_not_verified)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_whitelist_is_case_insensitive() {
        let list: Whitelist = ["Notch", " jeb_ "].into_iter().collect();

        assert!(list.contains("notch"));
        assert!(list.contains("NOTCH"));
        assert!(list.contains("Jeb_"));
        assert!(!list.contains("Dinnerbone"));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_whitelist_skips_blank_names() {
        let list: Whitelist = ["", "   "].into_iter().collect();
        assert!(list.is_empty());
    }

    #[test]
    fn test_from_json_empty_object_is_default() {
        let config = WardenConfig::from_json("{}").unwrap();
        assert_eq!(config, WardenConfig::default());
    }

    #[test]
    fn test_from_json_reads_original_keys() {
        let config = WardenConfig::from_json(
            r#"{
                "apiBaseUrl": "https://auth.example/",
                "apiKey": "k",
                "verifyTimeoutSeconds": 3,
                "enabled": false,
                "whitelist": ["Alex"],
                "anticheat": {"maxAirTicks": 120, "violationThreshold": 3, "exemptPlayers": ["Bot"]}
            }"#,
        )
        .unwrap();

        assert_eq!(config.api_base_url, "https://auth.example");
        assert_eq!(config.verify_timeout(), Duration::from_secs(3));
        assert!(!config.enabled);
        assert!(config.whitelist.contains("alex"));
        assert_eq!(config.anticheat.detector.max_air_ticks, 120);
        assert_eq!(config.anticheat.detector.max_horizontal_speed, 12.0);
        assert_eq!(config.anticheat.violation_threshold, 3);
        assert!(config.anticheat.exempt_players.contains("BOT"));
    }

    #[test]
    fn test_from_json_rejects_zero_threshold() {
        let result = WardenConfig::from_json(r#"{"anticheat": {"violationThreshold": 0}}"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_from_json_rejects_zero_interval() {
        let result = WardenConfig::from_json(
            r#"{"enabled": false, "anticheat": {"checkIntervalTicks": 0}}"#,
        );
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_from_json_rejects_negative_speed() {
        let result = WardenConfig::from_json(r#"{"anticheat": {"maxHorizontalSpeed": -1.0}}"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_non_finite_teleport_threshold() {
        let mut config = WardenConfig::default();
        config.anticheat.detector.teleport_threshold = f64::INFINITY;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_from_json_rejects_zero_timeout() {
        let result = WardenConfig::from_json(r#"{"verifyTimeoutSeconds": 0}"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_from_json_garbage_is_parse_error() {
        let result = WardenConfig::from_json("whitelist = [");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_not_verified_notice_appends_reason() {
        let config = WardenConfig::default();
        let notice = config.not_verified_notice("token_expired");

        assert!(notice.starts_with(&config.kick_message_not_verified));
        assert!(notice.ends_with("\nReason: token_expired"));
    }

    #[test]
    fn test_load_missing_file_writes_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config").join("warden.json");

        let config = WardenConfig::load(&path).unwrap();

        assert_eq!(config, WardenConfig::default());
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("\"apiBaseUrl\""));
        assert!(written.contains("\"violationThreshold\": 5"));
    }

    #[test]
    fn test_load_existing_file_round_trips_edits() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("warden.json");
        let edited = WardenConfig {
            whitelist: ["Steve"].into_iter().collect(),
            ..WardenConfig::default()
        };
        edited.write_to(&path).unwrap();

        let loaded = WardenConfig::load(&path).unwrap();

        assert_eq!(loaded, edited);
    }
}
