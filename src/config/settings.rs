//! User settings for triad
//!
//! Currency symbol, debounce delay for budget writes, the commit-time
//! reconciliation policy and the optional remote backend.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::paths::TriadPaths;
use crate::error::TriadError;

/// How a commit handles an allocation whose total is not 100
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ReconcilePolicy {
    /// Move the difference into savings, but never below zero; any excess
    /// left over is taken from wants, then needs
    #[default]
    Clamp,
    /// Move the whole difference into savings even if it goes negative
    PermitNegative,
}

impl fmt::Display for ReconcilePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clamp => write!(f, "clamp"),
            Self::PermitNegative => write!(f, "permit-negative"),
        }
    }
}

impl FromStr for ReconcilePolicy {
    type Err = TriadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "clamp" => Ok(Self::Clamp),
            "permit-negative" | "permit" | "negative" => Ok(Self::PermitNegative),
            other => Err(TriadError::Config(format!(
                "Unknown reconcile policy '{}' (expected 'clamp' or 'permit-negative')",
                other
            ))),
        }
    }
}

/// Connection details for the managed remote backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteSettings {
    /// Project base URL, e.g. `https://abc.supabase.co`
    pub url: String,
    /// Public (anon) API key sent with every request
    pub api_key: String,
}

/// User settings for triad
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency symbol shown before amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Quiet period before a budget edit is written to the store
    #[serde(default = "default_save_delay_ms")]
    pub save_delay_ms: u64,

    #[serde(default)]
    pub reconcile_policy: ReconcilePolicy,

    /// Remote backend; `None` keeps everything in the local snapshot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<RemoteSettings>,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "Rp".to_string()
}

fn default_save_delay_ms() -> u64 {
    800
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            save_delay_ms: default_save_delay_ms(),
            reconcile_policy: ReconcilePolicy::default(),
            remote: None,
        }
    }
}

impl Settings {
    pub fn save_delay(&self) -> Duration {
        Duration::from_millis(self.save_delay_ms)
    }

    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &TriadPaths) -> Result<Self, TriadError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| TriadError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                TriadError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &TriadPaths) -> Result<(), TriadError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| TriadError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| TriadError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.currency_symbol, "Rp");
        assert_eq!(settings.save_delay(), Duration::from_millis(800));
        assert_eq!(settings.reconcile_policy, ReconcilePolicy::Clamp);
        assert!(settings.remote.is_none());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TriadPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.reconcile_policy = ReconcilePolicy::PermitNegative;
        settings.remote = Some(RemoteSettings {
            url: "https://example.supabase.co".into(),
            api_key: "anon".into(),
        });
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.reconcile_policy, ReconcilePolicy::PermitNegative);
        assert_eq!(loaded.remote, settings.remote);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings.save_delay_ms, 800);
        assert_eq!(settings.schema_version, 1);
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!(
            "permit-negative".parse::<ReconcilePolicy>().unwrap(),
            ReconcilePolicy::PermitNegative
        );
        assert_eq!("CLAMP".parse::<ReconcilePolicy>().unwrap(), ReconcilePolicy::Clamp);
        assert!("spread".parse::<ReconcilePolicy>().is_err());
    }
}
