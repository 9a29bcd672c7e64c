//! Path management for triad
//!
//! ## Path Resolution Order
//!
//! 1. `TRIAD_DATA_DIR` environment variable (if set)
//! 2. The platform config directory reported by `directories`
//!    (`~/.config/triad` on Linux, `~/Library/Application Support/triad` on macOS,
//!    `%APPDATA%\triad\config` on Windows)
//! 3. `./.triad` when no home directory can be determined

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::TriadError;

/// Environment variable that overrides the base directory
pub const DATA_DIR_ENV: &str = "TRIAD_DATA_DIR";

/// Manages all paths used by triad
#[derive(Debug, Clone)]
pub struct TriadPaths {
    base_dir: PathBuf,
}

impl TriadPaths {
    /// Resolve the base directory from the environment or platform defaults
    pub fn new() -> Result<Self, TriadError> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) if !custom.trim().is_empty() => PathBuf::from(custom),
            _ => resolve_default_path(),
        };

        Ok(Self { base_dir })
    }

    /// Create TriadPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Directory holding the local budget snapshot
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Signed-in identity, absent when nobody is signed in
    pub fn session_file(&self) -> PathBuf {
        self.base_dir.join("session.json")
    }

    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Whole-state snapshot used by the local store
    pub fn budget_file(&self) -> PathBuf {
        self.data_dir().join("budget.json")
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> Result<(), TriadError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| TriadError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| TriadError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if triad has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

fn resolve_default_path() -> PathBuf {
    ProjectDirs::from("", "", "triad")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".triad"))
}
