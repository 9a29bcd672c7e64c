//! Configuration module for triad
//!
//! - Base directory resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::TriadPaths;
pub use settings::{ReconcilePolicy, RemoteSettings, Settings};
