//! Persistence of the signed-in identity

use std::path::PathBuf;

use tracing::info;

use super::file_io::{read_json_opt, remove_if_exists, write_json_atomic};
use crate::error::{TriadError, TriadResult};
use crate::models::Identity;

/// Stores the current identity in `session.json`
pub struct SessionRepository {
    path: PathBuf,
}

impl SessionRepository {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// The signed-in identity, if any
    pub fn current(&self) -> TriadResult<Option<Identity>> {
        read_json_opt(&self.path)
    }

    pub fn sign_in(&self, identity: &Identity) -> TriadResult<()> {
        if identity.user_id.trim().is_empty() {
            return Err(TriadError::Validation("User id cannot be empty".into()));
        }
        if identity.access_token.trim().is_empty() {
            return Err(TriadError::Validation("Access token cannot be empty".into()));
        }

        write_json_atomic(&self.path, identity)?;
        info!(user = %identity.user_id, "signed in");
        Ok(())
    }

    /// Forget the identity; returns whether someone was signed in
    pub fn sign_out(&self) -> TriadResult<bool> {
        let removed = remove_if_exists(&self.path)?;
        if removed {
            info!("signed out");
        }
        Ok(removed)
    }
}
