//! Storage layer for triad
//!
//! One [`BudgetStore`] abstraction with two implementations: a local JSON
//! snapshot and a remote managed database. [`open_store`] picks one from the
//! settings and the signed-in identity.

pub mod file_io;
pub mod local;
pub mod remote;
pub mod session;
pub mod store;

pub use file_io::{read_json_opt, write_json_atomic};
pub use local::LocalStore;
pub use remote::RemoteStore;
pub use session::SessionRepository;
pub use store::{BudgetStore, ExpenseChange};

use tracing::{debug, warn};

use crate::config::{Settings, TriadPaths};
use crate::error::TriadResult;
use crate::models::Identity;

/// Open the store a session should use
///
/// The remote backend is used only when one is configured and a user is
/// signed in. Anything else falls back to the local snapshot; a missing
/// session is not an error.
pub fn open_store(
    paths: &TriadPaths,
    settings: &Settings,
    identity: Option<Identity>,
) -> TriadResult<Box<dyn BudgetStore>> {
    match (&settings.remote, identity) {
        (Some(remote), Some(identity)) => {
            debug!(url = %remote.url, user = %identity.user_id, "using remote store");
            Ok(Box::new(RemoteStore::new(remote, identity)?))
        }
        (Some(_), None) => {
            debug!("remote backend configured but nobody is signed in; using local snapshot");
            Ok(Box::new(LocalStore::new(paths.budget_file())))
        }
        (None, Some(identity)) => {
            warn!(
                user = %identity.user_id,
                "signed in but no remote backend configured; using local snapshot"
            );
            Ok(Box::new(LocalStore::new(paths.budget_file())))
        }
        (None, None) => Ok(Box::new(LocalStore::new(paths.budget_file()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RemoteSettings;
    use tempfile::TempDir;

    fn remote_settings() -> Settings {
        Settings {
            remote: Some(RemoteSettings {
                url: "https://example.supabase.co".into(),
                api_key: "anon".into(),
            }),
            ..Settings::default()
        }
    }

    #[test]
    fn test_local_without_session() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TriadPaths::with_base_dir(temp_dir.path().to_path_buf());

        let store = open_store(&paths, &remote_settings(), None).unwrap();
        assert!(store.describe().starts_with("local snapshot"));

        let store = open_store(&paths, &Settings::default(), None).unwrap();
        assert!(store.describe().starts_with("local snapshot"));
    }

    #[test]
    fn test_remote_with_session() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TriadPaths::with_base_dir(temp_dir.path().to_path_buf());
        let identity = Identity::new("user-1", None, "token");

        let store = open_store(&paths, &remote_settings(), Some(identity.clone())).unwrap();
        assert!(store.describe().starts_with("remote https://example.supabase.co"));

        let store = open_store(&paths, &Settings::default(), Some(identity)).unwrap();
        assert!(store.describe().starts_with("local snapshot"));
    }
}
