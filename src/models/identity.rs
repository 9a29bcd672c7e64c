//! Signed-in user identity
//!
//! Issued by the external identity provider; triad only stores it and
//! forwards the access token to the remote backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The user a budget belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Opaque user id from the identity provider
    pub user_id: String,
    #[serde(default)]
    pub email: Option<String>,
    /// Bearer token for the remote backend
    pub access_token: String,
    #[serde(default = "Utc::now")]
    pub signed_in_at: DateTime<Utc>,
}

impl Identity {
    pub fn new(
        user_id: impl Into<String>,
        email: Option<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            email,
            access_token: access_token.into(),
            signed_in_at: Utc::now(),
        }
    }

    /// Email if known, otherwise the user id
    pub fn display_name(&self) -> &str {
        self.email.as_deref().unwrap_or(&self.user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_prefers_email() {
        let with_email = Identity::new("u-1", Some("dewi@example.com".into()), "tok");
        assert_eq!(with_email.display_name(), "dewi@example.com");

        let without = Identity::new("u-2", None, "tok");
        assert_eq!(without.display_name(), "u-2");
    }
}
