//! Strongly-typed ID wrappers
//!
//! Budget and expense ids are UUIDs generated locally, so the same id is used
//! in the local snapshot and on the remote backend.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Length of the hex prefix shown in the display form
const SHORT_LEN: usize = 8;

macro_rules! define_id {
    ($name:ident, $display_prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new random ID
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Check whether user input refers to this id
            ///
            /// Accepts the full UUID, the display form (`prefix-1a2b3c4d`)
            /// or a bare hex prefix of at least 4 characters.
            pub fn matches(&self, needle: &str) -> bool {
                let needle = needle.trim().to_lowercase();
                let needle = needle.strip_prefix($display_prefix).unwrap_or(&needle);
                if needle.len() < 4 {
                    return false;
                }
                self.0.to_string().starts_with(needle)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $display_prefix, &self.0.to_string()[..SHORT_LEN])
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                let s = s.strip_prefix($display_prefix).unwrap_or(s);
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

define_id!(ExpenseId, "exp-");
define_id!(BudgetId, "bud-");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display() {
        let id = ExpenseId::new();
        let display = id.to_string();
        assert!(display.starts_with("exp-"));
        assert_eq!(display.len(), 12);
    }

    #[test]
    fn test_matches_short_and_full_forms() {
        let id = ExpenseId::new();
        let full = id.as_uuid().to_string();

        assert!(id.matches(&full));
        assert!(id.matches(&id.to_string()));
        assert!(id.matches(&full[..8]));
        assert!(id.matches(&full[..8].to_uppercase()));
        assert!(!id.matches("exp-"));
        assert!(!id.matches(&full[..3]));
    }

    #[test]
    fn test_parse_with_prefix() {
        let uuid_str = "550e8400-e29b-41d4-a716-446655440000";
        let id: BudgetId = format!("bud-{}", uuid_str).parse().unwrap();
        assert_eq!(id.as_uuid().to_string(), uuid_str);
    }

    #[test]
    fn test_serializes_as_plain_uuid() {
        let id = ExpenseId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.as_uuid()));
    }
}
