//! The three fixed budget categories

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TriadError;

/// One of the three 50/30/20 buckets
///
/// Used as a key for both the allocation percentages and the expense lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Needs,
    Wants,
    Savings,
}

impl Category {
    /// All categories in their fixed order
    ///
    /// This order is also the order in which the rebalancer takes overflow
    /// from the categories that were not edited.
    pub const ALL: [Category; 3] = [Category::Needs, Category::Wants, Category::Savings];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Needs => "needs",
            Self::Wants => "wants",
            Self::Savings => "savings",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Needs => "Needs",
            Self::Wants => "Wants",
            Self::Savings => "Savings",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for Category {
    type Err = TriadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "needs" | "need" | "n" => Ok(Self::Needs),
            "wants" | "want" | "w" => Ok(Self::Wants),
            "savings" | "saving" | "s" => Ok(Self::Savings),
            other => Err(TriadError::Validation(format!(
                "Unknown category '{}' (expected needs, wants or savings)",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("Needs".parse::<Category>().unwrap(), Category::Needs);
        assert_eq!("w".parse::<Category>().unwrap(), Category::Wants);
        assert_eq!(" saving ".parse::<Category>().unwrap(), Category::Savings);
        assert!("fun".parse::<Category>().unwrap_err().is_validation());
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Category::Wants).unwrap(), "\"wants\"");
        let c: Category = serde_json::from_str("\"savings\"").unwrap();
        assert_eq!(c, Category::Savings);
    }
}
