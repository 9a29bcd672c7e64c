//! Audit entry data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::diff::generate_diff;

/// Types of operations that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Update => write!(f, "UPDATE"),
            Operation::Delete => write!(f, "DELETE"),
        }
    }
}

/// Types of entities that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    /// Income of the budget record
    Income,
    /// Needs/wants/savings split
    Allocation,
    Expense,
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityType::Income => write!(f, "Income"),
            EntityType::Allocation => write!(f, "Allocation"),
            EntityType::Expense => write!(f, "Expense"),
        }
    }
}

/// A single audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the operation occurred (UTC)
    pub timestamp: DateTime<Utc>,
    pub operation: Operation,
    pub entity_type: EntityType,
    pub entity_id: String,

    /// Human-readable description of the entity (e.g. expense name)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_summary: Option<String>,
}

impl AuditEntry {
    fn with_values(
        operation: Operation,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
        before: Option<serde_json::Value>,
        after: Option<serde_json::Value>,
    ) -> Self {
        let diff_summary = match (&before, &after) {
            (Some(b), Some(a)) => generate_diff(b, a),
            _ => None,
        };

        Self {
            timestamp: Utc::now(),
            operation,
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
            diff_summary,
        }
    }

    pub fn create<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        Self::with_values(
            Operation::Create,
            entity_type,
            entity_id.into(),
            entity_name,
            None,
            serde_json::to_value(entity).ok(),
        )
    }

    /// Update entry; the diff summary is derived from `before` and `after`
    pub fn update<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> Self {
        Self::with_values(
            Operation::Update,
            entity_type,
            entity_id.into(),
            entity_name,
            serde_json::to_value(before).ok(),
            serde_json::to_value(after).ok(),
        )
    }

    pub fn delete<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        Self::with_values(
            Operation::Delete,
            entity_type,
            entity_id.into(),
            entity_name,
            serde_json::to_value(entity).ok(),
            None,
        )
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.entity_type,
            self.entity_id
        );

        if let Some(name) = &self.entity_name {
            output.push_str(&format!(" ({})", name));
        }

        if let Some(diff) = &self.diff_summary {
            output.push_str(&format!("\n  Changes: {}", diff));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_entry_has_after_only() {
        let entry = AuditEntry::create(
            EntityType::Expense,
            "exp-1a2b3c4d",
            Some("Rent".into()),
            &json!({"name": "Rent", "amount": 2000000}),
        );
        assert_eq!(entry.operation, Operation::Create);
        assert!(entry.before.is_none());
        assert!(entry.after.is_some());
        assert!(entry.diff_summary.is_none());
    }

    #[test]
    fn test_update_entry_computes_diff() {
        let entry = AuditEntry::update(
            EntityType::Income,
            "budget",
            None,
            &json!({"income": 4000000}),
            &json!({"income": 5000000}),
        );
        assert_eq!(
            entry.diff_summary.as_deref(),
            Some("income: 4000000 -> 5000000")
        );
    }

    #[test]
    fn test_human_readable() {
        let entry = AuditEntry::delete(
            EntityType::Expense,
            "exp-1a2b3c4d",
            Some("Cinema".into()),
            &json!({"name": "Cinema"}),
        );
        let text = entry.format_human_readable();
        assert!(text.contains("DELETE Expense exp-1a2b3c4d (Cinema)"));
    }

    #[test]
    fn test_serialization_skips_empty_fields() {
        let entry = AuditEntry::create(EntityType::Allocation, "budget", None, &json!({}));
        let line = serde_json::to_string(&entry).unwrap();
        assert!(line.contains("\"entity_type\":\"allocation\""));
        assert!(!line.contains("before"));
        assert!(!line.contains("entity_name"));
    }
}
