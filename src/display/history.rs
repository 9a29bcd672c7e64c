//! Audit history and notification formatting

use crate::audit::AuditEntry;
use crate::services::Notification;

/// Format audit entries, oldest first
pub fn format_history(entries: &[AuditEntry]) -> String {
    if entries.is_empty() {
        return "No history yet.\n".to_string();
    }

    let mut output = String::new();
    for entry in entries {
        output.push_str(&entry.format_human_readable());
        output.push('\n');
    }
    output
}

pub fn format_notifications(notifications: &[Notification]) -> String {
    notifications
        .iter()
        .map(|n| format!("{}\n", n))
        .collect()
}
