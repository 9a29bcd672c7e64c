//! Field diffs for audit entries

use serde_json::Value;

/// Describe what changed between two JSON values
///
/// Nested objects are flattened into dotted paths (`allocation.needs`), so an
/// income or allocation change on a budget snapshot reads naturally. Returns
/// `None` when nothing changed.
pub fn generate_diff(before: &Value, after: &Value) -> Option<String> {
    let mut changes = Vec::new();
    collect_changes(before, after, "", &mut changes);

    if changes.is_empty() {
        None
    } else {
        Some(changes.join(", "))
    }
}

fn collect_changes(before: &Value, after: &Value, path: &str, changes: &mut Vec<String>) {
    match (before, after) {
        (Value::Object(b), Value::Object(a)) => {
            for (key, before_val) in b {
                let child = join_path(path, key);
                match a.get(key) {
                    Some(after_val) => collect_changes(before_val, after_val, &child, changes),
                    None => changes.push(format!("{}: {} -> (removed)", child, render(before_val))),
                }
            }
            for (key, after_val) in a {
                if !b.contains_key(key) {
                    changes.push(format!(
                        "{}: (added) -> {}",
                        join_path(path, key),
                        render(after_val)
                    ));
                }
            }
        }
        _ if before != after => {
            let label = if path.is_empty() { "value" } else { path };
            changes.push(format!("{}: {} -> {}", label, render(before), render(after)));
        }
        _ => {}
    }
}

fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) if s.chars().count() > 40 => {
            let head: String = s.chars().take(37).collect();
            format!("\"{}...\"", head)
        }
        Value::Array(items) => format!("[{} items]", items.len()),
        Value::Object(fields) => format!("{{{} fields}}", fields.len()),
        other => other.to_string(),
    }
}
