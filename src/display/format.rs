//! Shared formatting helpers for terminal output

use crate::models::Money;

/// Format a percentage with precision that suits its size
pub fn format_percentage(pct: f64) -> String {
    if pct > 0.0 && pct < 0.1 {
        format!("{:.2}%", pct)
    } else if pct < 10.0 {
        format!("{:.1}%", pct)
    } else {
        format!("{:.0}%", pct)
    }
}

/// Text progress bar; anything past 100% is shown as a full bar
pub fn format_bar(percent: f64, width: usize) -> String {
    if percent <= 0.0 {
        return "░".repeat(width);
    }

    let filled = ((percent / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Money with the configured symbol, e.g. "Rp 1.500.000"
pub fn money(amount: Money, symbol: &str) -> String {
    amount.format_with_symbol(symbol)
}

pub fn separator(width: usize) -> String {
    "─".repeat(width)
}

/// Truncate to `max_len` characters, ending in "..." when cut
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        ".".repeat(max_len)
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(0.05), "0.05%");
        assert_eq!(format_percentage(5.25), "5.2%");
        assert_eq!(format_percentage(80.0), "80%");
        assert_eq!(format_percentage(120.4), "120%");
    }

    #[test]
    fn test_format_bar() {
        assert_eq!(format_bar(0.0, 4), "░░░░");
        assert_eq!(format_bar(50.0, 4), "██░░");
        assert_eq!(format_bar(250.0, 4), "████");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Rent", 10), "Rent");
        assert_eq!(truncate("Groceries and household", 10), "Groceri...");
        assert_eq!(truncate("Kopi susu", 2), "..");
    }
}
