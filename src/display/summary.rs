//! Budget summary and allocation formatting

use super::format::{format_bar, format_percentage, money, separator};
use crate::models::{Allocation, Category, Money, FULL_PERCENT};
use crate::reports::BudgetSummary;

const BAR_WIDTH: usize = 10;
const WIDTH: usize = 86;

/// Format the allocation split with the amount each share is worth
pub fn format_allocation(allocation: &Allocation, income: Money, symbol: &str) -> String {
    let mut output = String::new();

    for category in Category::ALL {
        output.push_str(&format!(
            "{:8} {:>4}%  {:>16}\n",
            category.label(),
            allocation.get(category),
            money(allocation.amount_for(income, category), symbol)
        ));
    }

    output.push_str(&format!("{:8} {:>4}%\n", "Total", allocation.total()));
    if !allocation.is_balanced() {
        output.push_str(&format!(
            "Total must be {}% (currently {}%)\n",
            FULL_PERCENT,
            allocation.total()
        ));
    }

    output
}

/// Format the per-category allocated/spent/remaining table
pub fn format_summary(summary: &BudgetSummary, symbol: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Income: {}\n\n", money(summary.income, symbol)));
    output.push_str(&format!(
        "{:8} {:>5}  {:>16} {:>16} {:>16}  {}\n",
        "Category", "Share", "Allocated", "Spent", "Remaining", "Progress"
    ));
    output.push_str(&separator(WIDTH));
    output.push('\n');

    for row in &summary.categories {
        let flag = if row.is_overspent() { " over" } else { "" };
        output.push_str(&format!(
            "{:8} {:>4}%  {:>16} {:>16} {:>16}  {} {}{}\n",
            row.category.label(),
            row.percent,
            money(row.allocated, symbol),
            money(row.spent, symbol),
            money(row.remaining, symbol),
            format_bar(row.progress_percent, BAR_WIDTH),
            format_percentage(row.progress_percent),
            flag
        ));
    }

    output.push_str(&separator(WIDTH));
    output.push('\n');
    output.push_str(&format!(
        "{:8} {:>4}%  {:>16} {:>16} {:>16}\n",
        "Total",
        summary.allocation_total,
        money(summary.total_allocated, symbol),
        money(summary.total_spent, symbol),
        money(summary.total_remaining, symbol)
    ));

    if !summary.allocation_balanced {
        output.push_str(&format!(
            "\nTotal must be {}% (currently {}%)\n",
            FULL_PERCENT, summary.allocation_total
        ));
    }

    output
}
