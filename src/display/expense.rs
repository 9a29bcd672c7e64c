//! Expense list formatting

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use super::format::{money, truncate};
use crate::models::{Category, Expense, ExpenseBook};

const NAME_WIDTH: usize = 28;

#[derive(Tabled)]
struct ExpenseRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Category")]
    category: &'static str,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Paid")]
    paid: &'static str,
}

impl ExpenseRow {
    fn new(category: Category, expense: &Expense, symbol: &str) -> Self {
        Self {
            id: expense.id.to_string(),
            category: category.label(),
            name: truncate(&expense.name, NAME_WIDTH),
            amount: money(expense.amount, symbol),
            paid: if expense.paid { "yes" } else { "" },
        }
    }
}

/// Format expenses as a table, optionally limited to one category
pub fn format_expense_table(
    book: &ExpenseBook,
    category: Option<Category>,
    symbol: &str,
) -> String {
    let rows: Vec<ExpenseRow> = book
        .iter()
        .filter(|(c, _)| category.map_or(true, |wanted| *c == wanted))
        .map(|(c, e)| ExpenseRow::new(c, e, symbol))
        .collect();

    if rows.is_empty() {
        return match category {
            Some(c) => format!("No {} expenses.\n", c.as_str()),
            None => "No expenses.\n".to_string(),
        };
    }

    let mut table = Table::new(rows);
    table
        .with(Style::sharp())
        .with(Modify::new(Columns::single(3)).with(Alignment::right()));
    format!("{}\n", table)
}

/// Format a single expense for display
pub fn format_expense_details(category: Category, expense: &Expense, symbol: &str) -> String {
    let mut output = String::new();
    output.push_str(&format!("Expense:  {}\n", expense.id));
    output.push_str(&format!("Category: {}\n", category.label()));
    output.push_str(&format!("Name:     {}\n", expense.name));
    output.push_str(&format!("Amount:   {}\n", money(expense.amount, symbol)));
    output.push_str(&format!(
        "Paid:     {}\n",
        if expense.paid { "yes" } else { "no" }
    ));
    output
}
