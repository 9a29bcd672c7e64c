//! Expense CLI commands

use clap::Subcommand;

use super::context::{finish_session, resolve_expense, CliContext};
use crate::display::{format_expense_details, format_expense_table};
use crate::error::{TriadError, TriadResult};
use crate::models::{Category, Money};

#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Add an unpaid expense to a category
    Add {
        /// needs, wants or savings
        category: Category,
        name: String,
        /// Amount in whole units
        amount: String,
    },

    /// List expenses
    #[command(alias = "ls")]
    List {
        /// Only this category
        category: Option<Category>,
    },

    /// Change an expense's name or amount
    Edit {
        /// Expense id (e.g. exp-1a2b3c4d)
        id: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        amount: Option<String>,
    },

    /// Delete an expense
    #[command(alias = "rm")]
    Remove { id: String },

    /// Flip an expense between paid and unpaid
    Toggle { id: String },
}

pub fn parse_amount(input: &str) -> TriadResult<Money> {
    let amount = Money::parse(input)
        .map_err(|e| TriadError::Validation(format!("Invalid amount: {}", e)))?;
    if amount.is_negative() {
        return Err(TriadError::Validation(
            "Expense amount cannot be negative".into(),
        ));
    }
    Ok(amount)
}

pub fn handle_expense_command(ctx: &CliContext, cmd: ExpenseCommands) -> TriadResult<()> {
    let symbol = ctx.symbol();
    let mut session = ctx.open_session()?;

    match cmd {
        ExpenseCommands::Add {
            category,
            name,
            amount,
        } => {
            let amount = parse_amount(&amount)?;
            let id = session.add_expense(category, &name, amount)?;
            println!(
                "Added {} expense {} ({})",
                category.as_str(),
                id,
                amount.format_with_symbol(symbol)
            );
        }

        ExpenseCommands::List { category } => {
            print!(
                "{}",
                format_expense_table(&session.state().expenses, category, symbol)
            );
        }

        ExpenseCommands::Edit { id, name, amount } => {
            if name.is_none() && amount.is_none() {
                return Err(TriadError::Validation(
                    "Nothing to change; pass --name and/or --amount".into(),
                ));
            }
            let amount = amount.as_deref().map(parse_amount).transpose()?;
            let (category, id) = resolve_expense(&session.state().expenses, &id)?;

            let updated = session.edit_expense(category, id, name, amount)?;
            println!("Updated expense:");
            print!("{}", format_expense_details(category, &updated, symbol));
        }

        ExpenseCommands::Remove { id } => {
            let (category, id) = resolve_expense(&session.state().expenses, &id)?;
            let removed = session.remove_expense(category, id)?;
            println!("Removed '{}' from {}", removed.name, category.as_str());
        }

        ExpenseCommands::Toggle { id } => {
            let (category, id) = resolve_expense(&session.state().expenses, &id)?;
            let paid = session.toggle_expense_paid(category, id)?;
            println!(
                "Marked {} as {}",
                id,
                if paid { "paid" } else { "unpaid" }
            );
        }
    }

    finish_session(session)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("Rp 1.500.000").unwrap().units(), 1_500_000);
        assert!(parse_amount("-5").unwrap_err().is_validation());
        assert!(parse_amount("abc").unwrap_err().is_validation());
    }
}
