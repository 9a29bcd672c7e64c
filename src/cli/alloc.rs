//! Allocation CLI commands

use clap::Subcommand;

use super::context::{finish_session, CliContext};
use crate::display::format_allocation;
use crate::error::{TriadError, TriadResult};
use crate::models::{Category, Reconciliation};

#[derive(Subcommand)]
pub enum AllocCommands {
    /// Show the needs/wants/savings split
    Show,

    /// Set one category and commit
    Set {
        /// needs, wants or savings
        category: Category,

        /// Percentage (clamped to 0-100)
        #[arg(allow_hyphen_values = true)]
        percent: i32,
    },

    /// Apply several slider moves, then commit once
    Drag {
        /// Moves like "needs=60"
        #[arg(required = true)]
        moves: Vec<String>,
    },
}

/// Parse a "category=percent" move
pub fn parse_move(input: &str) -> TriadResult<(Category, i32)> {
    let (category, value) = input.split_once('=').ok_or_else(|| {
        TriadError::Validation(format!(
            "Expected <category>=<percent>, got '{}'",
            input
        ))
    })?;

    let category: Category = category.parse()?;
    let value = value.trim().parse::<i32>().map_err(|_| {
        TriadError::Validation(format!("Invalid percentage '{}'", value.trim()))
    })?;
    Ok((category, value))
}

pub fn handle_alloc_command(ctx: &CliContext, cmd: AllocCommands) -> TriadResult<()> {
    let symbol = ctx.symbol();
    let mut session = ctx.open_session()?;

    match cmd {
        AllocCommands::Show => {
            let state = session.state();
            print!("{}", format_allocation(&state.allocation, state.income, symbol));
        }

        AllocCommands::Set { category, percent } => {
            let result = session.set_allocation(category, percent);
            report_commit(&result);
            let state = session.state();
            print!("{}", format_allocation(&state.allocation, state.income, symbol));
        }

        AllocCommands::Drag { moves } => {
            let moves = moves
                .iter()
                .map(|m| parse_move(m))
                .collect::<TriadResult<Vec<_>>>()?;

            for (category, value) in moves {
                let draft = session.drag_allocation(category, value);
                println!(
                    "{} -> {}: {}/{}/{}",
                    category.as_str(),
                    value,
                    draft.needs,
                    draft.wants,
                    draft.savings
                );
            }

            let result = session.commit_allocation();
            report_commit(&result);
            let state = session.state();
            print!("{}", format_allocation(&state.allocation, state.income, symbol));
        }
    }

    finish_session(session)
}

fn report_commit(result: &Reconciliation) {
    if result.savings_delta != 0 {
        println!(
            "Savings adjusted by {:+} to reach 100%",
            result.savings_delta
        );
    }
    if result.redistributed > 0 {
        println!(
            "Savings could not absorb the excess; took {} points from wants/needs",
            result.redistributed
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_move() {
        assert_eq!(parse_move("needs=60").unwrap(), (Category::Needs, 60));
        assert_eq!(parse_move("w= 15").unwrap(), (Category::Wants, 15));
        assert!(parse_move("needs").unwrap_err().is_validation());
        assert!(parse_move("needs=lots").unwrap_err().is_validation());
        assert!(parse_move("rent=10").is_err());
    }
}
