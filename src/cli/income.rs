//! Income CLI commands

use clap::Subcommand;

use super::context::{finish_session, CliContext};
use crate::error::{TriadError, TriadResult};
use crate::models::Money;

#[derive(Subcommand)]
pub enum IncomeCommands {
    /// Set the monthly income
    Set {
        /// Amount in whole units (e.g. "5000000" or "5.000.000")
        #[arg(allow_hyphen_values = true)]
        amount: String,
    },

    /// Show the income and what each category receives
    Show,
}

pub fn handle_income_command(ctx: &CliContext, cmd: IncomeCommands) -> TriadResult<()> {
    let symbol = ctx.symbol();
    let mut session = ctx.open_session()?;

    match cmd {
        IncomeCommands::Set { amount } => {
            let amount = Money::parse(&amount)
                .map_err(|e| TriadError::Validation(format!("Invalid amount: {}", e)))?;
            if amount.is_negative() {
                println!("Income cannot be negative; using 0.");
            }
            let income = session.set_income(amount);
            println!("Income set to {}", income.format_with_symbol(symbol));
        }

        IncomeCommands::Show => {
            let state = session.state();
            println!("Income: {}", state.income.format_with_symbol(symbol));
            println!();
            print!(
                "{}",
                crate::display::format_allocation(&state.allocation, state.income, symbol)
            );
        }
    }

    finish_session(session)
}
