//! CLI command handlers
//!
//! Bridges clap argument parsing with [`BudgetSession`](crate::services::BudgetSession).
//! Each handler opens a session, applies one command and flushes before
//! returning.

pub mod alloc;
pub mod auth;
pub mod config;
pub mod context;
pub mod expense;
pub mod income;
pub mod shell;
pub mod summary;
pub mod sync;

pub use alloc::{handle_alloc_command, AllocCommands};
pub use auth::{handle_auth_command, AuthCommands};
pub use config::{handle_config_command, ConfigCommands};
pub use context::CliContext;
pub use expense::{handle_expense_command, ExpenseCommands};
pub use income::{handle_income_command, IncomeCommands};
pub use shell::handle_shell_command;
pub use summary::{handle_history_command, handle_summary_command};
pub use sync::{handle_sync_command, SyncCommands};
