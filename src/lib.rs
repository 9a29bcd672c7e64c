//! triad - a terminal 50/30/20 budget planner
//!
//! Split a monthly income into needs, wants and savings, then track expenses
//! against each share. Budgets live in a local JSON snapshot or, for a
//! signed-in user, in a remote managed database.
//!
//! # Architecture
//!
//! - `config`: path resolution and user settings
//! - `error`: custom error types
//! - `models`: money, categories, the allocation rebalancer, expenses
//! - `reports`: allocated vs. spent summaries
//! - `storage`: the local snapshot and remote stores behind one trait
//! - `services`: the budget session and debounced saving
//! - `audit`: append-only audit trail
//! - `display` and `cli`: terminal output and commands
//!
//! # Example
//!
//! ```rust,ignore
//! use triad_cli::config::{Settings, TriadPaths};
//! use triad_cli::models::{Category, Money};
//! use triad_cli::services::BudgetSession;
//! use triad_cli::storage::open_store;
//!
//! let paths = TriadPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let store = open_store(&paths, &settings, None)?;
//!
//! let mut session = BudgetSession::open(store, &settings);
//! session.set_income(Money::from_units(5_000_000));
//! session.set_allocation(Category::Needs, 60);
//! session.flush();
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{TriadError, TriadResult};
