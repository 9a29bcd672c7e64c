//! Display formatting for terminal output
//!
//! Plain-text renderings of budget summaries, allocation splits, expense
//! tables and audit history.

pub mod expense;
pub mod format;
pub mod history;
pub mod summary;

pub use expense::{format_expense_details, format_expense_table};
pub use history::{format_history, format_notifications};
pub use summary::{format_allocation, format_summary};
