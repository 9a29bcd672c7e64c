//! Core data models for triad
//!
//! The budgeting domain: income, the needs/wants/savings allocation, and the
//! expenses tracked under each category.

pub mod allocation;
pub mod budget;
pub mod category;
pub mod expense;
pub mod identity;
pub mod ids;
pub mod money;

pub use allocation::{clamp_percent, Allocation, Reconciliation, FULL_PERCENT};
pub use budget::BudgetState;
pub use category::Category;
pub use expense::{Expense, ExpenseBook, ExpenseValidationError};
pub use identity::Identity;
pub use ids::{BudgetId, ExpenseId};
pub use money::{Money, MoneyParseError};
