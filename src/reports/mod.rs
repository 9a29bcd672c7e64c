//! Reports for triad
//!
//! - Allocation vs. expense summary per category

pub mod summary;

pub use summary::{BudgetSummary, CategorySummary};
