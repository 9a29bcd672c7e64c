//! The persistence abstraction shared by the local and remote stores

use crate::error::TriadResult;
use crate::models::{BudgetState, Category, Expense, ExpenseId};

/// One expense mutation to mirror into a store
#[derive(Debug, Clone, PartialEq)]
pub enum ExpenseChange {
    Inserted { category: Category, expense: Expense },
    Updated { category: Category, expense: Expense },
    Removed { category: Category, id: ExpenseId },
}

impl ExpenseChange {
    pub fn category(&self) -> Category {
        match self {
            Self::Inserted { category, .. }
            | Self::Updated { category, .. }
            | Self::Removed { category, .. } => *category,
        }
    }

    pub fn expense_id(&self) -> ExpenseId {
        match self {
            Self::Inserted { expense, .. } | Self::Updated { expense, .. } => expense.id,
            Self::Removed { id, .. } => *id,
        }
    }
}

/// Where a budget lives between runs
///
/// Every write receives the full current state so that a store which only
/// keeps whole snapshots can ignore the finer-grained change.
pub trait BudgetStore {
    /// Short description for status output, e.g. "local snapshot (/path)"
    fn describe(&self) -> String;

    /// Load the stored budget, or `None` if nothing was saved yet
    fn load(&self) -> TriadResult<Option<BudgetState>>;

    /// Persist income and allocation
    fn save_budget(&self, state: &BudgetState) -> TriadResult<()>;

    /// Persist a single expense change
    fn save_expense(&self, state: &BudgetState, change: &ExpenseChange) -> TriadResult<()>;

    /// Overwrite everything stored with `state`
    fn replace_all(&self, state: &BudgetState) -> TriadResult<()>;
}
