//! Whole budget state: income, allocation and expenses

use serde::{Deserialize, Serialize};

use super::allocation::Allocation;
use super::category::Category;
use super::expense::{Expense, ExpenseBook};
use super::money::Money;

/// Everything a user edits, in one snapshot
///
/// This is what the local store writes verbatim and what the remote store
/// splits into a budget row plus expense rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetState {
    #[serde(default)]
    pub income: Money,
    #[serde(default)]
    pub allocation: Allocation,
    #[serde(default)]
    pub expenses: ExpenseBook,
}

impl BudgetState {
    /// Money assigned to a category
    pub fn allocated(&self, category: Category) -> Money {
        self.allocation.amount_for(self.income, category)
    }

    /// Sum of all expense amounts in a category, paid or not
    pub fn spent(&self, category: Category) -> Money {
        self.expenses.list(category).iter().map(|e| e.amount).sum()
    }

    /// Expenses held here whose id does not appear anywhere in `other`
    pub fn expenses_not_in<'a>(&'a self, other: &BudgetState) -> Vec<(Category, &'a Expense)> {
        self.expenses
            .iter()
            .filter(|(_, expense)| !other.expenses.iter().any(|(_, o)| o.id == expense.id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state() {
        let state = BudgetState::default();
        assert!(state.income.is_zero());
        assert_eq!(state.allocation, Allocation::default());
        assert!(state.expenses.is_empty());
    }

    #[test]
    fn test_partial_snapshot_fills_defaults() {
        let state: BudgetState = serde_json::from_str(r#"{"income": 4000000}"#).unwrap();
        assert_eq!(state.income.units(), 4_000_000);
        assert_eq!(state.allocation, Allocation::default());
    }

    #[test]
    fn test_spent_counts_paid_and_unpaid() {
        let mut state = BudgetState::default();
        let a = state
            .expenses
            .add(Category::Wants, "Cinema", Money::from_units(100))
            .unwrap();
        state
            .expenses
            .add(Category::Wants, "Books", Money::from_units(250))
            .unwrap();
        state.expenses.toggle_paid(Category::Wants, a).unwrap();

        assert_eq!(state.spent(Category::Wants).units(), 350);
        assert!(state.spent(Category::Needs).is_zero());
    }

    #[test]
    fn test_expenses_not_in() {
        let mut local = BudgetState::default();
        let rent = local
            .expenses
            .add(Category::Needs, "Rent", Money::from_units(2_000_000))
            .unwrap();

        let mut remote = local.clone();
        remote
            .expenses
            .add(Category::Savings, "Emergency fund", Money::from_units(500_000))
            .unwrap();
        // moved between categories still counts as present
        let moved = remote.expenses.remove(Category::Needs, rent).unwrap();
        remote.expenses.insert(Category::Wants, moved);

        let missing = remote.expenses_not_in(&local);
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].0, Category::Savings);
        assert_eq!(missing[0].1.name, "Emergency fund");

        assert!(local.expenses_not_in(&remote).is_empty());
    }
}
