//! Allocation vs. expense summary
//!
//! Derived values only; recomputed from a [`BudgetState`] on every read and
//! never stored.

use crate::models::{BudgetState, Category, Money};

/// Allocation against spending for a single category
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySummary {
    pub category: Category,
    /// Allocation percentage
    pub percent: i32,
    /// income × percent / 100
    pub allocated: Money,
    /// Sum of every expense in the category, paid or not
    pub spent: Money,
    /// Portion of `spent` already marked paid
    pub paid: Money,
    /// allocated − spent; negative means overspent
    pub remaining: Money,
    /// spent / allocated × 100, or 0 when nothing is allocated
    pub progress_percent: f64,
    pub expense_count: usize,
}

impl CategorySummary {
    pub fn compute(state: &BudgetState, category: Category) -> Self {
        let allocated = state.allocated(category);
        let expenses = state.expenses.list(category);
        let spent: Money = expenses.iter().map(|e| e.amount).sum();
        let paid: Money = expenses.iter().filter(|e| e.paid).map(|e| e.amount).sum();

        let progress_percent = if allocated.is_positive() {
            spent.units() as f64 / allocated.units() as f64 * 100.0
        } else {
            0.0
        };

        Self {
            category,
            percent: state.allocation.get(category),
            allocated,
            spent,
            paid,
            remaining: allocated - spent,
            progress_percent,
            expense_count: expenses.len(),
        }
    }

    /// Spending not yet marked paid
    pub fn unpaid(&self) -> Money {
        self.spent - self.paid
    }

    pub fn is_overspent(&self) -> bool {
        self.remaining.is_negative()
    }
}

/// Summary over all three categories
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetSummary {
    pub income: Money,
    pub categories: Vec<CategorySummary>,
    pub total_allocated: Money,
    pub total_spent: Money,
    pub total_remaining: Money,
    /// Whether the allocation sums to exactly 100
    pub allocation_balanced: bool,
    pub allocation_total: i32,
}

impl BudgetSummary {
    pub fn generate(state: &BudgetState) -> Self {
        let categories: Vec<_> = Category::ALL
            .iter()
            .map(|c| CategorySummary::compute(state, *c))
            .collect();

        let total_allocated = categories.iter().map(|c| c.allocated).sum();
        let total_spent: Money = categories.iter().map(|c| c.spent).sum();

        Self {
            income: state.income,
            total_remaining: state.income - total_spent,
            total_allocated,
            total_spent,
            allocation_balanced: state.allocation.is_balanced(),
            allocation_total: state.allocation.total(),
            categories,
        }
    }

    pub fn category(&self, category: Category) -> Option<&CategorySummary> {
        self.categories.iter().find(|c| c.category == category)
    }

    pub fn has_overspent(&self) -> bool {
        self.categories.iter().any(|c| c.is_overspent())
    }
}
