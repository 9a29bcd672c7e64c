//! Expense line items and the per-category expense book

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::category::Category;
use super::ids::ExpenseId;
use super::money::Money;
use crate::error::{TriadError, TriadResult};

/// Validation errors for expenses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpenseValidationError {
    EmptyName,
    NegativeAmount,
}

impl std::fmt::Display for ExpenseValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Expense name cannot be empty"),
            Self::NegativeAmount => write!(f, "Expense amount cannot be negative"),
        }
    }
}

impl std::error::Error for ExpenseValidationError {}

/// A named, amount-bearing line item under one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub name: String,
    pub amount: Money,
    #[serde(default)]
    pub paid: bool,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Expense {
    /// Create a new unpaid expense with a fresh id
    pub fn new(name: impl Into<String>, amount: Money) -> Self {
        Self {
            id: ExpenseId::new(),
            name: name.into().trim().to_string(),
            amount,
            paid: false,
            created_at: Utc::now(),
        }
    }

    pub fn validate(&self) -> Result<(), ExpenseValidationError> {
        if self.name.trim().is_empty() {
            return Err(ExpenseValidationError::EmptyName);
        }
        if self.amount.is_negative() {
            return Err(ExpenseValidationError::NegativeAmount);
        }
        Ok(())
    }
}

/// One ordered expense list per category
///
/// Every mutation is keyed by `(category, id)`; an id that is not in the
/// named category's list is reported as not found, even if it exists under
/// another category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseBook {
    #[serde(default)]
    needs: Vec<Expense>,
    #[serde(default)]
    wants: Vec<Expense>,
    #[serde(default)]
    savings: Vec<Expense>,
}

impl ExpenseBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expenses of a category in insertion order
    pub fn list(&self, category: Category) -> &[Expense] {
        match category {
            Category::Needs => &self.needs,
            Category::Wants => &self.wants,
            Category::Savings => &self.savings,
        }
    }

    fn list_mut(&mut self, category: Category) -> &mut Vec<Expense> {
        match category {
            Category::Needs => &mut self.needs,
            Category::Wants => &mut self.wants,
            Category::Savings => &mut self.savings,
        }
    }

    /// Iterate over every expense together with its category
    pub fn iter(&self) -> impl Iterator<Item = (Category, &Expense)> {
        Category::ALL
            .into_iter()
            .flat_map(move |c| self.list(c).iter().map(move |e| (c, e)))
    }

    pub fn len(&self) -> usize {
        self.needs.len() + self.wants.len() + self.savings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, category: Category, id: ExpenseId) -> Option<&Expense> {
        self.list(category).iter().find(|e| e.id == id)
    }

    /// Append a new unpaid expense and return its id
    pub fn add(
        &mut self,
        category: Category,
        name: impl Into<String>,
        amount: Money,
    ) -> TriadResult<ExpenseId> {
        let expense = Expense::new(name, amount);
        expense
            .validate()
            .map_err(|e| TriadError::Validation(e.to_string()))?;

        let id = expense.id;
        self.list_mut(category).push(expense);
        Ok(id)
    }

    /// Append an existing expense record, keeping its id
    ///
    /// Used when restoring records from a store.
    pub fn insert(&mut self, category: Category, expense: Expense) {
        self.list_mut(category).push(expense);
    }

    /// Replace the record with the same id in `category`
    ///
    /// Returns the previous version of the record.
    pub fn update(&mut self, category: Category, expense: Expense) -> TriadResult<Expense> {
        expense
            .validate()
            .map_err(|e| TriadError::Validation(e.to_string()))?;

        let slot = self
            .list_mut(category)
            .iter_mut()
            .find(|e| e.id == expense.id)
            .ok_or_else(|| TriadError::expense_not_found(expense.id.to_string()))?;

        // creation time is part of the record's identity, not user-editable
        let created_at = slot.created_at;
        let before = std::mem::replace(slot, expense);
        slot.created_at = created_at;
        Ok(before)
    }

    /// Delete the record with `id` from `category` and return it
    pub fn remove(&mut self, category: Category, id: ExpenseId) -> TriadResult<Expense> {
        let list = self.list_mut(category);
        let index = list
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| TriadError::expense_not_found(id.to_string()))?;
        Ok(list.remove(index))
    }

    /// Flip the paid flag and return the new value
    pub fn toggle_paid(&mut self, category: Category, id: ExpenseId) -> TriadResult<bool> {
        let expense = self
            .list_mut(category)
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| TriadError::expense_not_found(id.to_string()))?;

        expense.paid = !expense.paid;
        Ok(expense.paid)
    }

    /// Find the expense a user typed, in any category
    ///
    /// Returns `None` if nothing matches or the input is ambiguous.
    pub fn resolve(&self, needle: &str) -> Option<(Category, ExpenseId)> {
        let mut matches = self.iter().filter(|(_, e)| e.id.matches(needle));
        let first = matches.next().map(|(c, e)| (c, e.id))?;
        if matches.next().is_some() {
            return None;
        }
        Some(first)
    }
}
