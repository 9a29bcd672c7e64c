//! Allocation model: the needs/wants/savings percentage split
//!
//! Two operations keep the split honest:
//!
//! - [`Allocation::rebalance`] applies a single slider edit. When the edit
//!   pushes the total past 100, the other categories give up the overflow
//!   greedily in the fixed [`Category::ALL`] order. The total may stay below
//!   100 while the user is still dragging.
//! - [`Allocation::reconcile`] runs when the edit is committed and forces the
//!   total to exactly 100 by adjusting savings.

use serde::{Deserialize, Deserializer, Serialize};

use super::category::Category;
use super::money::Money;
use crate::config::ReconcilePolicy;

/// Sum every committed allocation must reach
pub const FULL_PERCENT: i32 = 100;

/// Clamp a raw percentage to the [0, 100] input range
pub fn clamp_percent(value: i32) -> i32 {
    value.clamp(0, FULL_PERCENT)
}

/// Bring a stored percentage back into the range a commit can produce
///
/// Under `permit-negative` savings can reach -100, so stored values are kept
/// within [-100, 100].
pub fn clamp_stored_percent(value: i32) -> i32 {
    value.clamp(-FULL_PERCENT, FULL_PERCENT)
}

fn de_stored_percent<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = i64::deserialize(deserializer)?;
    let bound = FULL_PERCENT as i64;
    Ok(raw.clamp(-bound, bound) as i32)
}

/// Percentage of income assigned to each category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    #[serde(deserialize_with = "de_stored_percent")]
    pub needs: i32,
    #[serde(deserialize_with = "de_stored_percent")]
    pub wants: i32,
    #[serde(deserialize_with = "de_stored_percent")]
    pub savings: i32,
}

impl Default for Allocation {
    /// The classic 50/30/20 split
    fn default() -> Self {
        Self::new(50, 30, 20)
    }
}

/// Result of committing an allocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    /// The allocation that should be persisted
    pub allocation: Allocation,
    /// Change applied to savings (positive when savings grew)
    pub savings_delta: i32,
    /// Percentage points taken from wants/needs because savings hit zero
    pub redistributed: i32,
    /// Set when the committed allocation still has a negative field
    pub warning: Option<String>,
}

impl Reconciliation {
    /// Whether the commit had to change anything
    pub fn changed(&self) -> bool {
        self.savings_delta != 0 || self.redistributed != 0
    }
}

impl Allocation {
    pub const fn new(needs: i32, wants: i32, savings: i32) -> Self {
        Self {
            needs,
            wants,
            savings,
        }
    }

    /// Build from stored values, clamping each into [-100, 100]
    pub fn from_stored(needs: i32, wants: i32, savings: i32) -> Self {
        Self::new(
            clamp_stored_percent(needs),
            clamp_stored_percent(wants),
            clamp_stored_percent(savings),
        )
    }

    pub fn get(&self, category: Category) -> i32 {
        match category {
            Category::Needs => self.needs,
            Category::Wants => self.wants,
            Category::Savings => self.savings,
        }
    }

    pub fn set(&mut self, category: Category, value: i32) {
        match category {
            Category::Needs => self.needs = value,
            Category::Wants => self.wants = value,
            Category::Savings => self.savings = value,
        }
    }

    pub fn total(&self) -> i32 {
        self.needs
            .saturating_add(self.wants)
            .saturating_add(self.savings)
    }

    /// True when the three fields sum to exactly 100
    pub fn is_balanced(&self) -> bool {
        self.total() == FULL_PERCENT
    }

    /// True when any field is below zero
    pub fn has_negative(&self) -> bool {
        Category::ALL.iter().any(|c| self.get(*c) < 0)
    }

    /// Money assigned to a category for the given income
    pub fn amount_for(&self, income: Money, category: Category) -> Money {
        income.percent(self.get(category))
    }

    /// Apply a single slider edit
    ///
    /// `value` is clamped to [0, 100] and stored exactly. If the total then
    /// exceeds 100, the overflow is taken from the other two categories in
    /// [`Category::ALL`] order, each giving up at most what it has. No field
    /// is pushed below zero.
    pub fn rebalance(&self, category: Category, value: i32) -> Allocation {
        let mut next = *self;
        next.set(category, clamp_percent(value));

        let total = next.total();
        if total <= FULL_PERCENT {
            return next;
        }

        let mut overflow = total - FULL_PERCENT;
        for other in Category::ALL.into_iter().filter(|c| *c != category) {
            let current = next.get(other);
            let reduction = current.max(0).min(overflow);
            next.set(other, current - reduction);
            overflow -= reduction;
            if overflow <= 0 {
                break;
            }
        }

        next
    }

    /// Force the total to exactly 100 at commit time
    ///
    /// The signed difference `100 - total` is added to savings. Under
    /// [`ReconcilePolicy::Clamp`] savings never drops below zero; whatever
    /// it cannot absorb is taken from wants, then needs. Under
    /// [`ReconcilePolicy::PermitNegative`] savings takes the whole difference
    /// and a warning is attached when it ends up negative.
    pub fn reconcile(&self, policy: ReconcilePolicy) -> Reconciliation {
        let diff = FULL_PERCENT.saturating_sub(self.total());
        let mut next = *self;
        next.savings = next.savings.saturating_add(diff);

        let mut redistributed: i32 = 0;
        if policy == ReconcilePolicy::Clamp && next.savings < 0 {
            let mut excess = next.savings.saturating_neg();
            next.savings = 0;
            for donor in [Category::Wants, Category::Needs] {
                let current = next.get(donor);
                let take = current.max(0).min(excess);
                next.set(donor, current - take);
                excess -= take;
                redistributed = redistributed.saturating_add(take);
                if excess == 0 {
                    break;
                }
            }
        }

        let warning = next.has_negative().then(|| {
            format!(
                "Allocation has a negative share: needs {}%, wants {}%, savings {}%",
                next.needs, next.wants, next.savings
            )
        });

        Reconciliation {
            allocation: next,
            savings_delta: next.savings.saturating_sub(self.savings),
            redistributed,
            warning,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_fifty_thirty_twenty() {
        let a = Allocation::default();
        assert_eq!(a, Allocation::new(50, 30, 20));
        assert!(a.is_balanced());
    }

    #[test]
    fn test_rebalance_greedy_example() {
        let start = Allocation::new(50, 30, 20);
        let next = start.rebalance(Category::Needs, 80);
        assert_eq!(next, Allocation::new(80, 0, 0));
    }

    #[test]
    fn test_rebalance_first_other_absorbs_first() {
        let start = Allocation::new(50, 30, 20);
        let next = start.rebalance(Category::Savings, 40);
        // overflow 20 comes entirely from needs, the first non-edited category
        assert_eq!(next, Allocation::new(30, 30, 40));
    }

    #[test]
    fn test_rebalance_below_total_leaves_others() {
        let start = Allocation::new(50, 30, 20);
        let next = start.rebalance(Category::Wants, 10);
        assert_eq!(next, Allocation::new(50, 10, 20));
        assert_eq!(next.total(), 80);
    }

    #[test]
    fn test_rebalance_clamps_input() {
        let start = Allocation::new(50, 30, 20);
        assert_eq!(start.rebalance(Category::Wants, 140), Allocation::new(0, 100, 0));
        assert_eq!(start.rebalance(Category::Wants, -5).wants, 0);
    }

    #[test]
    fn test_rebalance_never_negative_and_never_over_hundred() {
        let starts = [
            Allocation::new(50, 30, 20),
            Allocation::new(100, 0, 0),
            Allocation::new(0, 0, 100),
            Allocation::new(33, 33, 34),
        ];
        for start in starts {
            for category in Category::ALL {
                for value in 0..=100 {
                    let next = start.rebalance(category, value);
                    assert!(!next.has_negative(), "{:?} {} {} -> {:?}", start, category, value, next);
                    assert!(next.total() <= 100, "{:?} {} {} -> {:?}", start, category, value, next);
                    assert_eq!(next.get(category), value);
                }
            }
        }
    }

    #[test]
    fn test_reconcile_fills_savings() {
        let r = Allocation::new(40, 40, 10).reconcile(ReconcilePolicy::Clamp);
        assert_eq!(r.allocation, Allocation::new(40, 40, 20));
        assert_eq!(r.savings_delta, 10);
        assert!(r.warning.is_none());
    }

    #[test]
    fn test_reconcile_is_idempotent_when_balanced() {
        let a = Allocation::new(60, 25, 15);
        for policy in [ReconcilePolicy::Clamp, ReconcilePolicy::PermitNegative] {
            let r = a.reconcile(policy);
            assert_eq!(r.allocation, a);
            assert!(!r.changed());
        }
    }

    #[test]
    fn test_reconcile_clamp_redistributes_excess() {
        let r = Allocation::new(70, 40, 0).reconcile(ReconcilePolicy::Clamp);
        assert_eq!(r.allocation, Allocation::new(70, 30, 0));
        assert_eq!(r.redistributed, 10);
        assert!(r.allocation.is_balanced());
        assert!(r.warning.is_none());
    }

    #[test]
    fn test_reconcile_clamp_takes_from_needs_after_wants() {
        let r = Allocation::new(95, 5, 10).reconcile(ReconcilePolicy::Clamp);
        assert_eq!(r.allocation, Allocation::new(95, 5, 0));

        // only reachable from hand-edited snapshots, where needs exceeds 100
        let r = Allocation::new(110, 5, 0).reconcile(ReconcilePolicy::Clamp);
        assert_eq!(r.allocation, Allocation::new(100, 0, 0));
        assert_eq!(r.redistributed, 15);
        assert!(!r.allocation.has_negative());
    }

    #[test]
    fn test_reconcile_permit_negative_warns() {
        let r = Allocation::new(70, 40, 0).reconcile(ReconcilePolicy::PermitNegative);
        assert_eq!(r.allocation, Allocation::new(70, 40, -10));
        assert!(r.allocation.is_balanced());
        assert!(r.warning.is_some());
    }

    #[test]
    fn test_extreme_values_do_not_overflow() {
        let huge = Allocation::new(i32::MAX, i32::MAX, i32::MIN);
        assert_eq!(Allocation::new(i32::MAX, i32::MAX, 0).total(), i32::MAX);

        for policy in [ReconcilePolicy::Clamp, ReconcilePolicy::PermitNegative] {
            huge.reconcile(policy);
            Allocation::new(i32::MAX, i32::MAX, 0).reconcile(policy);
        }
        for category in Category::ALL {
            let next = Allocation::new(i32::MAX, i32::MAX, i32::MAX).rebalance(category, 50);
            assert!(!next.has_negative());
        }
    }

    #[test]
    fn test_stored_values_are_clamped() {
        let a: Allocation = serde_json::from_str(
            r#"{"needs": 9999999999, "wants": 2147483647, "savings": -500}"#,
        )
        .unwrap();
        assert_eq!(a, Allocation::new(100, 100, -100));

        let r = a.reconcile(ReconcilePolicy::Clamp);
        assert!(!r.allocation.has_negative());
        assert!(r.allocation.is_balanced());

        assert_eq!(Allocation::from_stored(150, -7, -300), Allocation::new(100, -7, -100));
    }

    #[test]
    fn test_amount_for() {
        let income = Money::from_units(5_000_000);
        let a = Allocation::default();
        assert_eq!(a.amount_for(income, Category::Wants).units(), 1_500_000);
        assert_eq!(a.amount_for(income, Category::Needs).units(), 2_500_000);
    }
}
