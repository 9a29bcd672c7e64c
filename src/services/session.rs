//! Budget session
//!
//! [`BudgetSession`] owns the in-memory budget, a store to mirror it into,
//! and the debounce state for budget writes. All edits go through it:
//!
//! - income edits and committed allocations are written through the
//!   [`SaveScheduler`] (income) or immediately (allocation commit)
//! - expense edits are applied locally first, then written immediately
//! - a failed write is logged and surfaced as a [`Notification`]; the local
//!   change is kept and the budget write is retried on the next flush

use std::time::Instant;

use tracing::{debug, info, warn};

use super::notification::Notification;
use super::scheduler::SaveScheduler;
use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::{ReconcilePolicy, Settings};
use crate::error::TriadResult;
use crate::models::{
    Allocation, BudgetState, Category, Expense, ExpenseId, Money, Reconciliation,
};
use crate::reports::BudgetSummary;
use crate::storage::{BudgetStore, ExpenseChange};

/// Audit id of the single budget record
const BUDGET_ENTITY_ID: &str = "budget";

/// Source of the current time for debounce deadlines
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Income and allocation as last written to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SavedBudget {
    income: Money,
    allocation: Allocation,
}

impl SavedBudget {
    fn of(state: &BudgetState) -> Self {
        Self {
            income: state.income,
            allocation: state.allocation,
        }
    }
}

/// The explicit state container behind every command
pub struct BudgetSession {
    store: Box<dyn BudgetStore>,
    clock: Box<dyn Clock>,
    audit: Option<AuditLogger>,
    policy: ReconcilePolicy,
    state: BudgetState,
    /// Uncommitted slider position, if a drag is in progress
    draft: Option<Allocation>,
    scheduler: SaveScheduler,
    /// Income/allocation differ from what the store holds
    budget_dirty: bool,
    saved: SavedBudget,
    notifications: Vec<Notification>,
}

impl BudgetSession {
    /// Load the stored budget and start a session on it
    ///
    /// A store that cannot be read is reported as a notification and the
    /// session starts from the default budget.
    pub fn open(store: Box<dyn BudgetStore>, settings: &Settings) -> Self {
        let mut notifications = Vec::new();
        let state = match store.load() {
            Ok(Some(state)) => {
                debug!(store = %store.describe(), expenses = state.expenses.len(), "loaded budget");
                state
            }
            Ok(None) => {
                debug!(store = %store.describe(), "no stored budget; starting from defaults");
                BudgetState::default()
            }
            Err(e) => {
                warn!(store = %store.describe(), error = %e, "failed to load budget");
                notifications.push(Notification::error(format!("Could not load budget: {}", e)));
                BudgetState::default()
            }
        };

        Self {
            store,
            clock: Box::new(SystemClock),
            audit: None,
            policy: settings.reconcile_policy,
            saved: SavedBudget::of(&state),
            state,
            draft: None,
            scheduler: SaveScheduler::new(settings.save_delay()),
            budget_dirty: false,
            notifications,
        }
    }

    /// Record every mutation in an audit log
    pub fn with_audit(mut self, audit: AuditLogger) -> Self {
        self.audit = Some(audit);
        self
    }

    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn state(&self) -> &BudgetState {
        &self.state
    }

    /// The allocation being dragged, if any
    pub fn draft(&self) -> Option<&Allocation> {
        self.draft.as_ref()
    }

    /// Allocation as shown to the user: the draft while dragging, else committed
    pub fn visible_allocation(&self) -> Allocation {
        self.draft.unwrap_or(self.state.allocation)
    }

    pub fn policy(&self) -> ReconcilePolicy {
        self.policy
    }

    pub fn describe_store(&self) -> String {
        self.store.describe()
    }

    pub fn summary(&self) -> BudgetSummary {
        BudgetSummary::generate(&self.state)
    }

    /// Whether a debounced budget write is waiting
    pub fn has_pending_save(&self) -> bool {
        self.scheduler.is_pending() || self.budget_dirty
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    // ---- income -----------------------------------------------------------

    /// Set the income; negative input is clamped to zero
    ///
    /// The write is debounced.
    pub fn set_income(&mut self, amount: Money) -> Money {
        let amount = amount.non_negative();
        if amount == self.state.income {
            return amount;
        }

        self.state.income = amount;
        self.mark_budget_dirty();
        amount
    }

    // ---- allocation -------------------------------------------------------

    /// Move one slider without committing
    pub fn drag_allocation(&mut self, category: Category, value: i32) -> Allocation {
        let next = self.visible_allocation().rebalance(category, value);
        self.draft = Some(next);
        next
    }

    /// Commit the dragged (or current) allocation
    ///
    /// The allocation is reconciled to total 100 and written at once,
    /// replacing any pending debounced write.
    pub fn commit_allocation(&mut self) -> Reconciliation {
        let base = self.draft.take().unwrap_or(self.state.allocation);
        let reconciliation = base.reconcile(self.policy);

        if let Some(warning) = &reconciliation.warning {
            self.notifications.push(Notification::warning(warning.clone()));
        }
        if reconciliation.redistributed > 0 {
            info!(
                points = reconciliation.redistributed,
                "savings could not absorb the excess; redistributed"
            );
        }

        self.state.allocation = reconciliation.allocation;
        self.scheduler.cancel();
        self.budget_dirty = true;
        self.write_budget();
        reconciliation
    }

    /// Set one category and commit in a single step
    pub fn set_allocation(&mut self, category: Category, value: i32) -> Reconciliation {
        self.drag_allocation(category, value);
        self.commit_allocation()
    }

    /// Throw away an uncommitted drag
    pub fn discard_draft(&mut self) -> bool {
        self.draft.take().is_some()
    }

    // ---- expenses ---------------------------------------------------------

    /// Append an unpaid expense and write it through
    pub fn add_expense(
        &mut self,
        category: Category,
        name: &str,
        amount: Money,
    ) -> TriadResult<ExpenseId> {
        let id = self.state.expenses.add(category, name, amount)?;
        let expense = self.expense(category, id)?;

        self.audit(AuditEntry::create(
            EntityType::Expense,
            id.to_string(),
            Some(expense.name.clone()),
            &expense,
        ));
        self.write_expense(ExpenseChange::Inserted { category, expense });
        Ok(id)
    }

    /// Replace an expense's name, amount and paid flag
    pub fn update_expense(&mut self, category: Category, expense: Expense) -> TriadResult<()> {
        let before = self.state.expenses.update(category, expense)?;
        let after = self.expense(category, before.id)?;

        self.audit(AuditEntry::update(
            EntityType::Expense,
            after.id.to_string(),
            Some(after.name.clone()),
            &before,
            &after,
        ));
        self.write_expense(ExpenseChange::Updated {
            category,
            expense: after,
        });
        Ok(())
    }

    /// Edit selected fields of an expense; `None` keeps the current value
    pub fn edit_expense(
        &mut self,
        category: Category,
        id: ExpenseId,
        name: Option<String>,
        amount: Option<Money>,
    ) -> TriadResult<Expense> {
        let mut expense = self.expense(category, id)?;
        if let Some(name) = name {
            expense.name = name.trim().to_string();
        }
        if let Some(amount) = amount {
            expense.amount = amount;
        }

        self.update_expense(category, expense)?;
        self.expense(category, id)
    }

    pub fn remove_expense(&mut self, category: Category, id: ExpenseId) -> TriadResult<Expense> {
        let removed = self.state.expenses.remove(category, id)?;

        self.audit(AuditEntry::delete(
            EntityType::Expense,
            id.to_string(),
            Some(removed.name.clone()),
            &removed,
        ));
        self.write_expense(ExpenseChange::Removed { category, id });
        Ok(removed)
    }

    /// Flip the paid flag; returns the new value
    pub fn toggle_expense_paid(&mut self, category: Category, id: ExpenseId) -> TriadResult<bool> {
        let before = self.expense(category, id)?;
        let paid = self.state.expenses.toggle_paid(category, id)?;
        let after = self.expense(category, id)?;

        self.audit(AuditEntry::update(
            EntityType::Expense,
            id.to_string(),
            Some(after.name.clone()),
            &before,
            &after,
        ));
        self.write_expense(ExpenseChange::Updated {
            category,
            expense: after,
        });
        Ok(paid)
    }

    // ---- persistence ------------------------------------------------------

    /// Fire the debounced write if its quiet period has passed
    ///
    /// Returns whether a write was attempted.
    pub fn tick(&mut self) -> bool {
        let now = self.clock.now();
        self.tick_at(now)
    }

    /// [`tick`](Self::tick) against an explicit instant
    pub fn tick_at(&mut self, now: Instant) -> bool {
        match self.scheduler.take_due(now) {
            Some(pending) => {
                debug!(edits = pending.edits, "debounced budget write due");
                self.write_budget();
                true
            }
            None => false,
        }
    }

    /// Write any pending budget change now
    ///
    /// Returns `true` when the store holds the current budget afterwards.
    pub fn flush(&mut self) -> bool {
        self.scheduler.flush();
        if !self.budget_dirty {
            return true;
        }
        self.write_budget()
    }

    /// Overwrite everything in the session's own store with the in-memory budget
    pub fn push_all(&mut self) -> TriadResult<()> {
        self.scheduler.cancel();
        self.store.replace_all(&self.state)?;
        self.after_budget_written();
        info!(store = %self.store.describe(), expenses = self.state.expenses.len(), "pushed full budget");
        Ok(())
    }

    /// Replace everything `target` holds with the in-memory budget
    ///
    /// Used to upload a local budget to the remote backend.
    pub fn push_to(&mut self, target: &dyn BudgetStore) -> TriadResult<()> {
        self.flush();
        target.replace_all(&self.state)?;
        info!(
            from = %self.store.describe(),
            to = %target.describe(),
            expenses = self.state.expenses.len(),
            "pushed full budget"
        );
        Ok(())
    }

    fn mark_budget_dirty(&mut self) {
        self.budget_dirty = true;
        let now = self.clock.now();
        self.scheduler.schedule(now);
    }

    fn write_budget(&mut self) -> bool {
        match self.store.save_budget(&self.state) {
            Ok(()) => {
                self.after_budget_written();
                true
            }
            Err(e) => {
                warn!(store = %self.store.describe(), error = %e, "failed to save budget");
                self.notifications
                    .push(Notification::error(format!("Could not save budget: {}", e)));
                false
            }
        }
    }

    fn after_budget_written(&mut self) {
        let current = SavedBudget::of(&self.state);
        let previous = self.saved;

        if previous.income != current.income {
            self.audit(AuditEntry::update(
                EntityType::Income,
                BUDGET_ENTITY_ID,
                None,
                &previous.income,
                &current.income,
            ));
        }
        if previous.allocation != current.allocation {
            self.audit(AuditEntry::update(
                EntityType::Allocation,
                BUDGET_ENTITY_ID,
                None,
                &previous.allocation,
                &current.allocation,
            ));
        }

        self.saved = current;
        self.budget_dirty = false;
    }

    fn write_expense(&mut self, change: ExpenseChange) {
        if let Err(e) = self.store.save_expense(&self.state, &change) {
            warn!(
                store = %self.store.describe(),
                expense = %change.expense_id(),
                error = %e,
                "failed to save expense"
            );
            self.notifications
                .push(Notification::error(format!("Could not save expense: {}", e)));
        }
    }

    fn expense(&self, category: Category, id: ExpenseId) -> TriadResult<Expense> {
        self.state
            .expenses
            .get(category, id)
            .cloned()
            .ok_or_else(|| crate::error::TriadError::expense_not_found(id.to_string()))
    }

    fn audit(&self, entry: AuditEntry) {
        if let Some(logger) = &self.audit {
            if let Err(e) = logger.log(&entry) {
                warn!(error = %e, "failed to write audit entry");
            }
        }
    }
}

impl Drop for BudgetSession {
    fn drop(&mut self) {
        if self.has_pending_save() {
            debug!("flushing pending budget write before exit");
            self.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TriadError;
    use crate::storage::LocalStore;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use std::time::Duration;
    use tempfile::TempDir;

    /// Clock the test moves by hand
    #[derive(Clone)]
    struct ManualClock(Rc<Cell<Instant>>);

    impl ManualClock {
        fn new() -> Self {
            Self(Rc::new(Cell::new(Instant::now())))
        }

        fn advance(&self, by: Duration) {
            self.0.set(self.0.get() + by);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            self.0.get()
        }
    }

    /// Store that records calls and can be told to fail
    #[derive(Clone, Default)]
    struct RecordingStore {
        calls: Rc<RefCell<Vec<String>>>,
        failing: Rc<Cell<bool>>,
    }

    impl RecordingStore {
        fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }

        fn record(&self, call: String) -> TriadResult<()> {
            self.calls.borrow_mut().push(call);
            if self.failing.get() {
                Err(TriadError::remote(503, "unavailable"))
            } else {
                Ok(())
            }
        }
    }

    impl BudgetStore for RecordingStore {
        fn describe(&self) -> String {
            "recording".into()
        }

        fn load(&self) -> TriadResult<Option<BudgetState>> {
            Ok(None)
        }

        fn save_budget(&self, state: &BudgetState) -> TriadResult<()> {
            self.record(format!(
                "budget {} {}/{}/{}",
                state.income.units(),
                state.allocation.needs,
                state.allocation.wants,
                state.allocation.savings
            ))
        }

        fn save_expense(&self, _state: &BudgetState, change: &ExpenseChange) -> TriadResult<()> {
            let kind = match change {
                ExpenseChange::Inserted { .. } => "insert",
                ExpenseChange::Updated { .. } => "update",
                ExpenseChange::Removed { .. } => "remove",
            };
            self.record(format!("{} {}", kind, change.category().as_str()))
        }

        fn replace_all(&self, _state: &BudgetState) -> TriadResult<()> {
            self.record("replace".into())
        }
    }

    fn settings(policy: ReconcilePolicy) -> Settings {
        Settings {
            save_delay_ms: 800,
            reconcile_policy: policy,
            ..Settings::default()
        }
    }

    fn recording_session(policy: ReconcilePolicy) -> (BudgetSession, RecordingStore, ManualClock) {
        let store = RecordingStore::default();
        let clock = ManualClock::new();
        let session = BudgetSession::open(Box::new(store.clone()), &settings(policy))
            .with_clock(Box::new(clock.clone()));
        (session, store, clock)
    }

    #[test]
    fn test_income_edits_are_debounced() {
        let (mut session, store, clock) = recording_session(ReconcilePolicy::Clamp);

        session.set_income(Money::from_units(5));
        clock.advance(Duration::from_millis(300));
        assert!(!session.tick());
        session.set_income(Money::from_units(50));
        clock.advance(Duration::from_millis(300));
        session.set_income(Money::from_units(5_000_000));
        clock.advance(Duration::from_millis(700));
        assert!(!session.tick());
        assert!(store.calls().is_empty());

        clock.advance(Duration::from_millis(100));
        assert!(session.tick());
        assert_eq!(store.calls(), vec!["budget 5000000 50/30/20"]);
        assert!(!session.has_pending_save());
    }

    #[test]
    fn test_negative_income_clamped() {
        let (mut session, _, _) = recording_session(ReconcilePolicy::Clamp);
        assert!(session.set_income(Money::from_units(-10)).is_zero());
        assert!(session.state().income.is_zero());
        assert!(!session.has_pending_save());
    }

    #[test]
    fn test_drag_does_not_persist() {
        let (mut session, store, _) = recording_session(ReconcilePolicy::Clamp);

        assert_eq!(
            session.drag_allocation(Category::Needs, 80),
            Allocation::new(80, 0, 0)
        );
        assert_eq!(session.state().allocation, Allocation::default());
        assert_eq!(session.visible_allocation(), Allocation::new(80, 0, 0));
        assert!(store.calls().is_empty());
    }

    #[test]
    fn test_commit_reconciles_and_writes_immediately() {
        let (mut session, store, _) = recording_session(ReconcilePolicy::Clamp);
        session.set_income(Money::from_units(1_000));

        session.drag_allocation(Category::Needs, 60);
        session.drag_allocation(Category::Wants, 10);
        let result = session.commit_allocation();

        assert_eq!(result.allocation, Allocation::new(60, 10, 30));
        assert_eq!(session.state().allocation, Allocation::new(60, 10, 30));
        assert!(session.draft().is_none());
        // the pending income write was folded into the commit
        assert_eq!(store.calls(), vec!["budget 1000 60/10/30"]);
        assert!(!session.has_pending_save());
    }

    #[test]
    fn test_commit_permit_negative_notifies() {
        let (mut session, _, _) = recording_session(ReconcilePolicy::PermitNegative);
        session.draft = Some(Allocation::new(70, 40, 0));

        let result = session.commit_allocation();
        assert_eq!(result.allocation, Allocation::new(70, 40, -10));
        let notes = session.take_notifications();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].kind, crate::services::NotificationKind::Warning);
        assert!(session.take_notifications().is_empty());
    }

    #[test]
    fn test_expense_edits_write_through() {
        let (mut session, store, _) = recording_session(ReconcilePolicy::Clamp);

        let id = session
            .add_expense(Category::Needs, "Rent", Money::from_units(2_000_000))
            .unwrap();
        assert!(session.toggle_expense_paid(Category::Needs, id).unwrap());
        let edited = session
            .edit_expense(Category::Needs, id, None, Some(Money::from_units(2_100_000)))
            .unwrap();
        assert_eq!(edited.name, "Rent");
        assert!(edited.paid);
        session.remove_expense(Category::Needs, id).unwrap();

        assert_eq!(
            store.calls(),
            vec!["insert needs", "update needs", "update needs", "remove needs"]
        );
        assert!(session.state().expenses.is_empty());
    }

    #[test]
    fn test_invalid_expense_rejected_without_write() {
        let (mut session, store, _) = recording_session(ReconcilePolicy::Clamp);
        assert!(session
            .add_expense(Category::Wants, "", Money::from_units(10))
            .unwrap_err()
            .is_validation());
        assert!(session
            .toggle_expense_paid(Category::Wants, ExpenseId::new())
            .unwrap_err()
            .is_not_found());
        assert!(store.calls().is_empty());
    }

    #[test]
    fn test_failed_write_keeps_local_change_and_notifies() {
        let (mut session, store, _) = recording_session(ReconcilePolicy::Clamp);
        store.failing.set(true);

        let id = session
            .add_expense(Category::Wants, "Cinema", Money::from_units(100))
            .unwrap();
        assert!(session.state().expenses.get(Category::Wants, id).is_some());

        let notes = session.take_notifications();
        assert_eq!(notes.len(), 1);
        assert!(notes[0].is_error());
    }

    #[test]
    fn test_failed_budget_write_retried_on_flush() {
        let (mut session, store, _) = recording_session(ReconcilePolicy::Clamp);
        store.failing.set(true);

        session.set_income(Money::from_units(700));
        assert!(!session.flush());
        assert!(session.has_pending_save());

        store.failing.set(false);
        assert!(session.flush());
        assert!(!session.has_pending_save());
        assert_eq!(store.calls().len(), 2);
    }

    #[test]
    fn test_push_all() {
        let (mut session, store, _) = recording_session(ReconcilePolicy::Clamp);
        session.set_income(Money::from_units(10));
        session.push_all().unwrap();
        assert_eq!(store.calls(), vec!["replace"]);
        assert!(!session.has_pending_save());
    }

    #[test]
    fn test_push_to_other_store() {
        let (mut session, own, _) = recording_session(ReconcilePolicy::Clamp);
        let target = RecordingStore::default();
        session.set_income(Money::from_units(10));

        session.push_to(&target).unwrap();
        assert_eq!(own.calls(), vec!["budget 10 50/30/20"]);
        assert_eq!(target.calls(), vec!["replace"]);
    }

    #[test]
    fn test_tick_at_explicit_instant() {
        let (mut session, store, clock) = recording_session(ReconcilePolicy::Clamp);
        session.set_income(Money::from_units(3));
        assert!(!session.tick_at(clock.now() + Duration::from_millis(799)));
        assert!(session.tick_at(clock.now() + Duration::from_millis(800)));
        assert_eq!(store.calls().len(), 1);
    }

    #[test]
    fn test_drop_flushes_to_local_snapshot() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("budget.json");

        {
            let mut session =
                BudgetSession::open(Box::new(LocalStore::new(path.clone())), &Settings::default());
            session.set_income(Money::from_units(4_000_000));
        }

        let session = BudgetSession::open(Box::new(LocalStore::new(path)), &Settings::default());
        assert_eq!(session.state().income.units(), 4_000_000);
    }

    #[test]
    fn test_mutations_are_audited() {
        let temp_dir = TempDir::new().unwrap();
        let logger = AuditLogger::new(temp_dir.path().join("audit.log"));
        let (session, _, _) = recording_session(ReconcilePolicy::Clamp);
        let mut session = session.with_audit(logger.clone());

        session.set_income(Money::from_units(1_000));
        session.flush();
        session.set_allocation(Category::Needs, 60);
        session
            .add_expense(Category::Savings, "Emergency fund", Money::from_units(100))
            .unwrap();

        let entries = logger.read_all().unwrap();
        let kinds: Vec<_> = entries.iter().map(|e| e.entity_type).collect();
        assert_eq!(
            kinds,
            vec![EntityType::Income, EntityType::Allocation, EntityType::Expense]
        );
        assert_eq!(
            entries[1].diff_summary.as_deref(),
            Some("needs: 50 -> 60, wants: 30 -> 20")
        );
    }
}
