//! Shared state for CLI handlers

use tracing::debug;

use crate::audit::AuditLogger;
use crate::config::{Settings, TriadPaths};
use crate::display::format_notifications;
use crate::error::{TriadError, TriadResult};
use crate::models::{Category, ExpenseBook, ExpenseId, Identity};
use crate::services::BudgetSession;
use crate::storage::{open_store, SessionRepository};

/// Paths and settings resolved once per invocation
pub struct CliContext {
    pub paths: TriadPaths,
    pub settings: Settings,
}

impl CliContext {
    pub fn new(paths: TriadPaths, settings: Settings) -> Self {
        Self { paths, settings }
    }

    pub fn symbol(&self) -> &str {
        &self.settings.currency_symbol
    }

    pub fn sessions(&self) -> SessionRepository {
        SessionRepository::new(self.paths.session_file())
    }

    pub fn identity(&self) -> TriadResult<Option<Identity>> {
        self.sessions().current()
    }

    pub fn audit_logger(&self) -> AuditLogger {
        AuditLogger::new(self.paths.audit_log())
    }

    /// Open a budget session on the store the current settings select
    pub fn open_session(&self) -> TriadResult<BudgetSession> {
        let store = open_store(&self.paths, &self.settings, self.identity()?)?;
        debug!(store = %store.describe(), "opening budget session");
        Ok(BudgetSession::open(store, &self.settings).with_audit(self.audit_logger()))
    }
}

/// Flush a session and report its notifications on stderr
///
/// Fails when any write during the command did not reach the store.
pub fn finish_session(mut session: BudgetSession) -> TriadResult<()> {
    session.flush();
    let notifications = session.take_notifications();
    if !notifications.is_empty() {
        eprint!("{}", format_notifications(&notifications));
    }

    if notifications.iter().any(|n| n.is_error()) {
        return Err(TriadError::Storage(format!(
            "Some changes were not saved to {}",
            session.describe_store()
        )));
    }
    Ok(())
}

/// Find an expense by the id a user typed
pub fn resolve_expense(book: &ExpenseBook, needle: &str) -> TriadResult<(Category, ExpenseId)> {
    book.resolve(needle)
        .ok_or_else(|| TriadError::expense_not_found(needle))
}
