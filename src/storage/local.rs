//! Local snapshot store
//!
//! Used when nobody is signed in or no remote backend is configured. The
//! whole budget state is written to one JSON file on every save and restored
//! verbatim on load.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::file_io::{read_json_opt, write_json_atomic};
use super::store::{BudgetStore, ExpenseChange};
use crate::error::TriadResult;
use crate::models::BudgetState;

const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Snapshot {
    #[serde(default = "default_version")]
    version: u32,
    saved_at: DateTime<Utc>,
    #[serde(flatten)]
    state: BudgetState,
}

fn default_version() -> u32 {
    SNAPSHOT_VERSION
}

/// Store that keeps the whole budget in a single JSON snapshot
pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn write_snapshot(&self, state: &BudgetState) -> TriadResult<()> {
        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION,
            saved_at: Utc::now(),
            state: state.clone(),
        };
        write_json_atomic(&self.path, &snapshot)?;
        debug!(path = %self.path.display(), expenses = state.expenses.len(), "wrote budget snapshot");
        Ok(())
    }
}

impl BudgetStore for LocalStore {
    fn describe(&self) -> String {
        format!("local snapshot ({})", self.path.display())
    }

    fn load(&self) -> TriadResult<Option<BudgetState>> {
        let snapshot: Option<Snapshot> = read_json_opt(&self.path)?;
        Ok(snapshot.map(|s| s.state))
    }

    fn save_budget(&self, state: &BudgetState) -> TriadResult<()> {
        self.write_snapshot(state)
    }

    fn save_expense(&self, state: &BudgetState, change: &ExpenseChange) -> TriadResult<()> {
        debug!(expense = %change.expense_id(), category = %change.category(), "expense change");
        self.write_snapshot(state)
    }

    fn replace_all(&self, state: &BudgetState) -> TriadResult<()> {
        self.write_snapshot(state)
    }
}
