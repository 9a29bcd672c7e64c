//! Audit trail for triad
//!
//! Every committed change to income, allocation or an expense is appended to
//! `audit.log` as one JSON object per line (JSONL), with before/after values
//! and a short field diff.
//!
//! ```rust,ignore
//! use triad_cli::audit::{AuditEntry, AuditLogger, EntityType};
//!
//! let logger = AuditLogger::new(paths.audit_log());
//! logger.log(&AuditEntry::create(EntityType::Expense, id.to_string(), Some(name), &expense))?;
//! ```

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
