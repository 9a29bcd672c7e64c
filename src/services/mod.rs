//! Service layer for triad
//!
//! [`BudgetSession`] applies user edits to the in-memory budget and mirrors
//! them into a store, debouncing budget writes through [`SaveScheduler`].

pub mod notification;
pub mod scheduler;
pub mod session;

pub use notification::{Notification, NotificationKind};
pub use scheduler::{PendingSave, SaveScheduler};
pub use session::{BudgetSession, Clock, SystemClock};
