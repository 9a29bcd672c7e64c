//! Synchronisation with the remote backend

use clap::Subcommand;
use tracing::warn;

use super::context::{finish_session, CliContext};
use crate::error::{TriadError, TriadResult};
use crate::services::BudgetSession;
use crate::storage::{BudgetStore, LocalStore, RemoteStore};

#[derive(Subcommand)]
pub enum SyncCommands {
    /// Replace the remote budget with the local snapshot
    Push {
        /// Overwrite even if the remote has expenses the local snapshot lacks
        #[arg(long)]
        force: bool,
    },
}

pub fn handle_sync_command(ctx: &CliContext, cmd: SyncCommands) -> TriadResult<()> {
    match cmd {
        SyncCommands::Push { force } => {
            let identity = ctx.identity()?.ok_or_else(|| {
                TriadError::SessionRequired(
                    "run 'triad auth login' before pushing to the remote backend".into(),
                )
            })?;
            let remote = ctx.settings.remote.as_ref().ok_or_else(|| {
                TriadError::Config(
                    "no remote backend configured; use 'triad config remote'".into(),
                )
            })?;

            let target = RemoteStore::new(remote, identity)?;
            let local = LocalStore::new(ctx.paths.budget_file());
            let mut session = BudgetSession::open(Box::new(local), &ctx.settings);

            if let Some(current) = target.load()? {
                let dropped = current.expenses_not_in(session.state()).len();
                if dropped > 0 && !force {
                    return Err(TriadError::Validation(format!(
                        "Pushing would delete {} remote expense(s) not in the local snapshot; \
                         re-run with --force to overwrite",
                        dropped
                    )));
                }
                if dropped > 0 {
                    warn!(dropped, "overwriting remote expenses missing locally");
                    eprintln!(
                        "Warning: deleting {} remote expense(s) not in the local snapshot",
                        dropped
                    );
                }
            }

            session.push_to(&target)?;
            println!(
                "Pushed budget and {} expenses to {}",
                session.state().expenses.len(),
                remote.url
            );
            finish_session(session)
        }
    }
}
