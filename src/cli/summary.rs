//! Summary and history commands

use super::context::{finish_session, CliContext};
use crate::display::{format_history, format_summary};
use crate::error::TriadResult;

pub fn handle_summary_command(ctx: &CliContext) -> TriadResult<()> {
    let session = ctx.open_session()?;
    print!("{}", format_summary(&session.summary(), ctx.symbol()));
    finish_session(session)
}

pub fn handle_history_command(ctx: &CliContext, limit: usize) -> TriadResult<()> {
    let entries = ctx.audit_logger().read_recent(limit)?;
    print!("{}", format_history(&entries));
    Ok(())
}
