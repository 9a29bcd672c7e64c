//! Line-oriented interactive mode
//!
//! One command per line. Income edits are debounced like any other session;
//! the pending write fires once a later line arrives after the quiet period,
//! and everything is flushed on `quit` or end of input.

use std::io::{BufRead, Write};

use super::alloc::parse_move;
use super::context::{finish_session, resolve_expense, CliContext};
use super::expense::parse_amount;
use crate::display::{
    format_allocation, format_expense_table, format_notifications, format_summary,
};
use crate::error::{TriadError, TriadResult};
use crate::models::{Category, Money};
use crate::services::BudgetSession;

const HELP: &str = "\
Commands:
  income <amount>              set income (saved after a short pause)
  drag <category>=<percent>    move a slider without saving
  commit                       reconcile to 100% and save
  discard                      drop uncommitted slider moves
  set <category> <percent>     move a slider and commit
  add <category> <amount> <name>
  paid <id>                    toggle paid
  rm <id>                      remove an expense
  list [category]              list expenses
  alloc                        show the split
  summary                      allocated vs spent
  flush                        save pending changes now
  quit                         save and exit
";

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub fn handle_shell_command(ctx: &CliContext) -> TriadResult<()> {
    let mut session = ctx.open_session()?;
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    writeln!(stdout, "triad shell ({}); type 'help'", session.describe_store())?;
    run_shell(&mut session, stdin.lock(), &mut stdout, ctx.symbol())?;
    finish_session(session)
}

/// Run commands from `input` until `quit` or end of input
pub fn run_shell<R: BufRead, W: Write>(
    session: &mut BudgetSession,
    input: R,
    out: &mut W,
    symbol: &str,
) -> TriadResult<()> {
    for line in input.lines() {
        let line = line?;
        session.tick();

        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let flow = match execute(session, line, out, symbol) {
            Ok(flow) => flow,
            Err(e) => {
                writeln!(out, "error: {}", e)?;
                Flow::Continue
            }
        };

        let notes = session.take_notifications();
        if !notes.is_empty() {
            write!(out, "{}", format_notifications(&notes))?;
        }

        if flow == Flow::Quit {
            break;
        }
    }

    session.flush();
    let notes = session.take_notifications();
    if !notes.is_empty() {
        write!(out, "{}", format_notifications(&notes))?;
    }
    Ok(())
}

fn execute<W: Write>(
    session: &mut BudgetSession,
    line: &str,
    out: &mut W,
    symbol: &str,
) -> TriadResult<Flow> {
    let mut words = line.split_whitespace();
    let command = words.next().unwrap_or_default();
    let args: Vec<&str> = words.collect();

    match (command, args.as_slice()) {
        ("help" | "?", _) => write!(out, "{}", HELP)?,
        ("quit" | "exit" | "q", _) => return Ok(Flow::Quit),

        ("income", [amount]) => {
            let amount = Money::parse(amount)
                .map_err(|e| TriadError::Validation(format!("Invalid amount: {}", e)))?;
            let income = session.set_income(amount);
            writeln!(out, "income {}", income.format_with_symbol(symbol))?;
        }

        ("drag", moves) if !moves.is_empty() => {
            for m in moves {
                let (category, value) = parse_move(m)?;
                session.drag_allocation(category, value);
            }
            let draft = session.visible_allocation();
            writeln!(
                out,
                "draft {}/{}/{} (total {}%)",
                draft.needs,
                draft.wants,
                draft.savings,
                draft.total()
            )?;
        }

        ("commit", []) => {
            let result = session.commit_allocation();
            let a = result.allocation;
            writeln!(out, "committed {}/{}/{}", a.needs, a.wants, a.savings)?;
        }

        ("discard", []) => {
            if session.discard_draft() {
                writeln!(out, "draft discarded")?;
            }
        }

        ("set", [category, percent]) => {
            let category: Category = category.parse()?;
            let percent = percent.parse::<i32>().map_err(|_| {
                TriadError::Validation(format!("Invalid percentage '{}'", percent))
            })?;
            let a = session.set_allocation(category, percent).allocation;
            writeln!(out, "committed {}/{}/{}", a.needs, a.wants, a.savings)?;
        }

        ("add", [category, amount, name @ ..]) if !name.is_empty() => {
            let category: Category = category.parse()?;
            let amount = parse_amount(amount)?;
            let id = session.add_expense(category, &name.join(" "), amount)?;
            writeln!(out, "added {}", id)?;
        }

        ("paid", [id]) => {
            let (category, id) = resolve_expense(&session.state().expenses, id)?;
            let paid = session.toggle_expense_paid(category, id)?;
            writeln!(out, "{} {}", id, if paid { "paid" } else { "unpaid" })?;
        }

        ("rm", [id]) => {
            let (category, id) = resolve_expense(&session.state().expenses, id)?;
            let removed = session.remove_expense(category, id)?;
            writeln!(out, "removed '{}'", removed.name)?;
        }

        ("list", []) => write!(
            out,
            "{}",
            format_expense_table(&session.state().expenses, None, symbol)
        )?,
        ("list", [category]) => {
            let category: Category = category.parse()?;
            write!(
                out,
                "{}",
                format_expense_table(&session.state().expenses, Some(category), symbol)
            )?
        }

        ("alloc", []) => write!(
            out,
            "{}",
            format_allocation(&session.visible_allocation(), session.state().income, symbol)
        )?,
        ("summary", []) => write!(out, "{}", format_summary(&session.summary(), symbol))?,

        ("flush", []) => {
            if session.flush() {
                writeln!(out, "saved")?;
            }
        }

        _ => {
            return Err(TriadError::Validation(format!(
                "Unknown command '{}'; type 'help'",
                line
            )))
        }
    }

    Ok(Flow::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::storage::{BudgetStore, LocalStore};
    use std::io::Cursor;
    use tempfile::TempDir;

    fn run(temp_dir: &TempDir, script: &str) -> String {
        let store = LocalStore::new(temp_dir.path().join("budget.json"));
        let mut session = BudgetSession::open(Box::new(store), &Settings::default());
        let mut out = Vec::new();
        run_shell(&mut session, Cursor::new(script), &mut out, "Rp").unwrap();
        String::from_utf8(out).unwrap()
    }

    fn stored(temp_dir: &TempDir) -> crate::models::BudgetState {
        LocalStore::new(temp_dir.path().join("budget.json"))
            .load()
            .unwrap()
            .unwrap()
    }

    #[test]
    fn test_income_flushed_at_end_of_input() {
        let temp_dir = TempDir::new().unwrap();
        let out = run(&temp_dir, "income 5.000.000\n");
        assert!(out.contains("income Rp 5.000.000"));
        assert_eq!(stored(&temp_dir).income.units(), 5_000_000);
    }

    #[test]
    fn test_drag_then_commit() {
        let temp_dir = TempDir::new().unwrap();
        let out = run(&temp_dir, "drag needs=80\ncommit\nquit\nincome 1\n");
        assert!(out.contains("draft 80/0/0 (total 80%)"));
        assert!(out.contains("committed 80/0/20"));

        // nothing after quit runs
        let state = stored(&temp_dir);
        assert!(state.income.is_zero());
        assert_eq!(state.allocation.savings, 20);
    }

    #[test]
    fn test_expense_commands() {
        let temp_dir = TempDir::new().unwrap();
        run(&temp_dir, "add wants 150000 Concert tickets\n");

        let state = stored(&temp_dir);
        let (category, expense) = state.expenses.iter().next().unwrap();
        assert_eq!(category, Category::Wants);
        assert_eq!(expense.name, "Concert tickets");

        let script = format!("paid {}\nlist wants\nrm {}\n", expense.id, expense.id);
        let out = run(&temp_dir, &script);
        assert!(out.contains(&format!("{} paid", expense.id)));
        assert!(out.contains("Concert tickets"));
        assert!(out.contains("removed 'Concert tickets'"));
        assert!(stored(&temp_dir).expenses.is_empty());
    }

    #[test]
    fn test_errors_do_not_stop_the_shell() {
        let temp_dir = TempDir::new().unwrap();
        let out = run(&temp_dir, "bogus\nadd rent 10 x\nset savings 30\n");
        assert!(out.contains("error: Validation error: Unknown command 'bogus'"));
        assert!(out.contains("Unknown category 'rent'"));
        assert!(out.contains("committed 40/30/30"));
    }
}
