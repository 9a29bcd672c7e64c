use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use triad_cli::cli::{
    handle_alloc_command, handle_auth_command, handle_config_command, handle_expense_command,
    handle_history_command, handle_income_command, handle_shell_command, handle_summary_command,
    handle_sync_command, AllocCommands, AuthCommands, CliContext, ConfigCommands,
    ExpenseCommands, IncomeCommands, SyncCommands,
};
use triad_cli::config::{Settings, TriadPaths};
use triad_cli::storage::{BudgetStore, LocalStore};

#[derive(Parser)]
#[command(
    name = "triad",
    version,
    about = "Terminal 50/30/20 budget planner",
    long_about = "triad splits your monthly income into needs, wants and savings \
                  and tracks expenses against each share. Budgets are kept in a \
                  local snapshot, or in a remote backend once you sign in."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data directory and default settings
    Init,

    /// Show or change settings
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Sign in to or out of the remote backend
    #[command(subcommand)]
    Auth(AuthCommands),

    /// Monthly income
    #[command(subcommand)]
    Income(IncomeCommands),

    /// Needs/wants/savings split
    #[command(subcommand, alias = "allocation")]
    Alloc(AllocCommands),

    /// Expenses per category
    #[command(subcommand, alias = "exp")]
    Expense(ExpenseCommands),

    /// Allocated vs. spent for every category
    Summary,

    /// Copy the budget between stores
    #[command(subcommand)]
    Sync(SyncCommands),

    /// Recent changes from the audit log
    History {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Interactive mode reading commands from stdin
    Shell,
}

/// Log filter comes from TRIAD_LOG; TRIAD_LOG_FORMAT=json switches to JSON lines
fn init_tracing() {
    let log_format = std::env::var("TRIAD_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_env("TRIAD_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false).with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let paths = TriadPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    let mut ctx = CliContext::new(paths, settings);

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing triad at: {}", ctx.paths.base_dir().display());
            ctx.paths.ensure_directories()?;
            ctx.settings.save(&ctx.paths)?;

            let local = LocalStore::new(ctx.paths.budget_file());
            if local.load()?.is_none() {
                local.replace_all(&Default::default())?;
            }

            println!("Initialization complete!");
            println!();
            println!("Your budget starts at 50% needs / 30% wants / 20% savings.");
            println!("Run 'triad income set <amount>' to get started.");
        }
        Some(Commands::Config(cmd)) => handle_config_command(&mut ctx, cmd)?,
        Some(Commands::Auth(cmd)) => handle_auth_command(&ctx, cmd)?,
        Some(Commands::Income(cmd)) => handle_income_command(&ctx, cmd)?,
        Some(Commands::Alloc(cmd)) => handle_alloc_command(&ctx, cmd)?,
        Some(Commands::Expense(cmd)) => handle_expense_command(&ctx, cmd)?,
        Some(Commands::Summary) => handle_summary_command(&ctx)?,
        Some(Commands::Sync(cmd)) => handle_sync_command(&ctx, cmd)?,
        Some(Commands::History { limit }) => handle_history_command(&ctx, limit)?,
        Some(Commands::Shell) => handle_shell_command(&ctx)?,
        None => {
            println!("triad - 50/30/20 budget planner");
            println!();
            println!("Run 'triad --help' for usage information.");
            println!("Run 'triad summary' to see your budget.");
        }
    }

    Ok(())
}
