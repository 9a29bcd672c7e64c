//! Configuration CLI commands

use clap::Subcommand;

use super::context::CliContext;
use crate::config::{ReconcilePolicy, RemoteSettings};
use crate::error::{TriadError, TriadResult};

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show paths and settings
    Show,

    /// Store budgets in a remote backend
    Remote {
        /// Project URL, e.g. https://abc.supabase.co
        #[arg(long)]
        url: String,

        /// Public API key
        #[arg(long, env = "TRIAD_API_KEY")]
        api_key: String,
    },

    /// Keep budgets in the local snapshot only
    Local,

    /// How a commit handles an allocation that does not total 100%
    Policy {
        /// clamp or permit-negative
        policy: ReconcilePolicy,
    },

    /// Quiet period before income edits are saved
    Delay {
        /// Milliseconds
        ms: u64,
    },

    /// Currency symbol shown before amounts
    Currency { symbol: String },
}

pub fn handle_config_command(ctx: &mut CliContext, cmd: ConfigCommands) -> TriadResult<()> {
    match cmd {
        ConfigCommands::Show => {
            let identity = ctx.identity()?;
            println!("triad configuration");
            println!("===================");
            println!("Base directory:  {}", ctx.paths.base_dir().display());
            println!("Budget snapshot: {}", ctx.paths.budget_file().display());
            println!("Audit log:       {}", ctx.paths.audit_log().display());
            println!();
            println!("Currency:        {}", ctx.settings.currency_symbol);
            println!("Save delay:      {} ms", ctx.settings.save_delay_ms);
            println!("Commit policy:   {}", ctx.settings.reconcile_policy);
            match &ctx.settings.remote {
                Some(remote) => println!("Remote backend:  {}", remote.url),
                None => println!("Remote backend:  (none)"),
            }
            match identity {
                Some(identity) => println!("Signed in as:    {}", identity.display_name()),
                None => println!("Signed in as:    (nobody)"),
            }
        }

        ConfigCommands::Remote { url, api_key } => {
            let url = url.trim().trim_end_matches('/').to_string();
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(TriadError::Config(format!(
                    "Remote URL must start with http:// or https://, got '{}'",
                    url
                )));
            }
            if api_key.trim().is_empty() {
                return Err(TriadError::Config("API key cannot be empty".into()));
            }

            ctx.settings.remote = Some(RemoteSettings { url: url.clone(), api_key });
            ctx.settings.save(&ctx.paths)?;
            println!("Remote backend set to {}", url);
            if ctx.identity()?.is_none() {
                println!("Run 'triad auth login' to start using it.");
            }
        }

        ConfigCommands::Local => {
            if ctx.settings.remote.take().is_some() {
                ctx.settings.save(&ctx.paths)?;
                println!("Remote backend removed; using the local snapshot.");
            } else {
                println!("Already using the local snapshot.");
            }
        }

        ConfigCommands::Policy { policy } => {
            ctx.settings.reconcile_policy = policy;
            ctx.settings.save(&ctx.paths)?;
            println!("Commit policy set to {}", policy);
        }

        ConfigCommands::Delay { ms } => {
            ctx.settings.save_delay_ms = ms;
            ctx.settings.save(&ctx.paths)?;
            println!("Save delay set to {} ms", ms);
        }

        ConfigCommands::Currency { symbol } => {
            ctx.settings.currency_symbol = symbol.trim().to_string();
            ctx.settings.save(&ctx.paths)?;
            println!("Currency symbol set to '{}'", ctx.settings.currency_symbol);
        }
    }

    Ok(())
}
