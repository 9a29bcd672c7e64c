//! Sign-in commands
//!
//! Tokens come from the external identity provider; these commands only
//! record or forget them.

use clap::Subcommand;

use super::context::CliContext;
use crate::error::TriadResult;
use crate::models::Identity;

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Record the signed-in user
    Login {
        /// User id issued by the identity provider
        #[arg(long)]
        user_id: String,

        #[arg(long)]
        email: Option<String>,

        /// Access token for the remote backend
        #[arg(long, env = "TRIAD_ACCESS_TOKEN", hide_env_values = true)]
        token: String,
    },

    /// Forget the signed-in user
    Logout,

    /// Show who is signed in and which store is used
    Status,
}

pub fn handle_auth_command(ctx: &CliContext, cmd: AuthCommands) -> TriadResult<()> {
    let sessions = ctx.sessions();

    match cmd {
        AuthCommands::Login {
            user_id,
            email,
            token,
        } => {
            let identity = Identity::new(user_id.trim(), email, token.trim());
            sessions.sign_in(&identity)?;
            println!("Signed in as {}", identity.display_name());
            if ctx.settings.remote.is_none() {
                println!("No remote backend configured; budgets stay local.");
                println!("Use 'triad config remote --url <url> --api-key <key>' to add one.");
            }
        }

        AuthCommands::Logout => {
            if sessions.sign_out()? {
                println!("Signed out.");
            } else {
                println!("Nobody was signed in.");
            }
        }

        AuthCommands::Status => match sessions.current()? {
            Some(identity) => {
                println!("Signed in as {}", identity.display_name());
                println!(
                    "Since {}",
                    identity.signed_in_at.format("%Y-%m-%d %H:%M:%S UTC")
                );
                match &ctx.settings.remote {
                    Some(remote) => println!("Budgets are stored at {}", remote.url),
                    None => println!("Budgets are stored locally."),
                }
            }
            None => {
                println!("Not signed in; budgets are stored locally.");
            }
        },
    }

    Ok(())
}
