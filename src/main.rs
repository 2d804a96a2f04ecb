use anyhow::Result;
use clap::{Parser, Subcommand};

use backoffice::cli::{
    auth::PASSWORD_ENV, handle_audit_command, handle_config_command, handle_login,
    handle_logout, handle_whoami, AuditCommands, CliContext, ConfigCommands,
};
use backoffice::config::{paths::BackofficePaths, settings::Settings};
use backoffice::logging::init_logging;

#[derive(Parser)]
#[command(
    name = "backoffice",
    version,
    about = "Audit log client for the sports-betting back office",
    long_about = "backoffice talks to the back-office REST API: it logs in, lists and \
                  inspects audit log entries with field-level diffs, shows the history \
                  of a single row and exports entries to CSV, JSON or YAML."
)]
struct Cli {
    /// Back-office API base URL (overrides settings and BACKOFFICE_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session token
    Login {
        /// Username
        username: String,
        /// Password (prompted for when omitted)
        #[arg(long, env = PASSWORD_ENV, hide_env_values = true)]
        password: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Show who the stored session belongs to
    Whoami,

    /// Audit log commands
    #[command(subcommand)]
    Audit(AuditCommands),

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigCommands>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = BackofficePaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    init_logging(&settings.log_level, cli.verbose);

    let mut ctx = CliContext::new(&paths, settings, cli.api_url.as_deref());

    match cli.command {
        Some(Commands::Login { username, password }) => {
            handle_login(&mut ctx, &username, password)?;
        }
        Some(Commands::Logout) => handle_logout(&mut ctx)?,
        Some(Commands::Whoami) => handle_whoami(&mut ctx)?,
        Some(Commands::Audit(cmd)) => handle_audit_command(&mut ctx, cmd)?,
        Some(Commands::Config { action }) => handle_config_command(&paths, &mut ctx, action)?,
        None => {
            println!("backoffice - audit log client for the sports-betting back office");
            println!();
            println!("Run 'backoffice --help' for usage information.");
            println!("Run 'backoffice login <username>' to get started.");
        }
    }

    Ok(())
}
