//! Configuration CLI commands

use clap::Subcommand;
use tracing::info;

use super::CliContext;
use crate::config::BackofficePaths;
use crate::error::BackofficeResult;

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show paths and effective settings
    Show,
    /// Change a setting and save it (api_url, request_timeout_secs, page_size, log_level)
    Set {
        /// Setting name
        key: String,
        /// New value
        value: String,
    },
}

/// Handle a config command; no subcommand means `show`
pub fn handle_config_command(
    paths: &BackofficePaths,
    ctx: &mut CliContext,
    cmd: Option<ConfigCommands>,
) -> BackofficeResult<()> {
    match cmd.unwrap_or(ConfigCommands::Show) {
        ConfigCommands::Show => {
            let settings = &ctx.settings;
            println!("Back Office CLI Configuration");
            println!("=============================");
            println!("Config directory: {}", paths.base_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!("Session file:     {}", paths.session_file().display());
            println!();
            println!("Settings:");
            println!("  API URL:         {}", ctx.client.base_url());
            println!("  Request timeout: {}s", settings.request_timeout_secs);
            println!("  Page size:       {}", settings.page_size);
            println!("  Log level:       {}", settings.log_level);
        }

        ConfigCommands::Set { key, value } => {
            ctx.settings.set(&key, &value)?;
            ctx.settings.save(paths)?;

            info!(%key, "setting saved");
            println!("Updated {}", key);
            println!("  Saved to: {}", paths.settings_file().display());
        }
    }

    Ok(())
}
