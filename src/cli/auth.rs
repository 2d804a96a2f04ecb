//! Login, logout and whoami commands

use tracing::debug;
use zeroize::Zeroizing;

use super::CliContext;
use crate::error::{BackofficeError, BackofficeResult};

/// Environment variable read for the password when `--password` is absent
pub const PASSWORD_ENV: &str = "BACKOFFICE_PASSWORD";

/// Handle `login`
///
/// The password comes from `--password`/`BACKOFFICE_PASSWORD` (both resolved
/// by clap) or from a hidden prompt.
pub fn handle_login(
    ctx: &mut CliContext,
    username: &str,
    password: Option<String>,
) -> BackofficeResult<()> {
    if username.trim().is_empty() {
        return Err(BackofficeError::Validation(
            "Username cannot be empty".into(),
        ));
    }

    let password = match password {
        Some(password) => Zeroizing::new(password),
        None => Zeroizing::new(
            rpassword::prompt_password("Password: ")
                .map_err(|e| BackofficeError::Io(format!("Failed to read password: {}", e)))?,
        ),
    };

    if password.is_empty() {
        return Err(BackofficeError::Validation(
            "Password cannot be empty".into(),
        ));
    }

    let username = ctx
        .session
        .login(&ctx.client, username.trim(), password.as_str())?;

    println!("Logged in as {}", username);
    println!("  Server: {}", ctx.client.base_url());
    Ok(())
}

/// Handle `logout`
pub fn handle_logout(ctx: &mut CliContext) -> BackofficeResult<()> {
    ctx.session.logout()?;
    println!("Logged out.");
    Ok(())
}

/// Handle `whoami`
pub fn handle_whoami(ctx: &mut CliContext) -> BackofficeResult<()> {
    let state = ctx.session.restore(&ctx.client)?;
    debug!(?state, "session restored");

    match ctx.session.username() {
        Some(username) => {
            println!("Logged in as {}", username);
            println!("  Server: {}", ctx.client.base_url());
        }
        None => println!("Not logged in."),
    }
    Ok(())
}
