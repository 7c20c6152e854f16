//! # Session Commands

use anyhow::Result;
use billing_api::ApiError;
use tracing::info;

use crate::cli::password_or_stdin;
use crate::context::Console;
use crate::render::format_date;

pub async fn login(console: Console, email: &str, password: Option<String>) -> Result<()> {
    let password = password_or_stdin(password)?;
    let Console {
        mut client, store, ..
    } = console;

    let session = client.login(email, &password).await?;
    store.save(&session)?;

    println!("Welcome, {} ({})", session.display_name(), session.role);
    Ok(())
}

pub fn logout(console: &Console) -> Result<()> {
    if console.store.clear()? {
        println!("Logged out");
    } else {
        println!("Not logged in");
    }
    Ok(())
}

/// Prints the stored session after checking it with the backend. A token the
/// backend rejects is removed.
pub async fn whoami(console: Console) -> Result<()> {
    let session = console.store.require()?;
    let client = console.client.with_session(session.clone());

    if !client.validate_session().await? {
        console.store.clear()?;
        info!(email = %session.email, "Stale session removed");
        return Err(ApiError::Unauthorized("Session expired. Please log in again.".into()).into());
    }

    println!("{} <{}>", session.display_name(), session.email);
    println!("Role:      {}", session.role);
    println!("Signed in: {}", format_date(session.logged_in_at));
    println!("Server:    {}", console.config.base_url());
    Ok(())
}
