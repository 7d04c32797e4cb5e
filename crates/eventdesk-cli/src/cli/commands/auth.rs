//! Auth command handlers.

use std::io::{self, BufRead, IsTerminal, Write};

use anyhow::{Context, Result};
use eventdesk_core::api::{AdminClient, resolve_base_url};
use eventdesk_core::config::Config;
use eventdesk_core::session::{FileSessionStore, SessionStore, mask_token};

pub async fn login(
    config: &Config,
    store: &FileSessionStore,
    email: Option<&str>,
    password: Option<String>,
) -> Result<()> {
    let client = AdminClient::from_config(config)?;

    let email = email
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .or_else(|| config.effective_login_email())
        .unwrap_or_default()
        .to_string();
    let password = match password {
        Some(password) => password,
        None => read_password()?,
    };
    if email.is_empty() || password.is_empty() {
        anyhow::bail!("Email and password are required.");
    }

    let token = client.login(&email, &password).await?;
    store.save(&token).context("save session")?;
    tracing::info!("session saved");

    println!("Logged in as {email} (token: {})", mask_token(&token));
    Ok(())
}

/// Reads the password from stdin, prompting only when interactive.
fn read_password() -> Result<String> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        eprint!("Password: ");
        io::stderr().flush()?;
    }

    let mut input = String::new();
    stdin
        .lock()
        .read_line(&mut input)
        .context("read password from stdin")?;
    Ok(input.trim_end_matches(['\r', '\n']).to_string())
}

pub fn logout(store: &FileSessionStore) -> Result<()> {
    if store.clear().context("clear session")? {
        println!("Logged out.");
    } else {
        println!("Not logged in.");
    }
    Ok(())
}

pub fn status(config: &Config, store: &FileSessionStore) -> Result<()> {
    match resolve_base_url(config.effective_api_url()) {
        Ok(url) => println!("API URL: {url}"),
        Err(e) => println!("API URL: {e}"),
    }

    match store.load() {
        Ok(Some(token)) => println!("Session: {}", mask_token(&token)),
        Ok(None) => println!("Session: not logged in"),
        Err(e) => println!("Session: unreadable ({e:#})"),
    }

    if let Some(path) = store.path() {
        println!("Session file: {}", path.display());
    }
    Ok(())
}
