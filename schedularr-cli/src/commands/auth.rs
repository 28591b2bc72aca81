use std::time::Duration;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use schedularr_core::config::AppConfig;
use schedularr_google::OAuthClient;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use super::{open_session_store, open_settings};
use crate::render::Render;
use crate::utils::tui;

pub async fn login(timeout: Duration, no_browser: bool) -> Result<()> {
    let app = AppConfig::load()?;
    let client = OAuthClient::new(app);
    let mut flow = client.login();

    let pending = flow.start().await.context("Failed to start sign-in")?;

    println!("Open this URL in your browser to sign in:\n");
    println!("{}\n", pending.authorization_url());

    if !no_browser && open::that(pending.authorization_url()).is_err() {
        println!("(Could not open browser automatically, please copy the URL above)");
    }

    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_ctrl_c.cancel();
        }
    });

    let spinner = tui::create_spinner("Waiting for Google (Ctrl-C to cancel)");
    let result = flow.complete(pending, timeout, cancel).await;
    spinner.finish_and_clear();

    let session = result?;
    open_session_store()?
        .save(&session)
        .context("Failed to save session")?;

    println!("{} {}", "Signed in as".green(), session.render());

    Ok(())
}

pub async fn logout(purge: bool) -> Result<()> {
    let store = open_session_store()?;

    match store.load()? {
        Some(session) => {
            revoke(&session.access_token).await;
            store.clear().context("Failed to delete session")?;
            println!("Signed out {}", session.render());
        }
        None => println!("{}", "Not signed in".dimmed()),
    }

    if purge {
        let mut settings = open_settings()?;
        settings.reset().context("Failed to reset settings")?;
        println!("Settings reset to defaults");
    }

    Ok(())
}

/// Best effort: the local session goes away either way.
async fn revoke(token: &str) {
    let app = match AppConfig::load() {
        Ok(app) => app,
        Err(e) => {
            warn!(error = %e, "skipping token revocation");
            return;
        }
    };

    if let Err(e) = OAuthClient::new(app).revoke(token).await {
        warn!(error = %e, "failed to revoke token");
    }
}

pub fn status() -> Result<()> {
    let store = open_session_store()?;

    match store.load()? {
        Some(session) => {
            println!("Signed in as {}", session.render());
            if session.is_expired() {
                println!(
                    "  {}",
                    "Access token expired; it will be refreshed on next use".dimmed()
                );
            }
        }
        None => {
            println!("{}", "Not signed in".dimmed());
            println!("\nSign in with:\n  schedularr auth login");
        }
    }

    Ok(())
}
