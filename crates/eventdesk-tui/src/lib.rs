//! Full-screen admin console for eventdesk.

pub mod common;
pub mod effects;
pub mod events;
pub mod features;
pub mod render;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod update;

use std::io::{IsTerminal, stderr};
use std::sync::Arc;

use anyhow::Result;
use eventdesk_core::config::Config;
use eventdesk_core::session::SessionStore;
pub use runtime::ConsoleRuntime;

/// Runs the interactive console until the user quits.
///
/// Must be called from within a tokio runtime; requests run as spawned tasks.
///
/// # Errors
/// Returns an error if there is no terminal or terminal I/O fails.
pub async fn run_console(config: &Config, store: Arc<dyn SessionStore>) -> Result<()> {
    // The console requires a terminal to render
    if !stderr().is_terminal() {
        anyhow::bail!(
            "The console requires a terminal.\n\
             Use `eventdesk quizzes`, `eventdesk events` or `eventdesk policies` for non-interactive output."
        );
    }

    tracing::info!("starting console");
    let mut runtime = ConsoleRuntime::new(config, store)?;
    let result = runtime.run();
    drop(runtime);

    result
}
