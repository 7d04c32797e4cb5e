//! CLI entry and dispatch.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use eventdesk_core::config;
use eventdesk_core::logging::{self, LogOutput};
use eventdesk_core::session::FileSessionStore;

mod commands;

#[derive(Parser)]
#[command(name = "eventdesk")]
#[command(version)]
#[command(about = "Admin console for quizzes, events and reward policies")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override the API base URL from config
    #[arg(long, global = true, env = "EVENTDESK_API_URL", value_name = "URL")]
    api_url: Option<String>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Log in and store the session token
    Login {
        /// Admin email (defaults to login_email from config)
        #[arg(long)]
        email: Option<String>,
        /// Admin password (read from stdin when omitted)
        #[arg(long, env = "EVENTDESK_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Forget the stored session token
    Logout,
    /// Show the API URL and session state
    Status,
    /// List quizzes (one page)
    Quizzes {
        /// Zero-based page number
        #[arg(long, default_value_t = 0)]
        page: u32,
        /// Page size (defaults to page_size from config)
        #[arg(long)]
        size: Option<u32>,
        /// Print the response body as the server sent it
        #[arg(long)]
        json: bool,
    },
    /// List events
    Events {
        /// Print the response body as the server sent it
        #[arg(long)]
        json: bool,
    },
    /// List reward policies
    Policies {
        /// Print the response body as the server sent it
        #[arg(long)]
        json: bool,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
    /// Set the API base URL in the config file
    SetUrl {
        /// Base URL of the admin API
        #[arg(value_name = "URL")]
        url: String,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let output = if cli.command.is_some() {
        LogOutput::FileAndStderr
    } else {
        LogOutput::File
    };
    let _log_guard = logging::init(output);

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let mut config = config::Config::load().context("load config")?;
    config.apply_api_url_override(cli.api_url.as_deref());
    tracing::debug!(api_url = config.effective_api_url(), "config loaded");

    // default to the full-screen console
    let Some(command) = cli.command else {
        let store = Arc::new(FileSessionStore::new());
        return eventdesk_tui::run_console(&config, store).await;
    };

    let store = FileSessionStore::new();
    match command {
        Commands::Login { email, password } => {
            commands::auth::login(&config, &store, email.as_deref(), password).await
        }
        Commands::Logout => commands::auth::logout(&store),
        Commands::Status => commands::auth::status(&config, &store),

        Commands::Quizzes { page, size, json } => {
            commands::lists::quizzes(&config, &store, page, size, json).await
        }
        Commands::Events { json } => commands::lists::events(&config, &store, json).await,
        Commands::Policies { json } => commands::lists::policies(&config, &store, json).await,

        Commands::Config { command } => match command {
            ConfigCommands::Path => commands::config::path(),
            ConfigCommands::Init => commands::config::init(),
            ConfigCommands::SetUrl { url } => commands::config::set_url(&url),
        },
    }
}
