//! Tracing subscriber setup.
//!
//! Logs go to a daily-rolling file under `<home>/logs` because the TUI owns the
//! terminal. One-shot commands can add a stderr layer for warnings.
//! Setup never fails the caller: without a log directory the file layer is skipped.

use std::path::Path;

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::paths;

/// Environment variable holding extra filter directives.
pub const LOG_ENV: &str = "EVENTDESK_LOG";

/// Noisy HTTP crates are capped at warn; `EVENTDESK_LOG` can override them explicitly.
const BASE_DIRECTIVES: &str = "hyper=warn,hyper_util=warn,reqwest=warn,h2=warn";

/// Where log output goes in addition to the log file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutput {
    /// File only (full-screen TUI).
    File,
    /// File, plus warnings on stderr (one-shot commands).
    FileAndStderr,
}

/// Keeps the background file writer alive. Drop it at exit to flush.
#[derive(Debug)]
pub struct LogGuard {
    _file: Option<WorkerGuard>,
}

/// Builds filter directives from the optional env value.
fn filter_directives(env: Option<&str>) -> String {
    match env.map(str::trim).filter(|s| !s.is_empty()) {
        Some(env) => format!("{BASE_DIRECTIVES},{env}"),
        None => format!("{BASE_DIRECTIVES},info"),
    }
}

fn file_writer(log_dir: &Path) -> Result<RollingFileAppender> {
    std::fs::create_dir_all(log_dir)?;
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("eventdesk")
        .filename_suffix("log")
        .build(log_dir)?;
    Ok(appender)
}

/// Installs the global subscriber.
///
/// Safe to call more than once; later calls leave the first subscriber in place.
pub fn init(output: LogOutput) -> LogGuard {
    let env = std::env::var(LOG_ENV).ok();
    let filter = EnvFilter::new(filter_directives(env.as_deref()));

    let mut file_error = None;
    let (file_layer, guard) = match paths::logs_dir().map(|dir| file_writer(&dir)) {
        Some(Ok(appender)) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        Some(Err(e)) => {
            file_error = Some(e);
            (None, None)
        }
        None => (None, None),
    };

    let stderr_layer = (output == LogOutput::FileAndStderr).then(|| {
        fmt::layer()
            .with_target(false)
            .without_time()
            .with_writer(std::io::stderr)
            .with_filter(LevelFilter::WARN)
    });

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .is_ok();

    if installed && let Some(e) = file_error {
        tracing::warn!("File logging disabled: {e:#}");
    }

    LogGuard { _file: guard }
}
