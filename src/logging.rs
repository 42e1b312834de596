use std::io::IsTerminal;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter directive
pub const LOG_ENV: &str = "TSK_LOG";

/// Default filter for a given `-v` count
fn default_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn env_filter(verbose: u8) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level(verbose)))
}

/// Log to stderr for one-shot CLI commands.
pub fn init_cli(verbose: u8) {
    let result = tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose))
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .try_init();
    if let Err(err) = result {
        tracing::debug!(error = %err, "tracing subscriber already set, continuing");
    }
}

/// Log to `<dir>/tsk.log` while the TUI owns the terminal.
///
/// The returned guard flushes the background writer when dropped and must be
/// held for the whole session.
pub fn init_tui(verbose: u8, dir: &Path) -> Option<WorkerGuard> {
    if std::fs::create_dir_all(dir).is_err() {
        return None;
    }
    let appender = tracing_appender::rolling::never(dir, "tsk.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    match tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose))
        .with_ansi(false)
        .with_thread_ids(true)
        .with_writer(writer)
        .try_init()
    {
        Ok(()) => Some(guard),
        Err(_) => None,
    }
}
