//! CLI command implementations

pub mod auth;
pub mod config;
pub mod guard;
pub mod logs;
pub mod menu;
pub mod nav;
pub mod query;
pub mod session;

use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{Context, Result};
use colored::Colorize;
use fishtail_core::config::Config;
use fishtail_core::ports::Navigator;
use fishtail_core::{EntryPoint, FishtailContext, LoggingService};
use indicatif::{ProgressBar, ProgressStyle};

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (shouldn't block operations)
pub fn get_logger() -> Option<LoggingService> {
    let app_dir = get_app_dir().ok()?;
    std::fs::create_dir_all(&app_dir).ok()?;
    LoggingService::new(&app_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION")).ok()
}

/// Record a command execution, ignoring any errors (logging should never
/// break the app)
pub fn log_command(logger: &Option<Arc<LoggingService>>, command: &str) {
    if let Some(l) = logger {
        let _ = l.log_command(command);
    }
}

/// Get the app directory from `FISHTAIL_DIR`, or `~/.fishtail`
pub fn get_app_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("FISHTAIL_DIR") {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(".fishtail"))
        .context("Could not find home directory; set FISHTAIL_DIR")
}

/// Navigator for a terminal: there is no browser to send, so destinations
/// are printed for the user to open
pub struct TerminalNavigator {
    href: Mutex<String>,
    quiet: bool,
    visited: Mutex<Vec<String>>,
}

impl TerminalNavigator {
    pub fn new(href: impl Into<String>, quiet: bool) -> Self {
        Self {
            href: Mutex::new(href.into()),
            quiet,
            visited: Mutex::new(Vec::new()),
        }
    }

    /// Destinations navigated to, oldest first
    pub fn visited(&self) -> Vec<String> {
        self.visited.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl Navigator for TerminalNavigator {
    fn current_href(&self) -> String {
        self.href.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn navigate(&self, url: &str) {
        if !self.quiet {
            println!("{} {}", "Open in your browser:".cyan(), url.underline());
        }
        self.visited
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url.to_string());
        *self.href.lock().unwrap_or_else(PoisonError::into_inner) = url.to_string();
    }
}

/// Location the CLI pretends to be at: `--url` if given, else the app's
/// landing page
fn location(app_dir: &std::path::Path, url: Option<&str>) -> Result<String> {
    match url {
        Some(url) => Ok(url.to_string()),
        None => Ok(format!("{}/", Config::load(app_dir)?.app_origin)),
    }
}

/// Build the context for a command. `url` stands in for the browser's
/// current location; `quiet` suppresses navigation output (for `--json`).
pub fn get_context(url: Option<&str>, quiet: bool) -> Result<(FishtailContext, Arc<TerminalNavigator>)> {
    let app_dir = get_app_dir()?;
    std::fs::create_dir_all(&app_dir)
        .with_context(|| format!("Failed to create app directory: {:?}", app_dir))?;

    let navigator = Arc::new(TerminalNavigator::new(location(&app_dir, url)?, quiet));
    let ctx = FishtailContext::new(&app_dir, navigator.clone())
        .context("Failed to initialize fishtail context")?;

    let ctx = match get_logger() {
        Some(logger) => ctx.with_logger(Arc::new(logger)),
        None => ctx,
    };
    Ok((ctx, navigator))
}

/// Spinner shown while waiting on the backend; hidden for `--json`
pub fn spinner(message: &str, json: bool) -> ProgressBar {
    if json {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        bar.set_style(style);
    }
    bar.set_message(message.to_string());
    bar.enable_steady_tick(std::time::Duration::from_millis(80));
    bar
}
