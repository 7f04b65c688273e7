//! Logs command - view and manage the local event log

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use dialoguer::Confirm;
use fishtail_core::services::logging::now_ms;
use fishtail_core::{EntryPoint, LoggingService};

use super::get_app_dir;
use crate::output;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

#[derive(Subcommand)]
pub enum LogsCommands {
    /// Show recent log entries
    List {
        /// Number of entries to show
        #[arg(short, long, default_value = "50")]
        limit: usize,
        /// Show only errors
        #[arg(long)]
        errors: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Clear old log entries
    Clear {
        /// Delete logs older than N days
        #[arg(long, default_value = "30")]
        older_than_days: u64,
        /// Skip confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show log statistics and database path
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn get_logging_service() -> Result<LoggingService> {
    let app_dir = get_app_dir()?;
    std::fs::create_dir_all(&app_dir)?;
    LoggingService::new(&app_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION"))
}

fn format_timestamp(timestamp_ms: i64) -> String {
    use chrono::{Local, TimeZone};
    Local
        .timestamp_millis_opt(timestamp_ms)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| timestamp_ms.to_string())
}

fn list(limit: usize, errors: bool, json: bool) -> Result<()> {
    let service = get_logging_service()?;
    let entries = if errors { service.get_errors(limit)? } else { service.get_recent(limit)? };

    if json {
        return output::json(&entries);
    }

    if entries.is_empty() {
        println!("No log entries found.");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Time", "Entry", "Event", "Context", "Error"]);

    for entry in &entries {
        let context = [entry.command.as_deref(), entry.route.as_deref(), entry.endpoint.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(", ");

        let error_indicator = if entry.error_message.is_some() {
            "!".red().to_string()
        } else {
            String::new()
        };

        table.add_row(vec![
            format_timestamp(entry.timestamp),
            entry.entry_point.clone(),
            entry.event.clone(),
            context,
            error_indicator,
        ]);
    }

    println!("{}", table);

    if !errors {
        let recent_errors = service.get_errors(3)?;
        if !recent_errors.is_empty() {
            println!();
            println!("{}", "Recent Errors:".red().bold());
            for err in &recent_errors {
                println!(
                    "  {} [{}]: {}",
                    format_timestamp(err.timestamp).dimmed(),
                    err.event,
                    err.error_message.as_deref().unwrap_or("Unknown error")
                );
            }
        }
    }
    Ok(())
}

fn clear(older_than_days: u64, force: bool, json: bool) -> Result<()> {
    let service = get_logging_service()?;
    let cutoff_ms = now_ms() - older_than_days as i64 * DAY_MS;

    if !force && !json {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete logs older than {} days?", older_than_days))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let deleted = service.delete_before(cutoff_ms)?;
    if json {
        output::json(&serde_json::json!({ "deleted": deleted }))
    } else {
        println!("Deleted {} log entries", deleted);
        Ok(())
    }
}

fn stats(json: bool) -> Result<()> {
    let service = get_logging_service()?;
    let total = service.count()?;
    let errors = service.get_errors(1000)?.len();
    let db_path = service.db_path().to_path_buf();
    let size_bytes = std::fs::metadata(&db_path).map(|m| m.len()).unwrap_or(0);

    if json {
        return output::json(&serde_json::json!({
            "total_entries": total,
            "error_count": errors,
            "database_path": db_path.to_string_lossy(),
            "database_size_bytes": size_bytes
        }));
    }

    println!("{}", "Log Statistics".bold());
    println!("  Total entries: {}", total);
    println!("  Errors: {}", errors);
    println!("  Database: {}", db_path.display());
    println!("  Size: {} bytes", size_bytes);
    Ok(())
}

pub fn run(command: LogsCommands) -> Result<()> {
    match command {
        LogsCommands::List { limit, errors, json } => list(limit, errors, json),
        LogsCommands::Clear { older_than_days, force, json } => clear(older_than_days, force, json),
        LogsCommands::Stats { json } => stats(json),
    }
}
