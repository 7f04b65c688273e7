//! Config command - show and change client settings

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use fishtail_core::config::Config;

use super::get_app_dir;
use crate::output;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the resolved configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change a setting (apiUrl, appOrigin, sameOriginPort, menuCacheSecs).
    /// An empty value clears optional settings.
    Set {
        key: String,
        value: String,
    },
}

fn show(json: bool) -> Result<()> {
    let config = Config::load(&get_app_dir()?)?;

    if json {
        return output::json(&serde_json::json!({
            "settings": config,
            "apiBase": config.api_base(),
            "authBase": config.auth_base(),
        }));
    }

    let unset = || "(not set)".dimmed().to_string();
    let mut table = output::create_table();
    table.set_header(vec!["Setting", "Value"]);
    table.add_row(vec!["apiUrl".to_string(), config.api_url.clone().unwrap_or_else(unset)]);
    table.add_row(vec!["appOrigin".to_string(), config.app_origin.clone()]);
    table.add_row(vec![
        "sameOriginPort".to_string(),
        config.same_origin_port.map(|p| p.to_string()).unwrap_or_else(unset),
    ]);
    table.add_row(vec!["menuCacheSecs".to_string(), config.menu_cache_secs.to_string()]);
    println!("{}", table);
    println!("  API requests go to {}", config.api_base().bold());
    println!("  Sign-in pages live at {}", config.auth_base().bold());
    Ok(())
}

pub fn run(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show { json } => show(json),
        ConfigCommands::Set { key, value } => {
            let app_dir = get_app_dir()?;
            std::fs::create_dir_all(&app_dir)?;
            let config = Config::update_setting(&app_dir, &key, &value)?;
            output::success(&format!("Updated {}", key));
            println!("  API requests go to {}", config.api_base().bold());
            Ok(())
        }
    }
}
