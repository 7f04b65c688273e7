//! Session command - show who is signed in

use anyhow::Result;
use colored::Colorize;
use fishtail_core::domain::{select_layout, RouteKind};

use super::{get_context, log_command, spinner};
use crate::output;

pub fn run(url: Option<&str>, json: bool) -> Result<()> {
    let (ctx, _) = get_context(url, json)?;
    log_command(&ctx.logger, "session");

    let bar = spinner("Checking session...", json);
    let state = ctx.initialize_session();
    bar.finish_and_clear();

    if json {
        return output::json(&serde_json::json!({
            "session": state,
            "storedUser": ctx.auth_service.stored_user(),
            "layout": select_layout(RouteKind::Protected, &state),
        }));
    }

    match &state.user {
        Some(user) => {
            println!("{}", "Signed in".green().bold());
            let mut table = output::create_table();
            table.add_row(vec!["Name".to_string(), user.display_name()]);
            table.add_row(vec!["Email".to_string(), user.email.clone()]);
            table.add_row(vec!["User ID".to_string(), user.id.clone()]);
            table.add_row(vec!["Role".to_string(), user.role.to_string()]);
            table.add_row(vec![
                "Layout".to_string(),
                select_layout(RouteKind::Protected, &state).as_str().to_string(),
            ]);
            println!("{}", table);
        }
        None => {
            println!("{}", "Not signed in".yellow());
            if let Some(stored) = ctx.auth_service.stored_user() {
                println!("  Last signed in as {} ({})", stored.email, stored.role.as_str().dimmed());
            }
            println!("  Run {} to sign in.", "ft login".bold());
        }
    }

    Ok(())
}
