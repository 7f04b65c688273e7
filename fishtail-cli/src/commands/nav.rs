//! Nav command - navigation sections for a role

use anyhow::Result;
use colored::Colorize;
use fishtail_core::domain::{get_navigation_for_role, Role};

use super::get_context;
use crate::output;

/// Role to show: `--role` if given, else the signed-in user's
fn resolve_role(role: Option<&str>, json: bool) -> Result<Role> {
    if let Some(value) = role {
        return Role::parse(value)
            .ok_or_else(|| anyhow::anyhow!("Unknown role '{}'. Expected user, provider or admin", value));
    }

    let (ctx, _) = get_context(None, json)?;
    match ctx.initialize_session().role() {
        Some(role) => Ok(role),
        None => anyhow::bail!("Not signed in. Pass --role to preview a role's navigation"),
    }
}

pub fn run(role: Option<&str>, json: bool) -> Result<()> {
    let role = resolve_role(role, json)?;
    let sections = get_navigation_for_role(role);

    if json {
        return output::json(&serde_json::json!({ "role": role, "sections": sections }));
    }

    println!("Navigation for {}", role.as_str().bold());
    for section in &sections {
        println!();
        println!("{}", section.title.bold());
        let mut table = output::create_table();
        table.set_header(vec!["Link", "Route", "Description", "Opens"]);
        for item in &section.items {
            let opens = if item.target.is_some() { "new tab" } else { "" };
            table.add_row(vec![item.name, item.href, item.description, opens]);
        }
        println!("{}", table);
    }
    Ok(())
}
