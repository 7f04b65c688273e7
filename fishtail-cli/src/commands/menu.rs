//! Menu command - fetch, filter and print the menu

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use fishtail_core::domain::menu::payload_to_raw_categories;
use fishtail_core::domain::{
    apply_menu_filter, normalize_categories, DietaryFilter, FilterMode, MenuCategory, SectionFilter,
};
use fishtail_core::OperationResult;

use super::{get_context, log_command, spinner};
use crate::output;

pub struct MenuArgs {
    pub diet: String,
    pub section: String,
    pub file: Option<std::path::PathBuf>,
    pub list_filters: bool,
    pub json: bool,
}

fn load_file(path: &Path) -> Result<Vec<MenuCategory>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let payload: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;
    Ok(normalize_categories(&payload_to_raw_categories(payload)))
}

fn print_filters(json: bool) -> Result<()> {
    if json {
        let dietary: Vec<_> = DietaryFilter::ALL_FILTERS
            .iter()
            .map(|(f, label)| serde_json::json!({"value": f.as_str(), "label": label}))
            .collect();
        let sections: Vec<_> = SectionFilter::ALL_FILTERS
            .iter()
            .map(|(f, label)| serde_json::json!({"value": f.as_str(), "label": label}))
            .collect();
        return output::json(&serde_json::json!({"dietary": dietary, "sections": sections}));
    }

    let mut table = output::create_table();
    table.set_header(vec!["Kind", "Value", "Label"]);
    for (filter, label) in DietaryFilter::ALL_FILTERS {
        table.add_row(vec!["--diet", filter.as_str(), label]);
    }
    for (section, label) in SectionFilter::ALL_FILTERS {
        table.add_row(vec!["--section", section.as_str(), label]);
    }
    println!("{}", table);
    Ok(())
}

fn print_menu(categories: &[MenuCategory]) {
    for category in categories {
        println!();
        if category.subtitle.is_empty() {
            println!("{}", category.title.bold());
        } else {
            println!("{}  {}", category.title.bold(), category.subtitle.dimmed());
        }

        if category.items.is_empty() {
            println!("  {}", "No matching dishes".dimmed());
            continue;
        }

        let mut table = output::create_table();
        table.set_header(vec!["Dish", "Price", "Dietary", "Description"]);
        for item in &category.items {
            table.add_row(vec![
                item.name.clone(),
                item.price.clone(),
                item.dietary_info.join(", "),
                item.description.clone(),
            ]);
        }
        println!("{}", table);
    }
}

/// Section filter first, then dietary, as the menu page applies them
fn filtered(categories: &[MenuCategory], section: &str, diet: &str) -> Vec<MenuCategory> {
    let by_section = apply_menu_filter(categories, FilterMode::Section, section);
    apply_menu_filter(&by_section, FilterMode::Dietary, diet)
}

fn report(
    categories: Vec<MenuCategory>,
    fetch_error: Option<String>,
) -> OperationResult<Vec<MenuCategory>> {
    match fetch_error {
        Some(message) => OperationResult::fail(message),
        None => OperationResult::ok(categories),
    }
}

pub fn run(args: MenuArgs) -> Result<()> {
    if args.list_filters {
        return print_filters(args.json);
    }

    if DietaryFilter::parse(&args.diet).is_none() && !args.json {
        output::warning(&format!("Unknown dietary filter '{}', showing everything", args.diet));
    }

    let mut fetch_error = None;
    let categories = match &args.file {
        Some(path) => load_file(path)?,
        None => {
            let (ctx, _) = get_context(None, args.json)?;
            log_command(&ctx.logger, "menu");

            let bar = spinner("Fetching menu...", args.json);
            let fetched = ctx.menu_service.try_fetch_menu_data();
            bar.finish_and_clear();

            match fetched {
                Ok(raw) => normalize_categories(&raw),
                Err(e) => {
                    if !args.json {
                        output::warning(&format!("Menu unavailable: {}", e));
                    }
                    fetch_error = Some(e.to_string());
                    Vec::new()
                }
            }
        }
    };

    let categories = filtered(&categories, &args.section, &args.diet);

    if args.json {
        return output::json(&report(categories, fetch_error));
    }

    if categories.is_empty() {
        println!("No menu categories found.");
        return Ok(());
    }

    print_menu(&categories);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Vec<MenuCategory> {
        normalize_categories(&[
            json!({"title": "Biryani", "items": [
                {"id": 1, "name": "Veg Biryani", "price": "$14.99", "dietaryInfo": "Vegetarian, GF"},
                {"id": 2, "name": "Lamb Biryani", "price": "$18.99"}
            ]}),
            json!({"title": "Tandoori Naan (Bread)", "items": [
                {"id": 3, "name": "Garlic Naan", "price": "$3.99", "dietaryInfo": ["Vegetarian"]}
            ]}),
        ])
    }

    #[test]
    fn test_json_report_shape() {
        let categories = filtered(&sample(), "biryani", "vegetarian");
        let value = serde_json::to_value(report(categories, None)).unwrap();

        assert_eq!(value["success"], true);
        assert!(value["error"].is_null());
        let data = value["data"].as_array().unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["title"], "Biryani");
        assert_eq!(data[0]["items"][0]["id"], "1");
        assert_eq!(data[0]["items"][0]["dietaryInfo"], json!(["Vegetarian", "GF"]));
        assert_eq!(data[0]["items"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_json_report_on_fetch_failure() {
        let value =
            serde_json::to_value(report(Vec::new(), Some("unexpected status 500".into()))).unwrap();
        assert_eq!(value["success"], false);
        assert!(value["data"].is_null());
        assert_eq!(value["error"], "unexpected status 500");
    }

    #[test]
    fn test_load_file_accepts_single_category() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("menu.json");
        std::fs::write(&path, r#"{"title": "Biryani", "items": []}"#).unwrap();

        let categories = load_file(&path).unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].title, "Biryani");
        assert!(load_file(&dir.path().join("missing.json")).is_err());
    }
}
