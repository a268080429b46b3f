//! `conditions` — list categories or one category's conditions.

use crate::catalog::{Catalog, Category};
use crate::cli::args::ConditionsArgs;
use crate::error::WaterSafeError;

/// Prints the category list, or the conditions of one category.
///
/// # Errors
///
/// Returns a catalog error if the dataset fails to load, or a JSON error if
/// serialization fails.
pub fn run(args: &ConditionsArgs) -> Result<(), WaterSafeError> {
    let catalog = match args.catalog.as_deref() {
        Some(path) => Catalog::from_path(path)?,
        None => Catalog::embedded()?,
    };

    match args.category {
        Some(category) => print_category(&catalog, category, args.json)?,
        None => print_overview(&catalog, args.json)?,
    }
    Ok(())
}

fn print_category(
    catalog: &Catalog,
    category: Category,
    json: bool,
) -> Result<(), WaterSafeError> {
    let conditions = catalog.conditions(category);
    if json {
        println!("{}", serde_json::to_string_pretty(conditions)?);
        return Ok(());
    }

    println!("{} ({})", category.label(), category);
    for condition in conditions {
        println!(
            "  {} {} [{}]\n      {}",
            condition.icon, condition.name, condition.severity, condition.description
        );
    }
    Ok(())
}

fn print_overview(catalog: &Catalog, json: bool) -> Result<(), WaterSafeError> {
    if json {
        let overview: Vec<serde_json::Value> = Category::ALL
            .iter()
            .map(|&category| {
                serde_json::json!({
                    "category": category.as_str(),
                    "label": category.label(),
                    "conditions": catalog.conditions(category).len(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&overview)?);
        return Ok(());
    }

    for category in Category::ALL {
        println!(
            "{:<20} {} ({} conditions)",
            category.as_str(),
            category.label(),
            catalog.conditions(category).len()
        );
    }
    Ok(())
}
