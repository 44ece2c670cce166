use anyhow::Result;

use recipebox_core::catalog::{COOK_METHODS, suggest_ingredients, suggest_measurements};

fn print_list(items: &[&str], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(items)?);
    } else {
        for item in items {
            println!("{item}");
        }
    }
    Ok(())
}

pub(crate) fn cmd_suggest_ingredient(query: &str, json: bool) -> Result<()> {
    print_list(&suggest_ingredients(query), json)
}

pub(crate) fn cmd_suggest_measurement(query: &str, json: bool) -> Result<()> {
    print_list(&suggest_measurements(query), json)
}

pub(crate) fn cmd_suggest_method(json: bool) -> Result<()> {
    print_list(COOK_METHODS, json)
}
