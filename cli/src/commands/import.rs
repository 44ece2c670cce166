use anyhow::{Context, Result, bail};
use std::path::Path;

use recipebox_core::models::{Ingredient, RecipeDraft};

use super::Store;
use super::helpers::{plural, short_id};

pub(crate) fn cmd_import(
    store: &mut Store,
    file: &Path,
    title_override: Option<String>,
    category: Option<String>,
    json: bool,
) -> Result<()> {
    let input = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read file: {}", file.display()))?;

    let fallback = file.file_stem().and_then(|s| s.to_str()).map(String::from);
    let mut draft = draft_from_cooklang(&input, title_override, fallback)?;

    if let Some(category) = category {
        draft.category = category;
    }
    if !store.is_known_category(&draft.category) {
        bail!(
            "Unknown category '{}'. Add it first with: recipebox category add \"{}\"",
            draft.category,
            draft.category
        );
    }

    let count = draft.ingredients.len();
    let id = store.add(draft)?;
    let Some(recipe) = store.get(&id) else {
        bail!("Recipe '{id}' vanished after saving");
    };

    if json {
        println!("{}", serde_json::to_string_pretty(recipe)?);
    } else {
        let title = &recipe.title;
        println!(
            "Imported recipe: {title} ({}, id: {})",
            plural(count, "ingredient", "ingredients"),
            short_id(&id)
        );
    }
    Ok(())
}

/// Build a draft from Cooklang source. Only the title and grouped ingredients
/// are carried over.
fn draft_from_cooklang(
    input: &str,
    title_override: Option<String>,
    fallback_title: Option<String>,
) -> Result<RecipeDraft> {
    let (recipe_data, _report) = cooklang::parse(input)
        .into_result()
        .map_err(|e| anyhow::anyhow!("Failed to parse Cooklang file: {e}"))?;

    let title = title_override
        .or_else(|| recipe_data.metadata.title().map(String::from))
        .or(fallback_title)
        .filter(|t| !t.trim().is_empty())
        .context("Could not determine recipe title. Use --title to specify one")?;

    // No unit table, so units stay as written in the file
    let converter = cooklang::Converter::empty();
    let ingredients: Vec<Ingredient> = recipe_data
        .group_ingredients(&converter)
        .iter()
        .map(cooklang_ingredient_row)
        .collect();

    if ingredients.is_empty() {
        bail!("No ingredients found in recipe");
    }

    let mut draft = RecipeDraft::titled(&title);
    draft.ingredients = ingredients;
    Ok(draft)
}

fn cooklang_ingredient_row(gi: &cooklang::ingredient_list::GroupedIngredient<'_>) -> Ingredient {
    // Grouped quantities with incompatible units are listed separately; keep the first
    let (amount, measurement) =
        gi.quantity
            .iter()
            .next()
            .map_or((String::new(), String::new()), |qty: &cooklang::Quantity| {
                let amount = match qty.value() {
                    cooklang::Value::Number(n) => format_amount(n.value()),
                    cooklang::Value::Range { start, end } => {
                        format!("{}-{}", format_amount(start.value()), format_amount(end.value()))
                    }
                    cooklang::Value::Text(t) => t.clone(),
                };
                (amount, qty.unit().unwrap_or_default().to_string())
            });

    Ingredient {
        amount,
        measurement,
        ingredient: gi.ingredient.display_name().to_string(),
    }
}

fn format_amount(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    format!("{rounded}")
}
