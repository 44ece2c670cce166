use anyhow::{Result, bail};
use clap::Args;
use std::process;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use recipebox_core::blob::RECIPES_KEY;
use recipebox_core::catalog::category_glyph;
use recipebox_core::models::{Recipe, RecipeDraft};
use recipebox_core::query::RecipeQuery;

use super::Store;
use super::helpers::{
    exit_not_found, last_saved, parse_ingredient, plural, resolve_id, short_id, truncate,
};

/// Optional recipe fields shared by `add` and `edit`.
#[derive(Args, Debug, Default)]
pub(crate) struct RecipeFields {
    /// Short description
    #[arg(short, long)]
    pub description: Option<String>,
    /// Category (must already exist)
    #[arg(short, long)]
    pub category: Option<String>,
    /// Cook method (e.g. Baked, Grilled, Slow Cooker)
    #[arg(short, long)]
    pub method: Option<String>,
    /// Cook time in minutes
    #[arg(short, long)]
    pub time: Option<String>,
    /// Ingredient as "amount|measurement|ingredient" (repeatable)
    #[arg(short, long = "ingredient", value_name = "AMOUNT|UNIT|NAME")]
    pub ingredients: Vec<String>,
    /// Step-by-step instructions (line breaks are kept)
    #[arg(long)]
    pub instructions: Option<String>,
    /// Notes or tips
    #[arg(short, long)]
    pub notes: Option<String>,
}

impl RecipeFields {
    /// Overwrite the draft fields that were given. Ingredients are appended.
    fn apply(self, draft: &mut RecipeDraft) -> Result<()> {
        if let Some(v) = self.description {
            draft.description = v;
        }
        if let Some(v) = self.category {
            draft.category = v;
        }
        if let Some(v) = self.method {
            draft.cook_method = v;
        }
        if let Some(v) = self.time {
            draft.cook_time = v;
        }
        for raw in &self.ingredients {
            draft.ingredients.push(parse_ingredient(raw)?);
        }
        if let Some(v) = self.instructions {
            draft.instructions = v;
        }
        if let Some(v) = self.notes {
            draft.notes = v;
        }
        Ok(())
    }
}

fn ensure_known_category(store: &Store, category: &str) -> Result<()> {
    if !store.is_known_category(category) {
        bail!(
            "Unknown category '{category}'. Add it first with: recipebox category add \"{category}\""
        );
    }
    Ok(())
}

pub(crate) fn cmd_add(
    store: &mut Store,
    title: &str,
    fields: RecipeFields,
    favorite: bool,
    json: bool,
) -> Result<()> {
    let mut draft = RecipeDraft::titled(title);
    // The blank form row is only useful interactively
    draft.ingredients.clear();
    draft.favorite = favorite;
    fields.apply(&mut draft)?;
    ensure_known_category(store, &draft.category)?;

    let id = store.add(draft)?;
    let Some(recipe) = store.get(&id) else {
        bail!("Recipe '{id}' vanished after saving");
    };

    if json {
        println!("{}", serde_json::to_string_pretty(recipe)?);
    } else {
        let title = &recipe.title;
        println!("Recipe added: {title} (id: {})", short_id(&id));
    }
    Ok(())
}

pub(crate) fn cmd_edit(
    store: &mut Store,
    query: &str,
    title: Option<String>,
    fields: RecipeFields,
    clear_ingredients: bool,
    json: bool,
) -> Result<()> {
    let Some(id) = resolve_id(store, query)? else {
        exit_not_found(query, json);
    };
    let Some(existing) = store.get(&id) else {
        exit_not_found(query, json);
    };

    let mut draft = RecipeDraft::from(existing);
    if let Some(t) = title {
        draft.title = t;
    }
    if clear_ingredients {
        draft.ingredients.clear();
    }
    if let Some(category) = &fields.category {
        ensure_known_category(store, category)?;
    }
    fields.apply(&mut draft)?;

    store.update(&id, draft)?;

    if json {
        if let Some(recipe) = store.get(&id) {
            println!("{}", serde_json::to_string_pretty(recipe)?);
        }
    } else {
        println!("Recipe updated!");
    }
    Ok(())
}

pub(crate) fn cmd_delete(store: &mut Store, query: &str, json: bool) -> Result<()> {
    let Some(id) = resolve_id(store, query)? else {
        exit_not_found(query, json);
    };
    let removed = store.delete(&id)?;
    if json {
        println!("{}", serde_json::json!({ "deleted": id, "removed": removed }));
    } else {
        println!("Recipe deleted");
    }
    Ok(())
}

pub(crate) fn cmd_fav(store: &mut Store, query: &str, json: bool) -> Result<()> {
    let Some(id) = resolve_id(store, query)? else {
        exit_not_found(query, json);
    };
    let Some(favorite) = store.toggle_favorite(&id)? else {
        exit_not_found(query, json);
    };
    if json {
        println!("{}", serde_json::json!({ "id": id, "favorite": favorite }));
    } else {
        let title = store.get(&id).map_or("", |r| r.title.as_str());
        if favorite {
            println!("♥ Favorited {title}");
        } else {
            println!("♡ Unfavorited {title}");
        }
    }
    Ok(())
}

pub(crate) fn cmd_show(store: &Store, query: &str, json: bool) -> Result<()> {
    let Some(recipe) = resolve_id(store, query)?.and_then(|id| store.get(&id)) else {
        exit_not_found(query, json);
    };

    if json {
        println!("{}", serde_json::to_string_pretty(recipe)?);
        return Ok(());
    }

    print!("{}", render_detail(recipe, store.is_known_category(&recipe.category)));
    Ok(())
}

fn render_detail(recipe: &Recipe, category_known: bool) -> String {
    use std::fmt::Write;

    let mut out = String::new();
    let glyph = category_glyph(&recipe.category);
    let heart = if recipe.favorite { " ♥" } else { "" };
    let _ = writeln!(out, "{glyph}  {}{heart}", recipe.title);
    if !recipe.description.is_empty() {
        let _ = writeln!(out, "   {}", recipe.description);
    }

    let mut chips: Vec<String> = Vec::new();
    if !recipe.cook_time.is_empty() {
        chips.push(format!("⏱ {} min", recipe.cook_time));
    }
    if !recipe.cook_method.is_empty() {
        chips.push(recipe.cook_method.clone());
    }
    if category_known {
        chips.push(recipe.category.clone());
    } else {
        chips.push(format!("{} (removed category)", recipe.category));
    }
    let _ = writeln!(out, "   {}", chips.join("  |  "));

    if !recipe.ingredients.is_empty() {
        let _ = writeln!(out, "\n  INGREDIENTS:");
        for ing in &recipe.ingredients {
            let qty = format!("{} {}", ing.amount, ing.measurement);
            let _ = writeln!(out, "    {:<16} {}", qty.trim(), ing.ingredient);
        }
    }
    if !recipe.instructions.is_empty() {
        let _ = writeln!(out, "\n  INSTRUCTIONS:");
        for line in recipe.instructions.lines() {
            let _ = writeln!(out, "    {line}");
        }
    }
    if !recipe.notes.is_empty() {
        let _ = writeln!(out, "\n  NOTES:");
        let _ = writeln!(out, "    {}", recipe.notes);
    }
    let _ = writeln!(out, "\n  id: {}", recipe.id);
    out
}

pub(crate) fn cmd_list(store: &Store, query: &RecipeQuery, json: bool) -> Result<()> {
    #[derive(Tabled)]
    struct RecipeRow {
        #[tabled(rename = "")]
        glyph: &'static str,
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "Title")]
        title: String,
        #[tabled(rename = "Category")]
        category: String,
        #[tabled(rename = "Method")]
        method: String,
        #[tabled(rename = "Time")]
        time: String,
        #[tabled(rename = "♥")]
        favorite: &'static str,
    }

    let recipes = store.query(query);
    if recipes.is_empty() {
        if json {
            println!("[]");
        } else if store.is_empty() {
            eprintln!("No recipes found. Add your first one!");
        } else {
            eprintln!("No recipes match these filters");
        }
        process::exit(2);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&recipes)?);
        return Ok(());
    }

    let mut header = format!(
        "🍴 {}  ·  ♥ {}",
        plural(store.len(), "recipe", "recipes"),
        plural(store.favorite_count(), "favorite", "favorites")
    );
    if let Some(saved) = last_saved(store.blobs(), RECIPES_KEY) {
        header.push_str(&format!("  ·  saved {saved}"));
    }
    println!("{header}");

    let rows: Vec<RecipeRow> = recipes
        .iter()
        .map(|r| RecipeRow {
            glyph: category_glyph(&r.category),
            id: short_id(&r.id),
            title: truncate(&r.title, 35),
            category: truncate(&r.category, 16),
            method: r.cook_method.clone(),
            time: if r.cook_time.is_empty() {
                "-".into()
            } else {
                format!("{} min", r.cook_time)
            },
            favorite: if r.favorite { "♥" } else { "" },
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(5..6)).with(Alignment::right()))
        .to_string();
    println!("{table}");

    Ok(())
}
