use anyhow::{Result, bail};
use serde::Serialize;
use std::process;

use recipebox_core::blob::BlobStore;
use recipebox_core::catalog::category_glyph;
use recipebox_core::store::RecipeStore;

use super::Store;
use super::helpers::{json_error, plural};

#[derive(Debug, Serialize)]
struct CategoryEntry<'a> {
    name: &'a str,
    glyph: &'static str,
    builtin: bool,
    recipes: usize,
}

fn category_entries<B: BlobStore>(store: &RecipeStore<B>) -> Vec<CategoryEntry<'_>> {
    let deletable = store.deletable_categories();
    store
        .categories()
        .iter()
        .map(|name| CategoryEntry {
            name,
            glyph: category_glyph(name),
            builtin: !deletable.contains(&name.as_str()),
            recipes: store.recipes().iter().filter(|r| &r.category == name).count(),
        })
        .collect()
}

/// Built-ins stay in the list even though the store would drop them.
fn ensure_deletable<B: BlobStore>(store: &RecipeStore<B>, name: &str) -> Result<()> {
    if store.is_known_category(name) && !store.deletable_categories().contains(&name) {
        bail!("\"{name}\" is a built-in category and cannot be deleted");
    }
    Ok(())
}

pub(crate) fn cmd_category_list(store: &Store, json: bool) -> Result<()> {
    let entries = category_entries(store);

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for e in &entries {
        let marker = if e.builtin { "" } else { "  (custom)" };
        println!("{} {:<16} {:>3}{marker}", e.glyph, e.name, e.recipes);
    }

    let orphans = store.orphaned_recipes();
    if !orphans.is_empty() {
        eprintln!(
            "\n{} in removed categories",
            plural(orphans.len(), "recipe is", "recipes are")
        );
    }
    Ok(())
}

pub(crate) fn cmd_category_add(store: &mut Store, name: &str, json: bool) -> Result<()> {
    let added = store.add_category(name)?;
    let name = name.trim();
    if json {
        println!("{}", serde_json::json!({ "category": name, "added": added }));
    } else if added {
        println!("Category \"{name}\" added");
    } else if name.is_empty() {
        eprintln!("Category name is blank, nothing added");
    } else {
        eprintln!("Category \"{name}\" already exists");
    }
    Ok(())
}

pub(crate) fn cmd_category_delete(store: &mut Store, name: &str, json: bool) -> Result<()> {
    ensure_deletable(store, name)?;
    if !store.delete_category(name)? {
        if json {
            println!("{}", json_error(&format!("Category '{name}' not found")));
        } else {
            eprintln!("Category '{name}' not found");
        }
        process::exit(2);
    }

    let still_used = store
        .recipes()
        .iter()
        .filter(|r| r.category == name)
        .count();
    if json {
        println!(
            "{}",
            serde_json::json!({ "deleted": name, "recipes_still_tagged": still_used })
        );
    } else {
        println!("Category \"{name}\" deleted");
        if still_used > 0 {
            println!(
                "{} still tagged \"{name}\"",
                plural(still_used, "recipe is", "recipes are")
            );
        }
    }
    Ok(())
}
