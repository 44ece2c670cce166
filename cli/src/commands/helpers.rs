use anyhow::{Result, bail};
use serde::Serialize;

use chrono::DateTime;

use recipebox_core::blob::{BlobStore, SqliteBlobStore};
use recipebox_core::models::{Ingredient, RecipeId};
use recipebox_core::store::RecipeStore;

/// Number of id characters shown in tables. Any unique prefix is accepted back.
pub(crate) const SHORT_ID_LEN: usize = 8;

/// Parse an `--ingredient` value: `"amount|measurement|ingredient"`, or a bare
/// ingredient name.
pub(crate) fn parse_ingredient(s: &str) -> Result<Ingredient> {
    let parts: Vec<&str> = s.split('|').map(str::trim).collect();
    match parts.as_slice() {
        [name] if !name.is_empty() => Ok(Ingredient::new("", "", name)),
        [amount, measurement, name] => Ok(Ingredient::new(amount, measurement, name)),
        _ => bail!(
            "Invalid ingredient '{s}'. Use 'amount|measurement|ingredient' (e.g. '2|cups|Sugar')"
        ),
    }
}

/// Resolve a full id or a unique id prefix to a stored recipe id.
pub(crate) fn resolve_id<B: BlobStore>(
    store: &RecipeStore<B>,
    query: &str,
) -> Result<Option<RecipeId>> {
    let query = query.trim();
    if query.is_empty() {
        return Ok(None);
    }
    let exact = RecipeId::from(query);
    if store.get(&exact).is_some() {
        return Ok(Some(exact));
    }
    let matches: Vec<&RecipeId> = store
        .recipes()
        .iter()
        .map(|r| &r.id)
        .filter(|id| id.as_str().starts_with(query))
        .collect();
    match matches.as_slice() {
        [] => Ok(None),
        [id] => Ok(Some((*id).clone())),
        _ => bail!(
            "Id prefix '{query}' matches {} recipes. Use more characters",
            matches.len()
        ),
    }
}

pub(crate) fn short_id(id: &RecipeId) -> String {
    id.as_str().chars().take(SHORT_ID_LEN).collect()
}

pub(crate) fn plural(count: usize, one: &str, many: &str) -> String {
    if count == 1 {
        format!("{count} {one}")
    } else {
        format!("{count} {many}")
    }
}

pub(crate) fn json_error(message: &str) -> String {
    #[derive(Serialize)]
    struct CliError<'a> {
        error: &'a str,
    }
    serde_json::to_string(&CliError { error: message })
        .unwrap_or_else(|_| format!("{{\"error\":\"{message}\"}}"))
}

/// Report a missing recipe and exit with status 2.
pub(crate) fn exit_not_found(query: &str, json: bool) -> ! {
    let message = format!("No recipe matching '{query}'");
    if json {
        println!("{}", json_error(&message));
    } else {
        eprintln!("{message}");
    }
    std::process::exit(2);
}

/// When `key` was last written, formatted for display. Lookup errors only log.
pub(crate) fn last_saved(blobs: &SqliteBlobStore, key: &str) -> Option<String> {
    match blobs.updated_at(key) {
        Ok(stamp) => stamp.map(|raw| format_saved_at(&raw)),
        Err(e) => {
            tracing::debug!(key, error = %format!("{e:#}"), "Could not read save time");
            None
        }
    }
}

fn format_saved_at(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map_or_else(|_| raw.to_string(), |t| t.format("%Y-%m-%d %H:%M").to_string())
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let end = s.char_indices().nth(max - 3).map_or(s.len(), |(i, _)| i);
        format!("{}...", &s[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recipebox_core::blob::{CATEGORIES_KEY, MemoryBlobStore, RECIPES_KEY};
    use recipebox_core::models::RecipeDraft;

    #[test]
    fn test_parse_ingredient_full() {
        let ing = parse_ingredient("2 | cups | All-purpose flour").unwrap();
        assert_eq!(ing, Ingredient::new("2", "cups", "All-purpose flour"));
    }

    #[test]
    fn test_parse_ingredient_name_only() {
        let ing = parse_ingredient("Salt").unwrap();
        assert_eq!(ing, Ingredient::new("", "", "Salt"));
    }

    #[test]
    fn test_parse_ingredient_keeps_free_form_units() {
        let ing = parse_ingredient("|to taste|Black pepper").unwrap();
        assert_eq!(ing, Ingredient::new("", "to taste", "Black pepper"));
    }

    #[test]
    fn test_parse_ingredient_invalid() {
        assert!(parse_ingredient("").is_err());
        assert!(parse_ingredient("2|cups").is_err());
        assert!(parse_ingredient("1|2|3|4").is_err());
    }

    #[test]
    fn test_resolve_id_exact_and_prefix() {
        let mut store = RecipeStore::load(MemoryBlobStore::new());
        let id = store.add(RecipeDraft::titled("Soup")).unwrap();

        assert_eq!(resolve_id(&store, id.as_str()).unwrap(), Some(id.clone()));
        assert_eq!(resolve_id(&store, &short_id(&id)).unwrap(), Some(id.clone()));
        assert_eq!(resolve_id(&store, "not-an-id").unwrap(), None);
        assert_eq!(resolve_id(&store, "  ").unwrap(), None);
    }

    #[test]
    fn test_resolve_id_ambiguous_prefix() {
        let legacy = r#"[{"id": 1718000000001, "title": "A"}, {"id": 1718000000002, "title": "B"}]"#;
        let store = RecipeStore::load(MemoryBlobStore::new().with_entry("recipes", legacy));
        assert!(resolve_id(&store, "1718").is_err());
        assert_eq!(
            resolve_id(&store, "1718000000002").unwrap(),
            Some(RecipeId::from("1718000000002"))
        );
    }

    #[test]
    fn test_short_id() {
        let id = RecipeId::from("0123456789abcdef");
        assert_eq!(short_id(&id), "01234567");
        assert_eq!(short_id(&RecipeId::from("42")), "42");
    }

    #[test]
    fn test_plural() {
        assert_eq!(plural(1, "recipe", "recipes"), "1 recipe");
        assert_eq!(plural(0, "recipe", "recipes"), "0 recipes");
        assert_eq!(plural(3, "recipe", "recipes"), "3 recipes");
    }

    #[test]
    fn test_json_error() {
        assert_eq!(json_error("nope"), r#"{"error":"nope"}"#);
    }

    #[test]
    fn test_format_saved_at() {
        assert_eq!(
            format_saved_at("2026-10-18T14:02:33.123456+02:00"),
            "2026-10-18 14:02"
        );
        assert_eq!(format_saved_at("yesterday"), "yesterday");
    }

    #[test]
    fn test_last_saved_after_write() {
        let mut store = RecipeStore::load(SqliteBlobStore::open_in_memory().unwrap());
        assert_eq!(last_saved(store.blobs(), RECIPES_KEY), None);

        store.add(RecipeDraft::titled("Soup")).unwrap();
        let saved = last_saved(store.blobs(), RECIPES_KEY).unwrap();
        assert_eq!(saved.len(), "2026-10-18 14:02".len());
        assert_eq!(last_saved(store.blobs(), CATEGORIES_KEY), None);
    }

    #[test]
    fn test_truncate_utf8() {
        assert_eq!(truncate("Crème brûlée", 20), "Crème brûlée");
        assert_eq!(truncate("Crème brûlée tart", 10), "Crème b...");
    }
}
