use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::blob::{BlobStore, CATEGORIES_KEY, RECIPES_KEY};
use crate::catalog::{BUILTIN_CATEGORIES, is_builtin_category};
use crate::error::StoreError;
use crate::models::{Recipe, RecipeDraft, RecipeId};
use crate::query::{RecipeQuery, filter_recipes};

/// Owns the recipe collection and the category list, and writes a full
/// snapshot of whichever collection changed after every mutation.
pub struct RecipeStore<B: BlobStore> {
    blobs: B,
    recipes: Vec<Recipe>,
    categories: Vec<String>,
}

impl<B: BlobStore> RecipeStore<B> {
    /// Read both snapshots from `blobs`. Missing or unreadable entries fall
    /// back to an empty recipe list and the built-in categories.
    pub fn load(blobs: B) -> Self {
        let recipes: Vec<Recipe> = read_snapshot(&blobs, RECIPES_KEY).unwrap_or_default();
        let categories = read_snapshot::<Vec<String>>(&blobs, CATEGORIES_KEY)
            .map_or_else(builtin_categories, dedup_categories);
        debug!(
            recipes = recipes.len(),
            categories = categories.len(),
            "Loaded recipe store"
        );
        Self {
            blobs,
            recipes,
            categories,
        }
    }

    // --- Recipes ---

    pub fn add(&mut self, draft: RecipeDraft) -> Result<RecipeId, StoreError> {
        draft.validate()?;
        let id = self.fresh_id();
        self.recipes.push(Recipe::from_draft(id.clone(), draft));
        debug!(recipe_id = %id, "Added recipe");
        self.persist_recipes()?;
        Ok(id)
    }

    pub fn update(&mut self, id: &RecipeId, draft: RecipeDraft) -> Result<(), StoreError> {
        draft.validate()?;
        let slot = self
            .recipes
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        *slot = Recipe::from_draft(id.clone(), draft);
        debug!(recipe_id = %id, "Updated recipe");
        self.persist_recipes()
    }

    /// Returns whether a recipe was removed. Unknown ids are not an error.
    pub fn delete(&mut self, id: &RecipeId) -> Result<bool, StoreError> {
        let before = self.recipes.len();
        self.recipes.retain(|r| &r.id != id);
        let removed = self.recipes.len() < before;
        debug!(recipe_id = %id, removed, "Deleted recipe");
        self.persist_recipes()?;
        Ok(removed)
    }

    /// Flip the favorite flag. Returns the new value, or `None` for an unknown id.
    pub fn toggle_favorite(&mut self, id: &RecipeId) -> Result<Option<bool>, StoreError> {
        let favorite = self.recipes.iter_mut().find(|r| &r.id == id).map(|r| {
            r.favorite = !r.favorite;
            r.favorite
        });
        debug!(recipe_id = %id, ?favorite, "Toggled favorite");
        self.persist_recipes()?;
        Ok(favorite)
    }

    #[must_use]
    pub fn get(&self, id: &RecipeId) -> Option<&Recipe> {
        self.recipes.iter().find(|r| &r.id == id)
    }

    #[must_use]
    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    #[must_use]
    pub fn favorite_count(&self) -> usize {
        self.recipes.iter().filter(|r| r.favorite).count()
    }

    #[must_use]
    pub fn query(&self, query: &RecipeQuery) -> Vec<&Recipe> {
        filter_recipes(&self.recipes, query)
    }

    // --- Categories ---

    /// Append a trimmed category name. Blank names and exact duplicates are
    /// ignored and return `false`.
    pub fn add_category(&mut self, name: &str) -> Result<bool, StoreError> {
        let name = name.trim();
        if name.is_empty() || self.is_known_category(name) {
            return Ok(false);
        }
        self.categories.push(name.to_string());
        debug!(category = name, "Added category");
        self.persist_categories()?;
        Ok(true)
    }

    /// Remove a category, built-in or not. Recipes keep their category string.
    pub fn delete_category(&mut self, name: &str) -> Result<bool, StoreError> {
        let before = self.categories.len();
        self.categories.retain(|c| c != name);
        let removed = self.categories.len() < before;
        debug!(category = name, removed, "Deleted category");
        self.persist_categories()?;
        Ok(removed)
    }

    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    #[must_use]
    pub fn is_known_category(&self, name: &str) -> bool {
        self.categories.iter().any(|c| c == name)
    }

    /// Categories the user added, in list order.
    #[must_use]
    pub fn deletable_categories(&self) -> Vec<&str> {
        self.categories
            .iter()
            .map(String::as_str)
            .filter(|c| !is_builtin_category(c))
            .collect()
    }

    /// Recipes whose category is no longer in the list.
    #[must_use]
    pub fn orphaned_recipes(&self) -> Vec<&Recipe> {
        self.recipes
            .iter()
            .filter(|r| !self.is_known_category(&r.category))
            .collect()
    }

    // --- Blob store access ---

    #[must_use]
    pub fn blobs(&self) -> &B {
        &self.blobs
    }

    #[must_use]
    pub fn into_blobs(self) -> B {
        self.blobs
    }

    fn fresh_id(&self) -> RecipeId {
        loop {
            let id = RecipeId::generate();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }

    fn persist_recipes(&mut self) -> Result<(), StoreError> {
        write_snapshot(&mut self.blobs, RECIPES_KEY, &self.recipes)
    }

    fn persist_categories(&mut self) -> Result<(), StoreError> {
        write_snapshot(&mut self.blobs, CATEGORIES_KEY, &self.categories)
    }
}

fn builtin_categories() -> Vec<String> {
    BUILTIN_CATEGORIES.iter().map(|c| (*c).to_string()).collect()
}

fn dedup_categories(categories: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(categories.len());
    for cat in categories {
        if !out.contains(&cat) {
            out.push(cat);
        }
    }
    out
}

fn read_snapshot<T: DeserializeOwned>(blobs: &impl BlobStore, key: &str) -> Option<T> {
    let raw = match blobs.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            let error = format!("{e:#}");
            warn!(key, %error, "Failed to read snapshot, using defaults");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, error = %e, "Malformed snapshot, using defaults");
            None
        }
    }
}

fn write_snapshot<T: Serialize + ?Sized>(
    blobs: &mut impl BlobStore,
    key: &'static str,
    value: &T,
) -> Result<(), StoreError> {
    let json = serde_json::to_string(value).map_err(|e| StoreError::Persistence {
        key,
        source: e.into(),
    })?;
    blobs
        .set(key, &json)
        .map_err(|source| StoreError::Persistence { key, source })?;
    debug!(key, bytes = json.len(), "Wrote snapshot");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::{MemoryBlobStore, SqliteBlobStore};
    use crate::models::Ingredient;
    use std::collections::HashSet;

    fn new_store() -> RecipeStore<MemoryBlobStore> {
        RecipeStore::load(MemoryBlobStore::new())
    }

    fn draft(title: &str, category: &str) -> RecipeDraft {
        let mut d = RecipeDraft::titled(title);
        d.category = category.to_string();
        d
    }

    fn full_draft() -> RecipeDraft {
        RecipeDraft {
            title: "Banana Bread".to_string(),
            description: "Moist and easy".to_string(),
            category: "Breads".to_string(),
            cook_method: "Baked".to_string(),
            cook_time: "60".to_string(),
            ingredients: vec![
                Ingredient::new("3", "", "Bananas"),
                Ingredient::new("2", "cups", "All-purpose flour"),
            ],
            instructions: "Mash.\nMix.\n\nBake at 350F.".to_string(),
            notes: "Freezes well".to_string(),
            favorite: false,
        }
    }

    /// Blob store whose writes always fail.
    struct FailingBlobStore;

    impl BlobStore for FailingBlobStore {
        fn get(&self, _key: &str) -> anyhow::Result<Option<String>> {
            Ok(None)
        }

        fn set(&mut self, _key: &str, _value: &str) -> anyhow::Result<()> {
            anyhow::bail!("quota exceeded")
        }
    }

    // --- Loading ---

    #[test]
    fn test_load_empty_uses_defaults() {
        let store = new_store();
        assert!(store.is_empty());
        assert_eq!(store.categories(), builtin_categories().as_slice());
    }

    #[test]
    fn test_load_malformed_falls_back() {
        let blobs = MemoryBlobStore::new()
            .with_entry(RECIPES_KEY, "{not json")
            .with_entry(CATEGORIES_KEY, r#"{"a": 1}"#);
        let store = RecipeStore::load(blobs);
        assert!(store.is_empty());
        assert_eq!(store.categories().len(), BUILTIN_CATEGORIES.len());
    }

    #[test]
    fn test_load_persisted_categories_override_builtins() {
        let blobs = MemoryBlobStore::new().with_entry(CATEGORIES_KEY, r#"["Lunch","Brunch"]"#);
        let store = RecipeStore::load(blobs);
        assert_eq!(store.categories(), ["Lunch", "Brunch"]);
        assert_eq!(store.deletable_categories(), vec!["Brunch"]);
    }

    #[test]
    fn test_load_drops_duplicate_categories() {
        let blobs =
            MemoryBlobStore::new().with_entry(CATEGORIES_KEY, r#"["Lunch","Brunch","Lunch"]"#);
        let store = RecipeStore::load(blobs);
        assert_eq!(store.categories(), ["Lunch", "Brunch"]);
    }

    #[test]
    fn test_load_legacy_snapshot() {
        let json = r#"[{
            "id": 1718000000000,
            "title": "Pancakes",
            "description": "",
            "category": "Breakfast",
            "cookMethod": "Fried",
            "cookTime": "15",
            "ingredients": [{"amount": "1", "measurement": "cup", "ingredient": "Milk"}],
            "instructions": "",
            "notes": "",
            "favorite": true
        }]"#;
        let store = RecipeStore::load(MemoryBlobStore::new().with_entry(RECIPES_KEY, json));
        assert_eq!(store.len(), 1);
        let r = store.get(&RecipeId::from("1718000000000")).unwrap();
        assert_eq!(r.title, "Pancakes");
        assert!(r.favorite);
    }

    // --- add ---

    #[test]
    fn test_add_appends_with_fresh_id() {
        let mut store = new_store();
        let mut seen = HashSet::new();
        for i in 0..20 {
            let before = store.len();
            let id = store.add(draft(&format!("Recipe {i}"), "Dinner")).unwrap();
            assert_eq!(store.len(), before + 1);
            assert!(seen.insert(id.clone()), "duplicate id {id}");
            assert_eq!(store.recipes().last().unwrap().id, id);
        }
    }

    #[test]
    fn test_add_defaults_favorite_false() {
        let mut store = new_store();
        let id = store.add(RecipeDraft::titled("Toast")).unwrap();
        assert!(!store.get(&id).unwrap().favorite);
    }

    #[test]
    fn test_add_blank_title_rejected() {
        let mut store = new_store();
        store.add(draft("Keep", "Lunch")).unwrap();
        let snapshot = store.recipes().to_vec();
        let written = store.blobs().get(RECIPES_KEY).unwrap();

        for title in ["", "   ", "\t\n"] {
            let err = store.add(draft(title, "Lunch")).unwrap_err();
            assert!(err.is_validation());
        }
        assert_eq!(store.recipes(), snapshot.as_slice());
        assert_eq!(store.blobs().get(RECIPES_KEY).unwrap(), written);
    }

    #[test]
    fn test_add_persists() {
        let mut store = new_store();
        let id = store.add(full_draft()).unwrap();
        let raw = store.blobs().get(RECIPES_KEY).unwrap().unwrap();
        let persisted: Vec<Recipe> = serde_json::from_str(&raw).unwrap();
        assert_eq!(persisted.len(), 1);
        assert_eq!(persisted[0].id, id);
        assert_eq!(persisted[0].instructions, "Mash.\nMix.\n\nBake at 350F.");
    }

    // --- update ---

    #[test]
    fn test_update_replaces_fields_keeps_id_and_position() {
        let mut store = new_store();
        let first = store.add(draft("First", "Lunch")).unwrap();
        let id = store.add(draft("Second", "Lunch")).unwrap();
        store.add(draft("Third", "Lunch")).unwrap();

        let new = full_draft();
        store.update(&id, new.clone()).unwrap();

        let updated = &store.recipes()[1];
        assert_eq!(updated.id, id);
        assert_eq!(RecipeDraft::from(updated), new);
        assert_eq!(store.recipes()[0].id, first);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_update_missing_id_is_not_found() {
        let mut store = new_store();
        store.add(draft("Only", "Lunch")).unwrap();
        let err = store
            .update(&RecipeId::from("missing"), full_draft())
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(store.recipes()[0].title, "Only");
    }

    #[test]
    fn test_update_blank_title_rejected() {
        let mut store = new_store();
        let id = store.add(draft("Original", "Lunch")).unwrap();
        let err = store.update(&id, draft("  ", "Dinner")).unwrap_err();
        assert!(err.is_validation());
        let r = store.get(&id).unwrap();
        assert_eq!(r.title, "Original");
        assert_eq!(r.category, "Lunch");
    }

    #[test]
    fn test_update_can_set_favorite() {
        let mut store = new_store();
        let id = store.add(draft("Soup", "Dinner")).unwrap();
        let mut d = RecipeDraft::from(store.get(&id).unwrap());
        d.favorite = true;
        store.update(&id, d).unwrap();
        assert!(store.get(&id).unwrap().favorite);
    }

    // --- delete ---

    #[test]
    fn test_delete_is_idempotent() {
        let mut store = new_store();
        let keep = store.add(draft("Keep", "Lunch")).unwrap();
        let id = store.add(draft("Drop", "Lunch")).unwrap();

        assert!(store.delete(&id).unwrap());
        let after_first = store.recipes().to_vec();
        assert!(!store.delete(&id).unwrap());
        assert_eq!(store.recipes(), after_first.as_slice());
        assert_eq!(store.len(), 1);
        assert!(store.get(&keep).is_some());
        assert!(store.get(&id).is_none());
    }

    #[test]
    fn test_delete_unknown_is_noop() {
        let mut store = new_store();
        store.add(draft("Keep", "Lunch")).unwrap();
        assert!(!store.delete(&RecipeId::from("nope")).unwrap());
        assert_eq!(store.len(), 1);
    }

    // --- toggle_favorite ---

    #[test]
    fn test_toggle_favorite_is_self_inverse() {
        let mut store = new_store();
        let id = store.add(draft("Soup", "Dinner")).unwrap();

        assert_eq!(store.toggle_favorite(&id).unwrap(), Some(true));
        assert!(store.get(&id).unwrap().favorite);
        assert_eq!(store.favorite_count(), 1);

        assert_eq!(store.toggle_favorite(&id).unwrap(), Some(false));
        assert!(!store.get(&id).unwrap().favorite);
        assert_eq!(store.favorite_count(), 0);
    }

    #[test]
    fn test_toggle_favorite_only_changes_flag() {
        let mut store = new_store();
        let id = store.add(full_draft()).unwrap();
        let before = store.get(&id).unwrap().clone();
        store.toggle_favorite(&id).unwrap();
        let after = store.get(&id).unwrap();
        assert_eq!(
            RecipeDraft {
                favorite: false,
                ..RecipeDraft::from(after)
            },
            RecipeDraft::from(&before)
        );
    }

    #[test]
    fn test_toggle_favorite_unknown_is_noop() {
        let mut store = new_store();
        store.add(draft("Soup", "Dinner")).unwrap();
        assert_eq!(store.toggle_favorite(&RecipeId::from("nope")).unwrap(), None);
        assert_eq!(store.favorite_count(), 0);
    }

    // --- categories ---

    #[test]
    fn test_add_category() {
        let mut store = new_store();
        assert!(store.add_category("  Brunch  ").unwrap());
        assert_eq!(store.categories().last().unwrap(), "Brunch");
        assert!(store.is_known_category("Brunch"));

        let raw = store.blobs().get(CATEGORIES_KEY).unwrap().unwrap();
        let persisted: Vec<String> = serde_json::from_str(&raw).unwrap();
        assert_eq!(persisted, store.categories());
    }

    #[test]
    fn test_add_category_duplicate_is_noop() {
        let mut store = new_store();
        let before = store.categories().to_vec();
        assert!(!store.add_category("Dessert").unwrap());
        assert_eq!(store.categories(), before.as_slice());
        // Nothing written for a rejected name
        assert!(store.blobs().get(CATEGORIES_KEY).unwrap().is_none());
    }

    #[test]
    fn test_add_category_is_case_sensitive() {
        let mut store = new_store();
        assert!(store.add_category("dessert").unwrap());
        assert_eq!(
            store.categories().iter().filter(|c| c.eq_ignore_ascii_case("dessert")).count(),
            2
        );
    }

    #[test]
    fn test_add_category_blank_is_noop() {
        let mut store = new_store();
        let before = store.categories().to_vec();
        assert!(!store.add_category("  ").unwrap());
        assert!(!store.add_category("").unwrap());
        assert_eq!(store.categories(), before.as_slice());
    }

    #[test]
    fn test_delete_category_does_not_cascade() {
        let mut store = new_store();
        store.add_category("Brunch").unwrap();
        let id = store.add(draft("Shakshuka", "Brunch")).unwrap();

        assert!(store.delete_category("Brunch").unwrap());
        assert!(!store.is_known_category("Brunch"));
        assert_eq!(store.get(&id).unwrap().category, "Brunch");

        let orphans = store.orphaned_recipes();
        assert_eq!(orphans.len(), 1);
        assert_eq!(orphans[0].id, id);
    }

    #[test]
    fn test_delete_builtin_category_allowed_in_store() {
        let mut store = new_store();
        assert!(store.delete_category("Snack").unwrap());
        assert!(!store.is_known_category("Snack"));
        assert!(!store.delete_category("Snack").unwrap());
    }

    #[test]
    fn test_deletable_categories_excludes_builtins() {
        let mut store = new_store();
        assert!(store.deletable_categories().is_empty());
        store.add_category("Brunch").unwrap();
        store.add_category("Holiday").unwrap();
        assert_eq!(store.deletable_categories(), vec!["Brunch", "Holiday"]);
    }

    // --- query ---

    #[test]
    fn test_query_scenario() {
        let mut store = new_store();
        store.add(draft("Apple Pie", "Dessert")).unwrap();
        let soup = store.add(draft("Apple Soup", "Dinner")).unwrap();
        store.toggle_favorite(&soup).unwrap();

        let titles = |q: &RecipeQuery| -> Vec<String> {
            store.query(q).iter().map(|r| r.title.clone()).collect()
        };

        let base = RecipeQuery::default().search("apple");
        assert_eq!(titles(&base), vec!["Apple Pie", "Apple Soup"]);
        assert_eq!(
            titles(&base.clone().favorites_only(true)),
            vec!["Apple Soup"]
        );
        assert_eq!(titles(&base.category("Dessert")), vec!["Apple Pie"]);
        assert_eq!(store.query(&RecipeQuery::default()).len(), 2);
    }

    // --- persistence ---

    #[test]
    fn test_reload_matches_memory_after_mutations() {
        let mut store = RecipeStore::load(SqliteBlobStore::open_in_memory().unwrap());
        let a = store.add(full_draft()).unwrap();
        let b = store.add(draft("Soup", "Dinner")).unwrap();
        store.add(draft("Salad", "Salads")).unwrap();
        store.toggle_favorite(&b).unwrap();
        let mut edit = RecipeDraft::from(store.get(&a).unwrap());
        edit.title = "Better Banana Bread".to_string();
        edit.add_ingredient();
        store.update(&a, edit).unwrap();
        store.delete(&b).unwrap();
        store.add_category("Brunch").unwrap();
        store.delete_category("Snack").unwrap();

        let recipes = store.recipes().to_vec();
        let categories = store.categories().to_vec();

        let reloaded = RecipeStore::load(store.into_blobs());
        assert_eq!(reloaded.recipes(), recipes.as_slice());
        assert_eq!(reloaded.categories(), categories.as_slice());
    }

    #[test]
    fn test_reload_via_borrowed_blob_store() {
        let mut blobs = MemoryBlobStore::new();
        {
            let mut store = RecipeStore::load(&mut blobs);
            store.add(draft("Tea", "Beverage")).unwrap();
        }
        let reloaded = RecipeStore::load(blobs);
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.recipes()[0].title, "Tea");
    }

    #[test]
    fn test_persistence_failure_is_surfaced_and_state_kept() {
        let mut store = RecipeStore::load(FailingBlobStore);
        let err = store.add(draft("Soup", "Dinner")).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Persistence {
                key: RECIPES_KEY,
                ..
            }
        ));
        assert_eq!(store.len(), 1);

        let err = store.add_category("Brunch").unwrap_err();
        assert!(matches!(
            err,
            StoreError::Persistence {
                key: CATEGORIES_KEY,
                ..
            }
        ));
        assert!(store.is_known_category("Brunch"));
    }

    #[test]
    fn test_validation_checked_before_persistence() {
        let mut store = RecipeStore::load(FailingBlobStore);
        assert!(store.add(draft(" ", "Dinner")).unwrap_err().is_validation());
        assert!(store.is_empty());
    }
}
