use crate::catalog::ALL_CATEGORIES;
use crate::models::Recipe;

/// Browse filters for the recipe list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeQuery {
    /// Exact category name, or [`ALL_CATEGORIES`].
    pub category: String,
    /// Case-insensitive substring matched against title and description.
    pub search: String,
    pub favorites_only: bool,
}

impl Default for RecipeQuery {
    fn default() -> Self {
        Self {
            category: ALL_CATEGORIES.to_string(),
            search: String::new(),
            favorites_only: false,
        }
    }
}

impl RecipeQuery {
    #[must_use]
    pub fn category(mut self, category: &str) -> Self {
        category.clone_into(&mut self.category);
        self
    }

    #[must_use]
    pub fn search(mut self, search: &str) -> Self {
        search.clone_into(&mut self.search);
        self
    }

    #[must_use]
    pub fn favorites_only(mut self, favorites_only: bool) -> Self {
        self.favorites_only = favorites_only;
        self
    }

    /// Fall back to every category when the active one has just been removed.
    pub fn on_category_deleted(&mut self, name: &str) {
        if self.category == name {
            ALL_CATEGORIES.clone_into(&mut self.category);
        }
    }

    #[must_use]
    pub fn matches(&self, recipe: &Recipe) -> bool {
        self.matches_category(recipe) && self.matches_search(recipe) && self.matches_favorite(recipe)
    }

    fn matches_category(&self, recipe: &Recipe) -> bool {
        self.category == ALL_CATEGORIES || recipe.category == self.category
    }

    fn matches_search(&self, recipe: &Recipe) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        recipe.title.to_lowercase().contains(&needle)
            || recipe.description.to_lowercase().contains(&needle)
    }

    fn matches_favorite(&self, recipe: &Recipe) -> bool {
        !self.favorites_only || recipe.favorite
    }
}

/// Recipes matching `query`, in collection order.
#[must_use]
pub fn filter_recipes<'a>(recipes: &'a [Recipe], query: &RecipeQuery) -> Vec<&'a Recipe> {
    recipes.iter().filter(|r| query.matches(r)).collect()
}
