use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::error::StoreError;

/// Opaque recipe identifier. Assigned once at creation and never reused.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RecipeId(String);

impl RecipeId {
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecipeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RecipeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

// Older snapshots stored creation timestamps as JSON numbers.
impl<'de> Deserialize<'de> for RecipeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match TextOrNumber::deserialize(deserializer)? {
            TextOrNumber::Text(s) => Self(s),
            TextOrNumber::Number(n) => Self(n.to_string()),
        })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Number(serde_json::Number),
}

fn text_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Option::<TextOrNumber>::deserialize(deserializer)? {
        Some(TextOrNumber::Text(s)) => s,
        Some(TextOrNumber::Number(n)) => n.to_string(),
        None => String::new(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Ingredient {
    #[serde(default, deserialize_with = "text_or_number")]
    pub amount: String,
    #[serde(default)]
    pub measurement: String,
    #[serde(default)]
    pub ingredient: String,
}

impl Ingredient {
    /// A blank form row, pre-set to the most common unit.
    #[must_use]
    pub fn blank() -> Self {
        Self {
            amount: String::new(),
            measurement: DEFAULT_MEASUREMENT.to_string(),
            ingredient: String::new(),
        }
    }

    #[must_use]
    pub fn new(amount: &str, measurement: &str, ingredient: &str) -> Self {
        Self {
            amount: amount.to_string(),
            measurement: measurement.to_string(),
            ingredient: ingredient.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngredientField {
    Amount,
    Measurement,
    Ingredient,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: RecipeId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub cook_method: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub cook_time: String,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub instructions: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub favorite: bool,
}

impl Recipe {
    /// Build a stored recipe from a draft, keeping `id`.
    #[must_use]
    pub fn from_draft(id: RecipeId, draft: RecipeDraft) -> Self {
        let RecipeDraft {
            title,
            description,
            category,
            cook_method,
            cook_time,
            ingredients,
            instructions,
            notes,
            favorite,
        } = draft;
        Self {
            id,
            title,
            description,
            category,
            cook_method,
            cook_time,
            ingredients,
            instructions,
            notes,
            favorite,
        }
    }
}

pub const DEFAULT_CATEGORY: &str = "Dinner";
pub const DEFAULT_COOK_METHOD: &str = "Baked";
pub const DEFAULT_MEASUREMENT: &str = "cup";

/// Editable recipe contents: every field of [`Recipe`] except its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDraft {
    pub title: String,
    pub description: String,
    pub category: String,
    pub cook_method: String,
    pub cook_time: String,
    pub ingredients: Vec<Ingredient>,
    pub instructions: String,
    pub notes: String,
    pub favorite: bool,
}

impl Default for RecipeDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            category: DEFAULT_CATEGORY.to_string(),
            cook_method: DEFAULT_COOK_METHOD.to_string(),
            cook_time: String::new(),
            ingredients: vec![Ingredient::blank()],
            instructions: String::new(),
            notes: String::new(),
            favorite: false,
        }
    }
}

impl From<&Recipe> for RecipeDraft {
    fn from(recipe: &Recipe) -> Self {
        Self {
            title: recipe.title.clone(),
            description: recipe.description.clone(),
            category: recipe.category.clone(),
            cook_method: recipe.cook_method.clone(),
            cook_time: recipe.cook_time.clone(),
            ingredients: recipe.ingredients.clone(),
            instructions: recipe.instructions.clone(),
            notes: recipe.notes.clone(),
            favorite: recipe.favorite,
        }
    }
}

impl RecipeDraft {
    #[must_use]
    pub fn titled(title: &str) -> Self {
        Self {
            title: title.to_string(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), StoreError> {
        validate_title(&self.title)
    }

    pub fn add_ingredient(&mut self) {
        self.ingredients.push(Ingredient::blank());
    }

    /// Remove the row at `index`. Out-of-range indexes are ignored.
    pub fn remove_ingredient(&mut self, index: usize) {
        if index < self.ingredients.len() {
            self.ingredients.remove(index);
        }
    }

    /// Returns false when `index` is out of range.
    pub fn set_ingredient_field(
        &mut self,
        index: usize,
        field: IngredientField,
        value: &str,
    ) -> bool {
        let Some(row) = self.ingredients.get_mut(index) else {
            return false;
        };
        let slot = match field {
            IngredientField::Amount => &mut row.amount,
            IngredientField::Measurement => &mut row.measurement,
            IngredientField::Ingredient => &mut row.ingredient,
        };
        value.clone_into(slot);
        true
    }
}

pub fn validate_title(title: &str) -> Result<(), StoreError> {
    if title.trim().is_empty() {
        return Err(StoreError::Validation("Please enter a recipe title".to_string()));
    }
    Ok(())
}
