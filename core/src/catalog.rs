//! Fixed reference data: built-in categories, cook methods, and the
//! autocomplete lists for ingredients and measurements.

/// Pseudo-category that matches every recipe in a query.
pub const ALL_CATEGORIES: &str = "All";

/// Categories present on first run. Users cannot delete these through the CLI.
pub const BUILTIN_CATEGORIES: &[&str] = &[
    "Breakfast",
    "Lunch",
    "Dinner",
    "Dessert",
    "Snack",
    "Appetizer",
    "Beverage",
    "Salads",
    "Breads",
];

const CATEGORY_GLYPHS: &[(&str, &str)] = &[
    ("Breakfast", "🍳"),
    ("Lunch", "🥗"),
    ("Dinner", "🍽️"),
    ("Dessert", "🍰"),
    ("Snack", "🍿"),
    ("Appetizer", "🥨"),
    ("Beverage", "🥤"),
    ("Salads", "🥙"),
    ("Breads", "🍞"),
];

const ALL_GLYPH: &str = "🍽️";
const FALLBACK_GLYPH: &str = "🍴";

pub const COOK_METHODS: &[&str] = &[
    "Baked",
    "No-Bake",
    "Fried",
    "Grilled",
    "Steamed",
    "Slow Cooker",
    "Instant Pot",
    "Raw",
    "Roasted",
    "Boiled",
    "Sautéed",
    "Broiled",
];

pub const COMMON_INGREDIENTS: &[&str] = &[
    "All-purpose flour",
    "Sugar",
    "Brown sugar",
    "Powdered sugar",
    "Butter",
    "Olive oil",
    "Vegetable oil",
    "Eggs",
    "Milk",
    "Heavy cream",
    "Baking powder",
    "Baking soda",
    "Salt",
    "Black pepper",
    "Garlic",
    "Onion",
    "Chicken breast",
    "Ground beef",
    "Bacon",
    "Cheddar cheese",
    "Parmesan cheese",
    "Mozzarella",
    "Sour cream",
    "Cream cheese",
    "Tomatoes",
    "Bell peppers",
    "Mushrooms",
    "Spinach",
    "Broccoli",
    "Carrots",
    "Potatoes",
    "Rice",
    "Pasta",
    "Bread crumbs",
    "Honey",
    "Vanilla extract",
    "Cinnamon",
    "Paprika",
    "Cumin",
    "Oregano",
    "Basil",
    "Thyme",
    "Rosemary",
    "Soy sauce",
    "Worcestershire sauce",
    "Hot sauce",
    "Lemon juice",
    "Chicken broth",
    "Beef broth",
    "Cornstarch",
    "Yeast",
    "Coconut milk",
    "Apple cider vinegar",
    "Dijon mustard",
    "Mayonnaise",
];

pub const COMMON_MEASUREMENTS: &[&str] = &[
    "cup",
    "cups",
    "tablespoon",
    "tablespoons",
    "teaspoon",
    "teaspoons",
    "pound",
    "pounds",
    "ounce",
    "ounces",
    "gram",
    "grams",
    "kilogram",
    "liter",
    "milliliter",
    "pinch",
    "dash",
    "handful",
    "clove",
    "cloves",
    "slice",
    "slices",
    "can",
    "package",
    "bunch",
    "sprig",
    "to taste",
    "as needed",
];

/// Maximum number of autocomplete suggestions returned per lookup.
pub const MAX_SUGGESTIONS: usize = 8;

#[must_use]
pub fn is_builtin_category(name: &str) -> bool {
    BUILTIN_CATEGORIES.contains(&name)
}

/// Display glyph for a category. Custom and orphaned categories share a fallback.
#[must_use]
pub fn category_glyph(name: &str) -> &'static str {
    if name == ALL_CATEGORIES {
        return ALL_GLYPH;
    }
    CATEGORY_GLYPHS
        .iter()
        .find(|(cat, _)| *cat == name)
        .map_or(FALLBACK_GLYPH, |&(_, glyph)| glyph)
}

/// Ingredient names containing `query`. An empty query suggests nothing.
#[must_use]
pub fn suggest_ingredients(query: &str) -> Vec<&'static str> {
    if query.is_empty() {
        return Vec::new();
    }
    filter_suggestions(COMMON_INGREDIENTS, query)
}

/// Measurement units containing `query`. An empty query lists the first few units.
#[must_use]
pub fn suggest_measurements(query: &str) -> Vec<&'static str> {
    filter_suggestions(COMMON_MEASUREMENTS, query)
}

fn filter_suggestions(list: &[&'static str], query: &str) -> Vec<&'static str> {
    let needle = query.to_lowercase();
    list.iter()
        .filter(|item| item.to_lowercase().contains(&needle))
        .take(MAX_SUGGESTIONS)
        .copied()
        .collect()
}
