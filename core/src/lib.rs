//! Recipe catalog core: the recipe and category data model, snapshot
//! persistence over a key-value blob store, and the browse/search query.

pub mod blob;
pub mod catalog;
pub mod error;
pub mod models;
pub mod query;
pub mod store;

pub use blob::{BlobStore, MemoryBlobStore, SqliteBlobStore};
pub use error::StoreError;
pub use models::{Ingredient, Recipe, RecipeDraft, RecipeId};
pub use query::{RecipeQuery, filter_recipes};
pub use store::RecipeStore;
