use crate::models::RecipeId;

/// Errors returned by [`RecipeStore`](crate::store::RecipeStore) mutations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The draft was rejected before any state changed.
    #[error("{0}")]
    Validation(String),

    /// No recipe with this id exists.
    #[error("Recipe '{0}' not found")]
    NotFound(RecipeId),

    /// The snapshot write failed. The in-memory mutation has already been applied.
    #[error("Failed to persist '{key}'")]
    Persistence {
        key: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl StoreError {
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
