use uuid::Uuid;

use crate::domain::repository::{RecipeListRepository, RecipeRepository};
use crate::domain::types::RecipeSummary;
use crate::error::RecipesServiceError;

// ── AddToList ────────────────────────────────────────────────────────────────

/// Adds a recipe to a user-owned list (favorites or shopping cart).
pub struct AddToListUseCase<R: RecipeRepository, L: RecipeListRepository> {
    pub recipes: R,
    pub list: L,
}

impl<R: RecipeRepository, L: RecipeListRepository> AddToListUseCase<R, L> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        recipe_id: i32,
    ) -> Result<RecipeSummary, RecipesServiceError> {
        let summary = self
            .recipes
            .find_summary(recipe_id)
            .await?
            .ok_or(RecipesServiceError::RecipeNotFound)?;
        if self.list.contains(user_id, recipe_id).await? {
            return Err(RecipesServiceError::AlreadyExists(self.list.kind()));
        }
        self.list.add(user_id, recipe_id).await?;
        tracing::info!(%user_id, recipe_id, list = %self.list.kind(), "recipe added to list");
        Ok(summary)
    }
}

// ── RemoveFromList ───────────────────────────────────────────────────────────

pub struct RemoveFromListUseCase<R: RecipeRepository, L: RecipeListRepository> {
    pub recipes: R,
    pub list: L,
}

impl<R: RecipeRepository, L: RecipeListRepository> RemoveFromListUseCase<R, L> {
    pub async fn execute(&self, user_id: Uuid, recipe_id: i32) -> Result<(), RecipesServiceError> {
        if self.recipes.find_author_id(recipe_id).await?.is_none() {
            return Err(RecipesServiceError::RecipeNotFound);
        }
        if !self.list.remove(user_id, recipe_id).await? {
            return Err(RecipesServiceError::MembershipNotFound(self.list.kind()));
        }
        tracing::info!(%user_id, recipe_id, list = %self.list.kind(), "recipe removed from list");
        Ok(())
    }
}
