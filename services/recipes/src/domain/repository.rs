#![allow(async_fn_in_trait)]

use std::collections::HashSet;

use uuid::Uuid;

use foodgram_domain::pagination::PageRequest;

use crate::domain::types::{
    CartIngredientLine, ImagePayload, Ingredient, Membership, NewTag, Recipe, RecipeDraft,
    RecipeFilter, RecipePatch, RecipeSummary, Tag, User,
};
use crate::error::RecipesServiceError;

/// Repository for user profiles.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RecipesServiceError>;
    async fn list(&self, page: PageRequest) -> Result<Vec<User>, RecipesServiceError>;
    /// Fails with `UserAlreadyExists` on an id, email or username clash.
    async fn create(&self, user: &User) -> Result<(), RecipesServiceError>;
}

pub trait TagRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Tag>, RecipesServiceError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Tag>, RecipesServiceError>;
    /// Fails with `TagAlreadyExists` on a name or slug clash.
    async fn create(&self, tag: &NewTag) -> Result<Tag, RecipesServiceError>;
}

pub trait IngredientRepository: Send + Sync {
    /// Ordered by name. The prefix match is case-insensitive.
    async fn list(&self, name_prefix: Option<&str>) -> Result<Vec<Ingredient>, RecipesServiceError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Ingredient>, RecipesServiceError>;
    /// Returns the ingredient and whether it was created by this call.
    async fn get_or_create(
        &self,
        name: &str,
        measurement_unit: &str,
    ) -> Result<(Ingredient, bool), RecipesServiceError>;
}

/// Existence lookups the recipe composer validates references against.
pub trait CatalogQueryPort: Send + Sync {
    async fn existing_ingredient_ids(&self, ids: &[i32])
    -> Result<HashSet<i32>, RecipesServiceError>;
    async fn existing_tag_ids(&self, ids: &[i32]) -> Result<HashSet<i32>, RecipesServiceError>;
}

/// Repository for the recipe aggregate.
///
/// Writes touching more than one table run in a single transaction.
pub trait RecipeRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<Recipe>, RecipesServiceError>;
    async fn find_author_id(&self, id: i32) -> Result<Option<Uuid>, RecipesServiceError>;
    async fn find_summary(&self, id: i32) -> Result<Option<RecipeSummary>, RecipesServiceError>;
    /// Newest first.
    async fn list(
        &self,
        filter: &RecipeFilter,
        page: PageRequest,
    ) -> Result<Vec<Recipe>, RecipesServiceError>;
    /// Persists the recipe with its tags and ingredient amounts; returns the new id.
    ///
    /// `draft.image` must already be a stored image reference. Fails with
    /// `UserNotFound` when the author has no profile.
    async fn create(&self, author_id: Uuid, draft: &RecipeDraft)
    -> Result<i32, RecipesServiceError>;
    /// Writes present scalar fields and replaces present association sets.
    async fn update(&self, id: i32, patch: &RecipePatch) -> Result<(), RecipesServiceError>;
    /// Returns `true` if a row was deleted.
    async fn delete(&self, id: i32) -> Result<bool, RecipesServiceError>;
    /// Newest first, truncated to `limit` when given.
    async fn summaries_by_author(
        &self,
        author_id: Uuid,
        limit: Option<u64>,
    ) -> Result<Vec<RecipeSummary>, RecipesServiceError>;
    async fn count_by_author(&self, author_id: Uuid) -> Result<u64, RecipesServiceError>;
}

/// Viewer-relative existence checks used by projections.
pub trait ViewerRelationPort: Send + Sync {
    async fn is_subscribed(&self, user_id: Uuid, author_id: Uuid)
    -> Result<bool, RecipesServiceError>;
    async fn is_favorited(&self, user_id: Uuid, recipe_id: i32) -> Result<bool, RecipesServiceError>;
    async fn is_in_shopping_cart(
        &self,
        user_id: Uuid,
        recipe_id: i32,
    ) -> Result<bool, RecipesServiceError>;
}

pub trait SubscriptionRepository: Send + Sync {
    async fn exists(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, RecipesServiceError>;
    /// Fails with `AlreadyExists` when the pair is already stored.
    async fn create(&self, user_id: Uuid, author_id: Uuid) -> Result<(), RecipesServiceError>;
    /// Returns `true` if a row was deleted.
    async fn delete(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, RecipesServiceError>;
    /// Followed authors, most recent subscription first.
    async fn list_authors(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<User>, RecipesServiceError>;
}

/// A user-owned set of recipes: favorites or the shopping cart.
pub trait RecipeListRepository: Send + Sync {
    fn kind(&self) -> Membership;
    async fn contains(&self, user_id: Uuid, recipe_id: i32) -> Result<bool, RecipesServiceError>;
    /// Fails with `AlreadyExists` when the pair is already stored.
    async fn add(&self, user_id: Uuid, recipe_id: i32) -> Result<(), RecipesServiceError>;
    /// Returns `true` if a row was deleted.
    async fn remove(&self, user_id: Uuid, recipe_id: i32) -> Result<bool, RecipesServiceError>;
}

/// Ingredient lines of every recipe in a user's shopping cart.
pub trait ShoppingListSource: Send + Sync {
    async fn cart_ingredients(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<CartIngredientLine>, RecipesServiceError>;
}

/// Storage for decoded recipe images.
pub trait ImageStore: Send + Sync {
    /// Stores the image and returns its opaque reference.
    async fn save(&self, image: &ImagePayload) -> Result<String, RecipesServiceError>;
    /// Removes a stored image; an unknown reference is not an error.
    async fn delete(&self, reference: &str) -> Result<(), RecipesServiceError>;
}
