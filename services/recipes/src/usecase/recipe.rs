use uuid::Uuid;

use foodgram_domain::pagination::PageRequest;
use foodgram_domain::viewer::Viewer;

use crate::domain::repository::{CatalogQueryPort, ImageStore, RecipeRepository, ViewerRelationPort};
use crate::domain::types::{IngredientAmount, RecipeDraft, RecipeFilter, RecipePatch};
use crate::domain::validation::{validate_draft, validate_patch};
use crate::error::RecipesServiceError;
use crate::usecase::projection::{RecipeView, project_recipe, project_recipes};

fn ingredient_ids(lines: &[IngredientAmount]) -> Vec<i32> {
    lines.iter().map(|line| line.id).collect()
}

/// Best-effort removal of an image nothing points to any more.
async fn discard_image<S: ImageStore>(images: &S, reference: &str) {
    if let Err(err) = images.delete(reference).await {
        tracing::warn!(%reference, error = %err, "failed to remove image");
    }
}

// ── CreateRecipe ─────────────────────────────────────────────────────────────

pub struct CreateRecipeUseCase<R, C, S, V>
where
    R: RecipeRepository,
    C: CatalogQueryPort,
    S: ImageStore,
    V: ViewerRelationPort,
{
    pub recipes: R,
    pub catalog: C,
    pub images: S,
    pub relations: V,
}

impl<R, C, S, V> CreateRecipeUseCase<R, C, S, V>
where
    R: RecipeRepository,
    C: CatalogQueryPort,
    S: ImageStore,
    V: ViewerRelationPort,
{
    pub async fn execute(
        &self,
        author_id: Uuid,
        mut draft: RecipeDraft,
    ) -> Result<RecipeView, RecipesServiceError> {
        let known_ingredients = self
            .catalog
            .existing_ingredient_ids(&ingredient_ids(&draft.ingredients))
            .await?;
        let known_tags = self.catalog.existing_tag_ids(&draft.tags).await?;
        let image = validate_draft(&draft, &known_ingredients, &known_tags)?;

        draft.image = self.images.save(&image).await?;
        let recipe_id = match self.recipes.create(author_id, &draft).await {
            Ok(id) => id,
            Err(err) => {
                discard_image(&self.images, &draft.image).await;
                return Err(err);
            }
        };
        tracing::info!(recipe_id, %author_id, "recipe created");

        let recipe = self
            .recipes
            .find_by_id(recipe_id)
            .await?
            .ok_or(RecipesServiceError::RecipeNotFound)?;
        project_recipe(&self.relations, recipe, Viewer::User(author_id)).await
    }
}

// ── UpdateRecipe ─────────────────────────────────────────────────────────────

pub struct UpdateRecipeUseCase<R, C, S, V>
where
    R: RecipeRepository,
    C: CatalogQueryPort,
    S: ImageStore,
    V: ViewerRelationPort,
{
    pub recipes: R,
    pub catalog: C,
    pub images: S,
    pub relations: V,
}

impl<R, C, S, V> UpdateRecipeUseCase<R, C, S, V>
where
    R: RecipeRepository,
    C: CatalogQueryPort,
    S: ImageStore,
    V: ViewerRelationPort,
{
    pub async fn execute(
        &self,
        user_id: Uuid,
        recipe_id: i32,
        mut patch: RecipePatch,
    ) -> Result<RecipeView, RecipesServiceError> {
        let author_id = self
            .recipes
            .find_author_id(recipe_id)
            .await?
            .ok_or(RecipesServiceError::RecipeNotFound)?;
        if author_id != user_id {
            return Err(RecipesServiceError::Forbidden);
        }
        if patch.is_empty() {
            return Err(RecipesServiceError::MissingData);
        }

        let known_ingredients = match &patch.ingredients {
            Some(lines) => {
                self.catalog
                    .existing_ingredient_ids(&ingredient_ids(lines))
                    .await?
            }
            None => Default::default(),
        };
        let known_tags = match &patch.tags {
            Some(tags) => self.catalog.existing_tag_ids(tags).await?,
            None => Default::default(),
        };
        let mut superseded = None;
        if let Some(image) = validate_patch(&patch, &known_ingredients, &known_tags)? {
            superseded = self
                .recipes
                .find_summary(recipe_id)
                .await?
                .map(|summary| summary.image);
            patch.image = Some(self.images.save(&image).await?);
        }

        if let Err(err) = self.recipes.update(recipe_id, &patch).await {
            if let Some(stored) = &patch.image {
                discard_image(&self.images, stored).await;
            }
            return Err(err);
        }
        tracing::info!(recipe_id, %user_id, "recipe updated");
        if let Some(previous) = superseded {
            discard_image(&self.images, &previous).await;
        }

        let recipe = self
            .recipes
            .find_by_id(recipe_id)
            .await?
            .ok_or(RecipesServiceError::RecipeNotFound)?;
        project_recipe(&self.relations, recipe, Viewer::User(user_id)).await
    }
}

// ── GetRecipe ────────────────────────────────────────────────────────────────

pub struct GetRecipeUseCase<R: RecipeRepository, V: ViewerRelationPort> {
    pub recipes: R,
    pub relations: V,
}

impl<R: RecipeRepository, V: ViewerRelationPort> GetRecipeUseCase<R, V> {
    pub async fn execute(
        &self,
        recipe_id: i32,
        viewer: Viewer,
    ) -> Result<RecipeView, RecipesServiceError> {
        let recipe = self
            .recipes
            .find_by_id(recipe_id)
            .await?
            .ok_or(RecipesServiceError::RecipeNotFound)?;
        project_recipe(&self.relations, recipe, viewer).await
    }
}

// ── ListRecipes ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct ListRecipesInput {
    pub author: Option<Uuid>,
    pub tag_slugs: Vec<String>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub page: PageRequest,
}

pub struct ListRecipesUseCase<R: RecipeRepository, V: ViewerRelationPort> {
    pub recipes: R,
    pub relations: V,
}

impl<R: RecipeRepository, V: ViewerRelationPort> ListRecipesUseCase<R, V> {
    /// Membership filters are ignored for anonymous viewers.
    pub async fn execute(
        &self,
        input: ListRecipesInput,
        viewer: Viewer,
    ) -> Result<Vec<RecipeView>, RecipesServiceError> {
        let viewer_id = viewer.user_id();
        let filter = RecipeFilter {
            author: input.author,
            tag_slugs: input.tag_slugs,
            favorited_by: viewer_id.filter(|_| input.is_favorited),
            in_cart_of: viewer_id.filter(|_| input.is_in_shopping_cart),
        };
        let recipes = self.recipes.list(&filter, input.page.clamped()).await?;
        project_recipes(&self.relations, recipes, viewer).await
    }
}

// ── DeleteRecipe ─────────────────────────────────────────────────────────────

pub struct DeleteRecipeUseCase<R: RecipeRepository, S: ImageStore> {
    pub recipes: R,
    pub images: S,
}

impl<R: RecipeRepository, S: ImageStore> DeleteRecipeUseCase<R, S> {
    pub async fn execute(&self, user_id: Uuid, recipe_id: i32) -> Result<(), RecipesServiceError> {
        let author_id = self
            .recipes
            .find_author_id(recipe_id)
            .await?
            .ok_or(RecipesServiceError::RecipeNotFound)?;
        if author_id != user_id {
            return Err(RecipesServiceError::Forbidden);
        }
        let image = self
            .recipes
            .find_summary(recipe_id)
            .await?
            .map(|summary| summary.image);
        if !self.recipes.delete(recipe_id).await? {
            return Err(RecipesServiceError::RecipeNotFound);
        }
        tracing::info!(recipe_id, %user_id, "recipe deleted");
        if let Some(image) = image {
            discard_image(&self.images, &image).await;
        }
        Ok(())
    }
}
