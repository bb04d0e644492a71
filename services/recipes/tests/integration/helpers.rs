use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use foodgram_domain::pagination::PageRequest;
use foodgram_recipes::domain::repository::{
    CatalogQueryPort, ImageStore, IngredientRepository, RecipeListRepository, RecipeRepository,
    ShoppingListSource, SubscriptionRepository, TagRepository, UserRepository, ViewerRelationPort,
};
use foodgram_recipes::domain::types::{
    CartIngredientLine, ImagePayload, Ingredient, IngredientAmount, Membership, NewTag, Recipe,
    RecipeDraft, RecipeFilter, RecipeIngredient, RecipePatch, RecipeSummary, Tag, User,
};
use foodgram_recipes::error::RecipesServiceError;

/// Smallest payload the image decoder accepts: the PNG signature.
pub const PNG_IMAGE: &str = "data:image/png;base64,iVBORw0KGgo=";

pub fn test_user(username: &str) -> User {
    User {
        id: Uuid::now_v7(),
        email: format!("{username}@example.com"),
        username: username.to_owned(),
        first_name: "Test".to_owned(),
        last_name: "User".to_owned(),
        role: 0,
        created_at: Utc::now(),
    }
}

pub fn draft(name: &str, tags: Vec<i32>, ingredients: Vec<(i32, i32)>) -> RecipeDraft {
    RecipeDraft {
        name: name.to_owned(),
        image: PNG_IMAGE.to_owned(),
        text: "Mix everything and simmer.".to_owned(),
        cooking_time: 30,
        tags,
        ingredients: ingredients
            .into_iter()
            .map(|(id, amount)| IngredientAmount { id, amount })
            .collect(),
    }
}

// ── MemoryStore ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct StoredRecipe {
    pub id: i32,
    pub author_id: Uuid,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i32,
    pub pub_date: DateTime<Utc>,
    pub tags: Vec<i32>,
    pub ingredients: Vec<IngredientAmount>,
}

#[derive(Default)]
pub struct StoreState {
    pub users: Vec<User>,
    pub tags: Vec<Tag>,
    pub ingredients: Vec<Ingredient>,
    pub recipes: Vec<StoredRecipe>,
    pub subscriptions: Vec<(Uuid, Uuid)>,
    pub favorites: Vec<(Uuid, i32)>,
    pub carts: Vec<(Uuid, i32)>,
    /// Stored images by reference.
    pub images: BTreeMap<String, ImagePayload>,
    pub images_saved: usize,
    /// Makes `RecipeRepository::update` fail like a lost connection.
    pub fail_recipe_updates: bool,
    /// Number of viewer-relation lookups served.
    pub relation_lookups: usize,
}

impl StoreState {
    fn pairs(&mut self, kind: Membership) -> &mut Vec<(Uuid, i32)> {
        match kind {
            Membership::ShoppingCart => &mut self.carts,
            _ => &mut self.favorites,
        }
    }

    fn build(&self, stored: &StoredRecipe) -> Option<Recipe> {
        let author = self.users.iter().find(|u| u.id == stored.author_id)?.clone();
        let tags = stored
            .tags
            .iter()
            .filter_map(|id| self.tags.iter().find(|t| t.id == *id).cloned())
            .collect();
        let ingredients = stored
            .ingredients
            .iter()
            .filter_map(|line| {
                self.ingredients
                    .iter()
                    .find(|i| i.id == line.id)
                    .map(|ingredient| RecipeIngredient {
                        ingredient: ingredient.clone(),
                        amount: line.amount,
                    })
            })
            .collect();
        Some(Recipe {
            id: stored.id,
            author,
            name: stored.name.clone(),
            image: stored.image.clone(),
            text: stored.text.clone(),
            cooking_time: stored.cooking_time,
            pub_date: stored.pub_date,
            tags,
            ingredients,
        })
    }

    /// Newest first.
    fn recipes_newest_first(&self) -> Vec<&StoredRecipe> {
        let mut recipes: Vec<&StoredRecipe> = self.recipes.iter().collect();
        recipes.sort_by(|a, b| b.pub_date.cmp(&a.pub_date).then(b.id.cmp(&a.id)));
        recipes
    }
}

fn summary(stored: &StoredRecipe) -> RecipeSummary {
    RecipeSummary {
        id: stored.id,
        name: stored.name.clone(),
        image: stored.image.clone(),
        cooking_time: stored.cooking_time,
    }
}

fn paginate<T>(items: Vec<T>, page: PageRequest) -> Vec<T> {
    items
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.limit() as usize)
        .collect()
}

/// In-memory implementation of every repository port, sharing one state.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<StoreState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap()
    }

    pub fn add_user(&self, username: &str) -> User {
        let user = test_user(username);
        self.state().users.push(user.clone());
        user
    }

    pub fn add_tag(&self, id: i32, slug: &str) -> Tag {
        let tag = Tag {
            id,
            name: slug.to_uppercase(),
            color: "#49B64E".to_owned(),
            slug: slug.to_owned(),
        };
        self.state().tags.push(tag.clone());
        tag
    }

    pub fn add_ingredient(&self, id: i32, name: &str, unit: &str) -> Ingredient {
        let ingredient = Ingredient {
            id,
            name: name.to_owned(),
            measurement_unit: unit.to_owned(),
        };
        self.state().ingredients.push(ingredient.clone());
        ingredient
    }

    pub fn recipe(&self, id: i32) -> Option<StoredRecipe> {
        self.state().recipes.iter().find(|r| r.id == id).cloned()
    }

    pub fn favorites(&self) -> MemoryList {
        MemoryList {
            store: self.clone(),
            kind: Membership::Favorite,
        }
    }

    pub fn cart(&self) -> MemoryList {
        MemoryList {
            store: self.clone(),
            kind: Membership::ShoppingCart,
        }
    }
}

impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RecipesServiceError> {
        Ok(self.state().users.iter().find(|u| u.id == id).cloned())
    }

    async fn list(&self, page: PageRequest) -> Result<Vec<User>, RecipesServiceError> {
        let users = self.state().users.clone();
        Ok(paginate(users, page))
    }

    async fn create(&self, user: &User) -> Result<(), RecipesServiceError> {
        let mut state = self.state();
        if state.users.iter().any(|u| {
            u.id == user.id || u.email == user.email || u.username == user.username
        }) {
            return Err(RecipesServiceError::UserAlreadyExists);
        }
        state.users.push(user.clone());
        Ok(())
    }
}

impl TagRepository for MemoryStore {
    async fn list(&self) -> Result<Vec<Tag>, RecipesServiceError> {
        let mut tags = self.state().tags.clone();
        tags.sort_by_key(|t| t.id);
        Ok(tags)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Tag>, RecipesServiceError> {
        Ok(self.state().tags.iter().find(|t| t.id == id).cloned())
    }

    async fn create(&self, tag: &NewTag) -> Result<Tag, RecipesServiceError> {
        let mut state = self.state();
        if state
            .tags
            .iter()
            .any(|t| t.slug == tag.slug || t.name == tag.name)
        {
            return Err(RecipesServiceError::TagAlreadyExists);
        }
        let created = Tag {
            id: state.tags.iter().map(|t| t.id).max().unwrap_or(0) + 1,
            name: tag.name.clone(),
            color: tag.color.clone(),
            slug: tag.slug.clone(),
        };
        state.tags.push(created.clone());
        Ok(created)
    }
}

impl IngredientRepository for MemoryStore {
    async fn list(&self, name_prefix: Option<&str>) -> Result<Vec<Ingredient>, RecipesServiceError> {
        let prefix = name_prefix.map(str::to_lowercase);
        let mut ingredients: Vec<Ingredient> = self
            .state()
            .ingredients
            .iter()
            .filter(|i| {
                prefix
                    .as_deref()
                    .is_none_or(|p| i.name.to_lowercase().starts_with(p))
            })
            .cloned()
            .collect();
        ingredients.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(ingredients)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Ingredient>, RecipesServiceError> {
        Ok(self.state().ingredients.iter().find(|i| i.id == id).cloned())
    }

    async fn get_or_create(
        &self,
        name: &str,
        measurement_unit: &str,
    ) -> Result<(Ingredient, bool), RecipesServiceError> {
        let mut state = self.state();
        if let Some(existing) = state
            .ingredients
            .iter()
            .find(|i| i.name == name && i.measurement_unit == measurement_unit)
        {
            return Ok((existing.clone(), false));
        }
        let created = Ingredient {
            id: state.ingredients.iter().map(|i| i.id).max().unwrap_or(0) + 1,
            name: name.to_owned(),
            measurement_unit: measurement_unit.to_owned(),
        };
        state.ingredients.push(created.clone());
        Ok((created, true))
    }
}

impl CatalogQueryPort for MemoryStore {
    async fn existing_ingredient_ids(
        &self,
        ids: &[i32],
    ) -> Result<HashSet<i32>, RecipesServiceError> {
        let state = self.state();
        Ok(ids
            .iter()
            .copied()
            .filter(|id| state.ingredients.iter().any(|i| i.id == *id))
            .collect())
    }

    async fn existing_tag_ids(&self, ids: &[i32]) -> Result<HashSet<i32>, RecipesServiceError> {
        let state = self.state();
        Ok(ids
            .iter()
            .copied()
            .filter(|id| state.tags.iter().any(|t| t.id == *id))
            .collect())
    }
}

impl RecipeRepository for MemoryStore {
    async fn find_by_id(&self, id: i32) -> Result<Option<Recipe>, RecipesServiceError> {
        let state = self.state();
        Ok(state
            .recipes
            .iter()
            .find(|r| r.id == id)
            .and_then(|stored| state.build(stored)))
    }

    async fn find_author_id(&self, id: i32) -> Result<Option<Uuid>, RecipesServiceError> {
        Ok(self
            .state()
            .recipes
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.author_id))
    }

    async fn find_summary(&self, id: i32) -> Result<Option<RecipeSummary>, RecipesServiceError> {
        Ok(self.state().recipes.iter().find(|r| r.id == id).map(summary))
    }

    async fn list(
        &self,
        filter: &RecipeFilter,
        page: PageRequest,
    ) -> Result<Vec<Recipe>, RecipesServiceError> {
        let state = self.state();
        let matching: Vec<&StoredRecipe> = state
            .recipes_newest_first()
            .into_iter()
            .filter(|r| filter.author.is_none_or(|author| r.author_id == author))
            .filter(|r| {
                filter.tag_slugs.is_empty()
                    || r.tags.iter().any(|id| {
                        state
                            .tags
                            .iter()
                            .any(|t| t.id == *id && filter.tag_slugs.contains(&t.slug))
                    })
            })
            .filter(|r| {
                filter
                    .favorited_by
                    .is_none_or(|user| state.favorites.contains(&(user, r.id)))
            })
            .filter(|r| {
                filter
                    .in_cart_of
                    .is_none_or(|user| state.carts.contains(&(user, r.id)))
            })
            .collect();
        Ok(paginate(matching, page)
            .into_iter()
            .filter_map(|stored| state.build(stored))
            .collect())
    }

    async fn create(
        &self,
        author_id: Uuid,
        draft: &RecipeDraft,
    ) -> Result<i32, RecipesServiceError> {
        let mut state = self.state();
        if !state.users.iter().any(|u| u.id == author_id) {
            return Err(RecipesServiceError::UserNotFound);
        }
        let id = state.recipes.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        state.recipes.push(StoredRecipe {
            id,
            author_id,
            name: draft.name.clone(),
            image: draft.image.clone(),
            text: draft.text.clone(),
            cooking_time: draft.cooking_time,
            pub_date: Utc::now() + Duration::milliseconds(i64::from(id)),
            tags: draft.tags.clone(),
            ingredients: draft.ingredients.clone(),
        });
        Ok(id)
    }

    async fn update(&self, id: i32, patch: &RecipePatch) -> Result<(), RecipesServiceError> {
        let mut state = self.state();
        if state.fail_recipe_updates {
            return Err(anyhow::anyhow!("connection reset").into());
        }
        let stored = state
            .recipes
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(RecipesServiceError::RecipeNotFound)?;
        if let Some(name) = &patch.name {
            stored.name = name.clone();
        }
        if let Some(image) = &patch.image {
            stored.image = image.clone();
        }
        if let Some(text) = &patch.text {
            stored.text = text.clone();
        }
        if let Some(cooking_time) = patch.cooking_time {
            stored.cooking_time = cooking_time;
        }
        if let Some(tags) = &patch.tags {
            stored.tags = tags.clone();
        }
        if let Some(ingredients) = &patch.ingredients {
            stored.ingredients = ingredients.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: i32) -> Result<bool, RecipesServiceError> {
        let mut state = self.state();
        let before = state.recipes.len();
        state.recipes.retain(|r| r.id != id);
        state.favorites.retain(|(_, recipe)| *recipe != id);
        state.carts.retain(|(_, recipe)| *recipe != id);
        Ok(state.recipes.len() < before)
    }

    async fn summaries_by_author(
        &self,
        author_id: Uuid,
        limit: Option<u64>,
    ) -> Result<Vec<RecipeSummary>, RecipesServiceError> {
        let state = self.state();
        let limit = limit.map_or(usize::MAX, |l| l as usize);
        Ok(state
            .recipes_newest_first()
            .into_iter()
            .filter(|r| r.author_id == author_id)
            .take(limit)
            .map(summary)
            .collect())
    }

    async fn count_by_author(&self, author_id: Uuid) -> Result<u64, RecipesServiceError> {
        Ok(self
            .state()
            .recipes
            .iter()
            .filter(|r| r.author_id == author_id)
            .count() as u64)
    }
}

impl ViewerRelationPort for MemoryStore {
    async fn is_subscribed(
        &self,
        user_id: Uuid,
        author_id: Uuid,
    ) -> Result<bool, RecipesServiceError> {
        let mut state = self.state();
        state.relation_lookups += 1;
        Ok(state.subscriptions.contains(&(user_id, author_id)))
    }

    async fn is_favorited(&self, user_id: Uuid, recipe_id: i32) -> Result<bool, RecipesServiceError> {
        let mut state = self.state();
        state.relation_lookups += 1;
        Ok(state.favorites.contains(&(user_id, recipe_id)))
    }

    async fn is_in_shopping_cart(
        &self,
        user_id: Uuid,
        recipe_id: i32,
    ) -> Result<bool, RecipesServiceError> {
        let mut state = self.state();
        state.relation_lookups += 1;
        Ok(state.carts.contains(&(user_id, recipe_id)))
    }
}

impl SubscriptionRepository for MemoryStore {
    async fn exists(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, RecipesServiceError> {
        Ok(self.state().subscriptions.contains(&(user_id, author_id)))
    }

    async fn create(&self, user_id: Uuid, author_id: Uuid) -> Result<(), RecipesServiceError> {
        let mut state = self.state();
        if state.subscriptions.contains(&(user_id, author_id)) {
            return Err(RecipesServiceError::AlreadyExists(Membership::Subscription));
        }
        state.subscriptions.push((user_id, author_id));
        Ok(())
    }

    async fn delete(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, RecipesServiceError> {
        let mut state = self.state();
        let before = state.subscriptions.len();
        state.subscriptions.retain(|pair| *pair != (user_id, author_id));
        Ok(state.subscriptions.len() < before)
    }

    async fn list_authors(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<User>, RecipesServiceError> {
        let state = self.state();
        let authors: Vec<User> = state
            .subscriptions
            .iter()
            .rev()
            .filter(|(user, _)| *user == user_id)
            .filter_map(|(_, author)| state.users.iter().find(|u| u.id == *author).cloned())
            .collect();
        Ok(paginate(authors, page))
    }
}

impl ShoppingListSource for MemoryStore {
    async fn cart_ingredients(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<CartIngredientLine>, RecipesServiceError> {
        let state = self.state();
        let mut lines = Vec::new();
        for (_, recipe_id) in state.carts.iter().filter(|(user, _)| *user == user_id) {
            let Some(recipe) = state.recipes.iter().find(|r| r.id == *recipe_id) else {
                continue;
            };
            for line in &recipe.ingredients {
                if let Some(ingredient) = state.ingredients.iter().find(|i| i.id == line.id) {
                    lines.push(CartIngredientLine {
                        name: ingredient.name.clone(),
                        measurement_unit: ingredient.measurement_unit.clone(),
                        amount: line.amount,
                    });
                }
            }
        }
        Ok(lines)
    }
}

impl ImageStore for MemoryStore {
    async fn save(&self, image: &ImagePayload) -> Result<String, RecipesServiceError> {
        let mut state = self.state();
        state.images_saved += 1;
        let reference = format!(
            "recipes/images/{}.{}",
            state.images_saved, image.extension
        );
        state.images.insert(reference.clone(), image.clone());
        Ok(reference)
    }

    async fn delete(&self, reference: &str) -> Result<(), RecipesServiceError> {
        self.state().images.remove(reference);
        Ok(())
    }
}

// ── MemoryList ───────────────────────────────────────────────────────────────

/// Favorites or shopping cart view over a [`MemoryStore`].
pub struct MemoryList {
    store: MemoryStore,
    kind: Membership,
}

impl RecipeListRepository for MemoryList {
    fn kind(&self) -> Membership {
        self.kind
    }

    async fn contains(&self, user_id: Uuid, recipe_id: i32) -> Result<bool, RecipesServiceError> {
        let mut state = self.store.state();
        Ok(state.pairs(self.kind).contains(&(user_id, recipe_id)))
    }

    async fn add(&self, user_id: Uuid, recipe_id: i32) -> Result<(), RecipesServiceError> {
        let mut state = self.store.state();
        let pairs = state.pairs(self.kind);
        if pairs.contains(&(user_id, recipe_id)) {
            return Err(RecipesServiceError::AlreadyExists(self.kind));
        }
        pairs.push((user_id, recipe_id));
        Ok(())
    }

    async fn remove(&self, user_id: Uuid, recipe_id: i32) -> Result<bool, RecipesServiceError> {
        let mut state = self.store.state();
        let pairs = state.pairs(self.kind);
        let before = pairs.len();
        pairs.retain(|pair| *pair != (user_id, recipe_id));
        Ok(pairs.len() < before)
    }
}
