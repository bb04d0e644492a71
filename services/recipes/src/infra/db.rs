use std::collections::{HashMap, HashSet};

use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait,
    ActiveValue::{Set, Unchanged},
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, SqlErr, TransactionError, TransactionTrait,
    sea_query::{Expr, Func, Query},
};
use uuid::Uuid;

use foodgram_domain::pagination::PageRequest;
use foodgram_recipes_schema::{
    favorite_recipes, ingredients, recipe_ingredients, recipe_tags, recipes, shopping_carts,
    subscriptions, tags, users,
};

use crate::domain::repository::{
    CatalogQueryPort, IngredientRepository, RecipeListRepository, RecipeRepository,
    ShoppingListSource, SubscriptionRepository, TagRepository, UserRepository, ViewerRelationPort,
};
use crate::domain::types::{
    CartIngredientLine, Ingredient, IngredientAmount, Membership, NewTag, Recipe, RecipeDraft,
    RecipeFilter, RecipeIngredient, RecipePatch, RecipeSummary, Tag, User,
};
use crate::error::RecipesServiceError;

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

fn is_foreign_key_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::ForeignKeyConstraintViolation(_)))
}

/// Maps a foreign-key violation raised while writing a recipe to the entity
/// that disappeared, keyed on the constraint names set by the migrations.
fn recipe_reference_error(message: &str) -> Option<RecipesServiceError> {
    if message.contains("fk_recipes_author") {
        Some(RecipesServiceError::UserNotFound)
    } else if message.contains("fk_recipe_tags_tag") {
        Some(RecipesServiceError::TagNotFound)
    } else if message.contains("fk_recipe_ingredients_ingredient") {
        Some(RecipesServiceError::IngredientNotFound)
    } else if message.contains("fk_recipe_tags_recipe")
        || message.contains("fk_recipe_ingredients_recipe")
    {
        Some(RecipesServiceError::RecipeNotFound)
    } else {
        None
    }
}

fn recipe_write_error(err: DbErr, context: &'static str) -> RecipesServiceError {
    if matches!(err, DbErr::RecordNotUpdated) {
        return RecipesServiceError::RecipeNotFound;
    }
    match err.sql_err() {
        Some(SqlErr::ForeignKeyConstraintViolation(message)) => {
            recipe_reference_error(&message).unwrap_or_else(|| internal(err, context))
        }
        _ => internal(err, context),
    }
}

fn flatten_txn(err: TransactionError<DbErr>) -> DbErr {
    match err {
        TransactionError::Connection(e) | TransactionError::Transaction(e) => e,
    }
}

fn internal(err: DbErr, context: &'static str) -> RecipesServiceError {
    anyhow::Error::new(err).context(context).into()
}

/// Escapes `LIKE` wildcards so user input matches literally.
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RecipesServiceError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model))
    }

    async fn list(&self, page: PageRequest) -> Result<Vec<User>, RecipesServiceError> {
        let models = users::Entity::find()
            .order_by_asc(users::Column::CreatedAt)
            .order_by_asc(users::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .context("list users")?;
        Ok(models.into_iter().map(user_from_model).collect())
    }

    async fn create(&self, user: &User) -> Result<(), RecipesServiceError> {
        let result = users::ActiveModel {
            id: Set(user.id),
            email: Set(user.email.clone()),
            username: Set(user.username.clone()),
            first_name: Set(user.first_name.clone()),
            last_name: Set(user.last_name.clone()),
            role: Set(i16::from(user.role)),
            created_at: Set(user.created_at),
        }
        .insert(&self.db)
        .await;
        match result {
            Ok(_) => Ok(()),
            Err(err) if is_unique_violation(&err) => Err(RecipesServiceError::UserAlreadyExists),
            Err(err) => Err(internal(err, "create user")),
        }
    }
}

fn user_from_model(model: users::Model) -> User {
    User {
        id: model.id,
        email: model.email,
        username: model.username,
        first_name: model.first_name,
        last_name: model.last_name,
        role: u8::try_from(model.role).unwrap_or_default(),
        created_at: model.created_at,
    }
}

// ── Tag repository ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbTagRepository {
    pub db: DatabaseConnection,
}

impl TagRepository for DbTagRepository {
    async fn list(&self) -> Result<Vec<Tag>, RecipesServiceError> {
        let models = tags::Entity::find()
            .order_by_asc(tags::Column::Id)
            .all(&self.db)
            .await
            .context("list tags")?;
        Ok(models.into_iter().map(tag_from_model).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Tag>, RecipesServiceError> {
        let model = tags::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find tag by id")?;
        Ok(model.map(tag_from_model))
    }

    async fn create(&self, tag: &NewTag) -> Result<Tag, RecipesServiceError> {
        let result = tags::ActiveModel {
            name: Set(tag.name.clone()),
            color: Set(tag.color.clone()),
            slug: Set(tag.slug.clone()),
            ..Default::default()
        }
        .insert(&self.db)
        .await;
        match result {
            Ok(model) => Ok(tag_from_model(model)),
            Err(err) if is_unique_violation(&err) => Err(RecipesServiceError::TagAlreadyExists),
            Err(err) => Err(internal(err, "create tag")),
        }
    }
}

fn tag_from_model(model: tags::Model) -> Tag {
    Tag {
        id: model.id,
        name: model.name,
        color: model.color,
        slug: model.slug,
    }
}

// ── Ingredient repository ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbIngredientRepository {
    pub db: DatabaseConnection,
}

impl DbIngredientRepository {
    async fn find_exact(
        &self,
        name: &str,
        measurement_unit: &str,
    ) -> Result<Option<ingredients::Model>, DbErr> {
        ingredients::Entity::find()
            .filter(ingredients::Column::Name.eq(name))
            .filter(ingredients::Column::MeasurementUnit.eq(measurement_unit))
            .one(&self.db)
            .await
    }
}

impl IngredientRepository for DbIngredientRepository {
    async fn list(&self, name_prefix: Option<&str>) -> Result<Vec<Ingredient>, RecipesServiceError> {
        let mut query = ingredients::Entity::find();
        if let Some(prefix) = name_prefix {
            let pattern = format!("{}%", escape_like(&prefix.to_lowercase()));
            query = query.filter(
                Expr::expr(Func::lower(Expr::col(ingredients::Column::Name))).like(pattern),
            );
        }
        let models = query
            .order_by_asc(ingredients::Column::Name)
            .order_by_asc(ingredients::Column::Id)
            .all(&self.db)
            .await
            .context("list ingredients")?;
        Ok(models.into_iter().map(ingredient_from_model).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Ingredient>, RecipesServiceError> {
        let model = ingredients::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find ingredient by id")?;
        Ok(model.map(ingredient_from_model))
    }

    async fn get_or_create(
        &self,
        name: &str,
        measurement_unit: &str,
    ) -> Result<(Ingredient, bool), RecipesServiceError> {
        if let Some(model) = self
            .find_exact(name, measurement_unit)
            .await
            .context("find ingredient by name and unit")?
        {
            return Ok((ingredient_from_model(model), false));
        }
        let result = ingredients::ActiveModel {
            name: Set(name.to_owned()),
            measurement_unit: Set(measurement_unit.to_owned()),
            ..Default::default()
        }
        .insert(&self.db)
        .await;
        match result {
            Ok(model) => Ok((ingredient_from_model(model), true)),
            // Lost a race with a concurrent loader.
            Err(err) if is_unique_violation(&err) => {
                let model = self
                    .find_exact(name, measurement_unit)
                    .await
                    .context("refetch ingredient after conflict")?
                    .context("ingredient missing after unique violation")?;
                Ok((ingredient_from_model(model), false))
            }
            Err(err) => Err(internal(err, "create ingredient")),
        }
    }
}

fn ingredient_from_model(model: ingredients::Model) -> Ingredient {
    Ingredient {
        id: model.id,
        name: model.name,
        measurement_unit: model.measurement_unit,
    }
}

// ── Catalog lookups ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbCatalog {
    pub db: DatabaseConnection,
}

impl CatalogQueryPort for DbCatalog {
    async fn existing_ingredient_ids(
        &self,
        ids: &[i32],
    ) -> Result<HashSet<i32>, RecipesServiceError> {
        if ids.is_empty() {
            return Ok(HashSet::new());
        }
        let found: Vec<i32> = ingredients::Entity::find()
            .select_only()
            .column(ingredients::Column::Id)
            .filter(ingredients::Column::Id.is_in(ids.iter().copied()))
            .into_tuple()
            .all(&self.db)
            .await
            .context("look up ingredient ids")?;
        Ok(found.into_iter().collect())
    }

    async fn existing_tag_ids(&self, ids: &[i32]) -> Result<HashSet<i32>, RecipesServiceError> {
        if ids.is_empty() {
            return Ok(HashSet::new());
        }
        let found: Vec<i32> = tags::Entity::find()
            .select_only()
            .column(tags::Column::Id)
            .filter(tags::Column::Id.is_in(ids.iter().copied()))
            .into_tuple()
            .all(&self.db)
            .await
            .context("look up tag ids")?;
        Ok(found.into_iter().collect())
    }
}

// ── Recipe repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbRecipeRepository {
    pub db: DatabaseConnection,
}

impl RecipeRepository for DbRecipeRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Recipe>, RecipesServiceError> {
        let Some(model) = recipes::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find recipe by id")?
        else {
            return Ok(None);
        };
        let mut loaded = load_recipes(&self.db, vec![model])
            .await
            .context("load recipe associations")?;
        Ok(loaded.pop())
    }

    async fn find_author_id(&self, id: i32) -> Result<Option<Uuid>, RecipesServiceError> {
        let author_id = recipes::Entity::find_by_id(id)
            .select_only()
            .column(recipes::Column::AuthorId)
            .into_tuple::<Uuid>()
            .one(&self.db)
            .await
            .context("find recipe author")?;
        Ok(author_id)
    }

    async fn find_summary(&self, id: i32) -> Result<Option<RecipeSummary>, RecipesServiceError> {
        let model = recipes::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find recipe summary")?;
        Ok(model.map(summary_from_model))
    }

    async fn list(
        &self,
        filter: &RecipeFilter,
        page: PageRequest,
    ) -> Result<Vec<Recipe>, RecipesServiceError> {
        let mut query = recipes::Entity::find();
        if let Some(author_id) = filter.author {
            query = query.filter(recipes::Column::AuthorId.eq(author_id));
        }
        if !filter.tag_slugs.is_empty() {
            query = query.filter(
                recipes::Column::Id.in_subquery(
                    Query::select()
                        .column((recipe_tags::Entity, recipe_tags::Column::RecipeId))
                        .from(recipe_tags::Entity)
                        .inner_join(
                            tags::Entity,
                            Expr::col((tags::Entity, tags::Column::Id))
                                .equals((recipe_tags::Entity, recipe_tags::Column::TagId)),
                        )
                        .and_where(
                            Expr::col((tags::Entity, tags::Column::Slug))
                                .is_in(filter.tag_slugs.iter().cloned()),
                        )
                        .to_owned(),
                ),
            );
        }
        if let Some(user_id) = filter.favorited_by {
            query = query.filter(
                recipes::Column::Id.in_subquery(
                    Query::select()
                        .column(favorite_recipes::Column::RecipeId)
                        .from(favorite_recipes::Entity)
                        .and_where(Expr::col(favorite_recipes::Column::UserId).eq(user_id))
                        .to_owned(),
                ),
            );
        }
        if let Some(user_id) = filter.in_cart_of {
            query = query.filter(
                recipes::Column::Id.in_subquery(
                    Query::select()
                        .column(shopping_carts::Column::RecipeId)
                        .from(shopping_carts::Entity)
                        .and_where(Expr::col(shopping_carts::Column::UserId).eq(user_id))
                        .to_owned(),
                ),
            );
        }
        let models = query
            .order_by_desc(recipes::Column::PubDate)
            .order_by_desc(recipes::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .context("list recipes")?;
        let recipes = load_recipes(&self.db, models)
            .await
            .context("load recipe associations")?;
        Ok(recipes)
    }

    async fn create(
        &self,
        author_id: Uuid,
        draft: &RecipeDraft,
    ) -> Result<i32, RecipesServiceError> {
        let draft = draft.clone();
        self.db
            .transaction::<_, i32, DbErr>(|txn| {
                Box::pin(async move {
                    let recipe = recipes::ActiveModel {
                        author_id: Set(author_id),
                        name: Set(draft.name),
                        image: Set(draft.image),
                        text: Set(draft.text),
                        cooking_time: Set(draft.cooking_time),
                        pub_date: Set(Utc::now()),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await?;
                    attach_tags(txn, recipe.id, &draft.tags).await?;
                    attach_ingredients(txn, recipe.id, &draft.ingredients).await?;
                    Ok(recipe.id)
                })
            })
            .await
            .map_err(flatten_txn)
            .map_err(|err| recipe_write_error(err, "create recipe"))
    }

    async fn update(&self, id: i32, patch: &RecipePatch) -> Result<(), RecipesServiceError> {
        let patch = patch.clone();
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                Box::pin(async move {
                    let mut recipe = recipes::ActiveModel {
                        id: Unchanged(id),
                        ..Default::default()
                    };
                    if let Some(name) = patch.name {
                        recipe.name = Set(name);
                    }
                    if let Some(image) = patch.image {
                        recipe.image = Set(image);
                    }
                    if let Some(text) = patch.text {
                        recipe.text = Set(text);
                    }
                    if let Some(cooking_time) = patch.cooking_time {
                        recipe.cooking_time = Set(cooking_time);
                    }
                    if recipe.is_changed() {
                        recipe.update(txn).await?;
                    }
                    if let Some(tag_ids) = patch.tags {
                        recipe_tags::Entity::delete_many()
                            .filter(recipe_tags::Column::RecipeId.eq(id))
                            .exec(txn)
                            .await?;
                        attach_tags(txn, id, &tag_ids).await?;
                    }
                    if let Some(lines) = patch.ingredients {
                        recipe_ingredients::Entity::delete_many()
                            .filter(recipe_ingredients::Column::RecipeId.eq(id))
                            .exec(txn)
                            .await?;
                        attach_ingredients(txn, id, &lines).await?;
                    }
                    Ok(())
                })
            })
            .await
            .map_err(flatten_txn)
            .map_err(|err| recipe_write_error(err, "update recipe"))
    }

    async fn delete(&self, id: i32) -> Result<bool, RecipesServiceError> {
        let result = recipes::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete recipe")?;
        Ok(result.rows_affected > 0)
    }

    async fn summaries_by_author(
        &self,
        author_id: Uuid,
        limit: Option<u64>,
    ) -> Result<Vec<RecipeSummary>, RecipesServiceError> {
        let mut query = recipes::Entity::find()
            .filter(recipes::Column::AuthorId.eq(author_id))
            .order_by_desc(recipes::Column::PubDate)
            .order_by_desc(recipes::Column::Id);
        if let Some(limit) = limit {
            query = query.limit(limit);
        }
        let models = query
            .all(&self.db)
            .await
            .context("list recipe summaries by author")?;
        Ok(models.into_iter().map(summary_from_model).collect())
    }

    async fn count_by_author(&self, author_id: Uuid) -> Result<u64, RecipesServiceError> {
        let count = recipes::Entity::find()
            .filter(recipes::Column::AuthorId.eq(author_id))
            .count(&self.db)
            .await
            .context("count recipes by author")?;
        Ok(count)
    }
}

async fn attach_tags<C: ConnectionTrait>(
    conn: &C,
    recipe_id: i32,
    tag_ids: &[i32],
) -> Result<(), DbErr> {
    if tag_ids.is_empty() {
        return Ok(());
    }
    recipe_tags::Entity::insert_many(tag_ids.iter().map(|&tag_id| recipe_tags::ActiveModel {
        recipe_id: Set(recipe_id),
        tag_id: Set(tag_id),
    }))
    .exec_without_returning(conn)
    .await?;
    Ok(())
}

async fn attach_ingredients<C: ConnectionTrait>(
    conn: &C,
    recipe_id: i32,
    lines: &[IngredientAmount],
) -> Result<(), DbErr> {
    if lines.is_empty() {
        return Ok(());
    }
    recipe_ingredients::Entity::insert_many(lines.iter().map(|line| {
        recipe_ingredients::ActiveModel {
            recipe_id: Set(recipe_id),
            ingredient_id: Set(line.id),
            amount: Set(line.amount),
        }
    }))
    .exec_without_returning(conn)
    .await?;
    Ok(())
}

/// Batch-loads authors, tags and ingredient amounts for the given rows,
/// preserving their order.
async fn load_recipes<C: ConnectionTrait>(
    conn: &C,
    models: Vec<recipes::Model>,
) -> Result<Vec<Recipe>, DbErr> {
    if models.is_empty() {
        return Ok(Vec::new());
    }
    let recipe_ids: Vec<i32> = models.iter().map(|m| m.id).collect();
    let author_ids: HashSet<Uuid> = models.iter().map(|m| m.author_id).collect();

    let authors: HashMap<Uuid, User> = users::Entity::find()
        .filter(users::Column::Id.is_in(author_ids))
        .all(conn)
        .await?
        .into_iter()
        .map(|m| (m.id, user_from_model(m)))
        .collect();

    let tag_links = recipe_tags::Entity::find()
        .filter(recipe_tags::Column::RecipeId.is_in(recipe_ids.iter().copied()))
        .order_by_asc(recipe_tags::Column::TagId)
        .all(conn)
        .await?;
    let tag_ids: HashSet<i32> = tag_links.iter().map(|l| l.tag_id).collect();
    let tags_by_id: HashMap<i32, Tag> = tags::Entity::find()
        .filter(tags::Column::Id.is_in(tag_ids))
        .all(conn)
        .await?
        .into_iter()
        .map(|m| (m.id, tag_from_model(m)))
        .collect();

    let ingredient_links = recipe_ingredients::Entity::find()
        .filter(recipe_ingredients::Column::RecipeId.is_in(recipe_ids.iter().copied()))
        .order_by_asc(recipe_ingredients::Column::IngredientId)
        .all(conn)
        .await?;
    let ingredient_ids: HashSet<i32> = ingredient_links.iter().map(|l| l.ingredient_id).collect();
    let ingredients_by_id: HashMap<i32, Ingredient> = ingredients::Entity::find()
        .filter(ingredients::Column::Id.is_in(ingredient_ids))
        .all(conn)
        .await?
        .into_iter()
        .map(|m| (m.id, ingredient_from_model(m)))
        .collect();

    let mut tags_by_recipe: HashMap<i32, Vec<Tag>> = HashMap::new();
    for link in tag_links {
        if let Some(tag) = tags_by_id.get(&link.tag_id) {
            tags_by_recipe
                .entry(link.recipe_id)
                .or_default()
                .push(tag.clone());
        }
    }
    let mut ingredients_by_recipe: HashMap<i32, Vec<RecipeIngredient>> = HashMap::new();
    for link in ingredient_links {
        if let Some(ingredient) = ingredients_by_id.get(&link.ingredient_id) {
            ingredients_by_recipe
                .entry(link.recipe_id)
                .or_default()
                .push(RecipeIngredient {
                    ingredient: ingredient.clone(),
                    amount: link.amount,
                });
        }
    }

    let mut loaded = Vec::with_capacity(models.len());
    for model in models {
        let author = authors.get(&model.author_id).cloned().ok_or_else(|| {
            DbErr::RecordNotFound(format!("author {} of recipe {}", model.author_id, model.id))
        })?;
        loaded.push(Recipe {
            id: model.id,
            author,
            tags: tags_by_recipe.remove(&model.id).unwrap_or_default(),
            ingredients: ingredients_by_recipe.remove(&model.id).unwrap_or_default(),
            name: model.name,
            image: model.image,
            text: model.text,
            cooking_time: model.cooking_time,
            pub_date: model.pub_date,
        });
    }
    Ok(loaded)
}

fn summary_from_model(model: recipes::Model) -> RecipeSummary {
    RecipeSummary {
        id: model.id,
        name: model.name,
        image: model.image,
        cooking_time: model.cooking_time,
    }
}

// ── Viewer relations ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbViewerRelations {
    pub db: DatabaseConnection,
}

impl ViewerRelationPort for DbViewerRelations {
    async fn is_subscribed(
        &self,
        user_id: Uuid,
        author_id: Uuid,
    ) -> Result<bool, RecipesServiceError> {
        let found = subscriptions::Entity::find_by_id((user_id, author_id))
            .one(&self.db)
            .await
            .context("check subscription")?;
        Ok(found.is_some())
    }

    async fn is_favorited(&self, user_id: Uuid, recipe_id: i32) -> Result<bool, RecipesServiceError> {
        let found = favorite_recipes::Entity::find_by_id((user_id, recipe_id))
            .one(&self.db)
            .await
            .context("check favorite")?;
        Ok(found.is_some())
    }

    async fn is_in_shopping_cart(
        &self,
        user_id: Uuid,
        recipe_id: i32,
    ) -> Result<bool, RecipesServiceError> {
        let found = shopping_carts::Entity::find_by_id((user_id, recipe_id))
            .one(&self.db)
            .await
            .context("check shopping cart")?;
        Ok(found.is_some())
    }
}

// ── Subscription repository ──────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbSubscriptionRepository {
    pub db: DatabaseConnection,
}

impl SubscriptionRepository for DbSubscriptionRepository {
    async fn exists(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, RecipesServiceError> {
        let found = subscriptions::Entity::find_by_id((user_id, author_id))
            .one(&self.db)
            .await
            .context("find subscription")?;
        Ok(found.is_some())
    }

    async fn create(&self, user_id: Uuid, author_id: Uuid) -> Result<(), RecipesServiceError> {
        let result = subscriptions::ActiveModel {
            user_id: Set(user_id),
            author_id: Set(author_id),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await;
        match result {
            Ok(_) => Ok(()),
            Err(err) if is_unique_violation(&err) => {
                Err(RecipesServiceError::AlreadyExists(Membership::Subscription))
            }
            Err(err) if is_foreign_key_violation(&err) => Err(RecipesServiceError::UserNotFound),
            Err(err) => Err(internal(err, "create subscription")),
        }
    }

    async fn delete(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, RecipesServiceError> {
        let result = subscriptions::Entity::delete_by_id((user_id, author_id))
            .exec(&self.db)
            .await
            .context("delete subscription")?;
        Ok(result.rows_affected > 0)
    }

    async fn list_authors(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<User>, RecipesServiceError> {
        let links = subscriptions::Entity::find()
            .filter(subscriptions::Column::UserId.eq(user_id))
            .order_by_desc(subscriptions::Column::CreatedAt)
            .order_by_desc(subscriptions::Column::AuthorId)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .context("list subscriptions")?;
        if links.is_empty() {
            return Ok(Vec::new());
        }
        let mut authors: HashMap<Uuid, User> = users::Entity::find()
            .filter(users::Column::Id.is_in(links.iter().map(|l| l.author_id)))
            .all(&self.db)
            .await
            .context("load subscribed authors")?
            .into_iter()
            .map(|m| (m.id, user_from_model(m)))
            .collect();
        Ok(links
            .into_iter()
            .filter_map(|link| authors.remove(&link.author_id))
            .collect())
    }
}

// ── Favorites ────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbFavoriteRepository {
    pub db: DatabaseConnection,
}

impl RecipeListRepository for DbFavoriteRepository {
    fn kind(&self) -> Membership {
        Membership::Favorite
    }

    async fn contains(&self, user_id: Uuid, recipe_id: i32) -> Result<bool, RecipesServiceError> {
        let found = favorite_recipes::Entity::find_by_id((user_id, recipe_id))
            .one(&self.db)
            .await
            .context("find favorite")?;
        Ok(found.is_some())
    }

    async fn add(&self, user_id: Uuid, recipe_id: i32) -> Result<(), RecipesServiceError> {
        let result = favorite_recipes::ActiveModel {
            user_id: Set(user_id),
            recipe_id: Set(recipe_id),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await;
        match result {
            Ok(_) => Ok(()),
            Err(err) if is_unique_violation(&err) => {
                Err(RecipesServiceError::AlreadyExists(Membership::Favorite))
            }
            Err(err) if is_foreign_key_violation(&err) => Err(RecipesServiceError::UserNotFound),
            Err(err) => Err(internal(err, "add favorite")),
        }
    }

    async fn remove(&self, user_id: Uuid, recipe_id: i32) -> Result<bool, RecipesServiceError> {
        let result = favorite_recipes::Entity::delete_by_id((user_id, recipe_id))
            .exec(&self.db)
            .await
            .context("remove favorite")?;
        Ok(result.rows_affected > 0)
    }
}

// ── Shopping cart ────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbShoppingCartRepository {
    pub db: DatabaseConnection,
}

impl RecipeListRepository for DbShoppingCartRepository {
    fn kind(&self) -> Membership {
        Membership::ShoppingCart
    }

    async fn contains(&self, user_id: Uuid, recipe_id: i32) -> Result<bool, RecipesServiceError> {
        let found = shopping_carts::Entity::find_by_id((user_id, recipe_id))
            .one(&self.db)
            .await
            .context("find shopping cart entry")?;
        Ok(found.is_some())
    }

    async fn add(&self, user_id: Uuid, recipe_id: i32) -> Result<(), RecipesServiceError> {
        let result = shopping_carts::ActiveModel {
            user_id: Set(user_id),
            recipe_id: Set(recipe_id),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await;
        match result {
            Ok(_) => Ok(()),
            Err(err) if is_unique_violation(&err) => {
                Err(RecipesServiceError::AlreadyExists(Membership::ShoppingCart))
            }
            Err(err) if is_foreign_key_violation(&err) => Err(RecipesServiceError::UserNotFound),
            Err(err) => Err(internal(err, "add shopping cart entry")),
        }
    }

    async fn remove(&self, user_id: Uuid, recipe_id: i32) -> Result<bool, RecipesServiceError> {
        let result = shopping_carts::Entity::delete_by_id((user_id, recipe_id))
            .exec(&self.db)
            .await
            .context("remove shopping cart entry")?;
        Ok(result.rows_affected > 0)
    }
}

impl ShoppingListSource for DbShoppingCartRepository {
    async fn cart_ingredients(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<CartIngredientLine>, RecipesServiceError> {
        let recipe_ids: Vec<i32> = shopping_carts::Entity::find()
            .select_only()
            .column(shopping_carts::Column::RecipeId)
            .filter(shopping_carts::Column::UserId.eq(user_id))
            .into_tuple()
            .all(&self.db)
            .await
            .context("list shopping cart recipes")?;
        if recipe_ids.is_empty() {
            return Ok(Vec::new());
        }
        let links = recipe_ingredients::Entity::find()
            .filter(recipe_ingredients::Column::RecipeId.is_in(recipe_ids))
            .all(&self.db)
            .await
            .context("list shopping cart ingredients")?;
        let ingredient_ids: HashSet<i32> = links.iter().map(|l| l.ingredient_id).collect();
        let ingredients_by_id: HashMap<i32, ingredients::Model> = ingredients::Entity::find()
            .filter(ingredients::Column::Id.is_in(ingredient_ids))
            .all(&self.db)
            .await
            .context("load shopping cart ingredient names")?
            .into_iter()
            .map(|m| (m.id, m))
            .collect();
        Ok(links
            .into_iter()
            .filter_map(|link| {
                ingredients_by_id
                    .get(&link.ingredient_id)
                    .map(|ingredient| CartIngredientLine {
                        name: ingredient.name.clone(),
                        measurement_unit: ingredient.measurement_unit.clone(),
                        amount: link.amount,
                    })
            })
            .collect())
    }
}
