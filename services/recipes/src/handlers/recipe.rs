use axum::{
    Json,
    extract::{Path, RawQuery, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use foodgram_auth_types::identity::{IdentityHeaders, MaybeIdentity};
use foodgram_domain::pagination::PageRequest;

use crate::domain::types::{IngredientAmount, RecipeDraft, RecipePatch, RecipeSummary};
use crate::error::RecipesServiceError;
use crate::handlers::tag::TagResponse;
use crate::handlers::user::ProfileResponse;
use crate::handlers::{parse_query, query_flag};
use crate::state::AppState;
use crate::usecase::projection::{RecipeIngredientView, RecipeView};
use crate::usecase::recipe::{
    CreateRecipeUseCase, DeleteRecipeUseCase, GetRecipeUseCase, ListRecipesInput,
    ListRecipesUseCase, UpdateRecipeUseCase,
};

// ── Responses ────────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct RecipeIngredientResponse {
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

impl From<RecipeIngredientView> for RecipeIngredientResponse {
    fn from(view: RecipeIngredientView) -> Self {
        Self {
            id: view.id,
            name: view.name,
            measurement_unit: view.measurement_unit,
            amount: view.amount,
        }
    }
}

#[derive(Serialize)]
pub struct RecipeResponse {
    pub id: i32,
    pub tags: Vec<TagResponse>,
    pub author: ProfileResponse,
    pub ingredients: Vec<RecipeIngredientResponse>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i32,
    #[serde(serialize_with = "foodgram_core::serde::to_rfc3339_ms")]
    pub pub_date: DateTime<Utc>,
}

impl From<RecipeView> for RecipeResponse {
    fn from(view: RecipeView) -> Self {
        Self {
            id: view.id,
            tags: view.tags.into_iter().map(TagResponse::from).collect(),
            author: view.author.into(),
            ingredients: view
                .ingredients
                .into_iter()
                .map(RecipeIngredientResponse::from)
                .collect(),
            is_favorited: view.is_favorited,
            is_in_shopping_cart: view.is_in_shopping_cart,
            name: view.name,
            image: view.image,
            text: view.text,
            cooking_time: view.cooking_time,
            pub_date: view.pub_date,
        }
    }
}

/// Short form used by favorites, the cart and subscription previews.
#[derive(Serialize)]
pub struct RecipeSummaryResponse {
    pub id: i32,
    pub name: String,
    pub image: String,
    pub cooking_time: i32,
}

impl From<RecipeSummary> for RecipeSummaryResponse {
    fn from(summary: RecipeSummary) -> Self {
        Self {
            id: summary.id,
            name: summary.name,
            image: summary.image,
            cooking_time: summary.cooking_time,
        }
    }
}

// ── Requests ─────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct IngredientAmountRequest {
    pub id: i32,
    pub amount: i32,
}

impl From<IngredientAmountRequest> for IngredientAmount {
    fn from(line: IngredientAmountRequest) -> Self {
        Self {
            id: line.id,
            amount: line.amount,
        }
    }
}

/// Absent fields fall through to field-scoped validation errors.
#[derive(Deserialize, Default)]
#[serde(default)]
pub struct CreateRecipeRequest {
    pub ingredients: Vec<IngredientAmountRequest>,
    pub tags: Vec<i32>,
    pub image: String,
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct UpdateRecipeRequest {
    pub ingredients: Option<Vec<IngredientAmountRequest>>,
    pub tags: Option<Vec<i32>>,
    pub image: Option<String>,
    pub name: Option<String>,
    pub text: Option<String>,
    pub cooking_time: Option<i32>,
}

fn amounts(lines: Vec<IngredientAmountRequest>) -> Vec<IngredientAmount> {
    lines.into_iter().map(IngredientAmount::from).collect()
}

#[derive(Deserialize, Default)]
pub struct RecipeListQuery {
    pub page: Option<u32>,
    #[serde(rename = "per-page")]
    pub per_page: Option<u32>,
    pub author: Option<Uuid>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub is_favorited: Option<String>,
    pub is_in_shopping_cart: Option<String>,
}

/// `tags` may repeat as `tags=a&tags=b` or in bracket form.
fn list_input(raw_query: Option<&str>) -> Result<ListRecipesInput, RecipesServiceError> {
    let query: RecipeListQuery = parse_query(raw_query)?;
    Ok(ListRecipesInput {
        author: query.author,
        tag_slugs: query.tags.into_iter().filter(|slug| !slug.is_empty()).collect(),
        is_favorited: query_flag(query.is_favorited.as_deref()),
        is_in_shopping_cart: query_flag(query.is_in_shopping_cart.as_deref()),
        page: PageRequest::from_query(query.page, query.per_page),
    })
}

// ── GET /recipes ─────────────────────────────────────────────────────────────

pub async fn list_recipes(
    identity: MaybeIdentity,
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<Vec<RecipeResponse>>, RecipesServiceError> {
    let input = list_input(raw_query.as_deref())?;
    let usecase = ListRecipesUseCase {
        recipes: state.recipe_repo(),
        relations: state.relations(),
    };
    let views = usecase.execute(input, identity.viewer()).await?;
    Ok(Json(views.into_iter().map(RecipeResponse::from).collect()))
}

// ── POST /recipes ────────────────────────────────────────────────────────────

pub async fn create_recipe(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Json(body): Json<CreateRecipeRequest>,
) -> Result<(StatusCode, Json<RecipeResponse>), RecipesServiceError> {
    let usecase = CreateRecipeUseCase {
        recipes: state.recipe_repo(),
        catalog: state.catalog(),
        images: state.image_store(),
        relations: state.relations(),
    };
    let draft = RecipeDraft {
        name: body.name,
        image: body.image,
        text: body.text,
        cooking_time: body.cooking_time,
        tags: body.tags,
        ingredients: amounts(body.ingredients),
    };
    let view = usecase.execute(identity.user_id, draft).await?;
    Ok((StatusCode::CREATED, Json(view.into())))
}

// ── GET /recipes/{id} ────────────────────────────────────────────────────────

pub async fn get_recipe(
    identity: MaybeIdentity,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<RecipeResponse>, RecipesServiceError> {
    let usecase = GetRecipeUseCase {
        recipes: state.recipe_repo(),
        relations: state.relations(),
    };
    Ok(Json(usecase.execute(id, identity.viewer()).await?.into()))
}

// ── PATCH /recipes/{id} ──────────────────────────────────────────────────────

pub async fn update_recipe(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<UpdateRecipeRequest>,
) -> Result<Json<RecipeResponse>, RecipesServiceError> {
    let usecase = UpdateRecipeUseCase {
        recipes: state.recipe_repo(),
        catalog: state.catalog(),
        images: state.image_store(),
        relations: state.relations(),
    };
    let patch = RecipePatch {
        name: body.name,
        image: body.image,
        text: body.text,
        cooking_time: body.cooking_time,
        tags: body.tags,
        ingredients: body.ingredients.map(amounts),
    };
    let view = usecase.execute(identity.user_id, id, patch).await?;
    Ok(Json(view.into()))
}

// ── DELETE /recipes/{id} ─────────────────────────────────────────────────────

pub async fn delete_recipe(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, RecipesServiceError> {
    let usecase = DeleteRecipeUseCase {
        recipes: state.recipe_repo(),
        images: state.image_store(),
    };
    usecase.execute(identity.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
