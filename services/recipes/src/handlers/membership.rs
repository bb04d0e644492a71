use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};

use foodgram_auth_types::identity::IdentityHeaders;

use crate::domain::repository::{RecipeListRepository, RecipeRepository};
use crate::error::RecipesServiceError;
use crate::handlers::recipe::RecipeSummaryResponse;
use crate::state::AppState;
use crate::usecase::membership::{AddToListUseCase, RemoveFromListUseCase};
use crate::usecase::shopping_list::{DownloadShoppingListUseCase, SHOPPING_LIST_FILENAME};

async fn add<R: RecipeRepository, L: RecipeListRepository>(
    recipes: R,
    list: L,
    identity: &IdentityHeaders,
    recipe_id: i32,
) -> Result<(StatusCode, Json<RecipeSummaryResponse>), RecipesServiceError> {
    let usecase = AddToListUseCase { recipes, list };
    let summary = usecase.execute(identity.user_id, recipe_id).await?;
    Ok((StatusCode::CREATED, Json(summary.into())))
}

async fn remove<R: RecipeRepository, L: RecipeListRepository>(
    recipes: R,
    list: L,
    identity: &IdentityHeaders,
    recipe_id: i32,
) -> Result<StatusCode, RecipesServiceError> {
    let usecase = RemoveFromListUseCase { recipes, list };
    usecase.execute(identity.user_id, recipe_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST|DELETE /recipes/{id}/favorite ───────────────────────────────────────

pub async fn add_favorite(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<(StatusCode, Json<RecipeSummaryResponse>), RecipesServiceError> {
    add(state.recipe_repo(), state.favorite_repo(), &identity, id).await
}

pub async fn remove_favorite(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, RecipesServiceError> {
    remove(state.recipe_repo(), state.favorite_repo(), &identity, id).await
}

// ── POST|DELETE /recipes/{id}/shopping_cart ──────────────────────────────────

pub async fn add_to_cart(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<(StatusCode, Json<RecipeSummaryResponse>), RecipesServiceError> {
    add(state.recipe_repo(), state.shopping_cart_repo(), &identity, id).await
}

pub async fn remove_from_cart(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, RecipesServiceError> {
    remove(state.recipe_repo(), state.shopping_cart_repo(), &identity, id).await
}

// ── GET /recipes/download_shopping_cart ──────────────────────────────────────

pub async fn download_shopping_cart(
    identity: IdentityHeaders,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, RecipesServiceError> {
    let usecase = DownloadShoppingListUseCase {
        cart: state.shopping_cart_repo(),
    };
    let body = usecase.execute(identity.user_id).await?;
    let disposition = format!("attachment; filename=\"{SHOPPING_LIST_FILENAME}\"");
    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_owned()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}
