use axum::{
    Json,
    extract::{Path, RawQuery, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use foodgram_auth_types::identity::IdentityHeaders;
use foodgram_domain::pagination::PageRequest;

use crate::error::RecipesServiceError;
use crate::handlers::parse_query;
use crate::handlers::recipe::RecipeSummaryResponse;
use crate::handlers::user::ProfileResponse;
use crate::state::AppState;
use crate::usecase::subscription::{
    ListSubscriptionsUseCase, SubscribeUseCase, SubscriptionView, UnsubscribeUseCase,
};

#[derive(Serialize)]
pub struct SubscriptionResponse {
    #[serde(flatten)]
    pub author: ProfileResponse,
    pub recipes: Vec<RecipeSummaryResponse>,
    pub recipes_count: u64,
}

impl From<SubscriptionView> for SubscriptionResponse {
    fn from(view: SubscriptionView) -> Self {
        Self {
            author: view.author.into(),
            recipes: view
                .recipes
                .into_iter()
                .map(RecipeSummaryResponse::from)
                .collect(),
            recipes_count: view.recipes_count,
        }
    }
}

#[derive(Deserialize, Default)]
pub struct SubscriptionQuery {
    pub page: Option<u32>,
    #[serde(rename = "per-page")]
    pub per_page: Option<u32>,
    pub recipes_limit: Option<u64>,
}

// ── GET /users/subscriptions ─────────────────────────────────────────────────

pub async fn list_subscriptions(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<Vec<SubscriptionResponse>>, RecipesServiceError> {
    let query: SubscriptionQuery = parse_query(raw_query.as_deref())?;
    let usecase = ListSubscriptionsUseCase {
        subscriptions: state.subscription_repo(),
        recipes: state.recipe_repo(),
        relations: state.relations(),
    };
    let views = usecase
        .execute(
            identity.user_id,
            PageRequest::from_query(query.page, query.per_page),
            query.recipes_limit,
        )
        .await?;
    Ok(Json(
        views.into_iter().map(SubscriptionResponse::from).collect(),
    ))
}

// ── POST /users/{id}/subscribe ───────────────────────────────────────────────

pub async fn subscribe(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(author_id): Path<Uuid>,
    RawQuery(raw_query): RawQuery,
) -> Result<(StatusCode, Json<SubscriptionResponse>), RecipesServiceError> {
    let query: SubscriptionQuery = parse_query(raw_query.as_deref())?;
    let usecase = SubscribeUseCase {
        users: state.user_repo(),
        subscriptions: state.subscription_repo(),
        recipes: state.recipe_repo(),
        relations: state.relations(),
    };
    let view = usecase
        .execute(identity.user_id, author_id, query.recipes_limit)
        .await?;
    Ok((StatusCode::CREATED, Json(view.into())))
}

// ── DELETE /users/{id}/subscribe ─────────────────────────────────────────────

pub async fn unsubscribe(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(author_id): Path<Uuid>,
) -> Result<StatusCode, RecipesServiceError> {
    let usecase = UnsubscribeUseCase {
        users: state.user_repo(),
        subscriptions: state.subscription_repo(),
    };
    usecase.execute(identity.user_id, author_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
