use axum::{
    Json,
    extract::{Path, RawQuery, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use foodgram_auth_types::identity::{IdentityHeaders, MaybeIdentity};
use foodgram_domain::pagination::PageRequest;

use crate::error::RecipesServiceError;
use crate::handlers::parse_query;
use crate::state::AppState;
use crate::usecase::projection::ProfileView;
use crate::usecase::user::{GetUserUseCase, ListUsersUseCase, RegisterUserInput, RegisterUserUseCase};

#[derive(Serialize)]
pub struct ProfileResponse {
    pub email: String,
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
}

impl From<ProfileView> for ProfileResponse {
    fn from(view: ProfileView) -> Self {
        Self {
            email: view.email,
            id: view.id,
            username: view.username,
            first_name: view.first_name,
            last_name: view.last_name,
            is_subscribed: view.is_subscribed,
        }
    }
}

#[derive(Deserialize, Default)]
pub struct PageQuery {
    pub page: Option<u32>,
    #[serde(rename = "per-page")]
    pub per_page: Option<u32>,
}

impl PageQuery {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::from_query(self.page, self.per_page)
    }
}

// ── POST /users ──────────────────────────────────────────────────────────────

/// Absent fields fall through to field-scoped validation errors.
#[derive(Deserialize, Default)]
#[serde(default)]
pub struct RegisterUserRequest {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

pub async fn register_user(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Json(body): Json<RegisterUserRequest>,
) -> Result<(StatusCode, Json<ProfileResponse>), RecipesServiceError> {
    let usecase = RegisterUserUseCase {
        repo: state.user_repo(),
    };
    let profile = usecase
        .execute(
            identity.user_id,
            identity.role(),
            RegisterUserInput {
                email: body.email,
                username: body.username,
                first_name: body.first_name,
                last_name: body.last_name,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(profile.into())))
}

// ── GET /users ───────────────────────────────────────────────────────────────

pub async fn list_users(
    identity: MaybeIdentity,
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<Vec<ProfileResponse>>, RecipesServiceError> {
    let query: PageQuery = parse_query(raw_query.as_deref())?;
    let usecase = ListUsersUseCase {
        repo: state.user_repo(),
        relations: state.relations(),
    };
    let profiles = usecase
        .execute(query.page_request(), identity.viewer())
        .await?;
    Ok(Json(profiles.into_iter().map(ProfileResponse::from).collect()))
}

// ── GET /users/me ────────────────────────────────────────────────────────────

pub async fn get_me(
    identity: IdentityHeaders,
    State(state): State<AppState>,
) -> Result<Json<ProfileResponse>, RecipesServiceError> {
    let usecase = GetUserUseCase {
        repo: state.user_repo(),
        relations: state.relations(),
    };
    let profile = usecase
        .execute(identity.user_id, identity.viewer())
        .await?;
    Ok(Json(profile.into()))
}

// ── GET /users/{id} ──────────────────────────────────────────────────────────

pub async fn get_user(
    identity: MaybeIdentity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProfileResponse>, RecipesServiceError> {
    let usecase = GetUserUseCase {
        repo: state.user_repo(),
        relations: state.relations(),
    };
    Ok(Json(usecase.execute(id, identity.viewer()).await?.into()))
}
