use chrono::Utc;
use uuid::Uuid;

use foodgram_domain::pagination::PageRequest;
use foodgram_domain::user::UserRole;
use foodgram_domain::viewer::Viewer;

use crate::domain::repository::{UserRepository, ViewerRelationPort};
use crate::domain::types::User;
use crate::domain::validation::validate_profile;
use crate::error::RecipesServiceError;
use crate::usecase::projection::{ProfileView, project_profile};

// ── RegisterUser ─────────────────────────────────────────────────────────────

pub struct RegisterUserInput {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

/// Creates the profile of the gateway-authenticated identity.
pub struct RegisterUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> RegisterUserUseCase<R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        role: UserRole,
        input: RegisterUserInput,
    ) -> Result<ProfileView, RecipesServiceError> {
        let email = input.email.trim().to_owned();
        let username = input.username.trim().to_owned();
        validate_profile(&email, &username, &input.first_name, &input.last_name)?;
        if self.repo.find_by_id(user_id).await?.is_some() {
            return Err(RecipesServiceError::UserAlreadyExists);
        }
        let user = User {
            id: user_id,
            email,
            username,
            first_name: input.first_name.trim().to_owned(),
            last_name: input.last_name.trim().to_owned(),
            role: role.as_u8(),
            created_at: Utc::now(),
        };
        self.repo.create(&user).await?;
        tracing::info!(%user_id, username = %user.username, "user registered");
        Ok(ProfileView {
            id: user.id,
            email: user.email,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            is_subscribed: false,
        })
    }
}

// ── GetUser ──────────────────────────────────────────────────────────────────

pub struct GetUserUseCase<R: UserRepository, V: ViewerRelationPort> {
    pub repo: R,
    pub relations: V,
}

impl<R: UserRepository, V: ViewerRelationPort> GetUserUseCase<R, V> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        viewer: Viewer,
    ) -> Result<ProfileView, RecipesServiceError> {
        let user = self
            .repo
            .find_by_id(user_id)
            .await?
            .ok_or(RecipesServiceError::UserNotFound)?;
        project_profile(&self.relations, user, viewer).await
    }
}

// ── ListUsers ────────────────────────────────────────────────────────────────

pub struct ListUsersUseCase<R: UserRepository, V: ViewerRelationPort> {
    pub repo: R,
    pub relations: V,
}

impl<R: UserRepository, V: ViewerRelationPort> ListUsersUseCase<R, V> {
    pub async fn execute(
        &self,
        page: PageRequest,
        viewer: Viewer,
    ) -> Result<Vec<ProfileView>, RecipesServiceError> {
        let users = self.repo.list(page.clamped()).await?;
        let mut views = Vec::with_capacity(users.len());
        for user in users {
            views.push(project_profile(&self.relations, user, viewer).await?);
        }
        Ok(views)
    }
}
