use uuid::Uuid;

use foodgram_domain::pagination::PageRequest;
use foodgram_domain::viewer::Viewer;

use crate::domain::repository::{
    RecipeRepository, SubscriptionRepository, UserRepository, ViewerRelationPort,
};
use crate::domain::types::{Membership, RecipeSummary, User};
use crate::error::RecipesServiceError;
use crate::usecase::projection::{ProfileView, project_profile};

/// A followed author with a preview of their recipes.
#[derive(Debug, Clone)]
pub struct SubscriptionView {
    pub author: ProfileView,
    pub recipes: Vec<RecipeSummary>,
    pub recipes_count: u64,
}

async fn subscription_view<R, V>(
    recipes: &R,
    relations: &V,
    author: User,
    viewer_id: Uuid,
    recipes_limit: Option<u64>,
) -> Result<SubscriptionView, RecipesServiceError>
where
    R: RecipeRepository,
    V: ViewerRelationPort,
{
    let author_id = author.id;
    let author = project_profile(relations, author, Viewer::User(viewer_id)).await?;
    let summaries = recipes.summaries_by_author(author_id, recipes_limit).await?;
    let recipes_count = recipes.count_by_author(author_id).await?;
    Ok(SubscriptionView {
        author,
        recipes: summaries,
        recipes_count,
    })
}

// ── Subscribe ────────────────────────────────────────────────────────────────

pub struct SubscribeUseCase<U, S, R, V>
where
    U: UserRepository,
    S: SubscriptionRepository,
    R: RecipeRepository,
    V: ViewerRelationPort,
{
    pub users: U,
    pub subscriptions: S,
    pub recipes: R,
    pub relations: V,
}

impl<U, S, R, V> SubscribeUseCase<U, S, R, V>
where
    U: UserRepository,
    S: SubscriptionRepository,
    R: RecipeRepository,
    V: ViewerRelationPort,
{
    pub async fn execute(
        &self,
        user_id: Uuid,
        author_id: Uuid,
        recipes_limit: Option<u64>,
    ) -> Result<SubscriptionView, RecipesServiceError> {
        let author = self
            .users
            .find_by_id(author_id)
            .await?
            .ok_or(RecipesServiceError::UserNotFound)?;
        if author_id == user_id {
            return Err(RecipesServiceError::SelfReferenceForbidden);
        }
        if self.subscriptions.exists(user_id, author_id).await? {
            return Err(RecipesServiceError::AlreadyExists(Membership::Subscription));
        }
        self.subscriptions.create(user_id, author_id).await?;
        tracing::info!(%user_id, %author_id, "subscribed");

        subscription_view(
            &self.recipes,
            &self.relations,
            author,
            user_id,
            recipes_limit,
        )
        .await
    }
}

// ── Unsubscribe ──────────────────────────────────────────────────────────────

pub struct UnsubscribeUseCase<U: UserRepository, S: SubscriptionRepository> {
    pub users: U,
    pub subscriptions: S,
}

impl<U: UserRepository, S: SubscriptionRepository> UnsubscribeUseCase<U, S> {
    pub async fn execute(&self, user_id: Uuid, author_id: Uuid) -> Result<(), RecipesServiceError> {
        if self.users.find_by_id(author_id).await?.is_none() {
            return Err(RecipesServiceError::UserNotFound);
        }
        if !self.subscriptions.delete(user_id, author_id).await? {
            return Err(RecipesServiceError::MembershipNotFound(
                Membership::Subscription,
            ));
        }
        tracing::info!(%user_id, %author_id, "unsubscribed");
        Ok(())
    }
}

// ── ListSubscriptions ────────────────────────────────────────────────────────

pub struct ListSubscriptionsUseCase<S, R, V>
where
    S: SubscriptionRepository,
    R: RecipeRepository,
    V: ViewerRelationPort,
{
    pub subscriptions: S,
    pub recipes: R,
    pub relations: V,
}

impl<S, R, V> ListSubscriptionsUseCase<S, R, V>
where
    S: SubscriptionRepository,
    R: RecipeRepository,
    V: ViewerRelationPort,
{
    pub async fn execute(
        &self,
        user_id: Uuid,
        page: PageRequest,
        recipes_limit: Option<u64>,
    ) -> Result<Vec<SubscriptionView>, RecipesServiceError> {
        let authors = self
            .subscriptions
            .list_authors(user_id, page.clamped())
            .await?;
        let mut views = Vec::with_capacity(authors.len());
        for author in authors {
            views.push(
                subscription_view(
                    &self.recipes,
                    &self.relations,
                    author,
                    user_id,
                    recipes_limit,
                )
                .await?,
            );
        }
        Ok(views)
    }
}
