use foodgram_domain::tag::normalize_hex_color;
use foodgram_domain::user::UserRole;

use crate::domain::repository::TagRepository;
use crate::domain::types::{NewTag, Tag};
use crate::domain::validation::validate_new_tag;
use crate::error::RecipesServiceError;

// ── ListTags ─────────────────────────────────────────────────────────────────

pub struct ListTagsUseCase<R: TagRepository> {
    pub repo: R,
}

impl<R: TagRepository> ListTagsUseCase<R> {
    pub async fn execute(&self) -> Result<Vec<Tag>, RecipesServiceError> {
        self.repo.list().await
    }
}

// ── GetTag ───────────────────────────────────────────────────────────────────

pub struct GetTagUseCase<R: TagRepository> {
    pub repo: R,
}

impl<R: TagRepository> GetTagUseCase<R> {
    pub async fn execute(&self, id: i32) -> Result<Tag, RecipesServiceError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(RecipesServiceError::TagNotFound)
    }
}

// ── CreateTag ────────────────────────────────────────────────────────────────

pub struct CreateTagUseCase<R: TagRepository> {
    pub repo: R,
}

impl<R: TagRepository> CreateTagUseCase<R> {
    pub async fn execute(
        &self,
        requester: UserRole,
        input: NewTag,
    ) -> Result<Tag, RecipesServiceError> {
        if !requester.is_admin() {
            return Err(RecipesServiceError::Forbidden);
        }
        let tag = NewTag {
            name: input.name.trim().to_owned(),
            color: input.color.trim().to_owned(),
            slug: input.slug.trim().to_owned(),
        };
        validate_new_tag(&tag)?;
        let tag = NewTag {
            color: normalize_hex_color(&tag.color),
            ..tag
        };
        let created = self.repo.create(&tag).await?;
        tracing::info!(tag_id = created.id, slug = %created.slug, "tag created");
        Ok(created)
    }
}
