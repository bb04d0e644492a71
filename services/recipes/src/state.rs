use std::path::PathBuf;

use sea_orm::DatabaseConnection;

use crate::infra::db::{
    DbCatalog, DbFavoriteRepository, DbIngredientRepository, DbRecipeRepository,
    DbShoppingCartRepository, DbSubscriptionRepository, DbTagRepository, DbUserRepository,
    DbViewerRelations,
};
use crate::infra::image::FsImageStore;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub media_root: PathBuf,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn tag_repo(&self) -> DbTagRepository {
        DbTagRepository {
            db: self.db.clone(),
        }
    }

    pub fn ingredient_repo(&self) -> DbIngredientRepository {
        DbIngredientRepository {
            db: self.db.clone(),
        }
    }

    pub fn catalog(&self) -> DbCatalog {
        DbCatalog {
            db: self.db.clone(),
        }
    }

    pub fn recipe_repo(&self) -> DbRecipeRepository {
        DbRecipeRepository {
            db: self.db.clone(),
        }
    }

    pub fn relations(&self) -> DbViewerRelations {
        DbViewerRelations {
            db: self.db.clone(),
        }
    }

    pub fn subscription_repo(&self) -> DbSubscriptionRepository {
        DbSubscriptionRepository {
            db: self.db.clone(),
        }
    }

    pub fn favorite_repo(&self) -> DbFavoriteRepository {
        DbFavoriteRepository {
            db: self.db.clone(),
        }
    }

    pub fn shopping_cart_repo(&self) -> DbShoppingCartRepository {
        DbShoppingCartRepository {
            db: self.db.clone(),
        }
    }

    pub fn image_store(&self) -> FsImageStore {
        FsImageStore {
            media_root: self.media_root.clone(),
        }
    }
}
