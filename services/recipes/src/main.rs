use anyhow::Context;
use sea_orm::Database;
use tracing::info;

use foodgram_recipes::config::RecipesConfig;
use foodgram_recipes::router::build_router;
use foodgram_recipes::state::AppState;
use foodgram_recipes_migration::{Migrator, MigratorTrait};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    foodgram_core::tracing::init_tracing();

    let config = RecipesConfig::from_env()?;

    let db = Database::connect(&config.database_url)
        .await
        .context("failed to connect to database")?;

    if config.run_migrations {
        Migrator::up(&db, None)
            .await
            .context("failed to apply migrations")?;
        info!("migrations applied");
    }

    let state = AppState {
        db,
        media_root: config.media_root.clone(),
    };

    let router = build_router(state);
    let http_addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&http_addr)
        .await
        .with_context(|| format!("failed to bind {http_addr}"))?;

    info!("recipes service listening on {http_addr}");
    axum::serve(listener, router)
        .await
        .context("server error")?;
    Ok(())
}
