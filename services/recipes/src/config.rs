use std::path::PathBuf;

use anyhow::Context as _;

/// Recipes service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct RecipesConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// TCP port for the HTTP server (default 8000). Env var: `FOODGRAM_PORT`.
    pub port: u16,
    /// Directory recipe images are written under (default `media`). Env var: `MEDIA_ROOT`.
    pub media_root: PathBuf,
    /// Apply pending migrations at start-up. Env var: `RUN_MIGRATIONS`.
    pub run_migrations: bool,
}

impl RecipesConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;
        let port = match lookup("FOODGRAM_PORT") {
            Some(v) => v
                .parse()
                .with_context(|| format!("invalid FOODGRAM_PORT {v:?}"))?,
            None => 8000,
        };
        let media_root = lookup("MEDIA_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("media"));
        let run_migrations = lookup("RUN_MIGRATIONS")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        Ok(Self {
            database_url,
            port,
            media_root,
            run_migrations,
        })
    }
}
