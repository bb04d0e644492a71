use crate::domain::repository::IngredientRepository;
use crate::domain::types::Ingredient;
use crate::error::RecipesServiceError;

// ── ListIngredients ──────────────────────────────────────────────────────────

pub struct ListIngredientsUseCase<R: IngredientRepository> {
    pub repo: R,
}

impl<R: IngredientRepository> ListIngredientsUseCase<R> {
    pub async fn execute(
        &self,
        name_prefix: Option<&str>,
    ) -> Result<Vec<Ingredient>, RecipesServiceError> {
        let prefix = name_prefix.map(str::trim).filter(|p| !p.is_empty());
        self.repo.list(prefix).await
    }
}

// ── GetIngredient ────────────────────────────────────────────────────────────

pub struct GetIngredientUseCase<R: IngredientRepository> {
    pub repo: R,
}

impl<R: IngredientRepository> GetIngredientUseCase<R> {
    pub async fn execute(&self, id: i32) -> Result<Ingredient, RecipesServiceError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(RecipesServiceError::IngredientNotFound)
    }
}

// ── LoadIngredients ──────────────────────────────────────────────────────────

/// A `(name, measurement_unit)` pair read from an import file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientRow {
    pub name: String,
    pub measurement_unit: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub created: u64,
    pub total: u64,
}

/// Get-or-create per row; loading the same rows twice creates nothing new.
pub struct LoadIngredientsUseCase<R: IngredientRepository> {
    pub repo: R,
}

impl<R: IngredientRepository> LoadIngredientsUseCase<R> {
    pub async fn execute(&self, rows: Vec<IngredientRow>) -> Result<LoadReport, RecipesServiceError> {
        let mut report = LoadReport::default();
        for row in rows {
            let (_, created) = self
                .repo
                .get_or_create(row.name.trim(), row.measurement_unit.trim())
                .await?;
            report.total += 1;
            if created {
                report.created += 1;
            }
        }
        tracing::info!(created = report.created, total = report.total, "ingredients loaded");
        Ok(report)
    }
}
