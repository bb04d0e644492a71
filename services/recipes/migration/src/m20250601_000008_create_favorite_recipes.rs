use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FavoriteRecipes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(FavoriteRecipes::UserId).uuid().not_null())
                    .col(ColumnDef::new(FavoriteRecipes::RecipeId).integer().not_null())
                    .col(
                        ColumnDef::new(FavoriteRecipes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .col(FavoriteRecipes::UserId)
                            .col(FavoriteRecipes::RecipeId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(FavoriteRecipes::Table, FavoriteRecipes::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(FavoriteRecipes::Table, FavoriteRecipes::RecipeId)
                            .to(Recipes::Table, Recipes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FavoriteRecipes::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum FavoriteRecipes {
    Table,
    UserId,
    RecipeId,
    CreatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}

#[derive(Iden)]
enum Recipes {
    Table,
    Id,
}
