//! Read-side shaping of stored aggregates for a given viewer.
//!
//! Viewer-relative flags are resolved through [`ViewerRelationPort`]; an
//! anonymous viewer never triggers a lookup.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use foodgram_domain::viewer::Viewer;

use crate::domain::repository::ViewerRelationPort;
use crate::domain::types::{Recipe, Tag, User};
use crate::error::RecipesServiceError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileView {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeIngredientView {
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

#[derive(Debug, Clone)]
pub struct RecipeView {
    pub id: i32,
    pub tags: Vec<Tag>,
    pub author: ProfileView,
    pub ingredients: Vec<RecipeIngredientView>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i32,
    pub pub_date: DateTime<Utc>,
}

pub async fn project_profile<V: ViewerRelationPort>(
    relations: &V,
    user: User,
    viewer: Viewer,
) -> Result<ProfileView, RecipesServiceError> {
    let is_subscribed = match viewer {
        Viewer::User(id) if id != user.id => relations.is_subscribed(id, user.id).await?,
        _ => false,
    };
    Ok(ProfileView {
        id: user.id,
        email: user.email,
        username: user.username,
        first_name: user.first_name,
        last_name: user.last_name,
        is_subscribed,
    })
}

pub async fn project_recipe<V: ViewerRelationPort>(
    relations: &V,
    recipe: Recipe,
    viewer: Viewer,
) -> Result<RecipeView, RecipesServiceError> {
    let (is_favorited, is_in_shopping_cart) = match viewer {
        Viewer::User(id) => (
            relations.is_favorited(id, recipe.id).await?,
            relations.is_in_shopping_cart(id, recipe.id).await?,
        ),
        Viewer::Anonymous => (false, false),
    };
    let author = project_profile(relations, recipe.author, viewer).await?;
    let ingredients = recipe
        .ingredients
        .into_iter()
        .map(|line| RecipeIngredientView {
            id: line.ingredient.id,
            name: line.ingredient.name,
            measurement_unit: line.ingredient.measurement_unit,
            amount: line.amount,
        })
        .collect();
    Ok(RecipeView {
        id: recipe.id,
        tags: recipe.tags,
        author,
        ingredients,
        is_favorited,
        is_in_shopping_cart,
        name: recipe.name,
        image: recipe.image,
        text: recipe.text,
        cooking_time: recipe.cooking_time,
        pub_date: recipe.pub_date,
    })
}

pub async fn project_recipes<V: ViewerRelationPort>(
    relations: &V,
    recipes: Vec<Recipe>,
    viewer: Viewer,
) -> Result<Vec<RecipeView>, RecipesServiceError> {
    let mut views = Vec::with_capacity(recipes.len());
    for recipe in recipes {
        views.push(project_recipe(relations, recipe, viewer).await?);
    }
    Ok(views)
}
