use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// User profile. Identity itself is owned by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub role: u8,
    pub created_at: DateTime<Utc>,
}

/// Immutable ingredient reference data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingredient {
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub id: i32,
    pub name: String,
    pub color: String,
    pub slug: String,
}

#[derive(Debug, Clone)]
pub struct NewTag {
    pub name: String,
    pub color: String,
    pub slug: String,
}

/// One ingredient association of a stored recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeIngredient {
    pub ingredient: Ingredient,
    pub amount: i32,
}

/// Stored recipe aggregate with its author, tags and ingredient amounts.
#[derive(Debug, Clone)]
pub struct Recipe {
    pub id: i32,
    pub author: User,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i32,
    pub pub_date: DateTime<Utc>,
    pub tags: Vec<Tag>,
    pub ingredients: Vec<RecipeIngredient>,
}

impl Recipe {
    pub fn summary(&self) -> RecipeSummary {
        RecipeSummary {
            id: self.id,
            name: self.name.clone(),
            image: self.image.clone(),
            cooking_time: self.cooking_time,
        }
    }
}

/// Short recipe form used by favorites, cart and subscription listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeSummary {
    pub id: i32,
    pub name: String,
    pub image: String,
    pub cooking_time: i32,
}

/// Ingredient line of a recipe write request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngredientAmount {
    pub id: i32,
    pub amount: i32,
}

/// Full recipe write payload.
///
/// `image` holds the base64 payload on the way in and the stored image
/// reference once it reaches the repository.
#[derive(Debug, Clone)]
pub struct RecipeDraft {
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i32,
    pub tags: Vec<i32>,
    pub ingredients: Vec<IngredientAmount>,
}

/// Partial recipe update. Absent fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct RecipePatch {
    pub name: Option<String>,
    pub image: Option<String>,
    pub text: Option<String>,
    pub cooking_time: Option<i32>,
    pub tags: Option<Vec<i32>>,
    pub ingredients: Option<Vec<IngredientAmount>>,
}

impl RecipePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.image.is_none()
            && self.text.is_none()
            && self.cooking_time.is_none()
            && self.tags.is_none()
            && self.ingredients.is_none()
    }
}

/// Recipe list filters. Tag slugs match any.
#[derive(Debug, Clone, Default)]
pub struct RecipeFilter {
    pub author: Option<Uuid>,
    pub tag_slugs: Vec<String>,
    pub favorited_by: Option<Uuid>,
    pub in_cart_of: Option<Uuid>,
}

/// Decoded image ready for storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub extension: String,
    pub bytes: Vec<u8>,
}

/// User-owned relation kinds keyed by a (user, target) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Membership {
    Subscription,
    Favorite,
    ShoppingCart,
}

impl fmt::Display for Membership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Subscription => "subscription",
            Self::Favorite => "favorite",
            Self::ShoppingCart => "shopping cart entry",
        })
    }
}

/// Ingredient amount contributed by one recipe in a user's cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartIngredientLine {
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

/// Aggregated shopping-list entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingListItem {
    pub name: String,
    pub measurement_unit: String,
    pub total: i64,
}
