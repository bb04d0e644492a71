use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::domain::types::Membership;

/// Inclusive bounds rendered into validation messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min: i64,
    pub max: Option<i64>,
}

impl Bounds {
    pub const fn between(min: i64, max: i64) -> Self {
        Self {
            min,
            max: Some(max),
        }
    }

    pub const fn at_least(min: i64) -> Self {
        Self { min, max: None }
    }

    pub fn contains(&self, value: i64) -> bool {
        value >= self.min && self.max.is_none_or(|max| value <= max)
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) => write!(f, "between {} and {max}", self.min),
            None => write!(f, "at least {}", self.min),
        }
    }
}

/// Recipes service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum RecipesServiceError {
    #[error("{field} length must be {bounds}")]
    InvalidLength { field: &'static str, bounds: Bounds },
    #[error("{field} must not be empty")]
    EmptyCollection { field: &'static str },
    #[error("{field} references unknown id {id}")]
    UnknownReference { field: &'static str, id: i32 },
    #[error("{field} contains duplicate id {id}")]
    DuplicateReference { field: &'static str, id: i32 },
    #[error("{field} must be {bounds}")]
    OutOfRange { field: &'static str, bounds: Bounds },
    #[error("invalid {field} format")]
    InvalidFormat { field: &'static str },
    #[error("missing data")]
    MissingData,
    #[error("{0} already exists")]
    AlreadyExists(Membership),
    #[error("cannot subscribe to yourself")]
    SelfReferenceForbidden,
    #[error("authentication mismatch")]
    AuthenticationMismatch,
    #[error("user already exists")]
    UserAlreadyExists,
    #[error("tag already exists")]
    TagAlreadyExists,
    #[error("recipe not found")]
    RecipeNotFound,
    #[error("user not found")]
    UserNotFound,
    #[error("tag not found")]
    TagNotFound,
    #[error("ingredient not found")]
    IngredientNotFound,
    #[error("{0} not found")]
    MembershipNotFound(Membership),
    #[error("forbidden")]
    Forbidden,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl RecipesServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidLength { .. } => "INVALID_LENGTH",
            Self::EmptyCollection { .. } => "EMPTY_COLLECTION",
            Self::UnknownReference { .. } => "UNKNOWN_REFERENCE",
            Self::DuplicateReference { .. } => "DUPLICATE_REFERENCE",
            Self::OutOfRange { .. } => "OUT_OF_RANGE",
            Self::InvalidFormat { .. } => "INVALID_FORMAT",
            Self::MissingData => "MISSING_DATA",
            Self::AlreadyExists(_) => "ALREADY_EXISTS",
            Self::SelfReferenceForbidden => "SELF_REFERENCE_FORBIDDEN",
            Self::AuthenticationMismatch => "AUTHENTICATION_MISMATCH",
            Self::UserAlreadyExists => "USER_ALREADY_EXISTS",
            Self::TagAlreadyExists => "TAG_ALREADY_EXISTS",
            Self::RecipeNotFound => "RECIPE_NOT_FOUND",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::TagNotFound => "TAG_NOT_FOUND",
            Self::IngredientNotFound => "INGREDIENT_NOT_FOUND",
            Self::MembershipNotFound(_) => "MEMBERSHIP_NOT_FOUND",
            Self::Forbidden => "FORBIDDEN",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Request field the error is scoped to, if any.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::InvalidLength { field, .. }
            | Self::EmptyCollection { field }
            | Self::UnknownReference { field, .. }
            | Self::DuplicateReference { field, .. }
            | Self::OutOfRange { field, .. }
            | Self::InvalidFormat { field } => Some(*field),
            _ => None,
        }
    }
}

impl IntoResponse for RecipesServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::InvalidLength { .. }
            | Self::EmptyCollection { .. }
            | Self::UnknownReference { .. }
            | Self::DuplicateReference { .. }
            | Self::OutOfRange { .. }
            | Self::InvalidFormat { .. }
            | Self::MissingData
            | Self::AlreadyExists(_)
            | Self::SelfReferenceForbidden
            | Self::AuthenticationMismatch => StatusCode::BAD_REQUEST,
            Self::UserAlreadyExists | Self::TagAlreadyExists => StatusCode::CONFLICT,
            Self::RecipeNotFound
            | Self::UserNotFound
            | Self::TagNotFound
            | Self::IngredientNotFound
            | Self::MembershipNotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if let Self::Internal(ref e) = self {
            tracing::error!(error = ?e, kind = "INTERNAL", "internal error");
        }
        let mut body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        if let Some(field) = self.field() {
            body["field"] = serde_json::Value::from(field);
        }
        (status, axum::Json(body)).into_response()
    }
}
