use serde::de::DeserializeOwned;

use crate::error::RecipesServiceError;

pub mod health;
pub mod ingredient;
pub mod membership;
pub mod recipe;
pub mod subscription;
pub mod tag;
pub mod user;

/// Repeated keys collect into a `Vec`; percent-encoded brackets are accepted.
const QUERY_CONFIG: serde_qs::Config = serde_qs::Config::new().use_form_encoding(true);

/// Parses a raw query string with `serde_qs`; a malformed query is `MissingData`.
pub(crate) fn parse_query<T: DeserializeOwned + Default>(
    raw: Option<&str>,
) -> Result<T, RecipesServiceError> {
    raw.filter(|q| !q.is_empty())
        .map(|q| QUERY_CONFIG.deserialize_str(q))
        .transpose()
        .map_err(|_| RecipesServiceError::MissingData)
        .map(Option::unwrap_or_default)
}

/// `1` and `true` enable a boolean query filter.
pub(crate) fn query_flag(value: Option<&str>) -> bool {
    matches!(value, Some("1" | "true"))
}
