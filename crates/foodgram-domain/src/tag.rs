//! Tag domain rules.

/// Maximum length of a tag name and slug.
pub const MAX_TAG_LEN: usize = 200;

/// Slug rule: 1–200 chars of `[-a-zA-Z0-9_]`.
pub fn validate_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.len() <= MAX_TAG_LEN
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Colour rule: `#RGB` or `#RRGGBB` hex.
pub fn validate_hex_color(color: &str) -> bool {
    match color.strip_prefix('#') {
        Some(hex) => (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

/// Canonical stored form of a colour: upper-case hex.
pub fn normalize_hex_color(color: &str) -> String {
    color.to_ascii_uppercase()
}
