//! Pure field validators for recipe, tag and profile writes.
//!
//! Each validator returns the first failure it finds. Reference checks take
//! the set of ids known to exist so callers can batch the lookups.

use std::collections::HashSet;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use foodgram_domain::tag::{MAX_TAG_LEN, validate_hex_color, validate_slug};
use foodgram_domain::user::{MAX_EMAIL_LEN, MAX_NAME_LEN, validate_email, validate_username};

use crate::domain::types::{ImagePayload, IngredientAmount, NewTag, RecipeDraft, RecipePatch};
use crate::error::{Bounds, RecipesServiceError};

pub const RECIPE_NAME_LEN: Bounds = Bounds::between(4, 200);
pub const COOKING_TIME: Bounds = Bounds::between(1, 300);
pub const INGREDIENT_AMOUNT: Bounds = Bounds::at_least(1);
pub const TEXT_LEN: Bounds = Bounds::at_least(1);
pub const TAG_NAME_LEN: Bounds = Bounds::between(1, MAX_TAG_LEN as i64);
pub const PROFILE_NAME_LEN: Bounds = Bounds::between(1, MAX_NAME_LEN as i64);

const MAX_IMAGE_EXTENSION_LEN: usize = 10;

fn char_len(value: &str) -> i64 {
    value.chars().count() as i64
}

fn check_length(field: &'static str, value: &str, bounds: Bounds) -> Result<(), RecipesServiceError> {
    if bounds.contains(char_len(value)) {
        Ok(())
    } else {
        Err(RecipesServiceError::InvalidLength { field, bounds })
    }
}

// ── Recipe fields ────────────────────────────────────────────────────────────

pub fn validate_recipe_name(name: &str) -> Result<(), RecipesServiceError> {
    check_length("name", name, RECIPE_NAME_LEN)
}

/// Checks entries in order: existence, amount, then repetition.
pub fn validate_ingredients(
    ingredients: &[IngredientAmount],
    known: &HashSet<i32>,
) -> Result<(), RecipesServiceError> {
    const FIELD: &str = "ingredients";
    if ingredients.is_empty() {
        return Err(RecipesServiceError::EmptyCollection { field: FIELD });
    }
    let mut seen = HashSet::with_capacity(ingredients.len());
    for line in ingredients {
        if !known.contains(&line.id) {
            return Err(RecipesServiceError::UnknownReference {
                field: FIELD,
                id: line.id,
            });
        }
        if !INGREDIENT_AMOUNT.contains(i64::from(line.amount)) {
            return Err(RecipesServiceError::OutOfRange {
                field: "amount",
                bounds: INGREDIENT_AMOUNT,
            });
        }
        if !seen.insert(line.id) {
            return Err(RecipesServiceError::DuplicateReference {
                field: FIELD,
                id: line.id,
            });
        }
    }
    Ok(())
}

pub fn validate_tags(tags: &[i32], known: &HashSet<i32>) -> Result<(), RecipesServiceError> {
    const FIELD: &str = "tags";
    if tags.is_empty() {
        return Err(RecipesServiceError::EmptyCollection { field: FIELD });
    }
    let mut seen = HashSet::with_capacity(tags.len());
    if let Some(&id) = tags.iter().find(|id| !seen.insert(**id)) {
        return Err(RecipesServiceError::DuplicateReference { field: FIELD, id });
    }
    if let Some(&id) = tags.iter().find(|id| !known.contains(*id)) {
        return Err(RecipesServiceError::UnknownReference { field: FIELD, id });
    }
    Ok(())
}

pub fn validate_cooking_time(cooking_time: i32) -> Result<(), RecipesServiceError> {
    if COOKING_TIME.contains(i64::from(cooking_time)) {
        Ok(())
    } else {
        Err(RecipesServiceError::OutOfRange {
            field: "cooking_time",
            bounds: COOKING_TIME,
        })
    }
}

pub fn validate_text(text: &str) -> Result<(), RecipesServiceError> {
    check_length("text", text.trim(), TEXT_LEN)
}

/// Decodes `data:image/<ext>;base64,<data>` or a bare base64 payload.
///
/// Bare payloads must carry a recognisable PNG, JPEG, GIF or WebP signature.
pub fn decode_image_payload(raw: &str) -> Result<ImagePayload, RecipesServiceError> {
    let invalid = || RecipesServiceError::InvalidFormat { field: "image" };
    let raw = raw.trim();

    let (declared, data) = match raw.strip_prefix("data:") {
        Some(rest) => {
            let (header, data) = rest.split_once(',').ok_or_else(invalid)?;
            let extension = header
                .strip_prefix("image/")
                .and_then(|h| h.strip_suffix(";base64"))
                .ok_or_else(invalid)?;
            if extension.is_empty()
                || extension.len() > MAX_IMAGE_EXTENSION_LEN
                || !extension.chars().all(|c| c.is_ascii_alphanumeric())
            {
                return Err(invalid());
            }
            (Some(extension.to_ascii_lowercase()), data)
        }
        None => (None, raw),
    };

    let bytes = STANDARD.decode(data.trim()).map_err(|_| invalid())?;
    if bytes.is_empty() {
        return Err(invalid());
    }
    let extension = match declared {
        Some(extension) => extension,
        None => sniff_extension(&bytes).ok_or_else(invalid)?.to_owned(),
    };
    Ok(ImagePayload { extension, bytes })
}

fn sniff_extension(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        Some("png")
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("jpg")
    } else if bytes.starts_with(b"GIF8") {
        Some("gif")
    } else if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        Some("webp")
    } else {
        None
    }
}

/// Validates a full draft and returns the decoded image.
pub fn validate_draft(
    draft: &RecipeDraft,
    known_ingredients: &HashSet<i32>,
    known_tags: &HashSet<i32>,
) -> Result<ImagePayload, RecipesServiceError> {
    validate_recipe_name(&draft.name)?;
    validate_ingredients(&draft.ingredients, known_ingredients)?;
    validate_tags(&draft.tags, known_tags)?;
    validate_cooking_time(draft.cooking_time)?;
    validate_text(&draft.text)?;
    decode_image_payload(&draft.image)
}

/// Validates the fields present in a patch, in the same order as a draft.
pub fn validate_patch(
    patch: &RecipePatch,
    known_ingredients: &HashSet<i32>,
    known_tags: &HashSet<i32>,
) -> Result<Option<ImagePayload>, RecipesServiceError> {
    if let Some(name) = &patch.name {
        validate_recipe_name(name)?;
    }
    if let Some(ingredients) = &patch.ingredients {
        validate_ingredients(ingredients, known_ingredients)?;
    }
    if let Some(tags) = &patch.tags {
        validate_tags(tags, known_tags)?;
    }
    if let Some(cooking_time) = patch.cooking_time {
        validate_cooking_time(cooking_time)?;
    }
    if let Some(text) = &patch.text {
        validate_text(text)?;
    }
    patch.image.as_deref().map(decode_image_payload).transpose()
}

// ── Tags ─────────────────────────────────────────────────────────────────────

pub fn validate_new_tag(tag: &NewTag) -> Result<(), RecipesServiceError> {
    check_length("name", tag.name.trim(), TAG_NAME_LEN)?;
    if !validate_hex_color(&tag.color) {
        return Err(RecipesServiceError::InvalidFormat { field: "color" });
    }
    check_length("slug", &tag.slug, TAG_NAME_LEN)?;
    if !validate_slug(&tag.slug) {
        return Err(RecipesServiceError::InvalidFormat { field: "slug" });
    }
    Ok(())
}

// ── Profiles ─────────────────────────────────────────────────────────────────

pub fn validate_profile(
    email: &str,
    username: &str,
    first_name: &str,
    last_name: &str,
) -> Result<(), RecipesServiceError> {
    check_length("email", email, Bounds::between(3, MAX_EMAIL_LEN as i64))?;
    if !validate_email(email) {
        return Err(RecipesServiceError::InvalidFormat { field: "email" });
    }
    check_length("username", username, PROFILE_NAME_LEN)?;
    if !validate_username(username) {
        return Err(RecipesServiceError::InvalidFormat { field: "username" });
    }
    check_length("first_name", first_name.trim(), PROFILE_NAME_LEN)?;
    check_length("last_name", last_name.trim(), PROFILE_NAME_LEN)
}
