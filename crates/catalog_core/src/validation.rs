//! Name checks for catalog entries.
//!
//! Character filtering happens on every input change and silently drops what
//! it rejects. The empty and duplicate checks run once, at submit time.

use shared::domain::{CatalogId, CatalogItem};

use crate::error::ValidationError;

/// Longest name the input accepts, counted in characters.
pub const MAX_NAME_CHARS: usize = 40;

pub fn normalize(raw: &str) -> &str {
    raw.trim()
}

pub fn is_empty(trimmed: &str) -> bool {
    trimmed.is_empty()
}

fn fold(name: &str) -> String {
    name.trim().to_lowercase()
}

/// True when another item already carries `trimmed`, ignoring case and
/// surrounding whitespace. `exclude_id` lets an edited item keep its own name.
pub fn is_duplicate(trimmed: &str, list: &[CatalogItem], exclude_id: Option<&CatalogId>) -> bool {
    let needle = fold(trimmed);
    list.iter()
        .filter(|item| Some(&item.id) != exclude_id)
        .any(|item| fold(&item.name) == needle)
}

/// Letters (accented Latin ones included), digits, space, `.`, `-` and `:`.
pub fn is_allowed_character(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(c, ' ' | '.' | '-' | ':')
        || (c.is_alphabetic() && ('\u{00C0}'..='\u{024F}').contains(&c))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredInput {
    pub value: String,
    pub dropped: usize,
}

pub fn filter_input(raw: &str) -> FilteredInput {
    let mut value = String::with_capacity(raw.len());
    let mut kept = 0;
    let mut dropped = 0;
    for c in raw.chars() {
        if is_allowed_character(c) && kept < MAX_NAME_CHARS {
            value.push(c);
            kept += 1;
        } else {
            dropped += 1;
        }
    }
    FilteredInput { value, dropped }
}

/// Submit-time check. Returns the trimmed name to send.
pub fn validate_name(
    raw: &str,
    list: &[CatalogItem],
    exclude_id: Option<&CatalogId>,
) -> Result<String, ValidationError> {
    let trimmed = normalize(raw);
    if is_empty(trimmed) {
        return Err(ValidationError::Required);
    }
    if is_duplicate(trimmed, list, exclude_id) {
        return Err(ValidationError::Duplicate {
            name: trimmed.to_string(),
        });
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
#[path = "tests/validation_tests.rs"]
mod tests;
