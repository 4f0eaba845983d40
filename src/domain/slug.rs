//! Deterministic, human-friendly slugs for generated file names.

use slug::slugify;
use thiserror::Error;

use super::items::ItemId;

/// Errors that can occur while generating a slug.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlugError {
    #[error("slug source text is empty")]
    EmptyInput,
    #[error("failed to derive slug from `{input}`")]
    Unrepresentable { input: String },
}

/// Derive a base slug from the provided human-readable text.
pub fn derive_slug(input: &str) -> Result<String, SlugError> {
    if input.trim().is_empty() {
        return Err(SlugError::EmptyInput);
    }

    let candidate = slugify(input);

    if candidate.is_empty() {
        return Err(SlugError::Unrepresentable {
            input: input.to_string(),
        });
    }

    Ok(candidate)
}

/// File name of an item page. The id prefix keeps names unique even when titles collide.
pub fn page_file_name(id: ItemId, title: &str) -> String {
    match derive_slug(title) {
        Ok(slug) => format!("item-{id}-{slug}.html"),
        Err(_) => format!("item-{id}.html"),
    }
}

/// Whether `name` has the shape produced by [`page_file_name`].
pub fn is_page_file_name(name: &str) -> bool {
    name.strip_prefix("item-")
        .and_then(|rest| rest.strip_suffix(".html"))
        .and_then(|stem| stem.split('-').next())
        .is_some_and(|id| !id.is_empty() && id.bytes().all(|byte| byte.is_ascii_digit()))
}
