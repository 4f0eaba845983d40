//! The item registry: an ordered, validated, immutable view of all items.
//!
//! The registry is built once per run from a [`ContentSource`] and passed by
//! reference to everything downstream. Any malformed content aborts loading;
//! a partially loaded registry is never returned.

use std::{collections::HashSet, time::Instant};

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::{
    demos,
    domain::{
        error::DomainError,
        items::{CodeSample, Item, ItemId, RunTarget, Site},
    },
    infra::content::{ContentReadError, ContentSource},
};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Read(#[from] ContentReadError),
    #[error("malformed content manifest `{source_name}`: {message}")]
    Parse {
        source_name: String,
        message: String,
    },
    #[error("duplicate item id {id}")]
    DuplicateId { id: ItemId },
    #[error("invalid item {item_id}: {reason}")]
    Invalid { item_id: ItemId, reason: String },
    #[error("item {item_id} references unknown demo `{name}`")]
    UnknownDemo { item_id: ItemId, name: String },
}

impl LoadError {
    fn invalid(item_id: ItemId, reason: impl Into<String>) -> Self {
        Self::Invalid {
            item_id,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRegistry {
    site: Site,
    items: Vec<Item>,
}

impl ItemRegistry {
    /// Read and validate every item from `source`, preserving manifest order.
    pub fn load(source: &ContentSource) -> Result<Self, LoadError> {
        let started_at = Instant::now();
        let manifest = source.read_manifest()?;
        let registry = Self::parse(&manifest, source)?;

        info!(
            target = "lessonbook::registry",
            op = "registry::load",
            source = %source,
            items = registry.items.len(),
            elapsed_ms = started_at.elapsed().as_millis() as u64,
            "Loaded content"
        );

        Ok(registry)
    }

    /// Parse a manifest; referenced files are read through `source`.
    pub fn parse(manifest: &str, source: &ContentSource) -> Result<Self, LoadError> {
        let raw: RawManifest = toml::from_str(manifest).map_err(|err| LoadError::Parse {
            source_name: source.to_string(),
            message: err.to_string(),
        })?;

        let site = raw.site.map(RawSite::into_site).unwrap_or_default();

        let mut seen = HashSet::with_capacity(raw.items.len());
        let mut items = Vec::with_capacity(raw.items.len());
        for raw_item in raw.items {
            if !seen.insert(raw_item.id) {
                return Err(LoadError::DuplicateId { id: raw_item.id });
            }
            items.push(raw_item.into_item(source)?);
        }

        Ok(Self { site, items })
    }

    /// Build a registry from already-constructed items, applying the same id check.
    pub fn from_items(site: Site, items: Vec<Item>) -> Result<Self, LoadError> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(item.id()) {
                return Err(LoadError::DuplicateId { id: item.id() });
            }
        }
        Ok(Self { site, items })
    }

    pub fn site(&self) -> &Site {
        &self.site
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawManifest {
    #[serde(default)]
    site: Option<RawSite>,
    #[serde(default)]
    items: Vec<RawItem>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSite {
    title: Option<String>,
    description: Option<String>,
}

impl RawSite {
    fn into_site(self) -> Site {
        let defaults = Site::default();
        Site {
            title: self
                .title
                .map(|title| title.trim().to_string())
                .filter(|title| !title.is_empty())
                .unwrap_or(defaults.title),
            description: self.description.filter(|text| !text.trim().is_empty()),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawItem {
    id: ItemId,
    title: String,
    description: Option<String>,
    description_file: Option<String>,
    #[serde(default)]
    samples: Vec<RawSample>,
}

impl RawItem {
    fn into_item(self, source: &ContentSource) -> Result<Item, LoadError> {
        let id = self.id;
        let description = match (self.description, self.description_file) {
            (Some(text), None) => text,
            (None, Some(path)) => source.read_relative(&path)?,
            (Some(_), Some(_)) => {
                return Err(LoadError::invalid(
                    id,
                    "`description` and `description_file` are mutually exclusive",
                ));
            }
            (None, None) => {
                return Err(LoadError::invalid(
                    id,
                    "one of `description` or `description_file` is required",
                ));
            }
        };

        let samples = self
            .samples
            .into_iter()
            .enumerate()
            .map(|(index, sample)| sample.into_sample(id, index + 1, source))
            .collect::<Result<Vec<_>, _>>()?;

        Item::new(id, self.title, description, samples)
            .map_err(|DomainError::Validation { message }| LoadError::invalid(id, message))
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSample {
    label: Option<String>,
    language: Option<String>,
    source: Option<String>,
    source_file: Option<String>,
    demo: Option<String>,
    command: Option<Vec<String>>,
}

impl RawSample {
    fn into_sample(
        self,
        item_id: ItemId,
        position: usize,
        source: &ContentSource,
    ) -> Result<CodeSample, LoadError> {
        let text = match (self.source, self.source_file) {
            (Some(text), None) => text,
            (None, Some(path)) => source.read_relative(&path)?,
            (Some(_), Some(_)) => {
                return Err(LoadError::invalid(
                    item_id,
                    format!("sample #{position}: `source` and `source_file` are mutually exclusive"),
                ));
            }
            (None, None) => {
                return Err(LoadError::invalid(
                    item_id,
                    format!("sample #{position}: one of `source` or `source_file` is required"),
                ));
            }
        };

        let run = match (self.demo, self.command) {
            (None, None) => None,
            (Some(name), None) => {
                if demos::find(&name).is_none() {
                    return Err(LoadError::UnknownDemo { item_id, name });
                }
                Some(RunTarget::Demo(name))
            }
            (None, Some(argv)) => Some(RunTarget::Command(argv)),
            (Some(_), Some(_)) => {
                return Err(LoadError::invalid(
                    item_id,
                    format!("sample #{position}: `demo` and `command` are mutually exclusive"),
                ));
            }
        };

        Ok(CodeSample {
            label: self.label,
            language: self.language.filter(|language| !language.trim().is_empty()),
            source: text,
            run,
        })
    }
}
