//! Persisted selection - the last-used choices, reloaded next session.
//!
//! The saved state is one opaque JSON blob under a fixed key. Where it is
//! kept is up to the `SelectionStore` implementation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::StoreError;
use crate::regions::Continent;
use crate::selection::Selection;

/// Key the saved selection is stored under.
pub const SELECTION_KEY: &str = "geoshape.selection";

/// Boundary dataset resolution (Natural Earth scale denominators).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resolution {
    #[default]
    #[serde(rename = "110m")]
    Coarse,
    #[serde(rename = "50m")]
    Medium,
    #[serde(rename = "10m")]
    Fine,
}

impl Resolution {
    pub fn all() -> &'static [Resolution] {
        &[Resolution::Coarse, Resolution::Medium, Resolution::Fine]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Resolution::Coarse => "110m",
            Resolution::Medium => "50m",
            Resolution::Fine => "10m",
        }
    }

    pub fn from_name(name: &str) -> Option<Resolution> {
        Resolution::all().iter().copied().find(|r| r.name() == name)
    }

    /// Conventional world dataset file name at this resolution.
    pub fn world_file(&self) -> String {
        format!("countries-{}.json", self.name())
    }
}

/// What survives between sessions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SavedSelection {
    pub resolution: Resolution,
    pub continent: Option<Continent>,
    pub country: Option<String>,
    pub include_borders: bool,
}

impl SavedSelection {
    /// Capture the persistable part of a selection.
    pub fn capture(selection: &Selection, resolution: Resolution) -> Self {
        Self {
            resolution,
            continent: selection.continent(),
            country: selection.country().map(str::to_string),
            include_borders: selection.include_country_borders,
        }
    }

    /// Rebuild a selection. Invalid combinations fall back to the parent level.
    pub fn restore(&self) -> Selection {
        let mut selection = Selection::new().with_continent(self.continent);
        if !selection.set_country(self.country.as_deref()) {
            debug!(country = ?self.country, "saved country does not match saved continent, ignored");
        }
        selection.include_country_borders = self.include_borders;
        selection
    }

    pub fn to_blob(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_blob(blob: &str) -> Result<Self, StoreError> {
        Ok(serde_json::from_str(blob)?)
    }

    /// Load from a store; `Ok(None)` when nothing was saved yet.
    pub fn load<S: SelectionStore + ?Sized>(store: &S) -> Result<Option<Self>, StoreError> {
        store.load(SELECTION_KEY)?.map(|blob| Self::from_blob(&blob)).transpose()
    }

    pub fn save<S: SelectionStore + ?Sized>(&self, store: &mut S) -> Result<(), StoreError> {
        store.save(SELECTION_KEY, &self.to_blob()?)
    }
}

/// Key/value persistence supplied by the host.
pub trait SelectionStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn save(&mut self, key: &str, blob: &str) -> Result<(), StoreError>;
}

/// In-process store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SelectionStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, blob: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), blob.to_string());
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
