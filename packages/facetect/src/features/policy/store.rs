//! Shared, persistable policy store.

use super::{DisabledAutodetectionInfo, DisabledByTypeElement};
use crate::errors::Result;
use crate::shared::{FacetTypeId, ModuleId};
use parking_lot::RwLock;
use std::fs;
use std::path::Path;

/// Project-scoped exclusion store.
///
/// The engine consults it before running any detector; the host persists
/// its state between sessions (`state` / `load_state`).
pub struct PolicyStore {
    info: RwLock<DisabledAutodetectionInfo>,
}

impl PolicyStore {
    pub fn new() -> Self {
        Self {
            info: RwLock::new(DisabledAutodetectionInfo::default()),
        }
    }

    /// Snapshot of the persisted state.
    pub fn state(&self) -> DisabledAutodetectionInfo {
        self.info.read().clone()
    }

    /// Replace the whole state, e.g. when the host restores a project.
    pub fn load_state(&self, state: DisabledAutodetectionInfo) {
        *self.info.write() = state;
    }

    pub fn is_disabled(&self, facet_type: &FacetTypeId, module: &ModuleId, url: &str) -> bool {
        self.info.read().is_disabled(facet_type, module, url)
    }

    pub fn find_element(&self, facet_type: &FacetTypeId) -> Option<DisabledByTypeElement> {
        self.info.read().find_element(facet_type).cloned()
    }

    pub fn replace_element(
        &self,
        facet_type: &FacetTypeId,
        element: Option<DisabledByTypeElement>,
    ) {
        self.info.write().replace_element(facet_type, element);
    }

    pub fn add_disabled(&self, facet_type: &FacetTypeId) {
        self.info.write().add_disabled(facet_type);
    }

    pub fn add_disabled_in_module(&self, facet_type: &FacetTypeId, module: ModuleId) {
        self.info.write().add_disabled_in_module(facet_type, module);
    }

    pub fn add_disabled_in_files(
        &self,
        facet_type: &FacetTypeId,
        module: ModuleId,
        urls: &[String],
    ) {
        self.info
            .write()
            .add_disabled_in_files(facet_type, module, urls);
    }

    /// Write the state as JSON.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(&*self.info.read())?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load state from a JSON file written by [`PolicyStore::save_to`].
    pub fn load_from(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = fs::read_to_string(path)?;
        let state: DisabledAutodetectionInfo = serde_json::from_str(&json)?;
        self.load_state(state);
        Ok(())
    }
}

impl Default for PolicyStore {
    fn default() -> Self {
        Self::new()
    }
}
