//! Core value types for facet detection.
//!
//! Identifiers are interned (`Arc<str>`) so they can be cloned freely
//! across the index, the policy store and listener callbacks without
//! duplicating string storage.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Facet type identifier.
///
/// Opaque to the engine beyond identity and equality; the host assigns
/// the actual meaning ("web", "spring", "android", ...).
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FacetTypeId(Arc<str>);

impl FacetTypeId {
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FacetTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Module identifier within the host project model.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleId(Arc<str>);

impl ModuleId {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// File-type classification assigned by the host's file-type registry.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileTypeId(Arc<str>);

impl FileTypeId {
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stable file identity (URL).
///
/// The URL survives content edits; the modification stamp tracked in the
/// index entry is what changes.
#[derive(Debug, Clone, Hash, Eq, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileUrl(Arc<str>);

impl FileUrl {
    pub fn new(url: impl AsRef<str>) -> Self {
        Self(Arc::from(url.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A facet value produced by a detector.
///
/// This is a plain value: the manager resolves it against the arena to
/// find the live instance it denotes, or creates a new implicit instance.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedFacet {
    pub facet_type: FacetTypeId,
    pub module: ModuleId,
    pub name: String,
    pub configuration: serde_json::Value,
}

impl DetectedFacet {
    pub fn new(
        facet_type: FacetTypeId,
        module: ModuleId,
        name: impl Into<String>,
        configuration: serde_json::Value,
    ) -> Self {
        Self {
            facet_type,
            module,
            name: name.into(),
            configuration,
        }
    }
}

/// A live facet owned by the arena.
///
/// `implicit` marks facets created by auto-detection rather than by a
/// user action; only implicit facets are ever deleted by the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct FacetInstance {
    pub facet_type: FacetTypeId,
    pub module: ModuleId,
    pub name: String,
    pub configuration: serde_json::Value,
    pub implicit: bool,
}

impl FacetInstance {
    /// Build an implicit instance from a detector result.
    pub fn implicit_from(detected: DetectedFacet) -> Self {
        Self {
            facet_type: detected.facet_type,
            module: detected.module,
            name: detected.name,
            configuration: detected.configuration,
            implicit: true,
        }
    }

    /// Whether this instance corresponds to the given detected value.
    pub fn matches(&self, detected: &DetectedFacet) -> bool {
        self.facet_type == detected.facet_type
            && self.module == detected.module
            && self.name == detected.name
    }
}
