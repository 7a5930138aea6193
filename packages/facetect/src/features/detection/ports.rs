//! Ports - collaborator contracts consumed by the detection engine.
//!
//! The host's virtual file system, module model and policy oracle are not
//! reimplemented here; the engine talks to them through these traits.

use crate::errors::Result;
use crate::shared::{FacetInstance, FacetTypeId, FileTypeId, FileUrl, ModuleId};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Handle to a file in the host's virtual file system.
///
/// The modification stamp is a monotonic per-content-change counter; the
/// engine uses it as the fingerprint that decides whether a file needs
/// re-scanning.
pub trait FileHandle: Send + Sync {
    fn is_valid(&self) -> bool;

    fn is_directory(&self) -> bool;

    /// Stable identity. Survives content edits.
    fn url(&self) -> FileUrl;

    fn modification_stamp(&self) -> u64;

    fn file_type(&self) -> FileTypeId;

    /// Current text content. Detectors may parse this; it may block.
    fn content_text(&self) -> Result<String>;
}

/// Host module/project model: which module owns a file.
pub trait ModuleModel: Send + Sync {
    fn module_for(&self, url: &FileUrl) -> Option<ModuleId>;
}

/// Host file enumeration, used by bulk re-detection.
pub trait ProjectFileIndex: Send + Sync {
    /// All project files whose type is in the given set.
    fn files_of_types(&self, types: &HashSet<FileTypeId>) -> Vec<Arc<dyn FileHandle>>;

    fn find_file(&self, url: &FileUrl) -> Option<Arc<dyn FileHandle>>;
}

/// Host policy oracle consulted before any detector runs.
pub trait AdditionPolicy: Send + Sync {
    fn is_addition_enabled(&self, facet_type: &FacetTypeId, strict: bool) -> bool;
}

/// Notification sink for implicitly added facets. Fire-and-forget.
pub trait ImplicitFacetListener: Send + Sync {
    fn implicit_facet_accepted(&self, facet: &FacetInstance);
}

/// Project-scoped context passed explicitly to the engine.
///
/// Replaces host-managed ambient singletons: everything the manager needs
/// from the project travels through this object.
pub struct ProjectContext {
    name: String,
    disposed: AtomicBool,
    modules: Arc<dyn ModuleModel>,
    file_index: Arc<dyn ProjectFileIndex>,
    addition_policy: Arc<dyn AdditionPolicy>,
}

impl ProjectContext {
    pub fn new(
        name: impl Into<String>,
        modules: Arc<dyn ModuleModel>,
        file_index: Arc<dyn ProjectFileIndex>,
        addition_policy: Arc<dyn AdditionPolicy>,
    ) -> Self {
        Self {
            name: name.into(),
            disposed: AtomicBool::new(false),
            modules,
            file_index,
            addition_policy,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    /// Mark the project as shutting down. Pending work becomes a no-op.
    pub fn dispose(&self) {
        self.disposed.store(true, Ordering::Release);
    }

    pub fn modules(&self) -> &Arc<dyn ModuleModel> {
        &self.modules
    }

    pub fn file_index(&self) -> &Arc<dyn ProjectFileIndex> {
        &self.file_index
    }

    pub fn addition_policy(&self) -> &Arc<dyn AdditionPolicy> {
        &self.addition_policy
    }
}
