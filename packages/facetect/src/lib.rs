/*
 * facetect - Incremental facet auto-detection engine
 *
 * Feature-first layout:
 * - shared/    : Common models (ids, facet instances)
 * - features/  : Vertical slices (registry -> arena -> index -> policy -> queue -> detection)
 *
 * The engine scans project files with pluggable detectors to infer
 * "facets" (technology markers on modules), keeps a file -> facet index
 * keyed by modification-stamp fingerprints, and coalesces file-change
 * events through a debounced queue so bursts of edits trigger a single
 * re-detection. Host services (VFS, module model, policy oracle) are
 * consumed through the ports in `features::detection`.
 */

pub mod errors;
pub mod features;
pub mod shared;

pub use errors::{DetectionError, Result};
pub use features::arena::{FacetArena, FacetHandle};
pub use features::detection::{
    AdditionPolicy, DetectionManager, FileHandle, ImplicitFacetListener, ModuleModel,
    ProjectContext, ProjectFileIndex, RedetectionWorker, StructuralEvent, StructuralNode,
};
pub use features::index::{DetectionIndex, IndexEntry, UpdateOutcome};
pub use features::policy::{
    DisabledAutodetectionInfo, DisabledByTypeElement, DisabledInModuleElement, PolicyStore,
};
pub use features::queue::{ExecutionMode, UpdateQueue};
pub use features::registry::{
    DetectorDescriptor, DetectorRegistrar, DetectorRegistry, FacetDetector, FacetType, FileFilter,
};
pub use shared::{DetectedFacet, FacetInstance, FacetTypeId, FileTypeId, FileUrl, ModuleId};
