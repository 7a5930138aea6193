//! Detection manager.
//!
//! Single logical owner of all index mutations and detector invocations
//! for one project. Detector invocation is synchronous and may block; the
//! debounce queue is the only asynchrony boundary.

use super::events::StructuralEvent;
use super::ports::{FileHandle, ImplicitFacetListener, ProjectContext};
use super::worker::RedetectionWorker;
use crate::features::arena::{FacetArena, FacetHandle};
use crate::features::index::DetectionIndex;
use crate::features::policy::{DisabledByTypeElement, PolicyStore};
use crate::features::queue::{ExecutionMode, UpdateQueue};
use crate::features::registry::{DetectorDescriptor, DetectorRegistry, FacetType};
use crate::shared::{DetectedFacet, FacetInstance, FacetTypeId, FileTypeId, FileUrl, ModuleId};
use parking_lot::RwLock;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Resets the in-progress flag when dropped, so a panicking or erroring
/// detector never leaves the manager locked.
struct DetectionGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> DetectionGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        if flag.swap(true, Ordering::AcqRel) {
            return None;
        }
        Some(Self { flag })
    }
}

impl Drop for DetectionGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Facet auto-detection manager for one project.
pub struct DetectionManager {
    project: Arc<ProjectContext>,
    registry: DetectorRegistry,
    arena: FacetArena,
    index: DetectionIndex,
    policy: PolicyStore,
    queue: UpdateQueue,
    listeners: RwLock<Vec<Box<dyn ImplicitFacetListener>>>,
    known_types: RwLock<Vec<FacetTypeId>>,
    detection_in_progress: AtomicBool,
}

impl DetectionManager {
    pub fn new(project: Arc<ProjectContext>, mode: ExecutionMode) -> Arc<Self> {
        Self::with_queue(project, UpdateQueue::with_default_period(mode))
    }

    /// Construct with a custom debounce period. Tests use short periods.
    pub fn with_quiet_period(
        project: Arc<ProjectContext>,
        mode: ExecutionMode,
        quiet_period: std::time::Duration,
    ) -> Arc<Self> {
        Self::with_queue(project, UpdateQueue::new(quiet_period, mode))
    }

    fn with_queue(project: Arc<ProjectContext>, queue: UpdateQueue) -> Arc<Self> {
        Arc::new(Self {
            project,
            registry: DetectorRegistry::new(),
            arena: FacetArena::new(),
            index: DetectionIndex::new(),
            policy: PolicyStore::new(),
            queue,
            listeners: RwLock::new(Vec::new()),
            known_types: RwLock::new(Vec::new()),
            detection_in_progress: AtomicBool::new(false),
        })
    }

    /// Ask every facet type to declare its detectors. Called once, before
    /// any file is processed.
    pub fn initialize(&self, facet_types: &[Arc<dyn FacetType>]) {
        let mut known = self.known_types.write();
        for facet_type in facet_types {
            known.push(facet_type.id());
            if self.registry.register_facet_type(facet_type.as_ref()) {
                tracing::debug!(facet_type = %facet_type.id(), "registered detectors");
            }
        }
    }

    /// Run detection for a file and reconcile the result with the index.
    ///
    /// Silently ignores invalid files and directories (a benign race with
    /// fast deletion) and does nothing once the project is disposed. A
    /// nested call issued from inside a running detector is a no-op.
    pub fn process_file(&self, file: &Arc<dyn FileHandle>, notify: bool) {
        if !file.is_valid() || file.is_directory() || self.project.is_disposed() {
            return;
        }
        // Re-entrancy: a detector inspecting content may trigger structural
        // events that land back here. Bail before touching the index.
        if self.detection_in_progress.load(Ordering::Acquire) {
            return;
        }

        let detectors = self.registry.detectors_for(&file.file_type());
        if detectors.is_empty() {
            return;
        }

        let url = file.url();
        let module = self.project.modules().module_for(&url);

        let mut detected: Vec<DetectedFacet> = Vec::new();
        for descriptor in &detectors {
            if let Some(facet) = self.run_detector(descriptor, file.as_ref(), module.as_ref(), &url)
            {
                detected.push(facet);
            }
        }

        let mut handles: Vec<FacetHandle> = Vec::new();
        for facet in detected {
            let handle = self
                .arena
                .find(&facet)
                .unwrap_or_else(|| self.arena.insert(FacetInstance::implicit_from(facet)));
            if !handles.contains(&handle) {
                handles.push(handle);
            }
        }

        let outcome = self
            .index
            .update_entry(&url, file.modification_stamp(), &handles);

        self.remove_obsolete_facets(&outcome.removed);

        if notify && !outcome.added.is_empty() {
            for handle in &outcome.added {
                if let Some(facet) = self.arena.get(*handle) {
                    self.fire_implicit_facet_accepted(&facet);
                }
            }
        }
    }

    fn run_detector(
        &self,
        descriptor: &DetectorDescriptor,
        file: &dyn FileHandle,
        module: Option<&ModuleId>,
        url: &FileUrl,
    ) -> Option<DetectedFacet> {
        if !descriptor.accepts(file) {
            return None;
        }
        // A facet needs an owning module
        let module = module?;

        if !self
            .project
            .addition_policy()
            .is_addition_enabled(descriptor.facet_type(), false)
        {
            return None;
        }
        if self
            .policy
            .is_disabled(descriptor.facet_type(), module, url.as_str())
        {
            return None;
        }

        let _guard = DetectionGuard::acquire(&self.detection_in_progress)?;
        match descriptor.detect(file) {
            Ok(facet) => facet,
            Err(err) => {
                tracing::warn!(
                    facet_type = %descriptor.facet_type(),
                    url = %url,
                    error = %err,
                    "detector failed; treating as no facet"
                );
                None
            }
        }
    }

    /// Delete every implicit facet in `removed` that no indexed file still
    /// references. Reusable tail of `process_file`, also run after bulk
    /// cleanups.
    pub fn remove_obsolete_facets(&self, removed: &[FacetHandle]) {
        for &handle in removed {
            let still_referenced = self
                .index
                .files_of(handle)
                .map(|urls| !urls.is_empty())
                .unwrap_or(false);
            if still_referenced {
                continue;
            }
            if let Some(facet) = self.arena.get(handle) {
                if facet.implicit {
                    self.arena.remove(handle);
                    tracing::debug!(
                        facet_type = %facet.facet_type,
                        module = %facet.module,
                        name = %facet.name,
                        "deleted obsolete implicit facet"
                    );
                }
            }
        }
    }

    /// Enqueue a debounced re-scan for a file. One pending re-scan per
    /// file; rapid successive edits collapse into a single run.
    pub fn queue_update(self: &Arc<Self>, file: Arc<dyn FileHandle>) {
        if !self.registry.is_watched(&file.file_type()) {
            return;
        }

        let key = format!("file:{}", file.url());
        let weak = Arc::downgrade(self);
        self.queue.queue(key, move || {
            if let Some(manager) = weak.upgrade() {
                manager.process_file(&file, true);
            }
        });
    }

    /// Dispatch a structural edit from the host.
    ///
    /// File removals are handled synchronously: a deletion must not race
    /// with a delayed re-scan of a file that no longer exists.
    pub fn handle_event(self: &Arc<Self>, event: StructuralEvent) {
        match event {
            StructuralEvent::ChildAdded(node) => {
                if let Some(file) = node.as_file() {
                    self.queue_update(Arc::clone(file));
                } else if let Some(owner) = node.owning_file() {
                    self.queue_update(Arc::clone(owner));
                }
            }
            StructuralEvent::ChildRemoved(node) => {
                if let Some(file) = node.as_file() {
                    let removed = self.index.remove_entry(&file.url());
                    self.remove_obsolete_facets(&removed);
                } else if let Some(owner) = node.owning_file() {
                    self.queue_update(Arc::clone(owner));
                }
            }
            StructuralEvent::ChildReplaced(node) | StructuralEvent::ChildMoved(node) => {
                if let Some(owner) = node.owning_file() {
                    self.queue_update(Arc::clone(owner));
                }
            }
        }
    }

    /// Re-scan every project file whose type has a registered detector.
    /// Files whose indexed stamp is current are skipped.
    pub fn redetect_facets(self: &Arc<Self>) {
        RedetectionWorker::redetect_facets(self);
    }

    /// Replace the exclusion record for a facet type, queueing
    /// compensating re-scans for every file whose exclusion state flips.
    pub fn set_disabled_autodetection_state(
        self: &Arc<Self>,
        facet_type: &FacetTypeId,
        element: Option<DisabledByTypeElement>,
    ) {
        let old = self.policy.find_element(facet_type);
        let affected =
            RedetectionWorker::affected_files(self, facet_type, old.as_ref(), element.as_ref());

        self.policy.replace_element(facet_type, element);

        tracing::debug!(
            facet_type = %facet_type,
            affected = affected.len(),
            "exclusion state changed"
        );
        for file in affected {
            self.queue_update(file);
        }
    }

    pub fn is_autodetection_enabled(
        &self,
        facet_type: &FacetTypeId,
        module: &ModuleId,
        url: &str,
    ) -> bool {
        !self.policy.is_disabled(facet_type, module, url)
    }

    pub fn disable_autodetection_in_project(&self) {
        for facet_type in self.known_types.read().iter() {
            self.policy.add_disabled(facet_type);
        }
    }

    pub fn disable_autodetection_in_project_for_type(&self, facet_type: &FacetTypeId) {
        self.policy.add_disabled(facet_type);
    }

    pub fn disable_autodetection_in_module(&self, facet_type: &FacetTypeId, module: ModuleId) {
        self.policy.add_disabled_in_module(facet_type, module);
    }

    pub fn disable_autodetection_in_files(
        &self,
        facet_type: &FacetTypeId,
        module: ModuleId,
        urls: &[String],
    ) {
        self.policy.add_disabled_in_files(facet_type, module, urls);
    }

    /// Files currently implying the given facet.
    pub fn get_files(&self, handle: FacetHandle) -> Option<HashSet<FileUrl>> {
        self.index.files_of(handle)
    }

    /// Drop a facet from the index without touching the arena, e.g. when
    /// the host deletes a user-created facet.
    pub fn remove_facet_from_cache(&self, handle: FacetHandle) {
        self.index.remove_facet(handle);
    }

    pub fn has_detectors(&self, facet_type: &FacetTypeId) -> bool {
        self.registry.has_detectors(facet_type)
    }

    pub fn file_types_with_detectors(
        &self,
        facet_types: &HashSet<FacetTypeId>,
    ) -> HashSet<FileTypeId> {
        self.registry.file_types_with_detectors(facet_types)
    }

    pub fn add_implicit_facet_listener(&self, listener: Box<dyn ImplicitFacetListener>) {
        self.listeners.write().push(listener);
    }

    fn fire_implicit_facet_accepted(&self, facet: &FacetInstance) {
        for listener in self.listeners.read().iter() {
            listener.implicit_facet_accepted(facet);
        }
    }

    /// Shut the engine down: pending queued work is dropped and listeners
    /// are detached. In-flight detector calls are not interrupted.
    pub fn dispose(&self) {
        self.queue.dispose();
        self.listeners.write().clear();
        tracing::debug!(project = %self.project.name(), "detection manager disposed");
    }

    pub fn project(&self) -> &Arc<ProjectContext> {
        &self.project
    }

    pub fn registry(&self) -> &DetectorRegistry {
        &self.registry
    }

    pub fn index(&self) -> &DetectionIndex {
        &self.index
    }

    pub fn arena(&self) -> &FacetArena {
        &self.arena
    }

    pub fn policy(&self) -> &PolicyStore {
        &self.policy
    }
}
