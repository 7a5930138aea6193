//! Registry storage and lookup.

use super::{DetectorDescriptor, FacetDetector, FacetType, FileFilter};
use crate::shared::{FacetTypeId, FileTypeId};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Per file-type detector collections, filled once at initialization.
pub struct DetectorRegistry {
    detectors: RwLock<HashMap<FileTypeId, Vec<Arc<DetectorDescriptor>>>>,
    types_with_detectors: RwLock<HashSet<FacetTypeId>>,
}

impl DetectorRegistry {
    pub fn new() -> Self {
        Self {
            detectors: RwLock::new(HashMap::new()),
            types_with_detectors: RwLock::new(HashSet::new()),
        }
    }

    /// Ask a facet type to declare its detectors.
    ///
    /// Returns true if the type registered at least one detector.
    pub fn register_facet_type(&self, facet_type: &dyn FacetType) -> bool {
        let mut registrar = DetectorRegistrar {
            registry: self,
            facet_type: facet_type.id(),
            registered: false,
        };
        facet_type.register_detectors(&mut registrar);

        let registered = registrar.registered;
        if registered {
            self.types_with_detectors.write().insert(facet_type.id());
        }
        registered
    }

    fn add(&self, descriptor: DetectorDescriptor) {
        self.detectors
            .write()
            .entry(descriptor.file_type().clone())
            .or_default()
            .push(Arc::new(descriptor));
    }

    /// Detectors registered for a file type, in registration order.
    pub fn detectors_for(&self, file_type: &FileTypeId) -> Vec<Arc<DetectorDescriptor>> {
        self.detectors
            .read()
            .get(file_type)
            .cloned()
            .unwrap_or_default()
    }

    /// Whether any detector targets the given facet type.
    pub fn has_detectors(&self, facet_type: &FacetTypeId) -> bool {
        self.types_with_detectors.read().contains(facet_type)
    }

    /// Whether the file type has any registered detector at all.
    pub fn is_watched(&self, file_type: &FileTypeId) -> bool {
        self.detectors.read().contains_key(file_type)
    }

    /// Every file type with at least one registered detector.
    pub fn watched_file_types(&self) -> HashSet<FileTypeId> {
        self.detectors.read().keys().cloned().collect()
    }

    /// Union of file types whose detectors target any of the given facet
    /// types. Collaborators use this to decide what to watch.
    pub fn file_types_with_detectors(
        &self,
        facet_types: &HashSet<FacetTypeId>,
    ) -> HashSet<FileTypeId> {
        let detectors = self.detectors.read();
        let mut file_types = HashSet::new();
        for (file_type, descriptors) in detectors.iter() {
            if descriptors
                .iter()
                .any(|d| facet_types.contains(d.facet_type()))
            {
                file_types.insert(file_type.clone());
            }
        }
        file_types
    }
}

impl Default for DetectorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Registration surface handed to a facet type during initialization.
pub struct DetectorRegistrar<'a> {
    registry: &'a DetectorRegistry,
    facet_type: FacetTypeId,
    registered: bool,
}

impl DetectorRegistrar<'_> {
    pub fn register(
        &mut self,
        file_type: FileTypeId,
        filter: Arc<dyn FileFilter>,
        detector: Arc<dyn FacetDetector>,
    ) {
        self.registered = true;
        self.registry.add(DetectorDescriptor::new(
            file_type,
            self.facet_type.clone(),
            filter,
            detector,
        ));
    }
}
