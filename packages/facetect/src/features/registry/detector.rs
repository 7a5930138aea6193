//! Detector descriptors and the traits facet types implement.

use crate::errors::Result;
use crate::features::detection::FileHandle;
use crate::shared::{DetectedFacet, FacetTypeId, FileTypeId};
use std::sync::Arc;

/// Detection function: inspects a file and yields at most one facet.
///
/// May read and parse file content, so it may block. An `Err` is
/// contained at the manager boundary and treated as "no facet".
pub trait FacetDetector: Send + Sync {
    fn detect(&self, file: &dyn FileHandle) -> Result<Option<DetectedFacet>>;
}

impl<F> FacetDetector for F
where
    F: Fn(&dyn FileHandle) -> Result<Option<DetectedFacet>> + Send + Sync,
{
    fn detect(&self, file: &dyn FileHandle) -> Result<Option<DetectedFacet>> {
        self(file)
    }
}

/// File-acceptance predicate paired with a detector.
pub trait FileFilter: Send + Sync {
    fn accepts(&self, file: &dyn FileHandle) -> bool;
}

impl<F> FileFilter for F
where
    F: Fn(&dyn FileHandle) -> bool + Send + Sync,
{
    fn accepts(&self, file: &dyn FileHandle) -> bool {
        self(file)
    }
}

/// A registered detector. Immutable once registered.
pub struct DetectorDescriptor {
    file_type: FileTypeId,
    facet_type: FacetTypeId,
    filter: Arc<dyn FileFilter>,
    detector: Arc<dyn FacetDetector>,
}

impl DetectorDescriptor {
    pub fn new(
        file_type: FileTypeId,
        facet_type: FacetTypeId,
        filter: Arc<dyn FileFilter>,
        detector: Arc<dyn FacetDetector>,
    ) -> Self {
        Self {
            file_type,
            facet_type,
            filter,
            detector,
        }
    }

    pub fn file_type(&self) -> &FileTypeId {
        &self.file_type
    }

    pub fn facet_type(&self) -> &FacetTypeId {
        &self.facet_type
    }

    pub fn accepts(&self, file: &dyn FileHandle) -> bool {
        self.filter.accepts(file)
    }

    pub fn detect(&self, file: &dyn FileHandle) -> Result<Option<DetectedFacet>> {
        self.detector.detect(file)
    }
}

/// A facet type known to the engine.
///
/// `register_detectors` is called exactly once per type during engine
/// initialization.
pub trait FacetType: Send + Sync {
    fn id(&self) -> FacetTypeId;

    fn register_detectors(&self, registrar: &mut super::DetectorRegistrar<'_>);
}
