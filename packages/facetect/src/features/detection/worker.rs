//! Bulk re-detection and exclusion-delta compensation.

use super::manager::DetectionManager;
use super::ports::FileHandle;
use crate::features::policy::DisabledByTypeElement;
use crate::shared::FacetTypeId;
use std::collections::HashSet;
use std::sync::Arc;

/// Queues the re-scans needed when the set of enabled detectors changes
/// globally: a full re-detection pass, or the compensation for an
/// exclusion record being replaced.
pub struct RedetectionWorker;

impl RedetectionWorker {
    /// Queue a re-scan of every project file whose type has a registered
    /// detector, skipping files whose indexed fingerprint is unchanged.
    pub fn redetect_facets(manager: &Arc<DetectionManager>) {
        let file_types = manager.registry().watched_file_types();
        let files = manager.project().file_index().files_of_types(&file_types);

        let mut queued = 0usize;
        for file in files {
            if manager.index().entry_stamp(&file.url()) == Some(file.modification_stamp()) {
                continue;
            }
            queued += 1;
            manager.queue_update(file);
        }
        tracing::debug!(queued, "bulk re-detection queued");
    }

    /// Files whose exclusion state flips between the old and the new
    /// record for a facet type, at any of the three granularities.
    ///
    /// Re-processing such a file either re-runs detection (exclusion
    /// lifted) or strips now-excluded facets from the index (the policy
    /// gate yields an empty detection result, so they become obsolete).
    pub fn affected_files(
        manager: &Arc<DetectionManager>,
        facet_type: &FacetTypeId,
        old: Option<&DisabledByTypeElement>,
        new: Option<&DisabledByTypeElement>,
    ) -> Vec<Arc<dyn FileHandle>> {
        if old == new {
            return Vec::new();
        }

        let mut types = HashSet::new();
        types.insert(facet_type.clone());
        let file_types = manager.registry().file_types_with_detectors(&types);
        if file_types.is_empty() {
            return Vec::new();
        }

        manager
            .project()
            .file_index()
            .files_of_types(&file_types)
            .into_iter()
            .filter(|file| {
                let url = file.url();
                let Some(module) = manager.project().modules().module_for(&url) else {
                    return false;
                };
                let was = old
                    .map(|e| e.is_disabled(&module, url.as_str()))
                    .unwrap_or(false);
                let now = new
                    .map(|e| e.is_disabled(&module, url.as_str()))
                    .unwrap_or(false);
                was != now
            })
            .collect()
    }
}
