//! Index storage and diffing.

use crate::features::arena::FacetHandle;
use crate::shared::FileUrl;
use dashmap::DashMap;
use std::collections::HashSet;

/// Per-file index record.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexEntry {
    stamp: u64,
    facets: Vec<FacetHandle>,
}

impl IndexEntry {
    pub fn stamp(&self) -> u64 {
        self.stamp
    }

    pub fn facets(&self) -> &[FacetHandle] {
        &self.facets
    }
}

/// Result of diffing a new detection result against the stored entry.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct UpdateOutcome {
    pub added: Vec<FacetHandle>,
    pub removed: Vec<FacetHandle>,
}

impl UpdateOutcome {
    pub fn is_noop(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// File -> facets mapping with its inverse, kept symmetric.
pub struct DetectionIndex {
    entries: DashMap<FileUrl, IndexEntry>,
    by_facet: DashMap<FacetHandle, HashSet<FileUrl>>,
}

impl DetectionIndex {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            by_facet: DashMap::new(),
        }
    }

    /// Diff a detection result against the stored entry and write it back.
    ///
    /// The entry is only rewritten when the stamp or the facet set
    /// changed; a scan of an unchanged file is a pure no-op. A missing
    /// entry means "no prior facets".
    pub fn update_entry(
        &self,
        url: &FileUrl,
        stamp: u64,
        detected: &[FacetHandle],
    ) -> UpdateOutcome {
        let previous: Vec<FacetHandle> = self
            .entries
            .get(url)
            .map(|e| e.facets.clone())
            .unwrap_or_default();

        let added: Vec<FacetHandle> = detected
            .iter()
            .filter(|h| !previous.contains(h))
            .copied()
            .collect();
        let removed: Vec<FacetHandle> = previous
            .iter()
            .filter(|h| !detected.contains(h))
            .copied()
            .collect();

        let stamp_changed = self.entries.get(url).map(|e| e.stamp) != Some(stamp);
        if added.is_empty() && removed.is_empty() && !stamp_changed {
            return UpdateOutcome::default();
        }

        self.entries.insert(
            url.clone(),
            IndexEntry {
                stamp,
                facets: detected.to_vec(),
            },
        );

        for handle in &added {
            self.by_facet
                .entry(*handle)
                .or_default()
                .insert(url.clone());
        }
        for handle in &removed {
            self.unlink(*handle, url);
        }

        UpdateOutcome { added, removed }
    }

    /// Drop a file's entry, returning the facets it implied.
    ///
    /// Synchronous by design: deletions must not race with a delayed
    /// re-scan of a file that no longer exists.
    pub fn remove_entry(&self, url: &FileUrl) -> Vec<FacetHandle> {
        let Some((_, entry)) = self.entries.remove(url) else {
            return Vec::new();
        };
        for handle in &entry.facets {
            self.unlink(*handle, url);
        }
        tracing::debug!(url = %url, "removed index entry");
        entry.facets
    }

    /// Files currently implying the given facet.
    pub fn files_of(&self, handle: FacetHandle) -> Option<HashSet<FileUrl>> {
        self.by_facet.get(&handle).map(|urls| urls.clone())
    }

    /// Drop a facet from every entry and from the inverse map.
    pub fn remove_facet(&self, handle: FacetHandle) {
        let Some((_, urls)) = self.by_facet.remove(&handle) else {
            return;
        };
        for url in urls {
            if let Some(mut entry) = self.entries.get_mut(&url) {
                entry.facets.retain(|h| *h != handle);
            }
        }
    }

    /// Stored modification stamp for a file, if it was ever scanned.
    pub fn entry_stamp(&self, url: &FileUrl) -> Option<u64> {
        self.entries.get(url).map(|e| e.stamp)
    }

    pub fn entry(&self, url: &FileUrl) -> Option<IndexEntry> {
        self.entries.get(url).map(|e| e.clone())
    }

    /// Snapshot of all entries. Used by bulk workers and tests.
    pub fn all_entries(&self) -> Vec<(FileUrl, IndexEntry)> {
        self.entries
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Verify the file->facet and facet->file maps mirror each other.
    ///
    /// Cheap enough for assertions in tests; not used on hot paths.
    pub fn is_symmetric(&self) -> bool {
        for entry in self.entries.iter() {
            for handle in &entry.value().facets {
                let covered = self
                    .by_facet
                    .get(handle)
                    .map(|urls| urls.contains(entry.key()))
                    .unwrap_or(false);
                if !covered {
                    return false;
                }
            }
        }
        for facet in self.by_facet.iter() {
            for url in facet.value() {
                let covered = self
                    .entries
                    .get(url)
                    .map(|e| e.facets.contains(facet.key()))
                    .unwrap_or(false);
                if !covered {
                    return false;
                }
            }
        }
        true
    }

    fn unlink(&self, handle: FacetHandle, url: &FileUrl) {
        let empty = if let Some(mut urls) = self.by_facet.get_mut(&handle) {
            urls.remove(url);
            urls.is_empty()
        } else {
            false
        };
        if empty {
            self.by_facet.remove(&handle);
        }
    }
}

impl Default for DetectionIndex {
    fn default() -> Self {
        Self::new()
    }
}
