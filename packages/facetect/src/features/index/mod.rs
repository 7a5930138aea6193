//! Detection index: which facets each scanned file currently implies.
//!
//! Two concurrent maps kept symmetric: file URL -> index entry, and the
//! inverse facet handle -> referencing file URLs. Entries carry the
//! file's modification stamp so unchanged files are never re-diffed.

mod detection_index;

pub use detection_index::{DetectionIndex, IndexEntry, UpdateOutcome};
