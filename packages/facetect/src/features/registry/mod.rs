//! Detector registry: per file-type collections of detector descriptors.
//!
//! Facet types declare their detectors once, at engine initialization.
//! Multiple detectors may target the same file type; no dedup is applied
//! and all of them fire.

mod detector;
mod registry;

pub use detector::{DetectorDescriptor, FacetDetector, FacetType, FileFilter};
pub use registry::{DetectorRegistrar, DetectorRegistry};
