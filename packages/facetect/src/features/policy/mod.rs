//! Disabled-autodetection policy: persisted exclusion records.
//!
//! Three granularities: a whole facet type, a facet type within one
//! module, or a facet type for specific file URLs within a module. A
//! narrower rule never re-enables a broader one; the check is "is this
//! (type, module, url) covered by any matching rule".

mod disabled_info;
mod store;

pub use disabled_info::{DisabledAutodetectionInfo, DisabledByTypeElement, DisabledInModuleElement};
pub use store::PolicyStore;
