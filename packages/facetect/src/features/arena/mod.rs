//! Facet arena: generation-checked storage for live facet instances.
//!
//! The detection index never owns facets. It stores [`FacetHandle`]s into
//! this arena; deleting a facet bumps the slot generation so every handle
//! that pointed at it reads back as `None` from then on.

mod facet_arena;

pub use facet_arena::{FacetArena, FacetHandle};
