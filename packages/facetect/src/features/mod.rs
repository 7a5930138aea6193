//! Vertical feature slices.

pub mod arena;
pub mod detection;
pub mod index;
pub mod policy;
pub mod queue;
pub mod registry;
