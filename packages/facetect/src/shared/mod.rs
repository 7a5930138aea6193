//! Shared models used across detection features.

pub mod models;

pub use models::*;
