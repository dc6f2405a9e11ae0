//! Domain model for to-do items.
//!
//! # Invariants
//! - Persisted items always carry a store-assigned `ItemId`.
//! - Title and description of a persisted item are never empty.

pub mod item;
