//! Repository layer for persisted to-do items.
//!
//! # Responsibility
//! - Define the item data access contract.
//! - Keep SQLite query details out of store/undo orchestration.
//!
//! # Invariants
//! - Write paths validate title/description before any SQL mutation.
//! - Missing update targets surface as `RepoError::NotFound`; missing delete
//!   targets do not.

pub mod item_repo;
