//! Use-case layer over the item repository.
//!
//! # Responsibility
//! - Turn repository writes into observable snapshots (`item_store`).
//! - Hold list view-state and the swipe-delete/undo flow.
//! - Keep UI/FFI callers decoupled from storage details.

pub mod item_store;
pub mod removal;
pub mod undo;
pub mod view_state;
