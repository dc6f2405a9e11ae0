//! Core domain logic for the to-do list app.
//! This crate is the single source of truth for item invariants.

pub mod config;
pub mod db;
pub mod form;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::CoreConfig;
pub use form::{is_valid, parse_priority, priority_label, ItemForm};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel};
pub use model::item::{Item, ItemDraft, ItemId, ItemValidationError, Priority};
pub use repo::item_repo::{ItemRepository, RepoError, RepoResult, SqliteItemRepository};
pub use service::item_store::{ItemSnapshot, ItemStore, ItemSubscription, SubscriptionId};
pub use service::removal::{confirm_removal, RemovalChoice, RemovalOutcome};
pub use service::undo::{
    UndoController, UndoError, UndoOutcome, UndoTicket, UndoToken, DEFAULT_UNDO_WINDOW,
};
pub use service::view_state::ItemListViewState;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
