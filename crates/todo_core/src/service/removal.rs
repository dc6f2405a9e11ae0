//! Delete-everything confirmation gate.
//!
//! Confirming clears the store with no undo; cancelling does nothing.

use crate::repo::item_repo::{ItemRepository, RepoResult};
use crate::service::item_store::ItemStore;
use log::info;

pub const REMOVAL_DIALOG_TITLE: &str = "Delete Everything?";
pub const REMOVAL_DIALOG_MESSAGE: &str = "Are you sure you want to remove Everything?";
pub const REMOVAL_COMPLETED_NOTICE: &str = "Successfully Removed Everything";

/// Answer given to the delete-everything dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalChoice {
    Confirm,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalOutcome {
    Removed { count: usize },
    Cancelled,
}

impl RemovalOutcome {
    /// Completion notice to show, if any.
    pub fn notice(&self) -> Option<&'static str> {
        match self {
            Self::Removed { .. } => Some(REMOVAL_COMPLETED_NOTICE),
            Self::Cancelled => None,
        }
    }
}

pub fn confirm_removal<R: ItemRepository>(
    store: &ItemStore<R>,
    choice: RemovalChoice,
) -> RepoResult<RemovalOutcome> {
    match choice {
        RemovalChoice::Confirm => {
            let count = store.delete_all()?;
            Ok(RemovalOutcome::Removed { count })
        }
        RemovalChoice::Cancel => {
            info!("event=confirm_removal module=removal status=ok outcome=cancelled");
            Ok(RemovalOutcome::Cancelled)
        }
    }
}
