//! Add/update form validation.
//!
//! # Responsibility
//! - Decide whether user-entered title/description may be saved.
//! - Map dropdown labels to `Priority` and back.
//!
//! # Invariants
//! - No trimming: `" "` is a valid title.
//! - `parse_priority` never fails; unknown labels map to `Priority::Low`.

use crate::model::item::{validate_fields, Item, ItemDraft, ItemId, ItemValidationError, Priority};

pub const HIGH_PRIORITY_LABEL: &str = "High Priority";
pub const MEDIUM_PRIORITY_LABEL: &str = "Medium Priority";
pub const LOW_PRIORITY_LABEL: &str = "Low Priority";

/// Returns `true` when both fields are non-empty.
pub fn is_valid(title: &str, description: &str) -> bool {
    validate_fields(title, description).is_ok()
}

/// Maps a dropdown label to its priority. Matching is exact and
/// case-sensitive.
pub fn parse_priority(label: &str) -> Priority {
    match label {
        HIGH_PRIORITY_LABEL => Priority::High,
        MEDIUM_PRIORITY_LABEL => Priority::Medium,
        LOW_PRIORITY_LABEL => Priority::Low,
        _ => Priority::Low,
    }
}

/// Dropdown label for `priority`, used to preselect the update form.
pub fn priority_label(priority: Priority) -> &'static str {
    match priority {
        Priority::High => HIGH_PRIORITY_LABEL,
        Priority::Medium => MEDIUM_PRIORITY_LABEL,
        Priority::Low => LOW_PRIORITY_LABEL,
    }
}

/// Raw values submitted by the add/update form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemForm {
    pub title: String,
    pub description: String,
    pub priority_label: String,
}

impl ItemForm {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        priority_label: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            priority_label: priority_label.into(),
        }
    }

    /// Prefills the form from an existing item.
    pub fn from_item(item: &Item) -> Self {
        Self::new(
            item.title.clone(),
            item.description.clone(),
            priority_label(item.priority),
        )
    }

    /// Validated draft for the add flow.
    pub fn into_draft(self) -> Result<ItemDraft, ItemValidationError> {
        validate_fields(&self.title, &self.description)?;
        let priority = parse_priority(&self.priority_label);
        Ok(ItemDraft::new(self.title, self.description, priority))
    }

    /// Validated replacement record for the update flow.
    pub fn into_item(self, id: ItemId) -> Result<Item, ItemValidationError> {
        self.into_draft().map(|draft| draft.into_item(id))
    }
}
