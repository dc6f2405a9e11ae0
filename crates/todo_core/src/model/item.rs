//! To-do item domain model.
//!
//! # Responsibility
//! - Define the persisted `Item` record and its unsaved `ItemDraft` shape.
//! - Own the non-empty title/description rule shared by form and store.
//!
//! # Invariants
//! - Emptiness is checked on the raw string. Whitespace-only values are valid.
//! - `Priority` wire names match the persisted column values.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned identifier of a persisted item.
pub type ItemId = i64;

/// Ordinal urgency tag of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Every priority, most urgent first. Matches dropdown order.
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    /// Column value stored in `todo_items.priority`.
    pub fn as_db_str(self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }

    /// Parses a stored column value. Unknown values yield `None`.
    pub fn from_db_str(value: &str) -> Option<Self> {
        match value {
            "HIGH" => Some(Self::High),
            "MEDIUM" => Some(Self::Medium),
            "LOW" => Some(Self::Low),
            _ => None,
        }
    }
}

/// Validation failures for item title/description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemValidationError {
    EmptyTitle,
    EmptyDescription,
}

impl Display for ItemValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::EmptyDescription => write!(f, "description must not be empty"),
        }
    }
}

impl Error for ItemValidationError {}

/// Persisted to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    pub description: String,
    pub priority: Priority,
}

impl Item {
    /// Checks the non-empty title/description rule.
    pub fn validate(&self) -> Result<(), ItemValidationError> {
        validate_fields(&self.title, &self.description)
    }

    /// Converts back into an insertable draft, keeping `id` as a hint.
    ///
    /// Used by undo to reinsert a captured record.
    pub fn to_draft(&self) -> ItemDraft {
        ItemDraft {
            id: Some(self.id),
            title: self.title.clone(),
            description: self.description.clone(),
            priority: self.priority,
        }
    }
}

/// Item fields before the store has assigned an identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDraft {
    /// Preferred id. The store assigns a fresh one when absent or taken.
    #[serde(default)]
    pub id: Option<ItemId>,
    pub title: String,
    pub description: String,
    pub priority: Priority,
}

impl ItemDraft {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        priority: Priority,
    ) -> Self {
        Self {
            id: None,
            title: title.into(),
            description: description.into(),
            priority,
        }
    }

    pub fn validate(&self) -> Result<(), ItemValidationError> {
        validate_fields(&self.title, &self.description)
    }

    /// Attaches the identity assigned by the store.
    pub fn into_item(self, id: ItemId) -> Item {
        Item {
            id,
            title: self.title,
            description: self.description,
            priority: self.priority,
        }
    }
}

pub(crate) fn validate_fields(title: &str, description: &str) -> Result<(), ItemValidationError> {
    if title.is_empty() {
        return Err(ItemValidationError::EmptyTitle);
    }
    if description.is_empty() {
        return Err(ItemValidationError::EmptyDescription);
    }
    Ok(())
}
