//! Swipe-delete with time-boxed undo.
//!
//! # Responsibility
//! - Capture a record and its list position, remove it from the visible list,
//!   then delete it from the store.
//! - Reinsert the captured record when undo arrives before the deadline.
//!
//! # Invariants
//! - Every delete gets its own ticket; tickets never affect each other.
//! - A ticket resolves at most once (restored, committed or dismissed).
//! - Undo at or after the deadline is a commit and writes nothing.
//! - A failed reinsert keeps the ticket pending for a retry inside the window.
//! - A failed store delete leaves the optimistic removal in place and is
//!   logged at error level.

use crate::model::item::{Item, ItemId};
use crate::repo::item_repo::{ItemRepository, RepoError};
use crate::service::item_store::ItemStore;
use crate::service::view_state::ItemListViewState;
use log::{error, info, warn};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Android "long" snackbar duration.
pub const DEFAULT_UNDO_WINDOW: Duration = Duration::from_millis(2750);

/// Handle identifying one pending undo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UndoToken(Uuid);

impl UndoToken {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Display for UndoToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UndoToken {
    type Err = uuid::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(value.trim()).map(Self)
    }
}

/// Record captured by a swipe-delete, redeemable until `deadline`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoTicket {
    token: UndoToken,
    item: Item,
    position: usize,
    deadline: Instant,
}

impl UndoTicket {
    pub fn token(&self) -> UndoToken {
        self.token
    }

    pub fn item(&self) -> &Item {
        &self.item
    }

    /// List position the item occupied when it was swiped away.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Notification text offered alongside the "Undo" action.
    pub fn message(&self) -> String {
        format!("Deleted '{}'", self.item.title)
    }
}

/// How an undo request was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoOutcome {
    /// The captured record was reinserted under this id.
    Restored(ItemId),
    /// The window had elapsed; the deletion stands.
    Committed,
    /// Unknown, already resolved, or dismissed token.
    NotPending,
}

#[derive(Debug)]
pub enum UndoError {
    PositionOutOfRange { position: usize, len: usize },
    Repo(RepoError),
}

impl Display for UndoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PositionOutOfRange { position, len } => {
                write!(f, "list position {position} is out of range (len={len})")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for UndoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::PositionOutOfRange { .. } => None,
        }
    }
}

impl From<RepoError> for UndoError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Tracks pending undo tickets for swipe-deleted items.
#[derive(Debug)]
pub struct UndoController {
    window: Duration,
    pending: HashMap<UndoToken, UndoTicket>,
}

impl Default for UndoController {
    fn default() -> Self {
        Self::new(DEFAULT_UNDO_WINDOW)
    }
}

impl UndoController {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: HashMap::new(),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, token: UndoToken) -> bool {
        self.pending.contains_key(&token)
    }

    /// Swipe-deletes the row at `position` of `view`.
    pub fn swipe_delete<R: ItemRepository>(
        &mut self,
        store: &ItemStore<R>,
        view: &mut ItemListViewState,
        position: usize,
    ) -> Result<UndoTicket, UndoError> {
        self.swipe_delete_at(store, view, position, Instant::now())
    }

    /// [`UndoController::swipe_delete`] with an explicit clock.
    pub fn swipe_delete_at<R: ItemRepository>(
        &mut self,
        store: &ItemStore<R>,
        view: &mut ItemListViewState,
        position: usize,
        now: Instant,
    ) -> Result<UndoTicket, UndoError> {
        let item = view
            .remove_at(position)
            .ok_or(UndoError::PositionOutOfRange {
                position,
                len: view.len(),
            })?;

        if let Err(err) = store.delete_one(item.id) {
            error!(
                "event=swipe_delete module=undo status=error error_code=optimistic_removal_inconsistent item_id={} error={err}",
                item.id
            );
            return Err(err.into());
        }

        let ticket = UndoTicket {
            token: UndoToken::generate(),
            item,
            position,
            deadline: now + self.window,
        };
        self.pending.insert(ticket.token, ticket.clone());
        info!(
            "event=swipe_delete module=undo status=ok item_id={} position={position} window_ms={}",
            ticket.item.id,
            self.window.as_millis()
        );
        Ok(ticket)
    }

    /// Activates "Undo" for `token`.
    pub fn undo<R: ItemRepository>(
        &mut self,
        store: &ItemStore<R>,
        token: UndoToken,
    ) -> Result<UndoOutcome, UndoError> {
        self.undo_at(store, token, Instant::now())
    }

    /// [`UndoController::undo`] with an explicit clock.
    pub fn undo_at<R: ItemRepository>(
        &mut self,
        store: &ItemStore<R>,
        token: UndoToken,
        now: Instant,
    ) -> Result<UndoOutcome, UndoError> {
        let Some(ticket) = self.pending.get(&token) else {
            return Ok(UndoOutcome::NotPending);
        };
        let item_id = ticket.item.id;

        if now >= ticket.deadline {
            self.pending.remove(&token);
            info!("event=undo module=undo status=ok outcome=committed item_id={item_id}");
            return Ok(UndoOutcome::Committed);
        }

        // The ticket stays pending until the reinsert lands.
        let restored_id = store.insert(&ticket.item.to_draft()).inspect_err(|err| {
            warn!("event=undo module=undo status=error item_id={item_id} ticket_kept=true error={err}");
        })?;
        self.pending.remove(&token);
        info!(
            "event=undo module=undo status=ok outcome=restored item_id={item_id} restored_id={restored_id}"
        );
        Ok(UndoOutcome::Restored(restored_id))
    }

    /// Cancels the undo opportunity. The deletion is unaffected.
    pub fn dismiss(&mut self, token: UndoToken) -> bool {
        let dismissed = self.pending.remove(&token).is_some();
        if dismissed {
            info!("event=undo_dismiss module=undo status=ok");
        }
        dismissed
    }

    /// Commits every ticket whose deadline has passed and returns them.
    pub fn expire(&mut self, now: Instant) -> Vec<UndoTicket> {
        let elapsed: Vec<UndoToken> = self
            .pending
            .values()
            .filter(|ticket| now >= ticket.deadline)
            .map(UndoTicket::token)
            .collect();

        let committed: Vec<UndoTicket> = elapsed
            .into_iter()
            .filter_map(|token| self.pending.remove(&token))
            .collect();
        if !committed.is_empty() {
            info!(
                "event=undo_expire module=undo status=ok committed={}",
                committed.len()
            );
        }
        committed
    }
}
