//! FFI use-case API for the Flutter to-do screens.
//!
//! # Responsibility
//! - Expose list, add/update form, swipe-delete/undo and delete-all flows.
//! - Turn core errors into response envelopes with UI-ready messages.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Pending undo tickets outlive individual calls; the database connection
//!   does not.
//!
//! # See also
//! - `todo_core::service`

use crate::palette::priority_color_hex;
use log::{error, warn};
use std::error::Error;
use std::path::Path;
use std::sync::{Mutex, OnceLock};
use std::time::Instant;
use todo_core::db::open_db;
use todo_core::{
    confirm_removal, core_version as core_version_inner, init_logging as init_logging_inner,
    parse_priority, ping as ping_inner, priority_label, CoreConfig, Item, ItemForm,
    ItemListViewState, ItemStore, RemovalChoice, RemovalOutcome, RepoError,
    SqliteItemRepository, UndoController, UndoOutcome, UndoToken,
};

const FILL_ALL_FIELDS_MESSAGE: &str = "Please fill out all fields.";

type FfiResult<T> = Result<T, Box<dyn Error>>;

static CONFIG: OnceLock<CoreConfig> = OnceLock::new();
static UNDO: OnceLock<Mutex<UndoController>> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// An empty `level` falls back to `TODO_LOG_LEVEL` or the build default.
///
/// # FFI contract
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    let level = if level.trim().is_empty() {
        config().log_level.clone()
    } else {
        level
    };
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One list row as rendered by the list screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemView {
    pub id: i64,
    pub title: String,
    pub description: String,
    /// Dropdown label, e.g. `High Priority`.
    pub priority: String,
    /// `#RRGGBB` tint for the priority indicator.
    pub priority_color: String,
}

/// List screen state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListResponse {
    pub items: Vec<ItemView>,
    /// Drives the "no data" placeholder.
    pub is_empty: bool,
    pub message: String,
}

/// Generic action envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub ok: bool,
    pub item_id: Option<i64>,
    /// Human-readable text for a toast or snackbar.
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, item_id: Option<i64>) -> Self {
        Self {
            ok: true,
            item_id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            item_id: None,
            message: message.into(),
        }
    }
}

/// Swipe-delete result carrying the undo handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwipeDeleteResponse {
    pub ok: bool,
    pub undo_token: Option<String>,
    /// Snackbar text, e.g. `Deleted 'Buy milk'`.
    pub message: String,
    /// How long the snackbar should offer "Undo".
    pub undo_window_ms: u64,
}

/// Loads every item in store order.
#[flutter_rust_bridge::frb(sync)]
pub fn list_items() -> ListResponse {
    list_items_in(&config().db_path)
}

/// Saves a new item from the add form.
#[flutter_rust_bridge::frb(sync)]
pub fn add_item(title: String, description: String, priority: String) -> ActionResponse {
    add_item_in(&config().db_path, ItemForm::new(title, description, priority))
}

/// Replaces an item from the update form.
#[flutter_rust_bridge::frb(sync)]
pub fn update_item(id: i64, title: String, description: String, priority: String) -> ActionResponse {
    update_item_in(
        &config().db_path,
        id,
        ItemForm::new(title, description, priority),
    )
}

/// Deletes an item swiped off the list and opens an undo window.
#[flutter_rust_bridge::frb(sync)]
pub fn swipe_delete(item_id: i64) -> SwipeDeleteResponse {
    swipe_delete_in(&config().db_path, item_id)
}

/// Restores a swiped item if its undo window is still open.
#[flutter_rust_bridge::frb(sync)]
pub fn undo_delete(undo_token: String) -> ActionResponse {
    undo_delete_in(&config().db_path, &undo_token)
}

/// Drops an undo opportunity, e.g. when the snackbar is swiped away.
#[flutter_rust_bridge::frb(sync)]
pub fn dismiss_undo(undo_token: String) -> ActionResponse {
    let token = match undo_token.parse::<UndoToken>() {
        Ok(token) => token,
        Err(err) => return ActionResponse::failure(format!("dismiss_undo failed: {err}")),
    };
    match with_undo(|undo| undo.dismiss(token)) {
        Ok(true) => ActionResponse::success("Undo dismissed.", None),
        Ok(false) => ActionResponse::success("Nothing to dismiss.", None),
        Err(err) => ActionResponse::failure(format!("dismiss_undo failed: {err}")),
    }
}

/// Answers the "Delete Everything?" dialog.
#[flutter_rust_bridge::frb(sync)]
pub fn delete_all(confirmed: bool) -> ActionResponse {
    delete_all_in(&config().db_path, confirmed)
}

/// Color for a dropdown label. Unknown labels get the low-priority color.
#[flutter_rust_bridge::frb(sync)]
pub fn priority_color(priority: String) -> String {
    priority_color_hex(parse_priority(&priority)).to_owned()
}

fn list_items_in(db_path: &Path) -> ListResponse {
    match with_store(db_path, |store| Ok(store.snapshot()?)) {
        Ok(snapshot) => {
            let is_empty = snapshot.is_empty();
            let message = format!("Loaded {} item(s).", snapshot.len());
            ListResponse {
                items: snapshot.into_items().into_iter().map(to_item_view).collect(),
                is_empty,
                message,
            }
        }
        Err(err) => ListResponse {
            items: Vec::new(),
            is_empty: false,
            message: format!("list_items failed: {err}"),
        },
    }
}

fn add_item_in(db_path: &Path, form: ItemForm) -> ActionResponse {
    let draft = match form.into_draft() {
        Ok(draft) => draft,
        Err(_) => return ActionResponse::failure(FILL_ALL_FIELDS_MESSAGE),
    };
    match with_store(db_path, |store| Ok(store.insert(&draft)?)) {
        Ok(id) => ActionResponse::success("Successfully added!", Some(id)),
        Err(err) => ActionResponse::failure(format!("add_item failed: {err}")),
    }
}

fn update_item_in(db_path: &Path, id: i64, form: ItemForm) -> ActionResponse {
    let item = match form.into_item(id) {
        Ok(item) => item,
        Err(_) => return ActionResponse::failure(FILL_ALL_FIELDS_MESSAGE),
    };
    match with_store(db_path, |store| Ok(store.update(&item)?)) {
        Ok(()) => ActionResponse::success("Successfully updated!", Some(id)),
        Err(err) => ActionResponse::failure(format!("update_item failed: {err}")),
    }
}

fn swipe_delete_in(db_path: &Path, item_id: i64) -> SwipeDeleteResponse {
    let result = with_store(db_path, |store| {
        let mut view = ItemListViewState::new();
        view.attach(store)?;
        let position = view
            .position_of(item_id)
            .ok_or(RepoError::NotFound(item_id))?;
        let ticket = with_undo(|undo| undo.swipe_delete(store, &mut view, position))??;
        view.detach(store);
        Ok(ticket)
    });

    let undo_window_ms = u64::try_from(config().undo_window.as_millis()).unwrap_or(u64::MAX);
    match result {
        Ok(ticket) => SwipeDeleteResponse {
            ok: true,
            undo_token: Some(ticket.token().to_string()),
            message: ticket.message(),
            undo_window_ms,
        },
        Err(err) => {
            error!("event=ffi_swipe_delete module=ffi status=error item_id={item_id} error={err}");
            SwipeDeleteResponse {
                ok: false,
                undo_token: None,
                message: format!("swipe_delete failed: {err}"),
                undo_window_ms,
            }
        }
    }
}

fn undo_delete_in(db_path: &Path, undo_token: &str) -> ActionResponse {
    let token = match undo_token.parse::<UndoToken>() {
        Ok(token) => token,
        Err(err) => return ActionResponse::failure(format!("undo_delete failed: {err}")),
    };
    let result = with_store(db_path, |store| Ok(with_undo(|undo| undo.undo(store, token))??));
    match result {
        Ok(UndoOutcome::Restored(id)) => ActionResponse::success("Item restored.", Some(id)),
        Ok(UndoOutcome::Committed) => ActionResponse::failure("Undo window has closed."),
        Ok(UndoOutcome::NotPending) => ActionResponse::failure("Nothing to undo."),
        Err(err) => ActionResponse::failure(format!("undo_delete failed: {err}")),
    }
}

fn delete_all_in(db_path: &Path, confirmed: bool) -> ActionResponse {
    let choice = if confirmed {
        RemovalChoice::Confirm
    } else {
        RemovalChoice::Cancel
    };
    match with_store(db_path, |store| Ok(confirm_removal(store, choice)?)) {
        Ok(outcome @ RemovalOutcome::Removed { .. }) => {
            ActionResponse::success(outcome.notice().unwrap_or_default(), None)
        }
        Ok(RemovalOutcome::Cancelled) => ActionResponse::success("", None),
        Err(err) => ActionResponse::failure(format!("delete_all failed: {err}")),
    }
}

fn config() -> &'static CoreConfig {
    CONFIG.get_or_init(CoreConfig::from_env)
}

fn with_store<T>(
    db_path: &Path,
    f: impl FnOnce(&ItemStore<SqliteItemRepository<'_>>) -> FfiResult<T>,
) -> FfiResult<T> {
    let conn = open_db(db_path).map_err(|err| format!("item DB open failed: {err}"))?;
    let repo = SqliteItemRepository::try_new(&conn)
        .map_err(|err| format!("item repo init failed: {err}"))?;
    f(&ItemStore::new(repo))
}

/// Runs `f` on the process-wide undo controller after committing elapsed
/// tickets.
fn with_undo<T>(f: impl FnOnce(&mut UndoController) -> T) -> Result<T, String> {
    let lock = UNDO.get_or_init(|| Mutex::new(UndoController::new(config().undo_window)));
    let mut undo = lock.lock().map_err(|_| {
        warn!("event=ffi_undo_lock module=ffi status=error error_code=lock_poisoned");
        "undo state is unavailable".to_string()
    })?;
    undo.expire(Instant::now());
    Ok(f(&mut *undo))
}

fn to_item_view(item: Item) -> ItemView {
    ItemView {
        id: item.id,
        priority: priority_label(item.priority).to_string(),
        priority_color: priority_color_hex(item.priority).to_string(),
        title: item.title,
        description: item.description,
    }
}
