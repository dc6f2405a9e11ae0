//! Item repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD plus delete-all over the `todo_items` table.
//! - Reject connections that were not bootstrapped through `db::open_*`.
//!
//! # Invariants
//! - Listing order is `id ASC`, i.e. insertion order.
//! - Rows that fail to decode are reported, never skipped.

use crate::db::migrations::{latest_version, schema_version};
use crate::db::DbError;
use crate::model::item::{Item, ItemDraft, ItemId, ItemValidationError, Priority};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const ITEMS_TABLE: &str = "todo_items";
const REQUIRED_COLUMNS: &[&str] = &["id", "title", "description", "priority"];

const ITEM_SELECT_SQL: &str = "SELECT id, title, description, priority FROM todo_items";

pub type RepoResult<T> = Result<T, RepoError>;

/// Error for item persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ItemValidationError),
    Db(DbError),
    NotFound(ItemId),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "item not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted item data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it with db::open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ItemValidationError> for RepoError {
    fn from(value: ItemValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for item persistence.
pub trait ItemRepository {
    /// Persists a new item and returns its id.
    ///
    /// `draft.id` is honored when that id is free; otherwise a fresh id is
    /// assigned.
    fn create_item(&self, draft: &ItemDraft) -> RepoResult<ItemId>;
    /// Replaces every field of an existing item.
    fn update_item(&self, item: &Item) -> RepoResult<()>;
    fn get_item(&self, id: ItemId) -> RepoResult<Option<Item>>;
    fn list_items(&self) -> RepoResult<Vec<Item>>;
    /// Removes one item. Returns `false` when it did not exist.
    fn delete_item(&self, id: ItemId) -> RepoResult<bool>;
    /// Removes every item and returns how many were removed.
    fn delete_all_items(&self) -> RepoResult<usize>;
}

/// SQLite-backed item repository.
pub struct SqliteItemRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteItemRepository<'conn> {
    /// Wraps a connection after checking schema version and table shape.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let expected_version = latest_version();
        let actual_version = schema_version(conn)?;
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        let columns = table_columns(conn, ITEMS_TABLE)?;
        if columns.is_empty() {
            return Err(RepoError::MissingRequiredTable(ITEMS_TABLE));
        }
        if let Some(column) = REQUIRED_COLUMNS
            .iter()
            .copied()
            .find(|required| !columns.iter().any(|name| name == required))
        {
            return Err(RepoError::MissingRequiredColumn {
                table: ITEMS_TABLE,
                column,
            });
        }

        Ok(Self { conn })
    }

    fn id_exists(&self, id: ItemId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM todo_items WHERE id = ?1);",
            [id],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

impl ItemRepository for SqliteItemRepository<'_> {
    fn create_item(&self, draft: &ItemDraft) -> RepoResult<ItemId> {
        draft.validate()?;

        let preferred_id = match draft.id {
            Some(id) if !self.id_exists(id)? => Some(id),
            _ => None,
        };

        self.conn.execute(
            "INSERT INTO todo_items (id, title, description, priority)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                preferred_id,
                draft.title.as_str(),
                draft.description.as_str(),
                draft.priority.as_db_str(),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn update_item(&self, item: &Item) -> RepoResult<()> {
        item.validate()?;

        let changed = self.conn.execute(
            "UPDATE todo_items
             SET title = ?1, description = ?2, priority = ?3
             WHERE id = ?4;",
            params![
                item.title.as_str(),
                item.description.as_str(),
                item.priority.as_db_str(),
                item.id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(item.id));
        }
        Ok(())
    }

    fn get_item(&self, id: ItemId) -> RepoResult<Option<Item>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ITEM_SELECT_SQL} WHERE id = ?1;"))?;
        let raw = stmt.query_row([id], read_raw_row).optional()?;
        raw.map(RawItemRow::into_item).transpose()
    }

    fn list_items(&self) -> RepoResult<Vec<Item>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ITEM_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut items = Vec::new();

        while let Some(row) = rows.next()? {
            items.push(read_raw_row(row)?.into_item()?);
        }

        Ok(items)
    }

    fn delete_item(&self, id: ItemId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM todo_items WHERE id = ?1;", [id])?;
        Ok(changed > 0)
    }

    fn delete_all_items(&self) -> RepoResult<usize> {
        let changed = self.conn.execute("DELETE FROM todo_items;", [])?;
        Ok(changed)
    }
}

struct RawItemRow {
    id: ItemId,
    title: String,
    description: String,
    priority: String,
}

impl RawItemRow {
    fn into_item(self) -> RepoResult<Item> {
        let priority = Priority::from_db_str(&self.priority).ok_or_else(|| {
            RepoError::InvalidData(format!(
                "invalid priority `{}` in todo_items.priority (id={})",
                self.priority, self.id
            ))
        })?;

        let item = Item {
            id: self.id,
            title: self.title,
            description: self.description,
            priority,
        };
        item.validate()
            .map_err(|err| RepoError::InvalidData(format!("item {}: {err}", item.id)))?;
        Ok(item)
    }
}

fn read_raw_row(row: &Row<'_>) -> rusqlite::Result<RawItemRow> {
    Ok(RawItemRow {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        priority: row.get("priority")?,
    })
}

fn table_columns(conn: &Connection, table: &str) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>("name"))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(names)
}
