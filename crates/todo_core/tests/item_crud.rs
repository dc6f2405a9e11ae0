use rusqlite::Connection;
use todo_core::db::migrations::latest_version;
use todo_core::db::open_db_in_memory;
use todo_core::{
    Item, ItemDraft, ItemRepository, ItemStore, Priority, RepoError, SqliteItemRepository,
};

fn draft(title: &str, priority: Priority) -> ItemDraft {
    ItemDraft::new(title, format!("{title} details"), priority)
}

#[test]
fn insert_then_get_all_includes_record_with_assigned_id() {
    let conn = open_db_in_memory().unwrap();
    let store = ItemStore::new(SqliteItemRepository::try_new(&conn).unwrap());

    let id = store.insert(&draft("groceries", Priority::High)).unwrap();

    let snapshot = store.snapshot().unwrap();
    assert_eq!(snapshot.len(), 1);
    let stored = &snapshot.items()[0];
    assert_eq!(stored.id, id);
    assert_eq!(stored.title, "groceries");
    assert_eq!(stored.description, "groceries details");
    assert_eq!(stored.priority, Priority::High);
}

#[test]
fn insert_rejects_empty_fields_without_persisting() {
    let conn = open_db_in_memory().unwrap();
    let store = ItemStore::new(SqliteItemRepository::try_new(&conn).unwrap());

    let err = store
        .insert(&ItemDraft::new("", "desc", Priority::Low))
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
    let err = store
        .insert(&ItemDraft::new("title", "", Priority::Low))
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    assert!(store.snapshot().unwrap().is_empty());
}

#[test]
fn whitespace_only_fields_are_persisted() {
    let conn = open_db_in_memory().unwrap();
    let store = ItemStore::new(SqliteItemRepository::try_new(&conn).unwrap());

    store.insert(&ItemDraft::new(" ", " ", Priority::Low)).unwrap();
    assert_eq!(store.snapshot().unwrap().len(), 1);
}

#[test]
fn update_replaces_all_fields() {
    let conn = open_db_in_memory().unwrap();
    let store = ItemStore::new(SqliteItemRepository::try_new(&conn).unwrap());
    let id = store.insert(&draft("draft", Priority::Low)).unwrap();

    let replacement = Item {
        id,
        title: "final".to_string(),
        description: "rewritten".to_string(),
        priority: Priority::Medium,
    };
    store.update(&replacement).unwrap();

    assert_eq!(store.get(id).unwrap(), Some(replacement));
}

#[test]
fn update_of_missing_item_returns_not_found_and_creates_nothing() {
    let conn = open_db_in_memory().unwrap();
    let store = ItemStore::new(SqliteItemRepository::try_new(&conn).unwrap());

    let ghost = draft("ghost", Priority::High).into_item(99);
    let err = store.update(&ghost).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(99)));
    assert!(store.snapshot().unwrap().is_empty());
}

#[test]
fn update_rejects_empty_title() {
    let conn = open_db_in_memory().unwrap();
    let store = ItemStore::new(SqliteItemRepository::try_new(&conn).unwrap());
    let id = store.insert(&draft("keep", Priority::Low)).unwrap();

    let mut invalid = store.get(id).unwrap().unwrap();
    invalid.title.clear();
    let err = store.update(&invalid).unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
    assert_eq!(store.get(id).unwrap().unwrap().title, "keep");
}

#[test]
fn delete_one_of_missing_id_is_a_no_op() {
    let conn = open_db_in_memory().unwrap();
    let store = ItemStore::new(SqliteItemRepository::try_new(&conn).unwrap());
    store.insert(&draft("a", Priority::Low)).unwrap();
    let before = store.snapshot().unwrap();

    let removed = store.delete_one(12345).unwrap();

    assert!(!removed);
    assert_eq!(store.snapshot().unwrap(), before);
}

#[test]
fn delete_one_removes_only_target() {
    let conn = open_db_in_memory().unwrap();
    let store = ItemStore::new(SqliteItemRepository::try_new(&conn).unwrap());
    let keep = store.insert(&draft("keep", Priority::Low)).unwrap();
    let gone = store.insert(&draft("gone", Priority::Low)).unwrap();

    assert!(store.delete_one(gone).unwrap());

    let ids: Vec<_> = store.snapshot().unwrap().items().iter().map(|i| i.id).collect();
    assert_eq!(ids, vec![keep]);
}

#[test]
fn three_items_listed_in_insertion_order_then_delete_all_empties() {
    let conn = open_db_in_memory().unwrap();
    let store = ItemStore::new(SqliteItemRepository::try_new(&conn).unwrap());

    for title in ["first", "second", "third"] {
        store.insert(&draft(title, Priority::Medium)).unwrap();
    }
    let titles: Vec<_> = store
        .snapshot()
        .unwrap()
        .items()
        .iter()
        .map(|item| item.title.clone())
        .collect();
    assert_eq!(titles, vec!["first", "second", "third"]);

    assert_eq!(store.delete_all().unwrap(), 3);
    assert!(store.snapshot().unwrap().is_empty());
    assert_eq!(store.delete_all().unwrap(), 0);
}

#[test]
fn insert_reuses_free_preferred_id_and_reassigns_taken_one() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteItemRepository::try_new(&conn).unwrap();

    let first = repo.create_item(&draft("first", Priority::Low)).unwrap();
    let item = repo.get_item(first).unwrap().unwrap();
    repo.delete_item(first).unwrap();

    let restored = repo.create_item(&item.to_draft()).unwrap();
    assert_eq!(restored, first);

    let duplicate = repo.create_item(&item.to_draft()).unwrap();
    assert_ne!(duplicate, first);
    assert_eq!(repo.list_items().unwrap().len(), 2);
}

#[test]
fn ids_are_not_reused_after_delete() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteItemRepository::try_new(&conn).unwrap();

    let first = repo.create_item(&draft("a", Priority::Low)).unwrap();
    repo.delete_item(first).unwrap();
    let second = repo.create_item(&draft("b", Priority::Low)).unwrap();
    assert!(second > first);
}

#[test]
fn list_reports_corrupted_priority() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteItemRepository::try_new(&conn).unwrap();
    repo.create_item(&draft("a", Priority::Low)).unwrap();
    conn.execute_batch(
        "PRAGMA ignore_check_constraints = ON;
         UPDATE todo_items SET priority = 'SOMEDAY';",
    )
    .unwrap();

    let err = repo.list_items().unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(message) if message.contains("SOMEDAY")));
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteItemRepository::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_items_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteItemRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredTable("todo_items"))
    ));
}

#[test]
fn repository_rejects_items_table_missing_priority_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE todo_items (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteItemRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "todo_items",
            column: "priority"
        })
    ));
}
