#![allow(clippy::unwrap_used)]

use super::*;

fn open_temp() -> (tempfile::TempDir, Storage) {
    let dir = tempfile::tempdir().unwrap();
    let db = Storage::open(&dir.path().join("finance.db")).unwrap();
    (dir, db)
}

// ── Init & seeding ────────────────────────────────────────────

#[test]
fn test_default_categories_seeded() {
    let (_dir, db) = open_temp();
    let names = db
        .fetch_all("SELECT name FROM categories ORDER BY name", [], |row| {
            row.get::<_, String>(0)
        })
        .unwrap();
    assert_eq!(names.len(), 9);
    assert!(names.contains(&"Salary".to_string()));
    assert!(names.contains(&"Groceries".to_string()));
}

#[test]
fn test_reopen_does_not_reseed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("finance.db");

    let db = Storage::open(&path).unwrap();
    db.execute(
        "INSERT INTO categories (name, type) VALUES ('Pets', 'expense')",
        [],
    )
    .unwrap();
    drop(db);

    let db = Storage::open(&path).unwrap();
    let count: i64 = db
        .fetch_one("SELECT COUNT(*) FROM categories", [], |row| row.get(0))
        .unwrap()
        .unwrap();
    assert_eq!(count, 10);
}

#[test]
fn test_open_fails_for_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no-such-dir").join("finance.db");
    let err = Storage::open(&path).unwrap_err();
    assert!(matches!(err, StorageError::Init { .. }));
}

// ── Statement primitives ──────────────────────────────────────

#[test]
fn test_execute_returns_affected_rows() {
    let (_dir, db) = open_temp();
    let affected = db
        .execute(
            "UPDATE categories SET type = type WHERE type = ?1",
            rusqlite::params!["expense"],
        )
        .unwrap();
    assert_eq!(affected, 7);
}

#[test]
fn test_fetch_one_none_when_no_rows() {
    let (_dir, db) = open_temp();
    let row = db
        .fetch_one(
            "SELECT id FROM categories WHERE name = ?1",
            rusqlite::params!["Nope"],
            |row| row.get::<_, i64>(0),
        )
        .unwrap();
    assert!(row.is_none());
}

#[test]
fn test_duplicate_name_is_integrity_violation() {
    let (_dir, db) = open_temp();
    let err = db
        .execute(
            "INSERT INTO categories (name, type) VALUES ('Salary', 'income')",
            [],
        )
        .unwrap_err();
    assert!(matches!(err, StorageError::Integrity(_)));
}

#[test]
fn test_check_constraint_is_integrity_violation() {
    let (_dir, db) = open_temp();
    let err = db
        .execute(
            "INSERT INTO categories (name, type) VALUES ('Misc', 'other')",
            [],
        )
        .unwrap_err();
    assert!(matches!(err, StorageError::Integrity(_)));
}

#[test]
fn test_bad_sql_is_generic_storage_error() {
    let (_dir, db) = open_temp();
    let err = db.execute("INSERT INTO no_such_table VALUES (1)", []).unwrap_err();
    assert!(matches!(err, StorageError::Sqlite(_)));
}
