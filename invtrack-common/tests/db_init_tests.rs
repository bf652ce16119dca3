//! Tests for database initialization
//!
//! - Database file is created automatically on first run
//! - Existing databases reopen without error (schema creation is idempotent)
//! - All inventory tables exist after init

use invtrack_common::db::init::init_database;
use tempfile::TempDir;

#[tokio::test]
async fn test_database_creation_when_missing() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("nested").join("invtrack.db");

    let result = init_database(&db_path).await;

    assert!(result.is_ok(), "Database initialization failed: {:?}", result.err());
    assert!(db_path.exists(), "Database file was not created");
}

#[tokio::test]
async fn test_database_opens_existing() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("invtrack.db");

    let pool1 = init_database(&db_path).await;
    assert!(pool1.is_ok());
    pool1.unwrap().close().await;

    let pool2 = init_database(&db_path).await;
    assert!(pool2.is_ok(), "Failed to open existing database: {:?}", pool2.err());
}

#[tokio::test]
async fn test_inventory_tables_created() {
    let dir = TempDir::new().unwrap();
    let pool = init_database(&dir.path().join("invtrack.db")).await.unwrap();

    for table in ["item_templates", "inventory_items", "locations", "legacy_migrations"] {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
        )
        .bind(table)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(count, 1, "Table {} missing", table);
    }
}

#[tokio::test]
async fn test_location_names_unique_at_schema_level() {
    let dir = TempDir::new().unwrap();
    let pool = init_database(&dir.path().join("invtrack.db")).await.unwrap();

    sqlx::query("INSERT INTO locations (id, name) VALUES ('loc-1', 'Lab')")
        .execute(&pool)
        .await
        .unwrap();
    let duplicate = sqlx::query("INSERT INTO locations (id, name) VALUES ('loc-2', 'LAB')")
        .execute(&pool)
        .await;

    assert!(duplicate.is_err(), "NOCASE unique constraint not enforced");
}
