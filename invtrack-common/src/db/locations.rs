//! Location queries
//!
//! Names are unique ignoring case; the column uses `COLLATE NOCASE` and the
//! checks below turn violations into `Error::Conflict` before SQLite does.

use crate::models::Location;
use crate::uuid_utils::prefixed_id;
use crate::{Error, Result};
use sqlx::{Row, Sqlite, SqlitePool};

fn clean_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::InvalidInput("Location name cannot be empty".to_string()));
    }
    Ok(name.to_string())
}

/// All locations ordered by name
pub async fn list_locations(pool: &SqlitePool) -> Result<Vec<Location>> {
    let rows = sqlx::query("SELECT id, name FROM locations ORDER BY name COLLATE NOCASE")
        .fetch_all(pool)
        .await?;

    Ok(rows
        .iter()
        .map(|row| Location {
            id: row.get("id"),
            name: row.get("name"),
        })
        .collect())
}

pub async fn get_location(pool: &SqlitePool, id: &str) -> Result<Option<Location>> {
    let row = sqlx::query("SELECT id, name FROM locations WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|row| Location {
        id: row.get("id"),
        name: row.get("name"),
    }))
}

/// Id of the location named `name` (case-insensitive), if any
async fn find_by_name<'e, E>(executor: E, name: &str) -> Result<Option<String>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let id: Option<String> =
        sqlx::query_scalar("SELECT id FROM locations WHERE name = ? COLLATE NOCASE")
            .bind(name)
            .fetch_optional(executor)
            .await?;
    Ok(id)
}

/// Insert a location with a caller-chosen id
pub async fn insert_location<'e, E>(executor: E, location: &Location) -> Result<()>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    sqlx::query("INSERT INTO locations (id, name) VALUES (?, ?)")
        .bind(&location.id)
        .bind(&location.name)
        .execute(executor)
        .await?;
    Ok(())
}

/// Create a location; the name is trimmed and must be unique ignoring case
pub async fn create_location(pool: &SqlitePool, name: &str) -> Result<Location> {
    let name = clean_name(name)?;

    if find_by_name(pool, &name).await?.is_some() {
        return Err(Error::Conflict(format!(
            "A location named {:?} already exists",
            name
        )));
    }

    let location = Location {
        id: prefixed_id("loc"),
        name,
    };
    insert_location(pool, &location).await?;
    Ok(location)
}

/// Rename a location; renaming to a different casing of itself is allowed
pub async fn rename_location(pool: &SqlitePool, id: &str, name: &str) -> Result<Location> {
    let name = clean_name(name)?;

    if let Some(existing) = find_by_name(pool, &name).await? {
        if existing != id {
            return Err(Error::Conflict(format!(
                "A location named {:?} already exists",
                name
            )));
        }
    }

    let result = sqlx::query(
        "UPDATE locations SET name = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?",
    )
    .bind(&name)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("Location {}", id)));
    }

    Ok(Location {
        id: id.to_string(),
        name,
    })
}

pub async fn delete_location(pool: &SqlitePool, id: &str) -> Result<()> {
    let result = sqlx::query("DELETE FROM locations WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("Location {}", id)));
    }
    Ok(())
}

pub async fn count_locations(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM locations")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
