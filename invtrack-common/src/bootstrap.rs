//! Startup bootstrap
//!
//! Runs once per process start, after the schema exists:
//! 1. If both the template and item tables are empty, read the legacy table,
//!    normalize it and persist the result in a single transaction.
//! 2. If no locations exist yet, seed them from the locations already used
//!    by inventory items.
//!
//! A missing or unreadable legacy table is not an error; it simply means
//! there is nothing to migrate.

use crate::config::InventoryConfig;
use crate::db::{count_all_items, count_locations, count_templates, create_location, insert_item, insert_template, list_item_locations};
use crate::legacy::fetch_legacy_rows;
use crate::normalize::{normalize_legacy_rows, NormalizedInventory};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{info, warn};

/// What the bootstrap changed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BootstrapReport {
    /// True when legacy rows were normalized and persisted
    pub migration_ran: bool,
    pub legacy_rows: usize,
    pub templates_created: usize,
    pub items_created: usize,
    pub locations_created: usize,
    pub completed_at: DateTime<Utc>,
}

/// Persist a normalization result: every template, then every item
///
/// Runs in one transaction so a failure leaves the tables empty and the
/// migration can be retried on the next start.
pub async fn persist_normalized(
    pool: &SqlitePool,
    source_table: &str,
    legacy_rows: usize,
    normalized: &NormalizedInventory,
) -> Result<()> {
    let mut tx = pool.begin().await?;

    for template in &normalized.templates {
        insert_template(&mut *tx, template).await?;
    }
    for item in &normalized.items {
        insert_item(&mut *tx, item).await?;
    }

    sqlx::query(
        r#"
        INSERT INTO legacy_migrations (
            source_table, rows_read, templates_created, items_created, migrated_at
        ) VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(source_table)
    .bind(legacy_rows as i64)
    .bind(normalized.templates.len() as i64)
    .bind(normalized.items.len() as i64)
    .bind(Utc::now().to_rfc3339())
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}

/// Migrate legacy rows when the normalized tables are empty
///
/// Returns `(rows_read, normalized)` when a migration was persisted.
pub async fn migrate_legacy(
    pool: &SqlitePool,
    source_table: &str,
) -> Result<Option<(usize, NormalizedInventory)>> {
    let templates = count_templates(pool).await?;
    let items = count_all_items(pool).await?;
    if templates > 0 || items > 0 {
        info!(
            "Inventory already populated ({} templates, {} items), skipping legacy migration",
            templates, items
        );
        return Ok(None);
    }

    info!("No data in inventory tables, checking legacy table {}", source_table);
    let rows = fetch_legacy_rows(pool, source_table).await;
    if rows.is_empty() {
        info!("No legacy data to migrate");
        return Ok(None);
    }

    info!("Processing {} legacy items...", rows.len());
    let normalized = normalize_legacy_rows(&rows);
    persist_normalized(pool, source_table, rows.len(), &normalized).await?;

    info!(
        "✓ Migrated {} legacy rows into {} templates and {} items",
        rows.len(),
        normalized.templates.len(),
        normalized.items.len()
    );
    Ok(Some((rows.len(), normalized)))
}

/// Create locations from item locations when none exist yet
///
/// Returns the number of locations created. Names that collide ignoring
/// case are skipped.
pub async fn seed_locations(pool: &SqlitePool) -> Result<usize> {
    if count_locations(pool).await? > 0 {
        return Ok(0);
    }

    let mut created = 0;
    for name in list_item_locations(pool).await? {
        match create_location(pool, &name).await {
            Ok(_) => created += 1,
            Err(Error::Conflict(_)) => warn!("Location already exists: {}", name),
            Err(e) => return Err(e),
        }
    }

    if created > 0 {
        info!("✓ Seeded {} locations from inventory items", created);
    }
    Ok(created)
}

/// Bring a freshly opened database to a usable state
pub async fn load_initial_data(
    pool: &SqlitePool,
    config: &InventoryConfig,
) -> Result<BootstrapReport> {
    let migrated = if config.migrate_legacy {
        migrate_legacy(pool, &config.legacy_table).await?
    } else {
        info!("Legacy migration disabled");
        None
    };

    let locations_created = seed_locations(pool).await?;

    let report = match migrated {
        Some((legacy_rows, normalized)) => BootstrapReport {
            migration_ran: true,
            legacy_rows,
            templates_created: normalized.templates.len(),
            items_created: normalized.items.len(),
            locations_created,
            completed_at: Utc::now(),
        },
        None => BootstrapReport {
            migration_ran: false,
            legacy_rows: 0,
            templates_created: 0,
            items_created: 0,
            locations_created,
            completed_at: Utc::now(),
        },
    };

    Ok(report)
}
