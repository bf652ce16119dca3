//! Inventory item queries
//!
//! Items are always listed by `position`. New items continue numbering after
//! the current maximum so positions stay unique and gap-tolerant.

use crate::db::templates::get_template;
use crate::models::{ConservationState, InventoryItem, ItemTemplate, NewInventoryItem, TemplateAttributes, DEFAULT_SITUATION};
use crate::uuid_utils::prefixed_id;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use tracing::debug;

/// Inventory listing filter; empty fields match everything
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemFilter {
    /// Case-insensitive substring of template name, asset code or serial
    pub search: Option<String>,
    /// Exact location name
    pub location: Option<String>,
    /// Exact conservation state
    pub conservation_state: Option<String>,
}

/// Item joined with its template, as shown in the inventory table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryRecord {
    #[serde(flatten)]
    pub item: InventoryItem,
    pub template: ItemTemplate,
}

/// Partial update; `None` leaves the stored value unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemPatch {
    pub position: Option<i64>,
    pub template_id: Option<String>,
    pub location: Option<String>,
    pub serial: Option<String>,
    pub situation: Option<String>,
    pub conservation_state: Option<String>,
    pub observations: Option<String>,
}

/// Largest number of units a single stock intake may create
pub const MAX_STOCK_UNITS: u64 = 10_000;

/// Units received per conservation state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct StockQuantities {
    #[serde(default)]
    pub bueno: u32,
    #[serde(default)]
    pub regular: u32,
    #[serde(default)]
    pub malo: u32,
}

impl StockQuantities {
    pub fn get(&self, state: ConservationState) -> u32 {
        match state {
            ConservationState::Bueno => self.bueno,
            ConservationState::Regular => self.regular,
            ConservationState::Malo => self.malo,
        }
    }

    pub fn total(&self) -> u64 {
        ConservationState::ALL
            .iter()
            .map(|s| u64::from(self.get(*s)))
            .sum()
    }
}

/// Batch intake of identical items from one template
///
/// Expands to one item per unit. Serials start empty and are filled in
/// individually later.
#[derive(Debug, Clone, Deserialize)]
pub struct StockIntake {
    pub template_id: String,
    pub location: String,
    pub quantities: StockQuantities,
    #[serde(default)]
    pub observations: String,
}

impl StockIntake {
    pub fn into_items(self) -> Result<Vec<NewInventoryItem>> {
        let location = self.location.trim().to_string();
        if self.template_id.trim().is_empty() || location.is_empty() {
            return Err(Error::InvalidInput(
                "An item template and a location are required".to_string(),
            ));
        }
        if self.quantities.total() == 0 {
            return Err(Error::InvalidInput(
                "Quantity must be greater than zero".to_string(),
            ));
        }
        if self.quantities.total() > MAX_STOCK_UNITS {
            return Err(Error::InvalidInput(format!(
                "At most {} units can be added at once",
                MAX_STOCK_UNITS
            )));
        }

        let mut items = Vec::with_capacity(self.quantities.total() as usize);
        for state in ConservationState::ALL {
            for _ in 0..self.quantities.get(state) {
                items.push(NewInventoryItem {
                    template_id: self.template_id.clone(),
                    location: location.clone(),
                    serial: String::new(),
                    situation: DEFAULT_SITUATION.to_string(),
                    conservation_state: state.to_string(),
                    observations: self.observations.clone(),
                });
            }
        }
        Ok(items)
    }
}

fn item_from_row(row: &SqliteRow) -> InventoryItem {
    InventoryItem {
        id: row.get("id"),
        position: row.get("position"),
        template_id: row.get("template_id"),
        location: row.get("location"),
        serial: row.get("serial"),
        situation: row.get("situation"),
        conservation_state: row.get("conservation_state"),
        observations: row.get("observations"),
    }
}

fn record_from_row(row: &SqliteRow) -> InventoryRecord {
    InventoryRecord {
        item: item_from_row(row),
        template: ItemTemplate {
            id: row.get("template_id"),
            attributes: TemplateAttributes {
                asset_code: row.get("t_asset_code"),
                name: row.get("t_name"),
                brand: row.get("t_brand"),
                model: row.get("t_model"),
                item_type: row.get("t_item_type"),
                color: row.get("t_color"),
                dimensions: row.get("t_dimensions"),
                other: row.get("t_other"),
                origin: row.get("t_origin"),
            },
        },
    }
}

impl InventoryRecord {
    /// Case-insensitive substring match over template name, asset code and serial
    ///
    /// `needle` must already be lowercased. SQLite's `LOWER()` folds ASCII only,
    /// so folding is done on this side.
    pub fn matches_search(&self, needle: &str) -> bool {
        [
            &self.template.attributes.name,
            &self.template.attributes.asset_code,
            &self.item.serial,
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Lowercased search term, if any
fn search_needle(filter: &ItemFilter) -> Option<String> {
    non_empty(&filter.search).map(str::to_lowercase)
}

/// Exact-match filters; search is applied in Rust afterwards
fn push_filter<'a>(qb: &mut QueryBuilder<'a, Sqlite>, filter: &'a ItemFilter) {
    qb.push(" WHERE 1 = 1");

    if let Some(location) = non_empty(&filter.location) {
        qb.push(" AND i.location = ").push_bind(location);
    }
    if let Some(state) = non_empty(&filter.conservation_state) {
        qb.push(" AND i.conservation_state = ").push_bind(state);
    }
}

async fn fetch_records(
    pool: &SqlitePool,
    filter: &ItemFilter,
    limit: Option<i64>,
    offset: i64,
) -> Result<Vec<InventoryRecord>> {
    let mut qb = QueryBuilder::<Sqlite>::new(
        r#"
        SELECT i.id, i.position, i.template_id, i.location, i.serial, i.situation,
               i.conservation_state, i.observations,
               t.asset_code AS t_asset_code, t.name AS t_name, t.brand AS t_brand,
               t.model AS t_model, t.item_type AS t_item_type, t.color AS t_color,
               t.dimensions AS t_dimensions, t.other AS t_other, t.origin AS t_origin
        FROM inventory_items i
        JOIN item_templates t ON t.id = i.template_id
        "#,
    );
    push_filter(&mut qb, filter);
    qb.push(" ORDER BY i.position, i.id");

    if let Some(limit) = limit {
        qb.push(" LIMIT ").push_bind(limit).push(" OFFSET ").push_bind(offset);
    }

    let rows = qb.build().fetch_all(pool).await?;
    Ok(rows.iter().map(record_from_row).collect())
}

/// Number of items matching `filter`
///
/// Items whose template no longer exists are excluded, as in listings.
pub async fn count_items(pool: &SqlitePool, filter: &ItemFilter) -> Result<i64> {
    if let Some(needle) = search_needle(filter) {
        let records = fetch_records(pool, filter, None, 0).await?;
        return Ok(records.iter().filter(|r| r.matches_search(&needle)).count() as i64);
    }

    let mut qb = QueryBuilder::<Sqlite>::new(
        "SELECT COUNT(*) FROM inventory_items i JOIN item_templates t ON t.id = i.template_id",
    );
    push_filter(&mut qb, filter);

    let count: i64 = qb.build_query_scalar().fetch_one(pool).await?;
    Ok(count)
}

/// Items matching `filter`, joined with their templates, by position
pub async fn list_items(
    pool: &SqlitePool,
    filter: &ItemFilter,
    limit: Option<i64>,
    offset: i64,
) -> Result<Vec<InventoryRecord>> {
    let Some(needle) = search_needle(filter) else {
        return fetch_records(pool, filter, limit, offset).await;
    };

    let matching = fetch_records(pool, filter, None, 0)
        .await?
        .into_iter()
        .filter(|r| r.matches_search(&needle))
        .skip(offset.max(0) as usize);

    Ok(match limit {
        Some(limit) => matching.take(limit.max(0) as usize).collect(),
        None => matching.collect(),
    })
}

pub async fn get_item(pool: &SqlitePool, id: &str) -> Result<Option<InventoryItem>> {
    let row = sqlx::query(
        r#"
        SELECT id, position, template_id, location, serial, situation,
               conservation_state, observations
        FROM inventory_items
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(item_from_row))
}

pub async fn count_all_items(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM inventory_items")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Highest position in use, 0 when the inventory is empty
pub async fn max_position<'e, E>(executor: E) -> Result<i64>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let max: Option<i64> = sqlx::query_scalar("SELECT MAX(position) FROM inventory_items")
        .fetch_one(executor)
        .await?;
    Ok(max.unwrap_or(0))
}

/// Insert an item with caller-chosen id and position
pub async fn insert_item<'e, E>(executor: E, item: &InventoryItem) -> Result<()>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO inventory_items (
            id, position, template_id, location, serial, situation,
            conservation_state, observations
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&item.id)
    .bind(item.position)
    .bind(&item.template_id)
    .bind(&item.location)
    .bind(&item.serial)
    .bind(&item.situation)
    .bind(&item.conservation_state)
    .bind(&item.observations)
    .execute(executor)
    .await?;

    Ok(())
}

/// Insert a batch of items, numbering positions after the current maximum
///
/// All-or-nothing: an unknown template anywhere in the batch inserts nothing.
pub async fn create_items(
    pool: &SqlitePool,
    items: Vec<NewInventoryItem>,
) -> Result<Vec<InventoryItem>> {
    let mut tx = pool.begin().await?;
    let last_position = max_position(&mut *tx).await?;

    let mut created = Vec::with_capacity(items.len());
    for (index, new_item) in items.into_iter().enumerate() {
        let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM item_templates WHERE id = ?")
            .bind(&new_item.template_id)
            .fetch_one(&mut *tx)
            .await?;
        if exists == 0 {
            return Err(Error::InvalidInput(format!(
                "Unknown item template: {}",
                new_item.template_id
            )));
        }

        let item = InventoryItem {
            id: prefixed_id("item"),
            position: last_position + index as i64 + 1,
            template_id: new_item.template_id,
            location: new_item.location,
            serial: new_item.serial,
            situation: new_item.situation,
            conservation_state: new_item.conservation_state,
            observations: new_item.observations,
        };
        insert_item(&mut *tx, &item).await?;
        created.push(item);
    }

    tx.commit().await?;
    debug!("Created {} inventory items", created.len());
    Ok(created)
}

/// Apply a partial update and return the stored result
pub async fn update_item(pool: &SqlitePool, id: &str, patch: ItemPatch) -> Result<InventoryItem> {
    let mut item = get_item(pool, id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Inventory item {}", id)))?;

    if let Some(template_id) = patch.template_id {
        if get_template(pool, &template_id).await?.is_none() {
            return Err(Error::InvalidInput(format!(
                "Unknown item template: {}",
                template_id
            )));
        }
        item.template_id = template_id;
    }
    if let Some(position) = patch.position {
        if position < 1 {
            return Err(Error::InvalidInput("Position must be at least 1".to_string()));
        }
        item.position = position;
    }
    if let Some(location) = patch.location {
        item.location = location;
    }
    if let Some(serial) = patch.serial {
        item.serial = serial;
    }
    if let Some(situation) = patch.situation {
        item.situation = situation;
    }
    if let Some(state) = patch.conservation_state {
        item.conservation_state = state;
    }
    if let Some(observations) = patch.observations {
        item.observations = observations;
    }

    sqlx::query(
        r#"
        UPDATE inventory_items SET
            position = ?, template_id = ?, location = ?, serial = ?, situation = ?,
            conservation_state = ?, observations = ?, updated_at = CURRENT_TIMESTAMP
        WHERE id = ?
        "#,
    )
    .bind(item.position)
    .bind(&item.template_id)
    .bind(&item.location)
    .bind(&item.serial)
    .bind(&item.situation)
    .bind(&item.conservation_state)
    .bind(&item.observations)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(item)
}

pub async fn delete_item(pool: &SqlitePool, id: &str) -> Result<()> {
    let result = sqlx::query("DELETE FROM inventory_items WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("Inventory item {}", id)));
    }
    Ok(())
}

/// Distinct conservation states present in the inventory
pub async fn list_conservation_states(pool: &SqlitePool) -> Result<Vec<String>> {
    let states: Vec<String> = sqlx::query_scalar(
        "SELECT DISTINCT conservation_state FROM inventory_items ORDER BY conservation_state",
    )
    .fetch_all(pool)
    .await?;
    Ok(states)
}

/// Distinct trimmed, non-empty item locations in position order
pub async fn list_item_locations(pool: &SqlitePool) -> Result<Vec<String>> {
    let raw: Vec<String> = sqlx::query_scalar(
        "SELECT TRIM(location) FROM inventory_items WHERE TRIM(location) <> '' ORDER BY position, id",
    )
    .fetch_all(pool)
    .await?;

    let mut seen = std::collections::HashSet::new();
    Ok(raw
        .into_iter()
        .filter(|loc| seen.insert(loc.clone()))
        .collect())
}
