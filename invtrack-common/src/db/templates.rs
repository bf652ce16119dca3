//! Item template queries

use crate::models::{ItemTemplate, TemplateAttributes};
use crate::uuid_utils::prefixed_id;
use crate::{Error, Result};
use serde::Deserialize;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite, SqlitePool};

const TEMPLATE_COLUMNS: &str = "id, asset_code, name, brand, model, item_type, color, dimensions, other, origin";

/// Partial update; `None` leaves the stored value unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplatePatch {
    pub asset_code: Option<String>,
    pub name: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    #[serde(rename = "type")]
    pub item_type: Option<String>,
    pub color: Option<String>,
    pub dimensions: Option<String>,
    pub other: Option<String>,
    pub origin: Option<String>,
}

impl TemplatePatch {
    fn apply(self, attributes: &mut TemplateAttributes) {
        let fields = [
            (self.asset_code, &mut attributes.asset_code),
            (self.name, &mut attributes.name),
            (self.brand, &mut attributes.brand),
            (self.model, &mut attributes.model),
            (self.item_type, &mut attributes.item_type),
            (self.color, &mut attributes.color),
            (self.dimensions, &mut attributes.dimensions),
            (self.other, &mut attributes.other),
            (self.origin, &mut attributes.origin),
        ];
        for (value, slot) in fields {
            if let Some(value) = value {
                *slot = value;
            }
        }
    }
}

fn template_from_row(row: &SqliteRow) -> ItemTemplate {
    ItemTemplate {
        id: row.get("id"),
        attributes: TemplateAttributes {
            asset_code: row.get("asset_code"),
            name: row.get("name"),
            brand: row.get("brand"),
            model: row.get("model"),
            item_type: row.get("item_type"),
            color: row.get("color"),
            dimensions: row.get("dimensions"),
            other: row.get("other"),
            origin: row.get("origin"),
        },
    }
}

/// User-created templates need an asset code and a name
fn validate(attributes: &TemplateAttributes) -> Result<()> {
    if attributes.asset_code.trim().is_empty() || attributes.name.trim().is_empty() {
        return Err(Error::InvalidInput(
            "Asset code and name are required".to_string(),
        ));
    }
    Ok(())
}

/// All templates ordered by name
pub async fn list_templates(pool: &SqlitePool) -> Result<Vec<ItemTemplate>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM item_templates ORDER BY name COLLATE NOCASE, id",
        TEMPLATE_COLUMNS
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(template_from_row).collect())
}

pub async fn get_template(pool: &SqlitePool, id: &str) -> Result<Option<ItemTemplate>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM item_templates WHERE id = ?",
        TEMPLATE_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(template_from_row))
}

pub async fn count_templates(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM item_templates")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Insert a template with a caller-chosen id
///
/// Takes any executor so the legacy migration can run inside a transaction.
pub async fn insert_template<'e, E>(executor: E, template: &ItemTemplate) -> Result<()>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let a = &template.attributes;
    sqlx::query(
        r#"
        INSERT INTO item_templates (
            id, asset_code, name, brand, model, item_type, color, dimensions, other, origin
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&template.id)
    .bind(&a.asset_code)
    .bind(&a.name)
    .bind(&a.brand)
    .bind(&a.model)
    .bind(&a.item_type)
    .bind(&a.color)
    .bind(&a.dimensions)
    .bind(&a.other)
    .bind(&a.origin)
    .execute(executor)
    .await?;

    Ok(())
}

/// Register a new template and return it with its generated id
pub async fn create_template(
    pool: &SqlitePool,
    attributes: TemplateAttributes,
) -> Result<ItemTemplate> {
    validate(&attributes)?;

    let template = ItemTemplate {
        id: prefixed_id("tpl"),
        attributes,
    };
    insert_template(pool, &template).await?;

    Ok(template)
}

/// Apply a partial update and return the stored result
pub async fn update_template(
    pool: &SqlitePool,
    id: &str,
    patch: TemplatePatch,
) -> Result<ItemTemplate> {
    let mut template = get_template(pool, id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Template {}", id)))?;

    patch.apply(&mut template.attributes);
    validate(&template.attributes)?;

    let a = &template.attributes;
    sqlx::query(
        r#"
        UPDATE item_templates SET
            asset_code = ?, name = ?, brand = ?, model = ?, item_type = ?,
            color = ?, dimensions = ?, other = ?, origin = ?,
            updated_at = CURRENT_TIMESTAMP
        WHERE id = ?
        "#,
    )
    .bind(&a.asset_code)
    .bind(&a.name)
    .bind(&a.brand)
    .bind(&a.model)
    .bind(&a.item_type)
    .bind(&a.color)
    .bind(&a.dimensions)
    .bind(&a.other)
    .bind(&a.origin)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(template)
}

/// Delete a template that no inventory item references
pub async fn delete_template(pool: &SqlitePool, id: &str) -> Result<()> {
    let in_use: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM inventory_items WHERE template_id = ?")
        .bind(id)
        .fetch_one(pool)
        .await?;

    if in_use > 0 {
        return Err(Error::Conflict(format!(
            "Template {} is referenced by {} inventory items",
            id, in_use
        )));
    }

    let result = sqlx::query("DELETE FROM item_templates WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("Template {}", id)));
    }

    Ok(())
}
