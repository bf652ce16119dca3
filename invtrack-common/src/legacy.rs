//! Legacy inventory rows
//!
//! The older schema kept one flat row per physical item, mixing template
//! attributes (brand, model, ...) with instance data (series). Rows are read
//! generically so that unexpected or missing columns never abort a migration.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::{Column, Row, SqlitePool, ValueRef};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Field keys read from legacy rows
pub mod fields {
    pub const ASSET_CODE: &str = "assetCode";
    pub const NAME: &str = "name";
    pub const BRAND: &str = "brand";
    pub const MODEL: &str = "model";
    pub const COLOR: &str = "color";
    pub const DIMENSIONS: &str = "dimensions";
    pub const OTHER: &str = "other";
    pub const ORIGIN: &str = "origin";
    pub const SERIES: &str = "series";
}

/// Flat, pre-normalization record keyed by column name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LegacyRow(BTreeMap<String, Value>);

impl LegacyRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// String form of a field; absent and null fields read as ""
    pub fn field(&self, key: &str) -> String {
        match self.0.get(key) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            Some(other) => other.to_string(),
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for LegacyRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        LegacyRow(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Validate a table name before interpolating it into SQL
pub fn is_valid_table_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() < 100
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Read every row of the legacy table
///
/// Never fails: a missing table, an invalid table name or a driver error is
/// logged and reported as "no legacy data".
pub async fn fetch_legacy_rows(pool: &SqlitePool, table: &str) -> Vec<LegacyRow> {
    if !is_valid_table_name(table) {
        warn!("Ignoring invalid legacy table name: {:?}", table);
        return Vec::new();
    }

    let rows = match sqlx::query(&format!("SELECT * FROM {}", table))
        .fetch_all(pool)
        .await
    {
        Ok(rows) => rows,
        Err(e) => {
            warn!("Legacy table {} not found or unreadable: {}", table, e);
            return Vec::new();
        }
    };

    info!("Read {} legacy rows from {}", rows.len(), table);

    rows.iter()
        .map(|row| {
            row.columns()
                .iter()
                .enumerate()
                .map(|(i, col)| (col.name().to_string(), column_value(row, i)))
                .collect::<LegacyRow>()
        })
        .collect()
}

/// Convert one SQLite value to a JSON scalar
fn column_value(row: &sqlx::sqlite::SqliteRow, i: usize) -> Value {
    row.try_get_raw(i)
        .ok()
        .and_then(|val| {
            if val.is_null() {
                Some(Value::Null)
            } else {
                row.try_get::<String, _>(i)
                    .ok()
                    .map(Value::String)
                    .or_else(|| row.try_get::<i64, _>(i).ok().map(|v| json!(v)))
                    .or_else(|| row.try_get::<f64, _>(i).ok().map(real_value))
            }
        })
        .unwrap_or(Value::Null)
}

/// Whole REAL values read like integers ("1", not "1.0")
fn real_value(v: f64) -> Value {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
        json!(v as i64)
    } else {
        json!(v)
    }
}
