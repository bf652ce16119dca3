//! Legacy row normalization
//!
//! Folds flat legacy rows into deduplicated item templates plus one inventory
//! item per row. Pure and synchronous: identical input (in identical order)
//! always produces identical output, including identifier numbering.
//!
//! Identifiers are positional (`tpl-<k>`, `item-<i>`), so the output is only
//! safe to persist into empty tables.

use crate::legacy::{fields, LegacyRow};
use crate::models::{ConservationState, InventoryItem, ItemTemplate, TemplateAttributes, DEFAULT_SITUATION};
use serde::Serialize;
use std::collections::HashMap;

/// Legacy value meaning "no serial number"
pub const NO_SERIAL_SENTINEL: &str = "SIN SERIE";

/// Result of one normalization pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizedInventory {
    pub templates: Vec<ItemTemplate>,
    pub items: Vec<InventoryItem>,
}

/// Template attributes carried by a legacy row
///
/// Legacy rows have no item type column, so `item_type` is always empty.
pub fn template_attributes(row: &LegacyRow) -> TemplateAttributes {
    TemplateAttributes {
        asset_code: row.field(fields::ASSET_CODE),
        name: row.field(fields::NAME),
        brand: row.field(fields::BRAND),
        model: row.field(fields::MODEL),
        item_type: String::new(),
        color: row.field(fields::COLOR),
        dimensions: row.field(fields::DIMENSIONS),
        other: row.field(fields::OTHER),
        origin: row.field(fields::ORIGIN),
    }
}

/// Deduplication key for a template
///
/// Each attribute is trimmed and upper-cased, then the ordered list is
/// encoded as a JSON array. Quoting and escaping keep field boundaries
/// explicit, so ("AB", "C") and ("A", "BC") never share a key.
pub fn signature(attributes: &TemplateAttributes) -> String {
    let normalized: Vec<String> = attributes
        .values()
        .iter()
        .map(|v| v.trim().to_uppercase())
        .collect();

    // Serializing a Vec<String> cannot fail
    serde_json::to_string(&normalized).unwrap_or_default()
}

/// Serial number of a legacy row, with the "no serial" sentinel cleared
pub fn legacy_serial(row: &LegacyRow) -> String {
    let series = row.field(fields::SERIES);
    if series == NO_SERIAL_SENTINEL {
        String::new()
    } else {
        series
    }
}

/// Normalize legacy rows into templates and items
///
/// - the k-th distinct signature becomes template `tpl-<k>`
/// - row `i` (0-based) becomes item `item-<i+1>` at position `i+1`
/// - an empty input yields empty outputs
pub fn normalize_legacy_rows(rows: &[LegacyRow]) -> NormalizedInventory {
    let mut out = NormalizedInventory::default();
    let mut template_ids: HashMap<String, String> = HashMap::new();

    for (index, row) in rows.iter().enumerate() {
        let attributes = template_attributes(row);
        let key = signature(&attributes);

        let template_id = match template_ids.get(&key) {
            Some(id) => id.clone(),
            None => {
                let id = format!("tpl-{}", out.templates.len() + 1);
                template_ids.insert(key, id.clone());
                out.templates.push(ItemTemplate {
                    id: id.clone(),
                    attributes,
                });
                id
            }
        };

        let position = index as i64 + 1;
        out.items.push(InventoryItem {
            id: format!("item-{}", position),
            position,
            template_id,
            location: String::new(),
            serial: legacy_serial(row),
            situation: DEFAULT_SITUATION.to_string(),
            conservation_state: ConservationState::Bueno.to_string(),
            observations: String::new(),
        });
    }

    out
}
