//! Inventory data model
//!
//! Templates describe a class of physical item, inventory items are the
//! trackable instances of a template, locations are the places items live.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Situation code assigned to new items ("U": in use)
pub const DEFAULT_SITUATION: &str = "U";

/// Free-text attributes shared by every instance of a template
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateAttributes {
    #[serde(default)]
    pub asset_code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub model: String,
    #[serde(default, rename = "type")]
    pub item_type: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub dimensions: String,
    #[serde(default)]
    pub other: String,
    #[serde(default)]
    pub origin: String,
}

impl TemplateAttributes {
    /// Attribute values in canonical order
    ///
    /// The order is part of the signature contract: changing it changes
    /// which legacy rows deduplicate together.
    pub fn values(&self) -> [&str; 9] {
        [
            self.asset_code.as_str(),
            self.name.as_str(),
            self.brand.as_str(),
            self.model.as_str(),
            self.item_type.as_str(),
            self.color.as_str(),
            self.dimensions.as_str(),
            self.other.as_str(),
            self.origin.as_str(),
        ]
    }
}

/// Reusable description of a class of item (e.g. "HP Probook Laptop")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemTemplate {
    pub id: String,
    #[serde(flatten)]
    pub attributes: TemplateAttributes,
}

/// One physical, trackable instance of a template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: String,
    /// 1-based sequence number across the whole inventory
    pub position: i64,
    pub template_id: String,
    pub location: String,
    pub serial: String,
    pub situation: String,
    pub conservation_state: String,
    #[serde(default)]
    pub observations: String,
}

/// Item fields supplied by the caller; id and position are assigned on insert
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewInventoryItem {
    pub template_id: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub serial: String,
    #[serde(default = "default_situation")]
    pub situation: String,
    #[serde(default = "default_conservation_state")]
    pub conservation_state: String,
    #[serde(default)]
    pub observations: String,
}

fn default_situation() -> String {
    DEFAULT_SITUATION.to_string()
}

fn default_conservation_state() -> String {
    ConservationState::default().to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    pub name: String,
}

/// Known conservation states
///
/// Stored as free text: rows migrated from older data may carry other values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConservationState {
    #[default]
    Bueno,
    Regular,
    Malo,
}

impl ConservationState {
    pub const ALL: [ConservationState; 3] = [
        ConservationState::Bueno,
        ConservationState::Regular,
        ConservationState::Malo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConservationState::Bueno => "BUENO",
            ConservationState::Regular => "REGULAR",
            ConservationState::Malo => "MALO",
        }
    }
}

impl fmt::Display for ConservationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConservationState {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "BUENO" => Ok(ConservationState::Bueno),
            "REGULAR" => Ok(ConservationState::Regular),
            "MALO" => Ok(ConservationState::Malo),
            other => Err(crate::Error::InvalidInput(format!(
                "Unknown conservation state: {}",
                other
            ))),
        }
    }
}
