//! # invtrack Common Library
//!
//! Shared code for the inventory tracker:
//! - Item template / inventory item / location models
//! - Legacy row normalization (flat legacy rows to templates + items)
//! - Database schema and CRUD queries
//! - Startup bootstrap (legacy migration, location seeding)
//! - Configuration loading

pub mod bootstrap;
pub mod config;
pub mod db;
pub mod error;
pub mod legacy;
pub mod models;
pub mod normalize;
pub mod uuid_utils;

pub use error::{Error, Result};
pub use models::{ConservationState, InventoryItem, ItemTemplate, Location};
pub use normalize::{normalize_legacy_rows, NormalizedInventory};
