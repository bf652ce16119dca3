//! HTTP API handlers for invtrack-server

pub mod health;
pub mod items;
pub mod locations;
pub mod templates;

pub use health::health_routes;
pub use items::{add_stock, conservation_states, delete_item, get_item, list_items, update_item};
pub use locations::{create_location, delete_location, get_location, list_locations, rename_location};
pub use templates::{create_template, delete_template, get_template, list_templates, update_template};
