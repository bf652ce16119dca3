//! invtrack-server library - inventory HTTP API
//!
//! JSON endpoints over item templates, inventory items and locations.

use axum::Router;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;
pub mod extract;
pub mod pagination;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    let api = Router::new()
        .route(
            "/api/templates",
            get(api::list_templates).post(api::create_template),
        )
        .route(
            "/api/templates/:id",
            get(api::get_template)
                .put(api::update_template)
                .delete(api::delete_template),
        )
        .route("/api/items", get(api::list_items))
        .route("/api/items/stock", post(api::add_stock))
        .route(
            "/api/items/:id",
            get(api::get_item).put(api::update_item).delete(api::delete_item),
        )
        .route("/api/conservation-states", get(api::conservation_states))
        .route(
            "/api/locations",
            get(api::list_locations).post(api::create_location),
        )
        .route(
            "/api/locations/:id",
            get(api::get_location)
                .put(api::rename_location)
                .delete(api::delete_location),
        );

    Router::new()
        .merge(api)
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
