//! Inventory item endpoints
//!
//! Listing supports the dashboard filters: free-text search over template
//! name, asset code and serial, plus exact location and conservation state.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use invtrack_common::db::{self, InventoryRecord, ItemFilter, ItemPatch, StockIntake};
use invtrack_common::models::InventoryItem;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::extract::{ApiJson, ApiQuery};
use crate::pagination::Page;
use crate::AppState;

/// Query parameters for the inventory listing
#[derive(Debug, Deserialize)]
pub struct ItemsQuery {
    /// Page number (1-indexed)
    pub page: Option<i64>,
    /// Rows per page, capped at `MAX_PAGE_SIZE`
    pub page_size: Option<i64>,
    pub search: Option<String>,
    pub location: Option<String>,
    pub conservation_state: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ItemsResponse {
    pub total_results: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
    pub items: Vec<InventoryRecord>,
}

/// GET /api/items
pub async fn list_items(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ItemsQuery>,
) -> ApiResult<Json<ItemsResponse>> {
    let filter = ItemFilter {
        search: query.search,
        location: query.location,
        conservation_state: query.conservation_state,
    };

    let total_results = db::count_items(&state.db, &filter).await?;
    let page = Page::new(total_results, query.page, query.page_size);
    let items = db::list_items(&state.db, &filter, Some(page.size), page.offset).await?;

    Ok(Json(ItemsResponse {
        total_results,
        page: page.number,
        page_size: page.size,
        total_pages: page.total_pages,
        items,
    }))
}

/// GET /api/items/:id
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<InventoryItem>> {
    db::get_item(&state.db, &id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Inventory item {}", id)))
}

/// POST /api/items/stock
///
/// Expands per-state quantities into individual items appended after the
/// current last position.
pub async fn add_stock(
    State(state): State<AppState>,
    ApiJson(intake): ApiJson<StockIntake>,
) -> ApiResult<(StatusCode, Json<Vec<InventoryItem>>)> {
    let items = intake.into_items()?;
    let created = db::create_items(&state.db, items).await?;
    info!("✓ Added {} items to inventory", created.len());
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/items/:id
pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<ItemPatch>,
) -> ApiResult<Json<InventoryItem>> {
    Ok(Json(db::update_item(&state.db, &id, patch).await?))
}

/// DELETE /api/items/:id
pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    db::delete_item(&state.db, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/conservation-states
///
/// Distinct states present in the inventory, for the dashboard filter.
pub async fn conservation_states(State(state): State<AppState>) -> ApiResult<Json<Vec<String>>> {
    Ok(Json(db::list_conservation_states(&state.db).await?))
}
