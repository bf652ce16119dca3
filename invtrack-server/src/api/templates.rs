//! Item template endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use invtrack_common::db::{self, TemplatePatch};
use invtrack_common::models::{ItemTemplate, TemplateAttributes};
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::extract::ApiJson;
use crate::AppState;

/// GET /api/templates
///
/// All templates ordered by name.
pub async fn list_templates(State(state): State<AppState>) -> ApiResult<Json<Vec<ItemTemplate>>> {
    Ok(Json(db::list_templates(&state.db).await?))
}

/// GET /api/templates/:id
pub async fn get_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ItemTemplate>> {
    db::get_template(&state.db, &id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Template {}", id)))
}

/// POST /api/templates
///
/// Asset code and name are required; other attributes default to "".
pub async fn create_template(
    State(state): State<AppState>,
    ApiJson(attributes): ApiJson<TemplateAttributes>,
) -> ApiResult<(StatusCode, Json<ItemTemplate>)> {
    let template = db::create_template(&state.db, attributes).await?;
    info!("✓ Added template: {} ({})", template.attributes.name, template.id);
    Ok((StatusCode::CREATED, Json(template)))
}

/// PUT /api/templates/:id
pub async fn update_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<TemplatePatch>,
) -> ApiResult<Json<ItemTemplate>> {
    Ok(Json(db::update_template(&state.db, &id, patch).await?))
}

/// DELETE /api/templates/:id
///
/// 409 while inventory items still reference the template.
pub async fn delete_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    db::delete_template(&state.db, &id).await?;
    info!("Deleted template {}", id);
    Ok(StatusCode::NO_CONTENT)
}
