use axum::extract::{Extension, Path};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::api::validate::ValidatedJson;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::models::ListItem;
use crate::services::{ItemPatch, NewItem};
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequest {
    #[validate(required(message = "name is required"), length(min = 1, max = 200, message = "name must be 1-200 characters"))]
    pub name: Option<String>,
    #[validate(range(min = 0.0, message = "quantity must not be negative"))]
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub category_id: Option<Uuid>,
    pub notes: Option<String>,
    pub estimated_price: Option<Decimal>,
    pub position: Option<i32>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemRequest {
    #[validate(length(min = 1, max = 200, message = "name must be 1-200 characters"))]
    pub name: Option<String>,
    #[validate(range(min = 0.0, message = "quantity must not be negative"))]
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub category_id: Option<Uuid>,
    pub notes: Option<String>,
    pub estimated_price: Option<Decimal>,
    pub position: Option<i32>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CheckItemRequest {
    pub actual_price: Option<Decimal>,
}

/// POST /api/v1/lists/:id/items - Add an item to a list
pub async fn create(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(list_id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<CreateItemRequest>,
) -> ApiResult<ListItem> {
    let item = NewItem {
        name: body.name.unwrap_or_default(),
        quantity: body.quantity,
        unit: body.unit,
        category_id: body.category_id,
        notes: body.notes,
        estimated_price: body.estimated_price,
        position: body.position,
    };

    let created = state.items.create(list_id, auth.user_id, item).await?;
    Ok(ApiResponse::created(created))
}

/// PATCH /api/v1/items/:itemId - Partial update; null fields are left unchanged
pub async fn update(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(item_id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<UpdateItemRequest>,
) -> ApiResult<ListItem> {
    let patch = ItemPatch {
        name: body.name,
        quantity: body.quantity,
        unit: body.unit,
        category_id: body.category_id,
        notes: body.notes,
        estimated_price: body.estimated_price,
        position: body.position,
    };

    let item = state.items.update(item_id, auth.user_id, patch).await?;
    Ok(ApiResponse::success(item))
}

/// DELETE /api/v1/items/:itemId
pub async fn destroy(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(item_id): Path<Uuid>,
) -> ApiResult<()> {
    state.items.delete(item_id, auth.user_id).await?;
    Ok(ApiResponse::<()>::no_content())
}

/// POST /api/v1/items/:itemId/check - Flip the checked state; body is optional
pub async fn check(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(item_id): Path<Uuid>,
    body: Option<ValidatedJson<CheckItemRequest>>,
) -> ApiResult<ListItem> {
    let actual_price = body.and_then(|ValidatedJson(b)| b.actual_price);
    let item = state.items.toggle_check(item_id, auth.user_id, actual_price).await?;
    Ok(ApiResponse::success(item))
}
