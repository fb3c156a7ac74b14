use axum::extract::{Extension, Path, Query};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::api::pagination::{PageMeta, PageQuery, Pagination};
use crate::api::validate::ValidatedJson;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::models::PantryItem;
use crate::services::{NewPantryItem, PantryItemPatch};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PantryIndexQuery {
    #[serde(flatten)]
    pub page: PageQuery,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePantryItemRequest {
    #[validate(required(message = "name is required"), length(min = 1, max = 200, message = "name must be 1-200 characters"))]
    pub name: Option<String>,
    #[validate(range(min = 0.0, message = "quantity must not be negative"))]
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub category_id: Option<Uuid>,
    pub expires_at: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePantryItemRequest {
    #[validate(length(min = 1, max = 200, message = "name must be 1-200 characters"))]
    pub name: Option<String>,
    #[validate(range(min = 0.0, message = "quantity must not be negative"))]
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub category_id: Option<Uuid>,
    pub expires_at: Option<NaiveDate>,
}

/// GET /api/v1/pantry - The requester's pantry, paginated
pub async fn index(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<PantryIndexQuery>,
) -> ApiResult<Vec<PantryItem>> {
    let page = Pagination::from_query(&query.page);
    let (items, total) = state
        .pantry
        .get_by_user(auth.user_id, &page, query.search.as_deref())
        .await?;
    Ok(ApiResponse::paginated(items, PageMeta::new(&page, total)))
}

/// POST /api/v1/pantry
pub async fn create(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<AuthUser>,
    ValidatedJson(body): ValidatedJson<CreatePantryItemRequest>,
) -> ApiResult<PantryItem> {
    let item = NewPantryItem {
        name: body.name.unwrap_or_default(),
        quantity: body.quantity,
        unit: body.unit,
        category_id: body.category_id,
        expires_at: body.expires_at,
    };

    let created = state.pantry.create(auth.user_id, item).await?;
    Ok(ApiResponse::created(created))
}

/// GET /api/v1/pantry/:id
pub async fn show(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(item_id): Path<Uuid>,
) -> ApiResult<PantryItem> {
    let item = state.pantry.get_by_id(item_id, auth.user_id).await?;
    Ok(ApiResponse::success(item))
}

/// PATCH /api/v1/pantry/:id
pub async fn update(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(item_id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<UpdatePantryItemRequest>,
) -> ApiResult<PantryItem> {
    let patch = PantryItemPatch {
        name: body.name,
        quantity: body.quantity,
        unit: body.unit,
        category_id: body.category_id,
        expires_at: body.expires_at,
    };

    let item = state.pantry.update(item_id, auth.user_id, patch).await?;
    Ok(ApiResponse::success(item))
}

/// DELETE /api/v1/pantry/:id
pub async fn destroy(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(item_id): Path<Uuid>,
) -> ApiResult<()> {
    state.pantry.delete(item_id, auth.user_id).await?;
    Ok(ApiResponse::<()>::no_content())
}
