use axum::extract::{Extension, Path, Query};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::api::pagination::{PageMeta, PageQuery, Pagination};
use crate::api::validate::ValidatedJson;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::models::Store;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StoreIndexQuery {
    #[serde(flatten)]
    pub page: PageQuery,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateStoreRequest {
    #[validate(required(message = "name is required"), length(min = 1, max = 200, message = "name must be 1-200 characters"))]
    pub name: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStoreRequest {
    #[validate(length(min = 1, max = 200, message = "name must be 1-200 characters"))]
    pub name: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteRequest {
    #[validate(required(message = "storeId is required"))]
    pub store_id: Option<Uuid>,
}

/// GET /api/v1/stores - Shared catalog, paginated
pub async fn index(
    Extension(state): Extension<AppState>,
    Query(query): Query<StoreIndexQuery>,
) -> ApiResult<Vec<Store>> {
    let page = Pagination::from_query(&query.page);
    let (stores, total) = state.stores.get_all(&page, query.search.as_deref()).await?;
    Ok(ApiResponse::paginated(stores, PageMeta::new(&page, total)))
}

/// POST /api/v1/stores
pub async fn create(
    Extension(state): Extension<AppState>,
    ValidatedJson(body): ValidatedJson<CreateStoreRequest>,
) -> ApiResult<Store> {
    let store = state
        .stores
        .create(body.name.unwrap_or_default(), body.address)
        .await?;
    Ok(ApiResponse::created(store))
}

/// GET /api/v1/stores/:id
pub async fn show(
    Extension(state): Extension<AppState>,
    Path(store_id): Path<Uuid>,
) -> ApiResult<Store> {
    let store = state.stores.get_by_id(store_id).await?;
    Ok(ApiResponse::success(store))
}

/// PATCH /api/v1/stores/:id
pub async fn update(
    Extension(state): Extension<AppState>,
    Path(store_id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<UpdateStoreRequest>,
) -> ApiResult<Store> {
    let store = state.stores.update(store_id, body.name, body.address).await?;
    Ok(ApiResponse::success(store))
}

/// DELETE /api/v1/stores/:id
pub async fn destroy(
    Extension(state): Extension<AppState>,
    Path(store_id): Path<Uuid>,
) -> ApiResult<()> {
    state.stores.delete(store_id).await?;
    Ok(ApiResponse::<()>::no_content())
}

/// GET /api/v1/stores/favorites - The requester's favorited stores
pub async fn favorites(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<Vec<Store>> {
    let stores = state.stores.get_favorites(auth.user_id).await?;
    Ok(ApiResponse::success(stores))
}

/// POST /api/v1/stores/favorites - Idempotent add
pub async fn add_favorite(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<AuthUser>,
    ValidatedJson(body): ValidatedJson<FavoriteRequest>,
) -> ApiResult<Store> {
    let store_id = body.store_id.unwrap_or_default();
    let store = state.stores.add_favorite(auth.user_id, store_id).await?;
    Ok(ApiResponse::created(store))
}

/// DELETE /api/v1/stores/favorites - Takes {"storeId": ...} in the body
pub async fn remove_favorite(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<AuthUser>,
    ValidatedJson(body): ValidatedJson<FavoriteRequest>,
) -> ApiResult<()> {
    let store_id = body.store_id.unwrap_or_default();
    state.stores.remove_favorite(auth.user_id, store_id).await?;
    Ok(ApiResponse::<()>::no_content())
}
