use axum::extract::{Extension, Query};
use serde::Deserialize;
use validator::Validate;

use crate::api::validate::ValidatedJson;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::models::{Category, CategoryUsage};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    #[validate(required(message = "name is required"), length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: Option<String>,
    pub icon: Option<String>,
}

/// GET /api/v1/categories - Defaults plus the requester's custom categories
pub async fn index(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<Vec<Category>> {
    let categories = state.categories.get_all(auth.user_id).await?;
    Ok(ApiResponse::success(categories))
}

/// POST /api/v1/categories - Creates a custom category owned by the requester
pub async fn create(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<AuthUser>,
    ValidatedJson(body): ValidatedJson<CreateCategoryRequest>,
) -> ApiResult<Category> {
    let category = state
        .categories
        .create(auth.user_id, body.name.unwrap_or_default(), body.icon)
        .await?;
    Ok(ApiResponse::created(category))
}

/// GET /api/v1/categories/search?q=... - Name substring match
pub async fn search(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Vec<Category>> {
    let q = match query.q.as_deref() {
        Some(q) if !q.trim().is_empty() => q,
        _ => return Err(ApiError::bad_request("Query parameter 'q' is required")),
    };

    let categories = state.categories.search(auth.user_id, q).await?;
    Ok(ApiResponse::success(categories))
}

/// GET /api/v1/categories/usage-stats - Usage counts across the requester's lists
pub async fn usage_stats(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<Vec<CategoryUsage>> {
    let stats = state.categories.usage_stats(auth.user_id).await?;
    Ok(ApiResponse::success(stats))
}
