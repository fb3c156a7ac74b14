use axum::extract::{Extension, Path, Query};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::api::pagination::{PageMeta, PageQuery, Pagination};
use crate::api::validate::ValidatedJson;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::models::{ListDetails, ShoppingList};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListIndexQuery {
    #[serde(flatten)]
    pub page: PageQuery,
    pub search: Option<String>,
    /// Parsed leniently: "true"/"false", anything else is ignored
    pub completed: Option<String>,
}

impl ListIndexQuery {
    fn completed_filter(&self) -> Option<bool> {
        self.completed.as_deref().and_then(|v| v.parse().ok())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ShowQuery {
    /// Any non-empty value eagerly loads items and collaborators
    pub include: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ListView {
    Details(Box<ListDetails>),
    Plain(ShoppingList),
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateListRequest {
    #[validate(required(message = "name is required"), length(min = 1, max = 200, message = "name must be 1-200 characters"))]
    pub name: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateListRequest {
    #[validate(length(min = 1, max = 200, message = "name must be 1-200 characters"))]
    pub name: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateListRequest {
    #[validate(length(min = 1, max = 200, message = "name must be 1-200 characters"))]
    pub name: Option<String>,
}

/// GET /api/v1/lists - Lists owned by or shared with the requester
pub async fn index(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<ListIndexQuery>,
) -> ApiResult<Vec<ShoppingList>> {
    let page = Pagination::from_query(&query.page);
    let (lists, total) = state
        .lists
        .get_by_user(auth.user_id, &page, query.search.as_deref(), query.completed_filter())
        .await?;

    Ok(ApiResponse::paginated(lists, PageMeta::new(&page, total)))
}

/// POST /api/v1/lists - Create a list owned by the requester
pub async fn create(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<AuthUser>,
    ValidatedJson(body): ValidatedJson<CreateListRequest>,
) -> ApiResult<ShoppingList> {
    let list = state
        .lists
        .create(auth.user_id, body.name.unwrap_or_default(), body.notes)
        .await?;

    Ok(ApiResponse::created(list))
}

/// GET /api/v1/lists/:id - Single list, with relations when ?include is given
pub async fn show(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(list_id): Path<Uuid>,
    Query(query): Query<ShowQuery>,
) -> ApiResult<ListView> {
    let view = match query.include.as_deref() {
        Some(include) if !include.is_empty() => {
            let details = state.lists.get_with_details(list_id, auth.user_id).await?;
            ListView::Details(Box::new(details))
        }
        _ => ListView::Plain(state.lists.get_by_id(list_id, auth.user_id).await?),
    };

    Ok(ApiResponse::success(view))
}

/// PATCH /api/v1/lists/:id - Partial update; null fields are left unchanged
pub async fn update(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(list_id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<UpdateListRequest>,
) -> ApiResult<ShoppingList> {
    let list = state
        .lists
        .update(list_id, auth.user_id, body.name, body.notes)
        .await?;

    Ok(ApiResponse::success(list))
}

/// DELETE /api/v1/lists/:id - Owner only
pub async fn destroy(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(list_id): Path<Uuid>,
) -> ApiResult<()> {
    state.lists.delete(list_id, auth.user_id).await?;
    Ok(ApiResponse::<()>::no_content())
}

/// POST /api/v1/lists/:id/complete - Mark a list completed
pub async fn complete(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(list_id): Path<Uuid>,
) -> ApiResult<ShoppingList> {
    let list = state.lists.complete(list_id, auth.user_id).await?;
    Ok(ApiResponse::success(list))
}

/// POST /api/v1/lists/:id/duplicate - Deep-copy a list; body is optional
pub async fn duplicate(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(list_id): Path<Uuid>,
    body: Option<ValidatedJson<DuplicateListRequest>>,
) -> ApiResult<ShoppingList> {
    let name = body.and_then(|ValidatedJson(b)| b.name);
    let copy = state.lists.duplicate(list_id, auth.user_id, name).await?;
    Ok(ApiResponse::created(copy))
}
