use axum::extract::{Extension, Path};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::api::validate::ValidatedJson;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::models::{Collaborator, CollaboratorRole};
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShareRequest {
    #[validate(required(message = "email is required"), email(message = "email must be a valid address"))]
    pub email: Option<String>,
    pub role: Option<CollaboratorRole>,
}

/// POST /api/v1/lists/:id/collaborators - Share a list (owner only)
pub async fn create(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(list_id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<ShareRequest>,
) -> ApiResult<Collaborator> {
    let email = body.email.unwrap_or_default();
    let role = body.role.unwrap_or(CollaboratorRole::Viewer);

    let collaborator = state
        .collaboration
        .share(list_id, auth.user_id, &email, role)
        .await?;
    Ok(ApiResponse::created(collaborator))
}

/// GET /api/v1/lists/:id/collaborators
pub async fn index(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(list_id): Path<Uuid>,
) -> ApiResult<Vec<Collaborator>> {
    let collaborators = state
        .collaboration
        .get_collaborators(list_id, auth.user_id)
        .await?;
    Ok(ApiResponse::success(collaborators))
}

/// DELETE /api/v1/lists/:id/collaborators/:userId - Revoke access (owner only)
pub async fn destroy(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path((list_id, user_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<()> {
    state
        .collaboration
        .remove(list_id, user_id, auth.user_id)
        .await?;
    Ok(ApiResponse::<()>::no_content())
}
