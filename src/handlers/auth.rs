use axum::extract::Extension;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::validate::ValidatedJson;
use crate::auth::{generate_session_token, Claims};
use crate::config;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::models::User;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(required(message = "email is required"), email(message = "email must be a valid email address"))]
    pub email: Option<String>,
    #[validate(required(message = "password is required"), length(min = 8, message = "password must be at least 8 characters"))]
    pub password: Option<String>,
    #[validate(length(max = 200, message = "name must be at most 200 characters"))]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(required(message = "email is required"))]
    pub email: Option<String>,
    #[validate(required(message = "password is required"))]
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub token: String,
    pub user: User,
    pub expires_in: u64,
}

/// POST /auth/register - Create an account and receive a session token
pub async fn register(
    Extension(state): Extension<AppState>,
    ValidatedJson(body): ValidatedJson<RegisterRequest>,
) -> ApiResult<SessionResponse> {
    let email = body.email.unwrap_or_default();
    let password = body.password.unwrap_or_default();

    let user = state.users.register(&email, &password, body.name).await?;
    let session = issue_session(user)?;
    Ok(ApiResponse::created(session))
}

/// POST /auth/login - Authenticate credentials and receive a session token
pub async fn login(
    Extension(state): Extension<AppState>,
    ValidatedJson(body): ValidatedJson<LoginRequest>,
) -> ApiResult<SessionResponse> {
    let email = body.email.unwrap_or_default();
    let password = body.password.unwrap_or_default();

    let user = state
        .users
        .authenticate(&email, &password)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid email or password"))?;

    let session = issue_session(user)?;
    Ok(ApiResponse::success(session))
}

/// GET /api/v1/auth/whoami - Profile of the authenticated user
pub async fn whoami(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<User> {
    let user = state.users.get_by_id(auth.user_id).await?;
    Ok(ApiResponse::success(user))
}

fn issue_session(user: User) -> Result<SessionResponse, ApiError> {
    let security = &config::config().security;
    let claims = Claims::new(user.id, user.email.clone(), security.session_expiry_hours);
    let token = generate_session_token(&claims, &security.session_secret)?;

    Ok(SessionResponse {
        token,
        user,
        expires_in: security.session_expiry_hours * 3600,
    })
}
