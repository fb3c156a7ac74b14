use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::json;

use crate::api::pagination::PageMeta;

/// Wrapper for API responses that automatically adds the success envelope:
/// `{success: true, data, meta?}`
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: Option<PageMeta>,
    pub status_code: Option<StatusCode>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a successful API response with default 200 status
    pub fn success(data: T) -> Self {
        Self {
            data,
            meta: None,
            status_code: None, // Default to 200 OK
        }
    }

    /// Create a 200 response carrying pagination metadata
    pub fn paginated(data: T, meta: PageMeta) -> Self {
        Self {
            data,
            meta: Some(meta),
            status_code: None,
        }
    }

    /// Create a 201 Created response
    pub fn created(data: T) -> Self {
        Self {
            data,
            meta: None,
            status_code: Some(StatusCode::CREATED),
        }
    }

    /// Create a 204 No Content response (empty body)
    pub fn no_content() -> ApiResponse<()> {
        ApiResponse {
            data: (),
            meta: None,
            status_code: Some(StatusCode::NO_CONTENT),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status_code.unwrap_or(StatusCode::OK);

        // For 204 No Content, return empty response
        if status == StatusCode::NO_CONTENT {
            return status.into_response();
        }

        let data_value = match serde_json::to_value(&self.data) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("failed to serialize response data: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "success": false,
                        "error": {
                            "code": "INTERNAL_SERVER_ERROR",
                            "message": "Failed to serialize response data"
                        }
                    })),
                )
                    .into_response();
            }
        };

        let mut envelope = json!({
            "success": true,
            "data": data_value,
        });
        if let Some(meta) = &self.meta {
            envelope["meta"] = json!(meta);
        }

        (status, Json(envelope)).into_response()
    }
}

/// Handler return type: success envelope or an ApiError translated to JSON
pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::pagination::Pagination;

    #[test]
    fn created_sets_201() {
        let res = ApiResponse::created(json!({"id": 1}));
        assert_eq!(res.status_code, Some(StatusCode::CREATED));
    }

    #[test]
    fn paginated_carries_meta() {
        let page = Pagination { page: 2, limit: 10 };
        let res = ApiResponse::paginated(vec![1, 2, 3], PageMeta::new(&page, 25));
        let meta = res.meta.unwrap();
        assert_eq!(meta.page, 2);
        assert_eq!(meta.total, 25);
        assert_eq!(meta.total_pages, 3);
    }
}
