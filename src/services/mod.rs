use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{CollaboratorRole, ListAccess};

pub mod category_service;
pub mod collaboration_service;
pub mod item_service;
pub mod list_service;
pub mod meal_plan_service;
pub mod pantry_service;
pub mod recipe_service;
pub mod store_service;
pub mod user_service;

pub use category_service::CategoryService;
pub use collaboration_service::CollaborationService;
pub use item_service::{ItemService, NewItem, ItemPatch};
pub use list_service::ListService;
pub use meal_plan_service::{MealPlanService, NewMealPlan, MealPlanPatch};
pub use pantry_service::{PantryService, NewPantryItem, PantryItemPatch};
pub use recipe_service::{RecipeService, NewRecipe, NewIngredient, RecipePatch};
pub use store_service::StoreService;
pub use user_service::UserService;

/// Failures surfaced by all services; route handlers translate these into
/// HTTP responses via `ApiError`.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Conflict(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Resolve the requesting user's relationship to a list. Lists the user has
/// no relationship to are reported as missing, so their existence never leaks.
pub(crate) async fn list_access(
    pool: &PgPool,
    list_id: Uuid,
    user_id: Uuid,
) -> Result<ListAccess, ServiceError> {
    let row: Option<(Uuid, Option<String>)> = sqlx::query_as(
        r#"
        SELECT l.owner_id, c.role
        FROM shopping_lists l
        LEFT JOIN list_collaborators c ON c.list_id = l.id AND c.user_id = $2
        WHERE l.id = $1
        "#,
    )
    .bind(list_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    match row {
        Some((owner_id, _)) if owner_id == user_id => Ok(ListAccess::Owner),
        Some((_, Some(role))) => CollaboratorRole::parse(&role)
            .map(ListAccess::Collaborator)
            .ok_or_else(|| ServiceError::Internal(format!("unknown collaborator role: {}", role))),
        _ => Err(ServiceError::NotFound("List")),
    }
}
