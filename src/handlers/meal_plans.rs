use axum::extract::{Extension, Path, Query};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::api::pagination::{PageMeta, PageQuery, Pagination};
use crate::api::validate::ValidatedJson;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::models::MealPlan;
use crate::services::{MealPlanPatch, NewMealPlan};
use crate::state::AppState;

const MEAL_TYPES: [&str; 4] = ["breakfast", "lunch", "dinner", "snack"];

fn validate_meal_type(value: &str) -> Result<(), ValidationError> {
    if MEAL_TYPES.contains(&value) {
        Ok(())
    } else {
        let mut err = ValidationError::new("meal_type");
        err.message = Some("mealType must be one of breakfast, lunch, dinner, snack".into());
        Err(err)
    }
}

#[derive(Debug, Deserialize)]
pub struct MealPlanIndexQuery {
    #[serde(flatten)]
    pub page: PageQuery,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMealPlanRequest {
    #[validate(required(message = "planDate is required"))]
    pub plan_date: Option<NaiveDate>,
    #[validate(
        required(message = "mealType is required"),
        custom(function = validate_meal_type)
    )]
    pub meal_type: Option<String>,
    pub recipe_id: Option<Uuid>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMealPlanRequest {
    pub plan_date: Option<NaiveDate>,
    #[validate(custom(function = validate_meal_type))]
    pub meal_type: Option<String>,
    pub recipe_id: Option<Uuid>,
    pub notes: Option<String>,
}

/// GET /api/v1/meal-plans - Optional from/to date window
pub async fn index(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<MealPlanIndexQuery>,
) -> ApiResult<Vec<MealPlan>> {
    let page = Pagination::from_query(&query.page);
    let (plans, total) = state
        .meal_plans
        .get_by_user(auth.user_id, &page, query.from, query.to)
        .await?;
    Ok(ApiResponse::paginated(plans, PageMeta::new(&page, total)))
}

/// POST /api/v1/meal-plans
pub async fn create(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<AuthUser>,
    ValidatedJson(body): ValidatedJson<CreateMealPlanRequest>,
) -> ApiResult<MealPlan> {
    let plan = NewMealPlan {
        plan_date: body.plan_date.unwrap_or_default(),
        meal_type: body.meal_type.unwrap_or_default(),
        recipe_id: body.recipe_id,
        notes: body.notes,
    };

    let created = state.meal_plans.create(auth.user_id, plan).await?;
    Ok(ApiResponse::created(created))
}

/// GET /api/v1/meal-plans/:id
pub async fn show(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(plan_id): Path<Uuid>,
) -> ApiResult<MealPlan> {
    let plan = state.meal_plans.get_by_id(plan_id, auth.user_id).await?;
    Ok(ApiResponse::success(plan))
}

/// PATCH /api/v1/meal-plans/:id
pub async fn update(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(plan_id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<UpdateMealPlanRequest>,
) -> ApiResult<MealPlan> {
    let patch = MealPlanPatch {
        plan_date: body.plan_date,
        meal_type: body.meal_type,
        recipe_id: body.recipe_id,
        notes: body.notes,
    };

    let plan = state.meal_plans.update(plan_id, auth.user_id, patch).await?;
    Ok(ApiResponse::success(plan))
}

/// DELETE /api/v1/meal-plans/:id
pub async fn destroy(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(plan_id): Path<Uuid>,
) -> ApiResult<()> {
    state.meal_plans.delete(plan_id, auth.user_id).await?;
    Ok(ApiResponse::<()>::no_content())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meal_type_whitelist() {
        for meal in MEAL_TYPES {
            assert!(validate_meal_type(meal).is_ok());
        }
        assert!(validate_meal_type("brunch").is_err());
        assert!(validate_meal_type("").is_err());
    }
}
