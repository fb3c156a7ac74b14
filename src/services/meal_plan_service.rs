use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::api::pagination::Pagination;
use crate::models::MealPlan;

use super::ServiceError;

#[derive(Debug, Clone)]
pub struct NewMealPlan {
    pub plan_date: NaiveDate,
    pub meal_type: String,
    pub recipe_id: Option<Uuid>,
    pub notes: Option<String>,
}

/// Null-valued fields in a patch request mean "no change", never "clear"
#[derive(Debug, Clone, Default)]
pub struct MealPlanPatch {
    pub plan_date: Option<NaiveDate>,
    pub meal_type: Option<String>,
    pub recipe_id: Option<Uuid>,
    pub notes: Option<String>,
}

#[derive(Clone)]
pub struct MealPlanService {
    pool: PgPool,
}

impl MealPlanService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_by_user(
        &self,
        user_id: Uuid,
        page: &Pagination,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<(Vec<MealPlan>, i64), ServiceError> {
        let plans = sqlx::query_as::<_, MealPlan>(
            "SELECT * FROM meal_plans \
             WHERE owner_id = $1 \
               AND ($2::date IS NULL OR plan_date >= $2) \
               AND ($3::date IS NULL OR plan_date <= $3) \
             ORDER BY plan_date, meal_type LIMIT $4 OFFSET $5",
        )
        .bind(user_id)
        .bind(from)
        .bind(to)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM meal_plans \
             WHERE owner_id = $1 \
               AND ($2::date IS NULL OR plan_date >= $2) \
               AND ($3::date IS NULL OR plan_date <= $3)",
        )
        .bind(user_id)
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await?;

        Ok((plans, total))
    }

    pub async fn get_by_id(&self, plan_id: Uuid, user_id: Uuid) -> Result<MealPlan, ServiceError> {
        sqlx::query_as::<_, MealPlan>(
            "SELECT * FROM meal_plans WHERE id = $1 AND owner_id = $2",
        )
        .bind(plan_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ServiceError::NotFound("Meal plan"))
    }

    pub async fn create(
        &self,
        owner_id: Uuid,
        plan: NewMealPlan,
    ) -> Result<MealPlan, ServiceError> {
        let created = sqlx::query_as::<_, MealPlan>(
            "INSERT INTO meal_plans (owner_id, plan_date, meal_type, recipe_id, notes) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(owner_id)
        .bind(plan.plan_date)
        .bind(plan.meal_type)
        .bind(plan.recipe_id)
        .bind(plan.notes)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    pub async fn update(
        &self,
        plan_id: Uuid,
        user_id: Uuid,
        patch: MealPlanPatch,
    ) -> Result<MealPlan, ServiceError> {
        sqlx::query_as::<_, MealPlan>(
            "UPDATE meal_plans SET \
                 plan_date = COALESCE($3, plan_date), \
                 meal_type = COALESCE($4, meal_type), \
                 recipe_id = COALESCE($5, recipe_id), \
                 notes = COALESCE($6, notes), \
                 updated_at = NOW() \
             WHERE id = $1 AND owner_id = $2 RETURNING *",
        )
        .bind(plan_id)
        .bind(user_id)
        .bind(patch.plan_date)
        .bind(patch.meal_type)
        .bind(patch.recipe_id)
        .bind(patch.notes)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ServiceError::NotFound("Meal plan"))
    }

    pub async fn delete(&self, plan_id: Uuid, user_id: Uuid) -> Result<(), ServiceError> {
        let result = sqlx::query("DELETE FROM meal_plans WHERE id = $1 AND owner_id = $2")
            .bind(plan_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ServiceError::NotFound("Meal plan"));
        }
        Ok(())
    }
}
