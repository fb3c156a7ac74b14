use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::api::pagination::Pagination;
use crate::models::PantryItem;

use super::ServiceError;

#[derive(Debug, Clone)]
pub struct NewPantryItem {
    pub name: String,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub category_id: Option<Uuid>,
    pub expires_at: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default)]
pub struct PantryItemPatch {
    pub name: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub category_id: Option<Uuid>,
    pub expires_at: Option<NaiveDate>,
}

#[derive(Clone)]
pub struct PantryService {
    pool: PgPool,
}

impl PantryService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_by_user(
        &self,
        user_id: Uuid,
        page: &Pagination,
        search: Option<&str>,
    ) -> Result<(Vec<PantryItem>, i64), ServiceError> {
        let items = sqlx::query_as::<_, PantryItem>(
            "SELECT * FROM pantry_items \
             WHERE owner_id = $1 AND ($2::text IS NULL OR name ILIKE '%' || $2 || '%') \
             ORDER BY name LIMIT $3 OFFSET $4",
        )
        .bind(user_id)
        .bind(search)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM pantry_items \
             WHERE owner_id = $1 AND ($2::text IS NULL OR name ILIKE '%' || $2 || '%')",
        )
        .bind(user_id)
        .bind(search)
        .fetch_one(&self.pool)
        .await?;

        Ok((items, total))
    }

    pub async fn get_by_id(&self, item_id: Uuid, user_id: Uuid) -> Result<PantryItem, ServiceError> {
        sqlx::query_as::<_, PantryItem>(
            "SELECT * FROM pantry_items WHERE id = $1 AND owner_id = $2",
        )
        .bind(item_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ServiceError::NotFound("Pantry item"))
    }

    pub async fn create(
        &self,
        owner_id: Uuid,
        item: NewPantryItem,
    ) -> Result<PantryItem, ServiceError> {
        let created = sqlx::query_as::<_, PantryItem>(
            "INSERT INTO pantry_items (owner_id, name, quantity, unit, category_id, expires_at) \
             VALUES ($1, $2, COALESCE($3, 1), $4, $5, $6) RETURNING *",
        )
        .bind(owner_id)
        .bind(item.name)
        .bind(item.quantity)
        .bind(item.unit)
        .bind(item.category_id)
        .bind(item.expires_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    pub async fn update(
        &self,
        item_id: Uuid,
        user_id: Uuid,
        patch: PantryItemPatch,
    ) -> Result<PantryItem, ServiceError> {
        sqlx::query_as::<_, PantryItem>(
            "UPDATE pantry_items SET \
                 name = COALESCE($3, name), \
                 quantity = COALESCE($4, quantity), \
                 unit = COALESCE($5, unit), \
                 category_id = COALESCE($6, category_id), \
                 expires_at = COALESCE($7, expires_at), \
                 updated_at = NOW() \
             WHERE id = $1 AND owner_id = $2 RETURNING *",
        )
        .bind(item_id)
        .bind(user_id)
        .bind(patch.name)
        .bind(patch.quantity)
        .bind(patch.unit)
        .bind(patch.category_id)
        .bind(patch.expires_at)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ServiceError::NotFound("Pantry item"))
    }

    pub async fn delete(&self, item_id: Uuid, user_id: Uuid) -> Result<(), ServiceError> {
        let result = sqlx::query("DELETE FROM pantry_items WHERE id = $1 AND owner_id = $2")
            .bind(item_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ServiceError::NotFound("Pantry item"));
        }
        Ok(())
    }
}
