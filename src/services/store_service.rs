use sqlx::PgPool;
use uuid::Uuid;

use crate::api::pagination::Pagination;
use crate::models::Store;

use super::ServiceError;

#[derive(Clone)]
pub struct StoreService {
    pool: PgPool,
}

impl StoreService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Stores are shared reference data, readable by any authenticated user
    pub async fn get_all(
        &self,
        page: &Pagination,
        search: Option<&str>,
    ) -> Result<(Vec<Store>, i64), ServiceError> {
        let stores = sqlx::query_as::<_, Store>(
            "SELECT * FROM stores \
             WHERE $1::text IS NULL OR name ILIKE '%' || $1 || '%' \
             ORDER BY name LIMIT $2 OFFSET $3",
        )
        .bind(search)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM stores WHERE $1::text IS NULL OR name ILIKE '%' || $1 || '%'",
        )
        .bind(search)
        .fetch_one(&self.pool)
        .await?;

        Ok((stores, total))
    }

    pub async fn get_by_id(&self, store_id: Uuid) -> Result<Store, ServiceError> {
        sqlx::query_as::<_, Store>("SELECT * FROM stores WHERE id = $1")
            .bind(store_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(ServiceError::NotFound("Store"))
    }

    pub async fn create(&self, name: String, address: Option<String>) -> Result<Store, ServiceError> {
        let store = sqlx::query_as::<_, Store>(
            "INSERT INTO stores (name, address) VALUES ($1, $2) RETURNING *",
        )
        .bind(name)
        .bind(address)
        .fetch_one(&self.pool)
        .await?;

        Ok(store)
    }

    pub async fn update(
        &self,
        store_id: Uuid,
        name: Option<String>,
        address: Option<String>,
    ) -> Result<Store, ServiceError> {
        sqlx::query_as::<_, Store>(
            "UPDATE stores \
             SET name = COALESCE($2, name), address = COALESCE($3, address), updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(store_id)
        .bind(name)
        .bind(address)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ServiceError::NotFound("Store"))
    }

    pub async fn delete(&self, store_id: Uuid) -> Result<(), ServiceError> {
        let result = sqlx::query("DELETE FROM stores WHERE id = $1")
            .bind(store_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ServiceError::NotFound("Store"));
        }
        Ok(())
    }

    pub async fn get_favorites(&self, user_id: Uuid) -> Result<Vec<Store>, ServiceError> {
        let stores = sqlx::query_as::<_, Store>(
            "SELECT s.* FROM stores s \
             JOIN store_favorites f ON f.store_id = s.id \
             WHERE f.user_id = $1 ORDER BY s.name",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(stores)
    }

    /// Idempotent: re-favoriting an already favorited store is a no-op
    pub async fn add_favorite(&self, user_id: Uuid, store_id: Uuid) -> Result<Store, ServiceError> {
        let store = self.get_by_id(store_id).await?;

        sqlx::query(
            "INSERT INTO store_favorites (user_id, store_id) VALUES ($1, $2) \
             ON CONFLICT (user_id, store_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(store_id)
        .execute(&self.pool)
        .await?;

        Ok(store)
    }

    pub async fn remove_favorite(&self, user_id: Uuid, store_id: Uuid) -> Result<(), ServiceError> {
        let result =
            sqlx::query("DELETE FROM store_favorites WHERE user_id = $1 AND store_id = $2")
                .bind(user_id)
                .bind(store_id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(ServiceError::NotFound("Favorite"));
        }
        Ok(())
    }
}
