use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Category, CategoryUsage};

use super::ServiceError;

#[derive(Clone)]
pub struct CategoryService {
    pool: PgPool,
}

impl CategoryService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// System defaults plus the user's own categories
    pub async fn get_all(&self, user_id: Uuid) -> Result<Vec<Category>, ServiceError> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT * FROM categories \
             WHERE is_default = TRUE OR created_by = $1 \
             ORDER BY is_default DESC, name",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        name: String,
        icon: Option<String>,
    ) -> Result<Category, ServiceError> {
        let category = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (name, icon, is_default, created_by) \
             VALUES ($1, $2, FALSE, $3) RETURNING *",
        )
        .bind(name)
        .bind(icon)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(category)
    }

    pub async fn search(&self, user_id: Uuid, query: &str) -> Result<Vec<Category>, ServiceError> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT * FROM categories \
             WHERE (is_default = TRUE OR created_by = $1) AND name ILIKE '%' || $2 || '%' \
             ORDER BY is_default DESC, name",
        )
        .bind(user_id)
        .bind(query)
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    /// Merge default categories with the user's historical usage counts,
    /// derived from items on lists the user owns.
    pub async fn usage_stats(&self, user_id: Uuid) -> Result<Vec<CategoryUsage>, ServiceError> {
        let stats = sqlx::query_as::<_, CategoryUsage>(
            r#"
            SELECT c.id, c.name, c.icon, c.is_default, COUNT(i.id) AS usage_count
            FROM categories c
            LEFT JOIN list_items i ON i.category_id = c.id
                AND i.list_id IN (SELECT id FROM shopping_lists WHERE owner_id = $1)
            WHERE c.is_default = TRUE OR c.created_by = $1
            GROUP BY c.id, c.name, c.icon, c.is_default
            ORDER BY usage_count DESC, c.name
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(stats)
    }
}
