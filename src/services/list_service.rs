use sqlx::PgPool;
use uuid::Uuid;

use crate::api::pagination::Pagination;
use crate::models::{Collaborator, ListDetails, ListItem, ShoppingList};

use super::{list_access, ServiceError};

const VISIBLE: &str = "(l.owner_id = $1 OR EXISTS \
    (SELECT 1 FROM list_collaborators c WHERE c.list_id = l.id AND c.user_id = $1))";

#[derive(Clone)]
pub struct ListService {
    pool: PgPool,
}

impl ListService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lists owned by or shared with the user, newest activity first
    pub async fn get_by_user(
        &self,
        user_id: Uuid,
        page: &Pagination,
        search: Option<&str>,
        completed: Option<bool>,
    ) -> Result<(Vec<ShoppingList>, i64), ServiceError> {
        let filters = format!(
            "{VISIBLE} \
             AND ($2::text IS NULL OR l.name ILIKE '%' || $2 || '%') \
             AND ($3::boolean IS NULL OR l.is_completed = $3)"
        );

        let lists = sqlx::query_as::<_, ShoppingList>(&format!(
            "SELECT l.* FROM shopping_lists l WHERE {filters} \
             ORDER BY l.updated_at DESC LIMIT $4 OFFSET $5"
        ))
        .bind(user_id)
        .bind(search)
        .bind(completed)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM shopping_lists l WHERE {filters}"
        ))
        .bind(user_id)
        .bind(search)
        .bind(completed)
        .fetch_one(&self.pool)
        .await?;

        Ok((lists, total))
    }

    pub async fn get_by_id(&self, list_id: Uuid, user_id: Uuid) -> Result<ShoppingList, ServiceError> {
        list_access(&self.pool, list_id, user_id).await?;
        self.fetch(list_id).await
    }

    /// Detail variant with items and collaborators eagerly loaded
    pub async fn get_with_details(
        &self,
        list_id: Uuid,
        user_id: Uuid,
    ) -> Result<ListDetails, ServiceError> {
        list_access(&self.pool, list_id, user_id).await?;
        let list = self.fetch(list_id).await?;

        let items = sqlx::query_as::<_, ListItem>(
            "SELECT * FROM list_items WHERE list_id = $1 ORDER BY position, created_at",
        )
        .bind(list_id)
        .fetch_all(&self.pool)
        .await?;

        let collaborators = sqlx::query_as::<_, Collaborator>(
            r#"
            SELECT c.id, c.list_id, c.user_id, c.invited_email, c.role,
                   u.name AS user_name, c.created_at
            FROM list_collaborators c
            LEFT JOIN users u ON u.id = c.user_id
            WHERE c.list_id = $1
            ORDER BY c.created_at
            "#,
        )
        .bind(list_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ListDetails { list, items, collaborators })
    }

    pub async fn create(
        &self,
        owner_id: Uuid,
        name: String,
        notes: Option<String>,
    ) -> Result<ShoppingList, ServiceError> {
        let list = sqlx::query_as::<_, ShoppingList>(
            "INSERT INTO shopping_lists (owner_id, name, notes) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(owner_id)
        .bind(name)
        .bind(notes)
        .fetch_one(&self.pool)
        .await?;

        Ok(list)
    }

    /// Partial update. Explicit nulls were stripped during deserialization,
    /// so a None here means "leave unchanged".
    pub async fn update(
        &self,
        list_id: Uuid,
        user_id: Uuid,
        name: Option<String>,
        notes: Option<String>,
    ) -> Result<ShoppingList, ServiceError> {
        let access = list_access(&self.pool, list_id, user_id).await?;
        if !access.can_edit() {
            return Err(ServiceError::Forbidden(
                "Only the owner or an editor can modify this list".into(),
            ));
        }

        let list = sqlx::query_as::<_, ShoppingList>(
            "UPDATE shopping_lists \
             SET name = COALESCE($2, name), notes = COALESCE($3, notes), updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(list_id)
        .bind(name)
        .bind(notes)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ServiceError::NotFound("List"))?;

        Ok(list)
    }

    pub async fn delete(&self, list_id: Uuid, user_id: Uuid) -> Result<(), ServiceError> {
        let access = list_access(&self.pool, list_id, user_id).await?;
        if !access.is_owner() {
            return Err(ServiceError::Forbidden("Only the owner can delete a list".into()));
        }

        let result = sqlx::query("DELETE FROM shopping_lists WHERE id = $1")
            .bind(list_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ServiceError::NotFound("List"));
        }
        Ok(())
    }

    /// Transition a list to completed. Requires owner or editor role.
    pub async fn complete(&self, list_id: Uuid, user_id: Uuid) -> Result<ShoppingList, ServiceError> {
        let access = list_access(&self.pool, list_id, user_id).await?;
        if !access.can_edit() {
            return Err(ServiceError::Forbidden(
                "Only the owner or an editor can complete this list".into(),
            ));
        }

        let list = sqlx::query_as::<_, ShoppingList>(
            "UPDATE shopping_lists \
             SET is_completed = TRUE, completed_at = NOW(), updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(list_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ServiceError::NotFound("List"))?;

        Ok(list)
    }

    /// Deep-copy a list and its items under a new name (default "Copy").
    /// The copy is owned by the requester regardless of the source owner.
    pub async fn duplicate(
        &self,
        list_id: Uuid,
        user_id: Uuid,
        name: Option<String>,
    ) -> Result<ShoppingList, ServiceError> {
        list_access(&self.pool, list_id, user_id).await?;

        let mut tx = self.pool.begin().await?;

        let source = sqlx::query_as::<_, ShoppingList>(
            "SELECT * FROM shopping_lists WHERE id = $1",
        )
        .bind(list_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(ServiceError::NotFound("List"))?;

        let name = name.unwrap_or_else(|| "Copy".to_string());
        let copy = sqlx::query_as::<_, ShoppingList>(
            "INSERT INTO shopping_lists (owner_id, name, notes) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(user_id)
        .bind(&name)
        .bind(&source.notes)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO list_items \
                 (list_id, name, quantity, unit, category_id, notes, is_checked, \
                  estimated_price, actual_price, position) \
             SELECT $1, name, quantity, unit, category_id, notes, is_checked, \
                    estimated_price, actual_price, position \
             FROM list_items WHERE list_id = $2",
        )
        .bind(copy.id)
        .bind(list_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(copy)
    }

    async fn fetch(&self, list_id: Uuid) -> Result<ShoppingList, ServiceError> {
        sqlx::query_as::<_, ShoppingList>("SELECT * FROM shopping_lists WHERE id = $1")
            .bind(list_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(ServiceError::NotFound("List"))
    }
}
