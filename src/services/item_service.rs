use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::ListItem;

use super::{list_access, ServiceError};

#[derive(Debug, Clone)]
pub struct NewItem {
    pub name: String,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub category_id: Option<Uuid>,
    pub notes: Option<String>,
    pub estimated_price: Option<Decimal>,
    pub position: Option<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub category_id: Option<Uuid>,
    pub notes: Option<String>,
    pub estimated_price: Option<Decimal>,
    pub position: Option<i32>,
}

#[derive(Clone)]
pub struct ItemService {
    pool: PgPool,
}

impl ItemService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        list_id: Uuid,
        user_id: Uuid,
        item: NewItem,
    ) -> Result<ListItem, ServiceError> {
        let access = list_access(&self.pool, list_id, user_id).await?;
        if !access.can_edit() {
            return Err(ServiceError::Forbidden(
                "Only the owner or an editor can add items to this list".into(),
            ));
        }

        // Missing position appends to the end of the list
        let created = sqlx::query_as::<_, ListItem>(
            "INSERT INTO list_items \
                 (list_id, name, quantity, unit, category_id, notes, estimated_price, position) \
             VALUES ($1, $2, COALESCE($3, 1), $4, $5, $6, $7, \
                 COALESCE($8, (SELECT COALESCE(MAX(position) + 1, 0) \
                               FROM list_items WHERE list_id = $1))) \
             RETURNING *",
        )
        .bind(list_id)
        .bind(item.name)
        .bind(item.quantity)
        .bind(item.unit)
        .bind(item.category_id)
        .bind(item.notes)
        .bind(item.estimated_price)
        .bind(item.position)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    pub async fn update(
        &self,
        item_id: Uuid,
        user_id: Uuid,
        patch: ItemPatch,
    ) -> Result<ListItem, ServiceError> {
        let list_id = self.list_of(item_id).await?;
        let access = list_access(&self.pool, list_id, user_id).await?;
        if !access.can_edit() {
            return Err(ServiceError::Forbidden(
                "Only the owner or an editor can modify items on this list".into(),
            ));
        }

        let updated = sqlx::query_as::<_, ListItem>(
            "UPDATE list_items SET \
                 name = COALESCE($2, name), \
                 quantity = COALESCE($3, quantity), \
                 unit = COALESCE($4, unit), \
                 category_id = COALESCE($5, category_id), \
                 notes = COALESCE($6, notes), \
                 estimated_price = COALESCE($7, estimated_price), \
                 position = COALESCE($8, position), \
                 updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(item_id)
        .bind(patch.name)
        .bind(patch.quantity)
        .bind(patch.unit)
        .bind(patch.category_id)
        .bind(patch.notes)
        .bind(patch.estimated_price)
        .bind(patch.position)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ServiceError::NotFound("Item"))?;

        Ok(updated)
    }

    pub async fn delete(&self, item_id: Uuid, user_id: Uuid) -> Result<(), ServiceError> {
        let list_id = self.list_of(item_id).await?;
        let access = list_access(&self.pool, list_id, user_id).await?;
        if !access.can_edit() {
            return Err(ServiceError::Forbidden(
                "Only the owner or an editor can remove items from this list".into(),
            ));
        }

        let result = sqlx::query("DELETE FROM list_items WHERE id = $1")
            .bind(item_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ServiceError::NotFound("Item"));
        }
        Ok(())
    }

    /// Flip the checked state, optionally recording the actual price paid.
    /// Any user the list is shared with may check items off.
    pub async fn toggle_check(
        &self,
        item_id: Uuid,
        user_id: Uuid,
        actual_price: Option<Decimal>,
    ) -> Result<ListItem, ServiceError> {
        let list_id = self.list_of(item_id).await?;
        list_access(&self.pool, list_id, user_id).await?;

        let item = sqlx::query_as::<_, ListItem>(
            "UPDATE list_items \
             SET is_checked = NOT is_checked, \
                 actual_price = COALESCE($2, actual_price), \
                 updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(item_id)
        .bind(actual_price)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ServiceError::NotFound("Item"))?;

        Ok(item)
    }

    async fn list_of(&self, item_id: Uuid) -> Result<Uuid, ServiceError> {
        let list_id: Option<(Uuid,)> =
            sqlx::query_as("SELECT list_id FROM list_items WHERE id = $1")
                .bind(item_id)
                .fetch_optional(&self.pool)
                .await?;

        list_id.map(|(id,)| id).ok_or(ServiceError::NotFound("Item"))
    }
}
