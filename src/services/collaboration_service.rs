use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Collaborator, CollaboratorRole};

use super::{list_access, ServiceError};

#[derive(Clone)]
pub struct CollaborationService {
    pool: PgPool,
}

impl CollaborationService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Attach a collaborator to a list. The target email is resolved to an
    /// existing user where possible; otherwise a pending invitation is stored.
    /// Sharing the same email again updates the role.
    pub async fn share(
        &self,
        list_id: Uuid,
        owner_id: Uuid,
        target_email: &str,
        role: CollaboratorRole,
    ) -> Result<Collaborator, ServiceError> {
        let access = list_access(&self.pool, list_id, owner_id).await?;
        if !access.is_owner() {
            return Err(ServiceError::Forbidden("Only the owner can share a list".into()));
        }

        let email = target_email.trim().to_lowercase();

        let target: Option<(Uuid, Option<String>)> =
            sqlx::query_as("SELECT id, name FROM users WHERE lower(email) = $1")
                .bind(&email)
                .fetch_optional(&self.pool)
                .await?;

        if let Some((target_id, _)) = &target {
            if *target_id == owner_id {
                return Err(ServiceError::Conflict("Cannot share a list with its owner".into()));
            }
        }

        let (target_id, target_name) = match target {
            Some((id, name)) => (Some(id), name),
            None => (None, None),
        };

        let row: (Uuid, Uuid, Option<Uuid>, String, String, DateTime<Utc>) = sqlx::query_as(
            "INSERT INTO list_collaborators (list_id, user_id, invited_email, role) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (list_id, invited_email) \
                 DO UPDATE SET role = EXCLUDED.role, user_id = EXCLUDED.user_id \
             RETURNING id, list_id, user_id, invited_email, role, created_at",
        )
        .bind(list_id)
        .bind(target_id)
        .bind(&email)
        .bind(role.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(Collaborator {
            id: row.0,
            list_id: row.1,
            user_id: row.2,
            invited_email: row.3,
            role: row.4,
            user_name: target_name,
            created_at: row.5,
        })
    }

    /// Visible to anyone already on the list (owner or collaborator)
    pub async fn get_collaborators(
        &self,
        list_id: Uuid,
        user_id: Uuid,
    ) -> Result<Vec<Collaborator>, ServiceError> {
        list_access(&self.pool, list_id, user_id).await?;

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

        Ok(collaborators)
    }

    pub async fn remove(
        &self,
        list_id: Uuid,
        collaborator_user_id: Uuid,
        requester_id: Uuid,
    ) -> Result<(), ServiceError> {
        let access = list_access(&self.pool, list_id, requester_id).await?;
        if !access.is_owner() {
            return Err(ServiceError::Forbidden(
                "Only the owner can remove collaborators".into(),
            ));
        }

        let result = sqlx::query(
            "DELETE FROM list_collaborators WHERE list_id = $1 AND user_id = $2",
        )
        .bind(list_id)
        .bind(collaborator_user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ServiceError::NotFound("Collaborator"));
        }
        Ok(())
    }
}
