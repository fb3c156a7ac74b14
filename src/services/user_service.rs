use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::{hash_password, verify_password};
use crate::models::{User, UserCredentials};

use super::ServiceError;

const USER_COLUMNS: &str =
    "id, email, name, image, email_verified, created_at, updated_at";

#[derive(Clone)]
pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: Option<String>,
    ) -> Result<User, ServiceError> {
        let password_hash =
            hash_password(password).map_err(|e| ServiceError::Internal(e.to_string()))?;
        let email = email.trim().to_lowercase();

        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (email, name, password_hash) VALUES ($1, $2, $3) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&email)
        .bind(name)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if matches!(&e, sqlx::Error::Database(db) if db.is_unique_violation()) {
                ServiceError::Conflict("Email is already registered".into())
            } else {
                ServiceError::Database(e)
            }
        })?;

        // Claim list invitations that were issued to this address before signup
        sqlx::query(
            "UPDATE list_collaborators SET user_id = $1 \
             WHERE user_id IS NULL AND invited_email = $2",
        )
        .bind(user.id)
        .bind(&email)
        .execute(&self.pool)
        .await?;

        Ok(user)
    }

    /// Returns None on unknown email or wrong password; the handler maps both
    /// to the same 401 so neither case is distinguishable.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, ServiceError> {
        let credentials = sqlx::query_as::<_, UserCredentials>(
            "SELECT id, email, password_hash FROM users WHERE lower(email) = $1",
        )
        .bind(email.trim().to_lowercase())
        .fetch_optional(&self.pool)
        .await?;

        let credentials = match credentials {
            Some(c) => c,
            None => return Ok(None),
        };

        let valid = verify_password(password, &credentials.password_hash)
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        if !valid {
            return Ok(None);
        }

        let user = self.get_by_id(credentials.id).await?;
        Ok(Some(user))
    }

    pub async fn get_by_id(&self, user_id: Uuid) -> Result<User, ServiceError> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ServiceError::NotFound("User"))
    }
}
