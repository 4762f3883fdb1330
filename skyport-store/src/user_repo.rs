use skyport_core::DomainError;
use sqlx::PgPool;
use uuid::Uuid;

use crate::map_db_err;

/// Thin identity adapter: the core only needs an opaque user id per request.
pub struct UserRepository {
    pool: PgPool,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Resolve an email to a user row, creating it on first sight. Password
    /// verification is the identity provider's concern, not this core's.
    pub async fn get_or_create_by_email(&self, email: &str) -> Result<UserRecord, DomainError> {
        sqlx::query_as(
            "INSERT INTO users (email) VALUES ($1) \
             ON CONFLICT (email) DO UPDATE SET email = EXCLUDED.email \
             RETURNING id, email",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_err)
    }

    pub async fn get_user(&self, id: Uuid) -> Result<Option<UserRecord>, DomainError> {
        sqlx::query_as("SELECT id, email FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_err)
    }
}
