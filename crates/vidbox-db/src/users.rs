use chrono::Utc;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use vidbox_core::models::User;
use vidbox_core::AppError;

#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self, password_hash), fields(db.table = "users", db.operation = "insert"))]
    pub async fn create(&self, username: &str, password_hash: &str) -> Result<User, AppError> {
        let result = sqlx::query_as::<Postgres, User>(
            r#"
            INSERT INTO users (id, username, password_hash, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(username)
        .bind(password_hash)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(user) => Ok(user),
            Err(e) if crate::is_unique_violation(&e) => {
                Err(AppError::Conflict("Username already exists".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<Postgres, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<Postgres, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Delete a user row. Sessions and video rows go with it via the
    /// database cascade; on-disk artifacts are the caller's concern.
    #[tracing::instrument(skip(self), fields(db.table = "users", db.operation = "delete"))]
    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
