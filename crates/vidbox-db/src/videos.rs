use chrono::Utc;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use vidbox_core::models::Video;
use vidbox_core::AppError;

#[derive(Clone)]
pub struct VideoRepository {
    pool: PgPool,
}

impl VideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Commit a video record. The caller guarantees the stored artifact
    /// already exists on disk; this is a single INSERT, so readers either
    /// see the final record or nothing.
    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "insert"))]
    pub async fn create(
        &self,
        id: Uuid,
        owner_id: Uuid,
        stored_name: &str,
        original_name: &str,
        title: &str,
        description: Option<&str>,
    ) -> Result<Video, AppError> {
        let video = sqlx::query_as::<Postgres, Video>(
            r#"
            INSERT INTO videos (id, owner_id, stored_name, original_name, title, description, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(stored_name)
        .bind(original_name)
        .bind(title)
        .bind(description)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;
        Ok(video)
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        let video = sqlx::query_as::<Postgres, Video>("SELECT * FROM videos WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(video)
    }

    /// List an owner's videos newest-first, optionally filtered by a
    /// case-insensitive substring match over title and original filename.
    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "select"))]
    pub async fn list_for_owner(
        &self,
        owner_id: Uuid,
        search: Option<&str>,
    ) -> Result<Vec<Video>, AppError> {
        let pattern = search
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(like_pattern);

        let videos = sqlx::query_as::<Postgres, Video>(
            r#"
            SELECT * FROM videos
            WHERE owner_id = $1
              AND ($2::text IS NULL OR title ILIKE $2 OR original_name ILIKE $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner_id)
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;
        Ok(videos)
    }

    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "update"))]
    pub async fn update_details(
        &self,
        id: Uuid,
        title: &str,
        description: Option<&str>,
    ) -> Result<Video, AppError> {
        let video = sqlx::query_as::<Postgres, Video>(
            r#"
            UPDATE videos SET title = $2, description = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(description)
        .fetch_optional(&self.pool)
        .await?;
        video.ok_or_else(|| AppError::NotFound("Video not found".to_string()))
    }

    /// Delete a video row; false when no row existed (idempotent delete).
    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "delete"))]
    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM videos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// All videos owned by a user (artifact cleanup before account delete).
    pub async fn list_all_for_owner(&self, owner_id: Uuid) -> Result<Vec<Video>, AppError> {
        self.list_for_owner(owner_id, None).await
    }
}

/// Build an ILIKE pattern from user input, escaping LIKE metacharacters so
/// the search stays a plain substring match.
fn like_pattern(query: &str) -> String {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_metacharacters() {
        assert_eq!(like_pattern("clip"), "%clip%");
        assert_eq!(like_pattern("100%"), "%100\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
        assert_eq!(like_pattern("back\\slash"), "%back\\\\slash%");
    }
}
