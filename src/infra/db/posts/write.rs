use async_trait::async_trait;
use time::OffsetDateTime;

use crate::application::repos::{PostsWriteRepo, RepoError};
use crate::domain::entities::PostRecord;
use crate::domain::posts::{NewPost, PostPatch, next_updated_at};
use crate::infra::db::{SqliteRepositories, map_sqlx_error};

use super::types::PostRow;

#[async_trait]
impl PostsWriteRepo for SqliteRepositories {
    async fn create_post(&self, post: NewPost) -> Result<PostRecord, RepoError> {
        let NewPost {
            title,
            content,
            author,
        } = post;

        let now = OffsetDateTime::now_utc();
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            INSERT INTO blogs (title, content, author, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?4)
            RETURNING id, title, content, author, created_at, updated_at
            "#,
        )
        .bind(title)
        .bind(content)
        .bind(author)
        .bind(now)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(PostRecord::from(row))
    }

    async fn update_post(&self, id: i64, patch: PostPatch) -> Result<PostRecord, RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;

        let existing = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, title, content, author, created_at, updated_at
            FROM blogs
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_sqlx_error)?
        .ok_or(RepoError::NotFound)?;

        let PostPatch {
            title,
            content,
            author,
        } = patch;
        let updated_at = next_updated_at(existing.updated_at, OffsetDateTime::now_utc());

        let row = sqlx::query_as::<_, PostRow>(
            r#"
            UPDATE blogs
            SET title = ?1, content = ?2, author = ?3, updated_at = ?4
            WHERE id = ?5
            RETURNING id, title, content, author, created_at, updated_at
            "#,
        )
        .bind(title.unwrap_or(existing.title))
        .bind(content.unwrap_or(existing.content))
        .bind(author.unwrap_or(existing.author))
        .bind(updated_at)
        .bind(id)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;

        Ok(PostRecord::from(row))
    }

    async fn delete_post(&self, id: i64) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM blogs WHERE id = ?1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}
