use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::models::comments::{Comment, CommentWithAuthor};

use super::CommentRepository;

pub struct PgCommentRepository {
    db: Arc<PgPool>,
}

impl PgCommentRepository {
    pub fn new(db: Arc<PgPool>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CommentRepository for PgCommentRepository {
    async fn create(&self, comment: &Comment) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO comments (id, post_id, user_id, body, created_at) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(comment.id)
        .bind(comment.post_id)
        .bind(comment.user_id)
        .bind(&comment.body)
        .bind(comment.created_at)
        .execute(self.db.as_ref())
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, sqlx::Error> {
        sqlx::query_as::<_, Comment>(
            "SELECT id, post_id, user_id, body, created_at FROM comments WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.db.as_ref())
        .await
    }

    async fn list_by_post(&self, post_id: Uuid) -> Result<Vec<CommentWithAuthor>, sqlx::Error> {
        let query = r#"
        SELECT
            c.id, c.post_id, c.user_id, c.body, c.created_at,
            u.username AS author_username,
            u.avatar AS author_avatar
        FROM comments c
        INNER JOIN users u ON u.id = c.user_id
        WHERE c.post_id = $1
        ORDER BY c.created_at ASC
        "#;
        sqlx::query_as::<_, CommentWithAuthor>(query)
            .bind(post_id)
            .fetch_all(self.db.as_ref())
            .await
    }

    async fn delete(&self, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(self.db.as_ref())
            .await?;

        Ok(())
    }
}
