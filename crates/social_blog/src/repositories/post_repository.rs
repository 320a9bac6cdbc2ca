use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::models::posts::{Post, PostWithAuthor};

use super::{Page, PostRepository};

const POST_WITH_AUTHOR: &str = r#"
    SELECT
        p.id, p.user_id, p.title, p.slug, p.content, p.created_at, p.updated_at,
        u.username AS author_username,
        u.avatar AS author_avatar
    FROM posts p
    INNER JOIN users u ON u.id = p.user_id
"#;

pub struct PgPostRepository {
    db: Arc<PgPool>,
}

impl PgPostRepository {
    pub fn new(db: Arc<PgPool>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    async fn create(&self, post: &Post) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO posts (id, user_id, title, slug, content, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(post.id)
        .bind(post.user_id)
        .bind(&post.title)
        .bind(&post.slug)
        .bind(&post.content)
        .bind(post.created_at)
        .bind(post.updated_at)
        .execute(self.db.as_ref())
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, sqlx::Error> {
        sqlx::query_as::<_, Post>(
            "SELECT id, user_id, title, slug, content, created_at, updated_at
             FROM posts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.db.as_ref())
        .await
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostWithAuthor>, sqlx::Error> {
        let query = format!("{POST_WITH_AUTHOR} WHERE p.slug = $1");
        sqlx::query_as::<_, PostWithAuthor>(&query)
            .bind(slug)
            .fetch_optional(self.db.as_ref())
            .await
    }

    async fn update(
        &self,
        id: Uuid,
        title: &str,
        content: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE posts SET title = $2, content = $3, updated_at = $4 WHERE id = $1")
            .bind(id)
            .bind(title)
            .bind(content)
            .bind(updated_at)
            .execute(self.db.as_ref())
            .await?;

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(self.db.as_ref())
            .await?;

        Ok(())
    }

    async fn list_all(&self, limit: i64, offset: i64) -> Result<Page<PostWithAuthor>, sqlx::Error> {
        let query = format!("{POST_WITH_AUTHOR} ORDER BY p.created_at DESC LIMIT $1 OFFSET $2");
        let posts = sqlx::query_as::<_, PostWithAuthor>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(self.db.as_ref())
            .await?;

        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts")
            .fetch_one(self.db.as_ref())
            .await?;

        Ok((posts, total))
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Page<PostWithAuthor>, sqlx::Error> {
        let query = format!(
            "{POST_WITH_AUTHOR} WHERE p.user_id = $1 ORDER BY p.created_at DESC LIMIT $2 OFFSET $3"
        );
        let posts = sqlx::query_as::<_, PostWithAuthor>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(self.db.as_ref())
            .await?;

        let total = self.count_by_user(user_id).await?;

        Ok((posts, total))
    }

    async fn feed(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Page<PostWithAuthor>, sqlx::Error> {
        const FEED_FILTER: &str = r#"
            WHERE p.user_id = $1
               OR p.user_id IN (SELECT followed_id FROM user_follows WHERE follower_id = $1)
        "#;

        let query = format!(
            "{POST_WITH_AUTHOR} {FEED_FILTER} ORDER BY p.created_at DESC LIMIT $2 OFFSET $3"
        );
        let posts = sqlx::query_as::<_, PostWithAuthor>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(self.db.as_ref())
            .await?;

        let count_query = format!("SELECT COUNT(*) FROM posts p {FEED_FILTER}");
        let total = sqlx::query_scalar::<_, i64>(&count_query)
            .bind(user_id)
            .fetch_one(self.db.as_ref())
            .await?;

        Ok((posts, total))
    }

    async fn count_by_user(&self, user_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(self.db.as_ref())
            .await
    }
}
