use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::models::users::User;

use super::{FollowRepository, UserRepository};

const USER_COLUMNS: &str = "u.id, u.username, u.email, u.password_hash, u.bio, u.avatar, u.created_at";

pub struct PgUserRepository {
    db: Arc<PgPool>,
}

impl PgUserRepository {
    pub fn new(db: Arc<PgPool>) -> Self {
        PgUserRepository { db }
    }

    async fn find_one_by(&self, column: &str, value: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users u WHERE u.{column} = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(value)
            .fetch_optional(self.db.as_ref())
            .await
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: &User) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO users (id, username, email, password_hash, bio, avatar, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.bio)
        .bind(&user.avatar)
        .bind(user.created_at)
        .execute(self.db.as_ref())
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users u WHERE u.id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(self.db.as_ref())
            .await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, sqlx::Error> {
        self.find_one_by("username", username).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        self.find_one_by("email", email).await
    }

    async fn update_account(
        &self,
        id: Uuid,
        username: &str,
        email: &str,
        bio: Option<&str>,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "UPDATE users
             SET username = $2, email = $3, bio = $4
             WHERE id = $1
             RETURNING id, username, email, password_hash, bio, avatar, created_at",
        )
        .bind(id)
        .bind(username)
        .bind(email)
        .bind(bio)
        .fetch_optional(self.db.as_ref())
        .await
    }

    async fn update_avatar(&self, id: Uuid, avatar: &str) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET avatar = $2 WHERE id = $1")
            .bind(id)
            .bind(avatar)
            .execute(self.db.as_ref())
            .await?;

        Ok(())
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(self.db.as_ref())
            .await?;

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), sqlx::Error> {
        // follows, posts, comments, sessions and reset tokens go with ON DELETE CASCADE
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(self.db.as_ref())
            .await?;

        Ok(())
    }
}

#[async_trait]
impl FollowRepository for PgUserRepository {
    async fn follow(&self, follower_id: Uuid, followed_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO user_follows (follower_id, followed_id, created_at) VALUES ($1, $2, $3)
             ON CONFLICT (follower_id, followed_id) DO NOTHING",
        )
        .bind(follower_id)
        .bind(followed_id)
        .bind(Utc::now())
        .execute(self.db.as_ref())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn unfollow(&self, follower_id: Uuid, followed_id: Uuid) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM user_follows WHERE follower_id = $1 AND followed_id = $2")
                .bind(follower_id)
                .bind(followed_id)
                .execute(self.db.as_ref())
                .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn is_following(
        &self,
        follower_id: Uuid,
        followed_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let query = r#"
        SELECT EXISTS (SELECT 1 FROM user_follows WHERE follower_id = $1 AND followed_id = $2)
        "#;
        sqlx::query_scalar::<_, bool>(query)
            .bind(follower_id)
            .bind(followed_id)
            .fetch_one(self.db.as_ref())
            .await
    }

    async fn list_followers(&self, user_id: Uuid) -> Result<Vec<User>, sqlx::Error> {
        let query = format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users u
            INNER JOIN user_follows uf ON u.id = uf.follower_id
            WHERE uf.followed_id = $1
            ORDER BY uf.created_at DESC
            "#
        );
        sqlx::query_as::<_, User>(&query)
            .bind(user_id)
            .fetch_all(self.db.as_ref())
            .await
    }

    async fn list_following(&self, user_id: Uuid) -> Result<Vec<User>, sqlx::Error> {
        let query = format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users u
            INNER JOIN user_follows uf ON u.id = uf.followed_id
            WHERE uf.follower_id = $1
            ORDER BY uf.created_at DESC
            "#
        );
        sqlx::query_as::<_, User>(&query)
            .bind(user_id)
            .fetch_all(self.db.as_ref())
            .await
    }

    async fn count_followers(&self, user_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM user_follows WHERE followed_id = $1")
            .bind(user_id)
            .fetch_one(self.db.as_ref())
            .await
    }

    async fn count_following(&self, user_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM user_follows WHERE follower_id = $1")
            .bind(user_id)
            .fetch_one(self.db.as_ref())
            .await
    }
}
