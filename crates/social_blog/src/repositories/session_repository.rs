use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::models::sessions::{PasswordReset, Session};

use super::SessionRepository;

pub struct PgSessionRepository {
    db: Arc<PgPool>,
}

impl PgSessionRepository {
    pub fn new(db: Arc<PgPool>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SessionRepository for PgSessionRepository {
    async fn create_session(&self, session: &Session) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO sessions (token, user_id, created_at, expires_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(session.token)
        .bind(session.user_id)
        .bind(session.created_at)
        .bind(session.expires_at)
        .execute(self.db.as_ref())
        .await?;

        Ok(())
    }

    async fn find_session(&self, token: Uuid) -> Result<Option<Session>, sqlx::Error> {
        sqlx::query_as::<_, Session>(
            "SELECT token, user_id, created_at, expires_at FROM sessions WHERE token = $1",
        )
        .bind(token)
        .fetch_optional(self.db.as_ref())
        .await
    }

    async fn delete_session(&self, token: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM sessions WHERE token = $1")
            .bind(token)
            .execute(self.db.as_ref())
            .await?;

        Ok(())
    }

    async fn delete_user_sessions(&self, user_id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM sessions WHERE user_id = $1")
            .bind(user_id)
            .execute(self.db.as_ref())
            .await?;

        Ok(())
    }

    async fn create_password_reset(&self, reset: &PasswordReset) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT INTO password_resets (token, user_id, expires_at) VALUES ($1, $2, $3)")
            .bind(reset.token)
            .bind(reset.user_id)
            .bind(reset.expires_at)
            .execute(self.db.as_ref())
            .await?;

        Ok(())
    }

    async fn take_password_reset(
        &self,
        token: Uuid,
    ) -> Result<Option<PasswordReset>, sqlx::Error> {
        sqlx::query_as::<_, PasswordReset>(
            "DELETE FROM password_resets WHERE token = $1 RETURNING token, user_id, expires_at",
        )
        .bind(token)
        .fetch_optional(self.db.as_ref())
        .await
    }
}
