use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{
    comments::{Comment, CommentWithAuthor},
    posts::{Post, PostWithAuthor},
    sessions::{PasswordReset, Session},
    users::User,
};

pub mod comment_repository;
#[cfg(test)]
pub mod in_memory;
pub mod post_repository;
pub mod session_repository;
pub mod user_repository;

/// A page of rows plus the total number of rows matching the query.
pub type Page<T> = (Vec<T>, i64);

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<(), sqlx::Error>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, sqlx::Error>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, sqlx::Error>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error>;
    async fn update_account(
        &self,
        id: Uuid,
        username: &str,
        email: &str,
        bio: Option<&str>,
    ) -> Result<Option<User>, sqlx::Error>;
    async fn update_avatar(&self, id: Uuid, avatar: &str) -> Result<(), sqlx::Error>;
    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), sqlx::Error>;
    /// Removes the user together with everything that references them.
    async fn delete(&self, id: Uuid) -> Result<(), sqlx::Error>;
}

#[async_trait]
pub trait FollowRepository: Send + Sync {
    /// Returns false when the edge already existed.
    async fn follow(&self, follower_id: Uuid, followed_id: Uuid) -> Result<bool, sqlx::Error>;
    /// Returns false when there was no edge to remove.
    async fn unfollow(&self, follower_id: Uuid, followed_id: Uuid) -> Result<bool, sqlx::Error>;
    async fn is_following(&self, follower_id: Uuid, followed_id: Uuid)
        -> Result<bool, sqlx::Error>;
    async fn list_followers(&self, user_id: Uuid) -> Result<Vec<User>, sqlx::Error>;
    async fn list_following(&self, user_id: Uuid) -> Result<Vec<User>, sqlx::Error>;
    async fn count_followers(&self, user_id: Uuid) -> Result<i64, sqlx::Error>;
    async fn count_following(&self, user_id: Uuid) -> Result<i64, sqlx::Error>;
}

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create(&self, post: &Post) -> Result<(), sqlx::Error>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, sqlx::Error>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostWithAuthor>, sqlx::Error>;
    async fn update(
        &self,
        id: Uuid,
        title: &str,
        content: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<(), sqlx::Error>;
    async fn delete(&self, id: Uuid) -> Result<(), sqlx::Error>;
    async fn list_all(&self, limit: i64, offset: i64) -> Result<Page<PostWithAuthor>, sqlx::Error>;
    async fn list_by_user(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Page<PostWithAuthor>, sqlx::Error>;
    /// Posts written by `user_id` or by anyone `user_id` follows, newest first.
    async fn feed(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Page<PostWithAuthor>, sqlx::Error>;
    async fn count_by_user(&self, user_id: Uuid) -> Result<i64, sqlx::Error>;
}

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn create(&self, comment: &Comment) -> Result<(), sqlx::Error>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, sqlx::Error>;
    async fn list_by_post(&self, post_id: Uuid) -> Result<Vec<CommentWithAuthor>, sqlx::Error>;
    async fn delete(&self, id: Uuid) -> Result<(), sqlx::Error>;
}

#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create_session(&self, session: &Session) -> Result<(), sqlx::Error>;
    async fn find_session(&self, token: Uuid) -> Result<Option<Session>, sqlx::Error>;
    async fn delete_session(&self, token: Uuid) -> Result<(), sqlx::Error>;
    async fn delete_user_sessions(&self, user_id: Uuid) -> Result<(), sqlx::Error>;
    async fn create_password_reset(&self, reset: &PasswordReset) -> Result<(), sqlx::Error>;
    /// Deletes the reset token and returns it, so a token can be used once.
    async fn take_password_reset(&self, token: Uuid)
        -> Result<Option<PasswordReset>, sqlx::Error>;
}
