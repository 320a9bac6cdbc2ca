use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{posts::AuthorResponse, users::avatar_url};

#[derive(Clone, Debug, PartialEq, FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, FromRow)]
pub struct CommentWithAuthor {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub author_username: String,
    pub author_avatar: String,
}

#[derive(Serialize, Deserialize, ToSchema, Clone, Debug)]
pub struct CommentResponse {
    pub id: Uuid,
    pub post_id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub author: AuthorResponse,
}

impl From<CommentWithAuthor> for CommentResponse {
    fn from(comment: CommentWithAuthor) -> Self {
        CommentResponse {
            id: comment.id,
            post_id: comment.post_id,
            body: comment.body,
            created_at: comment.created_at,
            author: AuthorResponse {
                id: comment.user_id,
                avatar_url: avatar_url(&comment.author_avatar),
                username: comment.author_username,
            },
        }
    }
}
