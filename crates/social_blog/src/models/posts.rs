use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::users::avatar_url;

#[derive(Clone, Debug, PartialEq, FromRow)]
pub struct Post {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// A post joined with the columns of its author needed for display.
#[derive(Clone, Debug, PartialEq, FromRow)]
pub struct PostWithAuthor {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub author_username: String,
    pub author_avatar: String,
}

#[derive(Serialize, Deserialize, ToSchema, Clone, Debug)]
pub struct AuthorResponse {
    pub id: Uuid,
    pub username: String,
    pub avatar_url: String,
}

#[derive(Serialize, Deserialize, ToSchema, Clone, Debug)]
pub struct PostResponse {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub author: AuthorResponse,
}

impl From<PostWithAuthor> for PostResponse {
    fn from(post: PostWithAuthor) -> Self {
        PostResponse {
            id: post.id,
            title: post.title,
            slug: post.slug,
            content: post.content,
            created_at: post.created_at,
            updated_at: post.updated_at,
            author: AuthorResponse {
                id: post.user_id,
                avatar_url: avatar_url(&post.author_avatar),
                username: post.author_username,
            },
        }
    }
}
