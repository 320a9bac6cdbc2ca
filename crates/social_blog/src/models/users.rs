use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

pub const DEFAULT_AVATAR: &str = "default.png";
pub const AVATARS_URL_PATH: &str = "/static/avatars";

#[derive(Clone, Debug, PartialEq, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub bio: Option<String>,
    pub avatar: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(username: &str, email: &str, password_hash: String) -> Self {
        User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash,
            bio: None,
            avatar: DEFAULT_AVATAR.to_string(),
            created_at: Utc::now(),
        }
    }

    pub fn avatar_url(&self) -> String {
        avatar_url(&self.avatar)
    }
}

pub fn avatar_url(avatar: &str) -> String {
    format!("{}/{}", AVATARS_URL_PATH, avatar)
}

/// Public view of a user, safe to show to anyone.
#[derive(Serialize, Deserialize, ToSchema, Clone, Debug)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub bio: Option<String>,
    pub avatar_url: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            avatar_url: user.avatar_url(),
            username: user.username,
            bio: user.bio,
        }
    }
}

/// The signed-in user's own account, including the email address.
#[derive(Serialize, Deserialize, ToSchema, Clone, Debug)]
pub struct AccountResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub bio: Option<String>,
    pub avatar_url: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for AccountResponse {
    fn from(user: User) -> Self {
        AccountResponse {
            id: user.id,
            avatar_url: user.avatar_url(),
            username: user.username,
            email: user.email,
            bio: user.bio,
            created_at: user.created_at,
        }
    }
}
