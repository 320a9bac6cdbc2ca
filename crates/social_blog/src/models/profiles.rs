use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::users::UserResponse;

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct ProfileResponse {
    pub user: UserResponse,
    pub posts_count: i64,
    pub followers_count: i64,
    pub following_count: i64,
    /// Only present when the request is authenticated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_following: Option<bool>,
}
