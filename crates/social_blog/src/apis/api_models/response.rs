use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{posts::PostResponse, users::AccountResponse};

use super::common::PaginationOptions;

#[derive(Serialize, Deserialize, ToSchema, Debug)]
#[serde(rename_all = "lowercase")]
pub enum MessageCategory {
    Success,
    Info,
}

/// Feedback for actions that have no resource to return
#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct MessageResponse {
    pub message: String,
    pub category: MessageCategory,
}

impl MessageResponse {
    pub fn success(message: impl Into<String>) -> Self {
        MessageResponse {
            message: message.into(),
            category: MessageCategory::Success,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        MessageResponse {
            message: message.into(),
            category: MessageCategory::Info,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct LoginResponse {
    pub token: Uuid,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub user: AccountResponse,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct PaginatedPostResponse {
    pub items: Vec<PostResponse>,
    pub total_items: i64,
    pub current_page: u32,
    pub items_per_page: u32,
    pub total_pages: u32,
}

impl PaginatedPostResponse {
    pub fn new(items: Vec<PostResponse>, total_items: i64, options: &PaginationOptions) -> Self {
        PaginatedPostResponse {
            items,
            total_items,
            current_page: options.page.max(1),
            items_per_page: options.limit() as u32,
            total_pages: options.total_pages(total_items),
        }
    }
}
