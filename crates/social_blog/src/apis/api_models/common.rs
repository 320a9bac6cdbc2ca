use serde::Deserialize;
use utoipa::IntoParams;

const MAX_LIMIT: u32 = 50;

/// Common pagination parameters for list endpoints
#[derive(Debug, Deserialize, Clone, Copy, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationOptions {
    /// Page number (starts at 1)
    #[serde(default = "default_page")]
    pub page: u32,
    /// Number of items per page (at most 50)
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl Default for PaginationOptions {
    fn default() -> Self {
        PaginationOptions {
            page: default_page(),
            limit: default_limit(),
        }
    }
}

impl PaginationOptions {
    pub fn limit(&self) -> i64 {
        self.limit.clamp(1, MAX_LIMIT) as i64
    }

    pub fn offset(&self) -> i64 {
        (self.page.max(1) as i64 - 1) * self.limit()
    }

    pub fn total_pages(&self, total_items: i64) -> u32 {
        ((total_items + self.limit() - 1) / self.limit()) as u32
    }
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    10
}
