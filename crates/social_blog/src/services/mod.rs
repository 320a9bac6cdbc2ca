pub mod auth_service;
pub mod comment_service;
pub mod mail_service;
pub mod post_service;
pub mod profile_service;
pub mod storage_service;
pub mod user_service;
