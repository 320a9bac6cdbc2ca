use async_trait::async_trait;
use tracing::info;

use crate::utils::errors::app_error::AppError;

/// Outbound email. Delivery itself lives outside this service.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_password_reset(
        &self,
        to: &str,
        username: &str,
        reset_link: &str,
    ) -> Result<(), AppError>;
}

/// Writes outgoing mail to the log instead of sending it.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_password_reset(
        &self,
        to: &str,
        username: &str,
        reset_link: &str,
    ) -> Result<(), AppError> {
        info!(
            to = %to,
            username = %username,
            "Password reset requested, visit {} to reset your password. The link expires shortly.",
            reset_link
        );
        Ok(())
    }
}
