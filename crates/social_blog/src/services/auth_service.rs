use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::{
    apis::api_models::request::{
        LoginRequest, RegisterRequest, RequestResetRequest, ResetPasswordRequest,
    },
    models::{
        sessions::{PasswordReset, Session},
        users::User,
    },
    repositories::{SessionRepository, UserRepository},
    settings::Settings,
    utils::{
        errors::app_error::{AppError, FieldErrors},
        password::{hash_password, verify_password},
    },
};

use super::mail_service::Mailer;

pub const EMAIL_TAKEN: &str = "This email address already exists";
pub const USERNAME_TAKEN: &str = "This username is taken";

#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub session_ttl: Duration,
    pub remember_me_ttl: Duration,
    pub reset_token_ttl: Duration,
    pub public_url: String,
}

impl From<&Settings> for AuthConfig {
    fn from(settings: &Settings) -> Self {
        AuthConfig {
            session_ttl: Duration::hours(settings.session_ttl_hours),
            remember_me_ttl: Duration::days(settings.remember_me_days),
            reset_token_ttl: Duration::seconds(settings.reset_token_ttl_secs),
            public_url: settings.public_url.trim_end_matches('/').to_string(),
        }
    }
}

pub struct AuthService {
    user_repository: Arc<dyn UserRepository>,
    session_repository: Arc<dyn SessionRepository>,
    mailer: Arc<dyn Mailer>,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        session_repository: Arc<dyn SessionRepository>,
        mailer: Arc<dyn Mailer>,
        config: AuthConfig,
    ) -> Self {
        Self {
            user_repository,
            session_repository,
            mailer,
            config,
        }
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<User, AppError> {
        request.validate()?;

        let mut errors = FieldErrors::new();
        if self
            .user_repository
            .find_by_username(&request.username)
            .await?
            .is_some()
        {
            errors.insert("username".into(), vec![USERNAME_TAKEN.into()]);
        }
        if self
            .user_repository
            .find_by_email(&request.email)
            .await?
            .is_some()
        {
            errors.insert("email".into(), vec![EMAIL_TAKEN.into()]);
        }
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        let user = User::new(
            &request.username,
            &request.email,
            hash_password(&request.password)?,
        );
        self.user_repository
            .create(&user)
            .await
            .map_err(unique_violation_to_field_error)?;

        info!("Registered user {}", user.username);
        Ok(user)
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<(Session, User), AppError> {
        request.validate()?;

        let user = self
            .user_repository
            .find_by_email(&request.email)
            .await?
            .filter(|user| verify_password(&request.password, &user.password_hash))
            .ok_or_else(|| {
                warn!("Failed login attempt for {}", request.email);
                AppError::Unauthorized("Wrong email or password".to_string())
            })?;

        let ttl = if request.remember {
            self.config.remember_me_ttl
        } else {
            self.config.session_ttl
        };
        let now = Utc::now();
        let session = Session {
            token: Uuid::new_v4(),
            user_id: user.id,
            created_at: now,
            expires_at: now + ttl,
        };
        self.session_repository.create_session(&session).await?;

        info!("User {} logged in", user.username);
        Ok((session, user))
    }

    pub async fn logout(&self, token: Uuid) -> Result<(), AppError> {
        self.session_repository.delete_session(token).await?;
        Ok(())
    }

    /// Resolves a bearer token to its user. Expired sessions are removed.
    pub async fn authenticate(&self, token: Uuid) -> Result<User, AppError> {
        let session = self
            .session_repository
            .find_session(token)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid session token".to_string()))?;

        if session.is_expired() {
            self.session_repository.delete_session(token).await?;
            return Err(AppError::Unauthorized("Session expired".to_string()));
        }

        self.user_repository
            .find_by_id(session.user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid session token".to_string()))
    }

    pub async fn request_password_reset(
        &self,
        request: &RequestResetRequest,
    ) -> Result<(), AppError> {
        request.validate()?;

        let user = self
            .user_repository
            .find_by_email(&request.email)
            .await?
            .ok_or_else(|| AppError::field("email", "No account with this email!"))?;

        let reset = PasswordReset {
            token: Uuid::new_v4(),
            user_id: user.id,
            expires_at: Utc::now() + self.config.reset_token_ttl,
        };
        self.session_repository.create_password_reset(&reset).await?;

        let link = format!(
            "{}/api/v1/auth/reset-password/{}",
            self.config.public_url, reset.token
        );
        self.mailer
            .send_password_reset(&user.email, &user.username, &link)
            .await
    }

    pub async fn reset_password(
        &self,
        token: Uuid,
        request: &ResetPasswordRequest,
    ) -> Result<User, AppError> {
        request.validate()?;

        let invalid = || AppError::BadRequest("That is an invalid or expired token".to_string());
        let reset = self
            .session_repository
            .take_password_reset(token)
            .await?
            .ok_or_else(invalid)?;
        if reset.is_expired() {
            return Err(invalid());
        }

        let user = self
            .user_repository
            .find_by_id(reset.user_id)
            .await?
            .ok_or_else(invalid)?;

        self.user_repository
            .update_password(user.id, &hash_password(&request.password)?)
            .await?;
        self.session_repository
            .delete_user_sessions(user.id)
            .await?;

        info!("Password reset for {}", user.username);
        Ok(user)
    }
}

/// Two concurrent registrations can both pass the lookup above; the unique
/// index decides and the loser gets the usual field error.
pub(crate) fn unique_violation_to_field_error(error: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_error) = &error {
        if db_error.is_unique_violation() {
            return match db_error.constraint() {
                Some(c) if c.contains("email") => AppError::field("email", EMAIL_TAKEN),
                _ => AppError::field("username", USERNAME_TAKEN),
            };
        }
    }
    AppError::DatabaseError(error)
}
