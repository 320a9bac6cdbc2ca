use std::sync::Arc;

use bytes::Bytes;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::{
    apis::api_models::request::UpdateAccountRequest,
    models::{
        profiles::ProfileResponse,
        users::{User, UserResponse, DEFAULT_AVATAR},
    },
    repositories::{FollowRepository, PostRepository, UserRepository},
    utils::errors::app_error::{AppError, FieldErrors},
};

use super::{
    auth_service::{unique_violation_to_field_error, EMAIL_TAKEN, USERNAME_TAKEN},
    storage_service::{avatar_extension, process_avatar, random_avatar_name, AvatarStorage},
};

#[derive(Clone)]
pub struct ProfileService {
    user_repository: Arc<dyn UserRepository>,
    follow_repository: Arc<dyn FollowRepository>,
    post_repository: Arc<dyn PostRepository>,
    avatar_storage: Arc<dyn AvatarStorage>,
}

impl ProfileService {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        follow_repository: Arc<dyn FollowRepository>,
        post_repository: Arc<dyn PostRepository>,
        avatar_storage: Arc<dyn AvatarStorage>,
    ) -> Self {
        ProfileService {
            user_repository,
            follow_repository,
            post_repository,
            avatar_storage,
        }
    }

    /// `viewer` is the authenticated caller, if any. `is_following` is only
    /// filled in for them.
    pub async fn get_profile(
        &self,
        username: &str,
        viewer: Option<Uuid>,
    ) -> Result<ProfileResponse, AppError> {
        let user = self
            .user_repository
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", username)))?;

        let posts_count = self.post_repository.count_by_user(user.id).await?;
        let followers_count = self.follow_repository.count_followers(user.id).await?;
        let following_count = self.follow_repository.count_following(user.id).await?;
        let is_following = match viewer {
            Some(viewer_id) => Some(
                self.follow_repository
                    .is_following(viewer_id, user.id)
                    .await?,
            ),
            None => None,
        };

        Ok(ProfileResponse {
            user: UserResponse::from(user),
            posts_count,
            followers_count,
            following_count,
            is_following,
        })
    }

    pub async fn update_account(
        &self,
        user: &User,
        request: &UpdateAccountRequest,
    ) -> Result<User, AppError> {
        request.validate()?;

        let mut errors = FieldErrors::new();
        if request.username != user.username
            && self
                .user_repository
                .find_by_username(&request.username)
                .await?
                .is_some()
        {
            errors.insert("username".into(), vec![USERNAME_TAKEN.into()]);
        }
        if request.email != user.email
            && self
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

        let bio = request.bio.as_deref().map(str::trim).filter(|b| !b.is_empty());
        let updated = self
            .user_repository
            .update_account(user.id, &request.username, &request.email, bio)
            .await
            .map_err(unique_violation_to_field_error)?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        info!("Account {} updated", updated.id);
        Ok(updated)
    }

    /// Resizes and stores the upload under a fresh random name, then drops the
    /// previous avatar unless it was the shared default.
    pub async fn upload_avatar(
        &self,
        user: &User,
        data: Bytes,
        file_name: Option<&str>,
        content_type: Option<&str>,
    ) -> Result<User, AppError> {
        let extension = avatar_extension(file_name, content_type)?;
        let processed = process_avatar(&data, extension)?;
        let name = random_avatar_name(extension);

        self.avatar_storage.save(&name, processed).await?;
        self.user_repository.update_avatar(user.id, &name).await?;

        if user.avatar != DEFAULT_AVATAR {
            if let Err(e) = self.avatar_storage.delete(&user.avatar).await {
                warn!("Could not remove old avatar {}: {}", user.avatar, e);
            }
        }

        self.user_repository
            .find_by_id(user.id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    pub async fn delete_account(&self, user: &User) -> Result<(), AppError> {
        self.user_repository.delete(user.id).await?;
        if user.avatar != DEFAULT_AVATAR {
            if let Err(e) = self.avatar_storage.delete(&user.avatar).await {
                warn!("Could not remove avatar of deleted user: {}", e);
            }
        }
        info!("Account {} deleted", user.username);
        Ok(())
    }
}
