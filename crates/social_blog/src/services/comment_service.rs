use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{
    apis::api_models::request::CommentRequest,
    models::{
        comments::{Comment, CommentResponse},
        users::User,
    },
    repositories::{CommentRepository, PostRepository},
    utils::errors::app_error::AppError,
};

pub struct CommentService {
    comment_repository: Arc<dyn CommentRepository>,
    post_repository: Arc<dyn PostRepository>,
}

impl CommentService {
    pub fn new(
        comment_repository: Arc<dyn CommentRepository>,
        post_repository: Arc<dyn PostRepository>,
    ) -> Self {
        Self {
            comment_repository,
            post_repository,
        }
    }

    pub async fn add_comment(
        &self,
        author: &User,
        slug: &str,
        request: &CommentRequest,
    ) -> Result<CommentResponse, AppError> {
        request.validate()?;
        let body = request.body.trim();
        if body.is_empty() {
            return Err(AppError::field("body", "This field is required."));
        }

        let post = self
            .post_repository
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Post {} not found", slug)))?;

        let comment = Comment {
            id: Uuid::new_v4(),
            post_id: post.id,
            user_id: author.id,
            body: body.to_string(),
            created_at: Utc::now(),
        };
        self.comment_repository.create(&comment).await?;
        info!("{} commented on {}", author.username, slug);

        self.comment_repository
            .list_by_post(post.id)
            .await?
            .into_iter()
            .find(|c| c.id == comment.id)
            .map(CommentResponse::from)
            .ok_or_else(|| AppError::InternalServerError("Comment vanished".to_string()))
    }

    /// Oldest first.
    pub async fn list_comments(&self, slug: &str) -> Result<Vec<CommentResponse>, AppError> {
        let post = self
            .post_repository
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Post {} not found", slug)))?;

        let comments = self.comment_repository.list_by_post(post.id).await?;
        Ok(comments.into_iter().map(CommentResponse::from).collect())
    }

    /// Allowed for whoever wrote the comment and for the author of the post it
    /// was left on.
    pub async fn delete_comment(&self, user: &User, comment_id: Uuid) -> Result<(), AppError> {
        let comment = self
            .comment_repository
            .find_by_id(comment_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;

        if comment.user_id != user.id {
            let post_author = self
                .post_repository
                .find_by_id(comment.post_id)
                .await?
                .map(|post| post.user_id);
            if post_author != Some(user.id) {
                return Err(AppError::Forbidden(
                    "You cannot delete this comment".to_string(),
                ));
            }
        }

        self.comment_repository.delete(comment.id).await?;
        Ok(())
    }
}
