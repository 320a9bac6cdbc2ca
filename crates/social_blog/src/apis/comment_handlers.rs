use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use uuid::Uuid;

use crate::{
    apis::api_models::{request::CommentRequest, response::MessageResponse},
    models::comments::CommentResponse,
    utils::errors::{app_error::AppError, error_payload::ErrorPayload},
    AppState,
};

use super::middlewares::auth::AuthUser;

pub const TAG: &str = "comments";

/// Comments on a post, oldest first
#[utoipa::path(
    get,
    tag = TAG,
    path = "/{slug}/comments",
    operation_id = "listComments",
    params(
        ("slug" = String, Path, description = "Post slug")
    ),
    responses(
        (status = 200, description = "Comments", body = Vec<CommentResponse>),
        (status = 404, description = "Post not found", body = ErrorPayload)
    )
)]
pub(super) async fn list_comments(
    State(app_state): State<Arc<AppState>>,
    WithRejection(Path(slug), _): WithRejection<Path<String>, AppError>,
) -> Result<(StatusCode, Json<Vec<CommentResponse>>), AppError> {
    let comments = app_state.comment_service.list_comments(&slug).await?;
    Ok((StatusCode::OK, Json(comments)))
}

/// Comment on a post
#[utoipa::path(
    post,
    tag = TAG,
    path = "/{slug}/comments",
    operation_id = "addComment",
    security(("bearer_auth" = [])),
    request_body = CommentRequest,
    params(
        ("slug" = String, Path, description = "Post slug")
    ),
    responses(
        (status = 201, description = "Your comment has been added!", body = CommentResponse),
        (status = 401, description = "Not logged in", body = ErrorPayload),
        (status = 404, description = "Post not found", body = ErrorPayload),
        (status = 422, description = "Invalid fields", body = ErrorPayload)
    )
)]
pub(super) async fn add_comment(
    State(app_state): State<Arc<AppState>>,
    auth: AuthUser,
    WithRejection(Path(slug), _): WithRejection<Path<String>, AppError>,
    WithRejection(Json(body), _): WithRejection<Json<CommentRequest>, AppError>,
) -> Result<(StatusCode, Json<CommentResponse>), AppError> {
    let comment = app_state
        .comment_service
        .add_comment(&auth.user, &slug, &body)
        .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// Delete a comment you wrote or one left on your post
#[utoipa::path(
    delete,
    tag = TAG,
    path = "/comments/{id}",
    operation_id = "deleteComment",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Comment id")
    ),
    responses(
        (status = 200, description = "Your comment has been deleted!", body = MessageResponse),
        (status = 403, description = "Not allowed", body = ErrorPayload),
        (status = 404, description = "Comment not found", body = ErrorPayload)
    )
)]
pub(super) async fn delete_comment(
    State(app_state): State<Arc<AppState>>,
    auth: AuthUser,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, AppError>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    app_state
        .comment_service
        .delete_comment(&auth.user, id)
        .await?;
    Ok((
        StatusCode::OK,
        Json(MessageResponse::success("Your comment has been deleted!")),
    ))
}
