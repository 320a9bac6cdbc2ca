use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;

use crate::{
    apis::api_models::{
        common::PaginationOptions,
        request::PostRequest,
        response::{MessageResponse, PaginatedPostResponse},
    },
    models::posts::PostResponse,
    utils::errors::{app_error::AppError, error_payload::ErrorPayload},
    AppState,
};

use super::middlewares::auth::AuthUser;

pub const TAG: &str = "posts";

/// Home feed: your own posts and posts by everyone you follow, newest first
#[utoipa::path(
    get,
    tag = TAG,
    path = "/feed",
    operation_id = "getFeed",
    security(("bearer_auth" = [])),
    params(PaginationOptions),
    responses(
        (status = 200, description = "Feed page", body = PaginatedPostResponse),
        (status = 401, description = "Not logged in", body = ErrorPayload)
    )
)]
pub(super) async fn get_feed(
    State(app_state): State<Arc<AppState>>,
    auth: AuthUser,
    WithRejection(Query(options), _): WithRejection<Query<PaginationOptions>, AppError>,
) -> Result<(StatusCode, Json<PaginatedPostResponse>), AppError> {
    let page = app_state.post_service.feed(&auth.user, &options).await?;
    Ok((StatusCode::OK, Json(page)))
}

/// Every post on the site, newest first
#[utoipa::path(
    get,
    tag = TAG,
    path = "/",
    operation_id = "explorePosts",
    params(PaginationOptions),
    responses(
        (status = 200, description = "Posts page", body = PaginatedPostResponse),
        (status = 500, description = "Internal server error", body = ErrorPayload)
    )
)]
pub(super) async fn explore(
    State(app_state): State<Arc<AppState>>,
    WithRejection(Query(options), _): WithRejection<Query<PaginationOptions>, AppError>,
) -> Result<(StatusCode, Json<PaginatedPostResponse>), AppError> {
    let page = app_state.post_service.explore(&options).await?;
    Ok((StatusCode::OK, Json(page)))
}

/// Publish a new post
#[utoipa::path(
    post,
    tag = TAG,
    path = "/",
    operation_id = "createPost",
    security(("bearer_auth" = [])),
    request_body = PostRequest,
    responses(
        (status = 201, description = "Your post has been created!", body = PostResponse),
        (status = 401, description = "Not logged in", body = ErrorPayload),
        (status = 422, description = "Invalid fields", body = ErrorPayload)
    )
)]
pub(super) async fn create_post(
    State(app_state): State<Arc<AppState>>,
    auth: AuthUser,
    WithRejection(Json(body), _): WithRejection<Json<PostRequest>, AppError>,
) -> Result<(StatusCode, Json<PostResponse>), AppError> {
    let post = app_state.post_service.create_post(&auth.user, &body).await?;
    Ok((StatusCode::CREATED, Json(PostResponse::from(post))))
}

/// Get a post by its slug
#[utoipa::path(
    get,
    tag = TAG,
    path = "/{slug}",
    operation_id = "getPost",
    params(
        ("slug" = String, Path, description = "Post slug")
    ),
    responses(
        (status = 200, description = "The post", body = PostResponse),
        (status = 404, description = "Post not found", body = ErrorPayload)
    )
)]
pub(super) async fn get_post(
    State(app_state): State<Arc<AppState>>,
    WithRejection(Path(slug), _): WithRejection<Path<String>, AppError>,
) -> Result<(StatusCode, Json<PostResponse>), AppError> {
    let post = app_state.post_service.get_post(&slug).await?;
    Ok((StatusCode::OK, Json(PostResponse::from(post))))
}

/// Edit one of your posts
#[utoipa::path(
    put,
    tag = TAG,
    path = "/{slug}",
    operation_id = "updatePost",
    security(("bearer_auth" = [])),
    request_body = PostRequest,
    params(
        ("slug" = String, Path, description = "Post slug")
    ),
    responses(
        (status = 200, description = "Your post has been updated!", body = PostResponse),
        (status = 403, description = "Not the author", body = ErrorPayload),
        (status = 404, description = "Post not found", body = ErrorPayload),
        (status = 422, description = "Invalid fields", body = ErrorPayload)
    )
)]
pub(super) async fn update_post(
    State(app_state): State<Arc<AppState>>,
    auth: AuthUser,
    WithRejection(Path(slug), _): WithRejection<Path<String>, AppError>,
    WithRejection(Json(body), _): WithRejection<Json<PostRequest>, AppError>,
) -> Result<(StatusCode, Json<PostResponse>), AppError> {
    let post = app_state
        .post_service
        .update_post(&auth.user, &slug, &body)
        .await?;
    Ok((StatusCode::OK, Json(PostResponse::from(post))))
}

/// Delete one of your posts along with its comments
#[utoipa::path(
    delete,
    tag = TAG,
    path = "/{slug}",
    operation_id = "deletePost",
    security(("bearer_auth" = [])),
    params(
        ("slug" = String, Path, description = "Post slug")
    ),
    responses(
        (status = 200, description = "Your post has been deleted!", body = MessageResponse),
        (status = 403, description = "Not the author", body = ErrorPayload),
        (status = 404, description = "Post not found", body = ErrorPayload)
    )
)]
pub(super) async fn delete_post(
    State(app_state): State<Arc<AppState>>,
    auth: AuthUser,
    WithRejection(Path(slug), _): WithRejection<Path<String>, AppError>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    app_state.post_service.delete_post(&auth.user, &slug).await?;
    Ok((
        StatusCode::OK,
        Json(MessageResponse::success("Your post has been deleted!")),
    ))
}
