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
        response::{MessageResponse, PaginatedPostResponse},
    },
    models::{profiles::ProfileResponse, users::UserResponse},
    utils::errors::{app_error::AppError, error_payload::ErrorPayload},
    AppState,
};

use super::middlewares::auth::{AuthUser, MaybeAuthUser};

pub const TAG: &str = "profiles";

/// Get a user's profile. `is_following` is included for logged in callers.
#[utoipa::path(
    get,
    tag = TAG,
    path = "/{username}",
    operation_id = "getProfile",
    security((), ("bearer_auth" = [])),
    params(
        ("username" = String, Path, description = "Username")
    ),
    responses(
        (status = 200, description = "Profile details retrieved successfully", body = ProfileResponse),
        (status = 404, description = "User not found", body = ErrorPayload),
        (status = 500, description = "Internal server error", body = ErrorPayload)
    )
)]
pub(super) async fn get_profile(
    State(app_state): State<Arc<AppState>>,
    MaybeAuthUser(viewer): MaybeAuthUser,
    WithRejection(Path(username), _): WithRejection<Path<String>, AppError>,
) -> Result<(StatusCode, Json<ProfileResponse>), AppError> {
    let profile = app_state
        .profile_service
        .get_profile(&username, viewer.map(|auth| auth.user.id))
        .await?;
    Ok((StatusCode::OK, Json(profile)))
}

/// Posts written by a user, newest first
#[utoipa::path(
    get,
    tag = TAG,
    path = "/{username}/posts",
    operation_id = "getUserPosts",
    params(
        ("username" = String, Path, description = "Username"),
        PaginationOptions
    ),
    responses(
        (status = 200, description = "Posts page", body = PaginatedPostResponse),
        (status = 404, description = "User not found", body = ErrorPayload)
    )
)]
pub(super) async fn get_user_posts(
    State(app_state): State<Arc<AppState>>,
    WithRejection(Path(username), _): WithRejection<Path<String>, AppError>,
    WithRejection(Query(options), _): WithRejection<Query<PaginationOptions>, AppError>,
) -> Result<(StatusCode, Json<PaginatedPostResponse>), AppError> {
    let page = app_state
        .post_service
        .list_user_posts(&username, &options)
        .await?;
    Ok((StatusCode::OK, Json(page)))
}

/// Users following this user
#[utoipa::path(
    get,
    tag = TAG,
    path = "/{username}/followers",
    operation_id = "getFollowers",
    params(
        ("username" = String, Path, description = "Username")
    ),
    responses(
        (status = 200, description = "List of followers", body = Vec<UserResponse>),
        (status = 404, description = "User not found", body = ErrorPayload)
    )
)]
pub(super) async fn get_followers(
    State(app_state): State<Arc<AppState>>,
    WithRejection(Path(username), _): WithRejection<Path<String>, AppError>,
) -> Result<(StatusCode, Json<Vec<UserResponse>>), AppError> {
    let followers = app_state.user_service.get_followers(&username).await?;
    Ok((StatusCode::OK, Json(followers)))
}

/// Users this user follows
#[utoipa::path(
    get,
    tag = TAG,
    path = "/{username}/following",
    operation_id = "getFollowing",
    params(
        ("username" = String, Path, description = "Username")
    ),
    responses(
        (status = 200, description = "List of followed users", body = Vec<UserResponse>),
        (status = 404, description = "User not found", body = ErrorPayload)
    )
)]
pub(super) async fn get_following(
    State(app_state): State<Arc<AppState>>,
    WithRejection(Path(username), _): WithRejection<Path<String>, AppError>,
) -> Result<(StatusCode, Json<Vec<UserResponse>>), AppError> {
    let following = app_state.user_service.get_following(&username).await?;
    Ok((StatusCode::OK, Json(following)))
}

/// Follow a user. Following someone twice is not an error.
#[utoipa::path(
    post,
    tag = TAG,
    path = "/{username}/follow",
    operation_id = "followUser",
    security(("bearer_auth" = [])),
    params(
        ("username" = String, Path, description = "Username to follow")
    ),
    responses(
        (status = 200, description = "User followed successfully", body = MessageResponse),
        (status = 401, description = "Not logged in", body = ErrorPayload),
        (status = 404, description = "User not found", body = ErrorPayload),
        (status = 422, description = "You cannot follow yourself", body = ErrorPayload)
    )
)]
pub(super) async fn follow_user(
    State(app_state): State<Arc<AppState>>,
    auth: AuthUser,
    WithRejection(Path(username), _): WithRejection<Path<String>, AppError>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    let followed = app_state
        .user_service
        .follow_user(&auth.user, &username)
        .await?;
    Ok((
        StatusCode::OK,
        Json(MessageResponse::success(format!(
            "You are now following {}!",
            followed.username
        ))),
    ))
}

/// Stop following a user
#[utoipa::path(
    post,
    tag = TAG,
    path = "/{username}/unfollow",
    operation_id = "unfollowUser",
    security(("bearer_auth" = [])),
    params(
        ("username" = String, Path, description = "Username to unfollow")
    ),
    responses(
        (status = 200, description = "User unfollowed successfully", body = MessageResponse),
        (status = 401, description = "Not logged in", body = ErrorPayload),
        (status = 404, description = "User not found", body = ErrorPayload)
    )
)]
pub(super) async fn unfollow_user(
    State(app_state): State<Arc<AppState>>,
    auth: AuthUser,
    WithRejection(Path(username), _): WithRejection<Path<String>, AppError>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    let unfollowed = app_state
        .user_service
        .unfollow_user(&auth.user, &username)
        .await?;
    Ok((
        StatusCode::OK,
        Json(MessageResponse::info(format!(
            "You are no longer following {}.",
            unfollowed.username
        ))),
    ))
}
