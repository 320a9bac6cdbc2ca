use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;

use crate::{
    apis::api_models::{
        request::{AvatarUploadForm, UpdateAccountRequest},
        response::MessageResponse,
    },
    models::users::AccountResponse,
    utils::errors::{app_error::AppError, error_payload::ErrorPayload},
    AppState,
};

use super::middlewares::auth::AuthUser;

pub const TAG: &str = "account";

/// Multipart field carrying the avatar image
const AVATAR_FIELD: &str = "avatar";

/// The logged in user's account
#[utoipa::path(
    get,
    tag = TAG,
    path = "/",
    operation_id = "getAccount",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Account details", body = AccountResponse),
        (status = 401, description = "Not logged in", body = ErrorPayload)
    )
)]
pub(super) async fn get_account(auth: AuthUser) -> Result<(StatusCode, Json<AccountResponse>), AppError> {
    Ok((StatusCode::OK, Json(AccountResponse::from(auth.user))))
}

/// Change username, email or bio
#[utoipa::path(
    put,
    tag = TAG,
    path = "/",
    operation_id = "updateAccount",
    security(("bearer_auth" = [])),
    request_body = UpdateAccountRequest,
    responses(
        (status = 200, description = "Your account has been updated!", body = AccountResponse),
        (status = 401, description = "Not logged in", body = ErrorPayload),
        (status = 422, description = "Invalid fields, or username/email already taken", body = ErrorPayload)
    )
)]
pub(super) async fn update_account(
    State(app_state): State<Arc<AppState>>,
    auth: AuthUser,
    WithRejection(Json(body), _): WithRejection<Json<UpdateAccountRequest>, AppError>,
) -> Result<(StatusCode, Json<AccountResponse>), AppError> {
    let user = app_state
        .profile_service
        .update_account(&auth.user, &body)
        .await?;
    Ok((StatusCode::OK, Json(AccountResponse::from(user))))
}

/// Delete the account with all its posts, comments and follows
#[utoipa::path(
    delete,
    tag = TAG,
    path = "/",
    operation_id = "deleteAccount",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Account deleted", body = MessageResponse),
        (status = 401, description = "Not logged in", body = ErrorPayload)
    )
)]
pub(super) async fn delete_account(
    State(app_state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    app_state.profile_service.delete_account(&auth.user).await?;
    Ok((
        StatusCode::OK,
        Json(MessageResponse::info("Your account has been deleted.")),
    ))
}

/// Upload a new avatar
#[utoipa::path(
    post,
    tag = TAG,
    path = "/avatar",
    operation_id = "uploadAvatar",
    security(("bearer_auth" = [])),
    request_body(content = AvatarUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Avatar uploaded successfully", body = AccountResponse),
        (status = 400, description = "Invalid file type or missing file", body = ErrorPayload),
        (status = 401, description = "Not logged in", body = ErrorPayload)
    )
)]
pub(super) async fn upload_avatar(
    State(app_state): State<Arc<AppState>>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<AccountResponse>), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some(AVATAR_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        let user = app_state
            .profile_service
            .upload_avatar(&auth.user, data, file_name.as_deref(), content_type.as_deref())
            .await?;
        return Ok((StatusCode::OK, Json(AccountResponse::from(user))));
    }

    Err(AppError::BadRequest("Missing avatar file".to_string()))
}
