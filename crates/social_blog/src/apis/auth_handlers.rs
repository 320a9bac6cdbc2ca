use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use uuid::Uuid;

use crate::{
    apis::api_models::{
        request::{LoginRequest, RegisterRequest, RequestResetRequest, ResetPasswordRequest},
        response::{LoginResponse, MessageResponse},
    },
    models::users::AccountResponse,
    utils::errors::{app_error::AppError, error_payload::ErrorPayload},
    AppState,
};

use super::middlewares::auth::AuthUser;

pub const TAG: &str = "auth";

/// Create a new account
#[utoipa::path(
    post,
    tag = TAG,
    path = "/register",
    operation_id = "register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Your account has been created! You are now able to log in", body = AccountResponse),
        (status = 422, description = "Invalid fields, or username/email already taken", body = ErrorPayload),
        (status = 500, description = "Internal server error", body = ErrorPayload)
    )
)]
pub(super) async fn register(
    State(app_state): State<Arc<AppState>>,
    WithRejection(Json(body), _): WithRejection<Json<RegisterRequest>, AppError>,
) -> Result<(StatusCode, Json<AccountResponse>), AppError> {
    let user = app_state.auth_service.register(&body).await?;
    Ok((StatusCode::CREATED, Json(AccountResponse::from(user))))
}

/// Log in and receive a session token
#[utoipa::path(
    post,
    tag = TAG,
    path = "/login",
    operation_id = "login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 401, description = "Wrong email or password", body = ErrorPayload),
        (status = 422, description = "Invalid fields", body = ErrorPayload)
    )
)]
pub(super) async fn login(
    State(app_state): State<Arc<AppState>>,
    WithRejection(Json(body), _): WithRejection<Json<LoginRequest>, AppError>,
) -> Result<(StatusCode, Json<LoginResponse>), AppError> {
    let (session, user) = app_state.auth_service.login(&body).await?;
    Ok((
        StatusCode::OK,
        Json(LoginResponse {
            token: session.token,
            expires_at: session.expires_at,
            user: AccountResponse::from(user),
        }),
    ))
}

/// End the current session
#[utoipa::path(
    post,
    tag = TAG,
    path = "/logout",
    operation_id = "logout",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Logged out", body = MessageResponse),
        (status = 401, description = "Not logged in", body = ErrorPayload)
    )
)]
pub(super) async fn logout(
    State(app_state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    app_state.auth_service.logout(auth.token).await?;
    Ok((
        StatusCode::OK,
        Json(MessageResponse::info("You have been logged out.")),
    ))
}

/// Email a password reset link
#[utoipa::path(
    post,
    tag = TAG,
    path = "/reset-password",
    operation_id = "requestPasswordReset",
    request_body = RequestResetRequest,
    responses(
        (status = 200, description = "Reset link sent", body = MessageResponse),
        (status = 422, description = "No account with this email", body = ErrorPayload)
    )
)]
pub(super) async fn request_password_reset(
    State(app_state): State<Arc<AppState>>,
    WithRejection(Json(body), _): WithRejection<Json<RequestResetRequest>, AppError>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    app_state.auth_service.request_password_reset(&body).await?;
    Ok((
        StatusCode::OK,
        Json(MessageResponse::info(
            "An email has been sent with instructions to reset your password.",
        )),
    ))
}

/// Set a new password using a reset token
#[utoipa::path(
    post,
    tag = TAG,
    path = "/reset-password/{token}",
    operation_id = "resetPassword",
    request_body = ResetPasswordRequest,
    params(
        ("token" = Uuid, Path, description = "Token from the reset email")
    ),
    responses(
        (status = 200, description = "Password updated", body = MessageResponse),
        (status = 400, description = "That is an invalid or expired token", body = ErrorPayload),
        (status = 422, description = "Invalid fields", body = ErrorPayload)
    )
)]
pub(super) async fn reset_password(
    State(app_state): State<Arc<AppState>>,
    WithRejection(Path(token), _): WithRejection<Path<Uuid>, AppError>,
    WithRejection(Json(body), _): WithRejection<Json<ResetPasswordRequest>, AppError>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    app_state.auth_service.reset_password(token, &body).await?;
    Ok((
        StatusCode::OK,
        Json(MessageResponse::success(
            "Your password has been updated! You are now able to log in",
        )),
    ))
}
