use std::sync::Arc;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use uuid::Uuid;

use crate::{models::users::User, utils::errors::app_error::AppError, AppState};

/// The caller behind a valid `Authorization: Bearer <token>` header.
/// Rejects with 401 when the header is missing or the session is unknown or
/// expired.
pub struct AuthUser {
    pub user: User,
    pub token: Uuid,
}

/// Like [`AuthUser`] but yields `None` for anonymous requests. A header that is
/// present but invalid is still rejected.
pub struct MaybeAuthUser(pub Option<AuthUser>);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| AppError::Unauthorized("Please log in to access this page.".to_string()))?;

        authenticate(state, bearer.token()).await
    }
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for MaybeAuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        match TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state).await {
            Ok(TypedHeader(Authorization(bearer))) => {
                Ok(MaybeAuthUser(Some(authenticate(state, bearer.token()).await?)))
            }
            Err(rejection) if rejection.is_missing() => Ok(MaybeAuthUser(None)),
            Err(_) => Err(AppError::Unauthorized("Malformed authorization header".to_string())),
        }
    }
}

async fn authenticate(state: &AppState, raw_token: &str) -> Result<AuthUser, AppError> {
    let token = Uuid::parse_str(raw_token)
        .map_err(|_| AppError::Unauthorized("Invalid session token".to_string()))?;
    let user = state.auth_service.authenticate(token).await?;
    Ok(AuthUser { user, token })
}
