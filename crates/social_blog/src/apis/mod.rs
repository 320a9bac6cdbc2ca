use std::sync::Arc;

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_scalar::{Scalar, Servable};

use crate::AppState;

pub mod account_handlers;
pub mod api_models;
pub mod auth_handlers;
pub mod comment_handlers;
pub mod middlewares;
pub mod post_handlers;
pub mod profile_handlers;


#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Registration, sessions and password resets"),
        (name = "posts", description = "Posts, the home feed and explore"),
        (name = "comments", description = "Comments on posts"),
        (name = "profiles", description = "Public profiles and the follow graph"),
        (name = "account", description = "The logged in user's account")
    )
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` scheme referenced by protected operations.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
        );
    }
}

pub fn setup_routes() -> Router<Arc<AppState>> {
    let api_doc = ApiDoc::openapi();

    let auth_router = OpenApiRouter::new()
        .routes(routes!(auth_handlers::register))
        .routes(routes!(auth_handlers::login))
        .routes(routes!(auth_handlers::logout))
        .routes(routes!(auth_handlers::request_password_reset))
        .routes(routes!(auth_handlers::reset_password));

    let post_router = OpenApiRouter::new()
        .routes(routes!(post_handlers::explore, post_handlers::create_post))
        .routes(routes!(
            post_handlers::get_post,
            post_handlers::update_post,
            post_handlers::delete_post
        ))
        .routes(routes!(
            comment_handlers::list_comments,
            comment_handlers::add_comment
        ));

    let profile_router = OpenApiRouter::new()
        .routes(routes!(profile_handlers::get_profile))
        .routes(routes!(profile_handlers::get_user_posts))
        .routes(routes!(profile_handlers::get_followers))
        .routes(routes!(profile_handlers::get_following))
        .routes(routes!(profile_handlers::follow_user))
        .routes(routes!(profile_handlers::unfollow_user));

    let account_router = OpenApiRouter::new()
        .routes(routes!(
            account_handlers::get_account,
            account_handlers::update_account,
            account_handlers::delete_account
        ))
        .routes(routes!(account_handlers::upload_avatar));

    let root_router = OpenApiRouter::new()
        .routes(routes!(post_handlers::get_feed))
        .routes(routes!(comment_handlers::delete_comment));

    let router = OpenApiRouter::with_openapi(api_doc)
        .merge(root_router)
        .nest("/auth", auth_router)
        .nest("/posts", post_router)
        .nest("/profiles", profile_router)
        .nest("/account", account_router);

    let (api_router, api_openapi) = OpenApiRouter::new()
        .nest("/api/v1", router)
        .split_for_parts();

    Router::new()
        .merge(Scalar::with_url("/docs", api_openapi))
        .merge(api_router)
}
