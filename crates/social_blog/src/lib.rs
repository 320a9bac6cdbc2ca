use apis::setup_routes;
use axum::Router;
use container::ServiceContainer;
use services::{
    auth_service::AuthService, comment_service::CommentService, post_service::PostService,
    profile_service::ProfileService, storage_service::LocalAvatarStorage,
    user_service::UserService,
};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::{path::Path, sync::Arc};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::info;

pub mod apis;
pub mod container;
pub mod models;
pub mod repositories;
pub mod services;
pub mod settings;
pub mod utils;

pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub user_service: Arc<UserService>,
    pub profile_service: Arc<ProfileService>,
    pub post_service: Arc<PostService>,
    pub comment_service: Arc<CommentService>,
}

impl From<ServiceContainer> for AppState {
    fn from(container: ServiceContainer) -> Self {
        AppState {
            auth_service: container.auth_service,
            user_service: container.user_service,
            profile_service: container.profile_service,
            post_service: container.post_service,
            comment_service: container.comment_service,
        }
    }
}

/// Connects to Postgres and brings the schema up to date.
pub async fn setup_database(settings: &settings::Settings) -> anyhow::Result<Arc<PgPool>> {
    let pool = PgPoolOptions::new()
        .max_connections(settings.database_max_connections.unwrap_or(10))
        .connect(&settings.database_url)
        .await?;

    MIGRATOR.run(&pool).await?;
    info!("Database migrations applied");

    Ok(Arc::new(pool))
}

pub async fn setup_router(settings: &settings::Settings) -> anyhow::Result<Router> {
    let db = setup_database(settings).await?;
    LocalAvatarStorage::new(&settings.upload_dir)
        .install_default()
        .await?;
    let container = ServiceContainer::postgres(settings, db);

    Ok(build_router(
        Arc::new(AppState::from(container)),
        &settings.upload_dir,
    ))
}

/// The full application: JSON API, docs, and the uploaded avatars.
pub fn build_router(state: Arc<AppState>, upload_dir: impl AsRef<Path>) -> Router {
    setup_routes()
        .nest_service("/static/avatars", ServeDir::new(upload_dir))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub fn init_tracing(settings: &settings::Settings) {
    let level = if settings.is_production() {
        tracing::Level::INFO
    } else {
        tracing::Level::DEBUG
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(!settings.is_production())
        .init();
}
