use std::sync::Arc;

use sqlx::PgPool;

use crate::{
    repositories::{
        comment_repository::PgCommentRepository, post_repository::PgPostRepository,
        session_repository::PgSessionRepository, user_repository::PgUserRepository,
        CommentRepository, FollowRepository, PostRepository, SessionRepository, UserRepository,
    },
    services::{
        auth_service::{AuthConfig, AuthService},
        comment_service::CommentService,
        mail_service::{LogMailer, Mailer},
        post_service::PostService,
        profile_service::ProfileService,
        storage_service::{AvatarStorage, LocalAvatarStorage},
        user_service::UserService,
    },
    settings::Settings,
};

/// Storage backends the services are wired on top of.
pub struct Backends {
    pub users: Arc<dyn UserRepository>,
    pub follows: Arc<dyn FollowRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub sessions: Arc<dyn SessionRepository>,
    pub avatars: Arc<dyn AvatarStorage>,
    pub mailer: Arc<dyn Mailer>,
}

impl Backends {
    pub fn postgres(settings: &Settings, db: Arc<PgPool>) -> Self {
        let users = Arc::new(PgUserRepository::new(db.clone()));
        Backends {
            users: users.clone(),
            follows: users,
            posts: Arc::new(PgPostRepository::new(db.clone())),
            comments: Arc::new(PgCommentRepository::new(db.clone())),
            sessions: Arc::new(PgSessionRepository::new(db)),
            avatars: Arc::new(LocalAvatarStorage::new(&settings.upload_dir)),
            mailer: Arc::new(LogMailer),
        }
    }
}

pub struct ServiceContainer {
    pub auth_service: Arc<AuthService>,
    pub user_service: Arc<UserService>,
    pub profile_service: Arc<ProfileService>,
    pub post_service: Arc<PostService>,
    pub comment_service: Arc<CommentService>,
}

impl ServiceContainer {
    pub fn new(settings: &Settings, backends: Backends) -> Self {
        let auth_service = Arc::new(AuthService::new(
            backends.users.clone(),
            backends.sessions,
            backends.mailer,
            AuthConfig::from(settings),
        ));
        let user_service = Arc::new(UserService::new(
            backends.users.clone(),
            backends.follows.clone(),
        ));
        let profile_service = Arc::new(ProfileService::new(
            backends.users.clone(),
            backends.follows,
            backends.posts.clone(),
            backends.avatars,
        ));
        let post_service = Arc::new(PostService::new(backends.posts.clone(), backends.users));
        let comment_service = Arc::new(CommentService::new(backends.comments, backends.posts));

        Self {
            auth_service,
            user_service,
            profile_service,
            post_service,
            comment_service,
        }
    }

    pub fn postgres(settings: &Settings, db: Arc<PgPool>) -> Self {
        Self::new(settings, Backends::postgres(settings, db))
    }
}
