use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{
    apis::api_models::{
        common::PaginationOptions, request::PostRequest, response::PaginatedPostResponse,
    },
    models::{
        posts::{Post, PostResponse, PostWithAuthor},
        users::User,
    },
    repositories::{Page, PostRepository, UserRepository},
    utils::{errors::app_error::AppError, slug::generate_slug},
};

pub struct PostService {
    post_repository: Arc<dyn PostRepository>,
    user_repository: Arc<dyn UserRepository>,
}

impl PostService {
    pub fn new(
        post_repository: Arc<dyn PostRepository>,
        user_repository: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            post_repository,
            user_repository,
        }
    }

    pub async fn create_post(
        &self,
        author: &User,
        request: &PostRequest,
    ) -> Result<PostWithAuthor, AppError> {
        let (title, content) = validate_post(request)?;

        let post = Post {
            id: Uuid::new_v4(),
            user_id: author.id,
            title: title.to_string(),
            slug: generate_slug(title),
            content: content.to_string(),
            created_at: Utc::now(),
            updated_at: None,
        };
        self.post_repository.create(&post).await?;
        info!("{} published {}", author.username, post.slug);

        self.get_post(&post.slug).await
    }

    pub async fn get_post(&self, slug: &str) -> Result<PostWithAuthor, AppError> {
        self.post_repository
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Post {} not found", slug)))
    }

    /// Only the author may edit. The slug is kept so existing links still work.
    pub async fn update_post(
        &self,
        user: &User,
        slug: &str,
        request: &PostRequest,
    ) -> Result<PostWithAuthor, AppError> {
        let post = self.get_owned_post(user, slug).await?;
        let (title, content) = validate_post(request)?;

        self.post_repository
            .update(post.id, title, content, Utc::now())
            .await?;

        self.get_post(slug).await
    }

    pub async fn delete_post(&self, user: &User, slug: &str) -> Result<(), AppError> {
        let post = self.get_owned_post(user, slug).await?;
        self.post_repository.delete(post.id).await?;
        info!("{} deleted {}", user.username, slug);
        Ok(())
    }

    /// Every post on the site, newest first.
    pub async fn explore(
        &self,
        options: &PaginationOptions,
    ) -> Result<PaginatedPostResponse, AppError> {
        let page = self
            .post_repository
            .list_all(options.limit(), options.offset())
            .await?;
        Ok(to_response(page, options))
    }

    /// Posts by `user` and by everyone `user` follows, newest first.
    pub async fn feed(
        &self,
        user: &User,
        options: &PaginationOptions,
    ) -> Result<PaginatedPostResponse, AppError> {
        let page = self
            .post_repository
            .feed(user.id, options.limit(), options.offset())
            .await?;
        Ok(to_response(page, options))
    }

    pub async fn list_user_posts(
        &self,
        username: &str,
        options: &PaginationOptions,
    ) -> Result<PaginatedPostResponse, AppError> {
        let user = self
            .user_repository
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", username)))?;

        let page = self
            .post_repository
            .list_by_user(user.id, options.limit(), options.offset())
            .await?;
        Ok(to_response(page, options))
    }

    async fn get_owned_post(&self, user: &User, slug: &str) -> Result<PostWithAuthor, AppError> {
        let post = self.get_post(slug).await?;
        if post.user_id != user.id {
            return Err(AppError::Forbidden(
                "You can only modify your own posts".to_string(),
            ));
        }
        Ok(post)
    }
}

fn validate_post(request: &PostRequest) -> Result<(&str, &str), AppError> {
    request.validate()?;
    let title = request.title.trim();
    if title.is_empty() {
        return Err(AppError::field("title", "This field is required."));
    }
    Ok((title, request.content.as_str()))
}

fn to_response(
    (posts, total): Page<PostWithAuthor>,
    options: &PaginationOptions,
) -> PaginatedPostResponse {
    let items = posts.into_iter().map(PostResponse::from).collect();
    PaginatedPostResponse::new(items, total, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{in_memory::InMemoryStore, FollowRepository};

    struct Fixture {
        service: PostService,
        store: Arc<InMemoryStore>,
        alice: User,
        bob: User,
        carol: User,
    }

    async fn setup() -> Fixture {
        let store = Arc::new(InMemoryStore::new());
        let alice = User::new("alice", "alice@example.com", "hash".to_string());
        let bob = User::new("bob", "bob@example.com", "hash".to_string());
        let carol = User::new("carol", "carol@example.com", "hash".to_string());
        for user in [&alice, &bob, &carol] {
            UserRepository::create(store.as_ref(), user).await.unwrap();
        }
        Fixture {
            service: PostService::new(store.clone(), store.clone()),
            store,
            alice,
            bob,
            carol,
        }
    }

    fn request(title: &str) -> PostRequest {
        PostRequest {
            title: title.to_string(),
            content: format!("Content of {}", title),
        }
    }

    #[tokio::test]
    async fn test_create_post_generates_slug() {
        let f = setup().await;
        let post = f
            .service
            .create_post(&f.alice, &request("Hello World"))
            .await
            .unwrap();

        assert!(post.slug.starts_with("hello-world-"));
        assert_eq!(post.author_username, "alice");
        assert_eq!(f.service.get_post(&post.slug).await.unwrap().id, post.id);
    }

    #[tokio::test]
    async fn test_identical_titles_get_distinct_slugs() {
        let f = setup().await;
        let first = f
            .service
            .create_post(&f.alice, &request("Same Title"))
            .await
            .unwrap();
        let second = f
            .service
            .create_post(&f.bob, &request("Same Title"))
            .await
            .unwrap();

        assert_ne!(first.slug, second.slug);
    }

    #[tokio::test]
    async fn test_blank_title_is_rejected() {
        let f = setup().await;
        let err = f
            .service
            .create_post(&f.alice, &request("   "))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(fields) if fields.contains_key("title")));
    }

    #[tokio::test]
    async fn test_only_author_can_edit_or_delete() {
        let f = setup().await;
        let post = f
            .service
            .create_post(&f.alice, &request("Mine"))
            .await
            .unwrap();

        let err = f
            .service
            .update_post(&f.bob, &post.slug, &request("Stolen"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let err = f.service.delete_post(&f.bob, &post.slug).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let updated = f
            .service
            .update_post(&f.alice, &post.slug, &request("Renamed"))
            .await
            .unwrap();
        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.slug, post.slug);
        assert!(updated.updated_at.is_some());

        f.service.delete_post(&f.alice, &post.slug).await.unwrap();
        assert!(matches!(
            f.service.get_post(&post.slug).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_feed_includes_own_and_followed_posts_only() {
        let f = setup().await;
        f.service
            .create_post(&f.alice, &request("From Alice"))
            .await
            .unwrap();
        f.service
            .create_post(&f.bob, &request("From Bob"))
            .await
            .unwrap();
        f.service
            .create_post(&f.carol, &request("From Carol"))
            .await
            .unwrap();

        let feed = f
            .service
            .feed(&f.alice, &PaginationOptions::default())
            .await
            .unwrap();
        assert_eq!(feed.total_items, 1);
        assert_eq!(feed.items[0].author.username, "alice");

        f.store.follow(f.alice.id, f.bob.id).await.unwrap();

        let feed = f
            .service
            .feed(&f.alice, &PaginationOptions::default())
            .await
            .unwrap();
        let mut authors: Vec<_> = feed.items.iter().map(|p| p.author.username.as_str()).collect();
        authors.sort();
        assert_eq!(authors, vec!["alice", "bob"]);
    }

    #[tokio::test]
    async fn test_feed_of_user_without_posts_or_follows_is_empty() {
        let f = setup().await;
        f.service
            .create_post(&f.bob, &request("From Bob"))
            .await
            .unwrap();

        let feed = f
            .service
            .feed(&f.carol, &PaginationOptions::default())
            .await
            .unwrap();
        assert!(feed.items.is_empty());
        assert_eq!(feed.total_pages, 0);
    }

    #[tokio::test]
    async fn test_explore_paginates() {
        let f = setup().await;
        for i in 0..5 {
            f.service
                .create_post(&f.alice, &request(&format!("Post {}", i)))
                .await
                .unwrap();
        }

        let options = PaginationOptions { page: 2, limit: 2 };
        let page = f.service.explore(&options).await.unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total_items, 5);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.current_page, 2);

        let user_posts = f
            .service
            .list_user_posts("alice", &PaginationOptions::default())
            .await
            .unwrap();
        assert_eq!(user_posts.total_items, 5);
        assert!(matches!(
            f.service
                .list_user_posts("nobody", &PaginationOptions::default())
                .await,
            Err(AppError::NotFound(_))
        ));
    }
}
