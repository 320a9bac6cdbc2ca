use crate::models::users::{User, UserResponse};
use crate::repositories::{FollowRepository, UserRepository};
use crate::utils::errors::app_error::AppError;
use std::sync::Arc;
use tracing::info;

/// Users and the follow graph between them.
#[derive(Clone)]
pub struct UserService {
    user_repository: Arc<dyn UserRepository>,
    follow_repository: Arc<dyn FollowRepository>,
}

impl UserService {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        follow_repository: Arc<dyn FollowRepository>,
    ) -> Self {
        Self {
            user_repository,
            follow_repository,
        }
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<User, AppError> {
        self.user_repository
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", username)))
    }

    /// Idempotent: following someone twice leaves a single edge.
    pub async fn follow_user(&self, follower: &User, username: &str) -> Result<User, AppError> {
        let followed = self.get_user_by_username(username).await?;
        if followed.id == follower.id {
            return Err(AppError::field("username", "You cannot follow yourself"));
        }

        if self
            .follow_repository
            .follow(follower.id, followed.id)
            .await?
        {
            info!("{} is now following {}", follower.username, followed.username);
        }
        Ok(followed)
    }

    /// Removing an edge that does not exist is a no-op.
    pub async fn unfollow_user(&self, follower: &User, username: &str) -> Result<User, AppError> {
        let followed = self.get_user_by_username(username).await?;

        if self
            .follow_repository
            .unfollow(follower.id, followed.id)
            .await?
        {
            info!("{} unfollowed {}", follower.username, followed.username);
        }
        Ok(followed)
    }

    pub async fn get_followers(&self, username: &str) -> Result<Vec<UserResponse>, AppError> {
        let user = self.get_user_by_username(username).await?;
        let followers = self.follow_repository.list_followers(user.id).await?;
        Ok(followers.into_iter().map(UserResponse::from).collect())
    }

    pub async fn get_following(&self, username: &str) -> Result<Vec<UserResponse>, AppError> {
        let user = self.get_user_by_username(username).await?;
        let following = self.follow_repository.list_following(user.id).await?;
        Ok(following.into_iter().map(UserResponse::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::in_memory::InMemoryStore;

    async fn setup() -> (UserService, Arc<InMemoryStore>, User, User) {
        let store = Arc::new(InMemoryStore::new());
        let alice = User::new("alice", "alice@example.com", "hash".to_string());
        let bob = User::new("bob", "bob@example.com", "hash".to_string());
        UserRepository::create(store.as_ref(), &alice).await.unwrap();
        UserRepository::create(store.as_ref(), &bob).await.unwrap();
        (UserService::new(store.clone(), store.clone()), store, alice, bob)
    }

    #[tokio::test]
    async fn test_follow_twice_leaves_one_edge() {
        let (service, store, alice, bob) = setup().await;

        service.follow_user(&alice, "bob").await.unwrap();
        service.follow_user(&alice, "bob").await.unwrap();

        assert_eq!(store.follow_count(), 1);
        assert!(store.is_following(alice.id, bob.id).await.unwrap());
        assert!(!store.is_following(bob.id, alice.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_unfollow_missing_edge_is_noop() {
        let (service, store, alice, bob) = setup().await;

        service.unfollow_user(&alice, "bob").await.unwrap();
        assert_eq!(store.follow_count(), 0);

        service.follow_user(&alice, "bob").await.unwrap();
        service.unfollow_user(&alice, "bob").await.unwrap();
        service.unfollow_user(&alice, "bob").await.unwrap();
        assert!(!store.is_following(alice.id, bob.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_cannot_follow_self() {
        let (service, store, alice, _) = setup().await;

        let err = service.follow_user(&alice, "alice").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(f) if f.contains_key("username")));
        assert_eq!(store.follow_count(), 0);

        service.unfollow_user(&alice, "alice").await.unwrap();
    }

    #[tokio::test]
    async fn test_follow_unknown_user_is_not_found() {
        let (service, _, alice, _) = setup().await;

        let err = service.follow_user(&alice, "nobody").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_followers_and_following_lists() {
        let (service, store, alice, bob) = setup().await;
        service.follow_user(&alice, "bob").await.unwrap();

        let followers = service.get_followers("bob").await.unwrap();
        assert_eq!(followers.len(), 1);
        assert_eq!(followers[0].id, alice.id);

        let following = service.get_following("alice").await.unwrap();
        assert_eq!(following.len(), 1);
        assert_eq!(following[0].id, bob.id);

        assert_eq!(store.count_followers(bob.id).await.unwrap(), 1);
        assert_eq!(store.count_following(alice.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_deleting_user_removes_follow_edges() {
        let (service, store, alice, bob) = setup().await;
        service.follow_user(&alice, "bob").await.unwrap();
        service.follow_user(&bob, "alice").await.unwrap();
        assert_eq!(store.follow_count(), 2);

        UserRepository::delete(store.as_ref(), bob.id).await.unwrap();

        assert_eq!(store.follow_count(), 0);
        assert_eq!(store.count_followers(alice.id).await.unwrap(), 0);
        assert_eq!(store.count_following(alice.id).await.unwrap(), 0);
    }
}
