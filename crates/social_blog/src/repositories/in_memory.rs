//! Mutex-backed implementations of every repository trait, used by the unit
//! and router tests in place of Postgres.

use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{
    comments::{Comment, CommentWithAuthor},
    posts::{Post, PostWithAuthor},
    sessions::{PasswordReset, Session},
    users::User,
};

use super::{
    CommentRepository, FollowRepository, Page, PostRepository, SessionRepository, UserRepository,
};

/// `follower_id` sees `followed_id`'s posts in their feed.
struct Follow {
    follower_id: Uuid,
    followed_id: Uuid,
}

#[derive(Default)]
struct State {
    users: HashMap<Uuid, User>,
    posts: Vec<Post>,
    comments: Vec<Comment>,
    follows: Vec<Follow>,
    sessions: HashMap<Uuid, Session>,
    resets: HashMap<Uuid, PasswordReset>,
}

impl State {
    fn with_author(&self, post: &Post) -> PostWithAuthor {
        let author = &self.users[&post.user_id];
        PostWithAuthor {
            id: post.id,
            user_id: post.user_id,
            title: post.title.clone(),
            slug: post.slug.clone(),
            content: post.content.clone(),
            created_at: post.created_at,
            updated_at: post.updated_at,
            author_username: author.username.clone(),
            author_avatar: author.avatar.clone(),
        }
    }

    fn page(&self, mut posts: Vec<&Post>, limit: i64, offset: i64) -> Page<PostWithAuthor> {
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = posts.len() as i64;
        let items = posts
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .map(|p| self.with_author(p))
            .collect();
        (items, total)
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn follow_count(&self) -> usize {
        self.lock().follows.len()
    }

    /// Test hook for pushing a token past its expiry.
    pub fn expire_password_reset(&self, token: Uuid) {
        if let Some(reset) = self.lock().resets.get_mut(&token) {
            reset.expires_at = Utc::now() - chrono::Duration::seconds(1);
        }
    }

    pub fn expire_session(&self, token: Uuid) {
        if let Some(session) = self.lock().sessions.get_mut(&token) {
            session.expires_at = Utc::now() - chrono::Duration::seconds(1);
        }
    }

    pub fn latest_password_reset(&self, user_id: Uuid) -> Option<Uuid> {
        self.lock()
            .resets
            .values()
            .filter(|r| r.user_id == user_id)
            .max_by_key(|r| r.expires_at)
            .map(|r| r.token)
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: &User) -> Result<(), sqlx::Error> {
        self.lock().users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        Ok(self.lock().users.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, sqlx::Error> {
        Ok(self
            .lock()
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        Ok(self.lock().users.values().find(|u| u.email == email).cloned())
    }

    async fn update_account(
        &self,
        id: Uuid,
        username: &str,
        email: &str,
        bio: Option<&str>,
    ) -> Result<Option<User>, sqlx::Error> {
        let mut state = self.lock();
        Ok(state.users.get_mut(&id).map(|user| {
            user.username = username.to_string();
            user.email = email.to_string();
            user.bio = bio.map(str::to_string);
            user.clone()
        }))
    }

    async fn update_avatar(&self, id: Uuid, avatar: &str) -> Result<(), sqlx::Error> {
        if let Some(user) = self.lock().users.get_mut(&id) {
            user.avatar = avatar.to_string();
        }
        Ok(())
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), sqlx::Error> {
        if let Some(user) = self.lock().users.get_mut(&id) {
            user.password_hash = password_hash.to_string();
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), sqlx::Error> {
        let mut state = self.lock();
        state.users.remove(&id);
        state
            .follows
            .retain(|f| f.follower_id != id && f.followed_id != id);
        let removed_posts: Vec<Uuid> = state
            .posts
            .iter()
            .filter(|p| p.user_id == id)
            .map(|p| p.id)
            .collect();
        state.posts.retain(|p| p.user_id != id);
        state
            .comments
            .retain(|c| c.user_id != id && !removed_posts.contains(&c.post_id));
        state.sessions.retain(|_, s| s.user_id != id);
        state.resets.retain(|_, r| r.user_id != id);
        Ok(())
    }
}

#[async_trait]
impl FollowRepository for InMemoryStore {
    async fn follow(&self, follower_id: Uuid, followed_id: Uuid) -> Result<bool, sqlx::Error> {
        let mut state = self.lock();
        let exists = state
            .follows
            .iter()
            .any(|f| f.follower_id == follower_id && f.followed_id == followed_id);
        if exists {
            return Ok(false);
        }
        state.follows.push(Follow {
            follower_id,
            followed_id,
        });
        Ok(true)
    }

    async fn unfollow(&self, follower_id: Uuid, followed_id: Uuid) -> Result<bool, sqlx::Error> {
        let mut state = self.lock();
        let before = state.follows.len();
        state
            .follows
            .retain(|f| !(f.follower_id == follower_id && f.followed_id == followed_id));
        Ok(state.follows.len() < before)
    }

    async fn is_following(
        &self,
        follower_id: Uuid,
        followed_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        Ok(self
            .lock()
            .follows
            .iter()
            .any(|f| f.follower_id == follower_id && f.followed_id == followed_id))
    }

    async fn list_followers(&self, user_id: Uuid) -> Result<Vec<User>, sqlx::Error> {
        let state = self.lock();
        Ok(state
            .follows
            .iter()
            .filter(|f| f.followed_id == user_id)
            .filter_map(|f| state.users.get(&f.follower_id).cloned())
            .collect())
    }

    async fn list_following(&self, user_id: Uuid) -> Result<Vec<User>, sqlx::Error> {
        let state = self.lock();
        Ok(state
            .follows
            .iter()
            .filter(|f| f.follower_id == user_id)
            .filter_map(|f| state.users.get(&f.followed_id).cloned())
            .collect())
    }

    async fn count_followers(&self, user_id: Uuid) -> Result<i64, sqlx::Error> {
        Ok(self
            .lock()
            .follows
            .iter()
            .filter(|f| f.followed_id == user_id)
            .count() as i64)
    }

    async fn count_following(&self, user_id: Uuid) -> Result<i64, sqlx::Error> {
        Ok(self
            .lock()
            .follows
            .iter()
            .filter(|f| f.follower_id == user_id)
            .count() as i64)
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn create(&self, post: &Post) -> Result<(), sqlx::Error> {
        self.lock().posts.push(post.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, sqlx::Error> {
        Ok(self.lock().posts.iter().find(|p| p.id == id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostWithAuthor>, sqlx::Error> {
        let state = self.lock();
        Ok(state
            .posts
            .iter()
            .find(|p| p.slug == slug)
            .map(|p| state.with_author(p)))
    }

    async fn update(
        &self,
        id: Uuid,
        title: &str,
        content: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        if let Some(post) = self.lock().posts.iter_mut().find(|p| p.id == id) {
            post.title = title.to_string();
            post.content = content.to_string();
            post.updated_at = Some(updated_at);
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), sqlx::Error> {
        let mut state = self.lock();
        state.posts.retain(|p| p.id != id);
        state.comments.retain(|c| c.post_id != id);
        Ok(())
    }

    async fn list_all(&self, limit: i64, offset: i64) -> Result<Page<PostWithAuthor>, sqlx::Error> {
        let state = self.lock();
        let posts = state.posts.iter().collect();
        Ok(state.page(posts, limit, offset))
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Page<PostWithAuthor>, sqlx::Error> {
        let state = self.lock();
        let posts = state.posts.iter().filter(|p| p.user_id == user_id).collect();
        Ok(state.page(posts, limit, offset))
    }

    async fn feed(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Page<PostWithAuthor>, sqlx::Error> {
        let state = self.lock();
        let followed: Vec<Uuid> = state
            .follows
            .iter()
            .filter(|f| f.follower_id == user_id)
            .map(|f| f.followed_id)
            .collect();
        let posts = state
            .posts
            .iter()
            .filter(|p| p.user_id == user_id || followed.contains(&p.user_id))
            .collect();
        Ok(state.page(posts, limit, offset))
    }

    async fn count_by_user(&self, user_id: Uuid) -> Result<i64, sqlx::Error> {
        Ok(self
            .lock()
            .posts
            .iter()
            .filter(|p| p.user_id == user_id)
            .count() as i64)
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn create(&self, comment: &Comment) -> Result<(), sqlx::Error> {
        self.lock().comments.push(comment.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, sqlx::Error> {
        Ok(self.lock().comments.iter().find(|c| c.id == id).cloned())
    }

    async fn list_by_post(&self, post_id: Uuid) -> Result<Vec<CommentWithAuthor>, sqlx::Error> {
        let state = self.lock();
        let mut comments: Vec<CommentWithAuthor> = state
            .comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .map(|c| {
                let author = &state.users[&c.user_id];
                CommentWithAuthor {
                    id: c.id,
                    post_id: c.post_id,
                    user_id: c.user_id,
                    body: c.body.clone(),
                    created_at: c.created_at,
                    author_username: author.username.clone(),
                    author_avatar: author.avatar.clone(),
                }
            })
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(comments)
    }

    async fn delete(&self, id: Uuid) -> Result<(), sqlx::Error> {
        self.lock().comments.retain(|c| c.id != id);
        Ok(())
    }
}

#[async_trait]
impl SessionRepository for InMemoryStore {
    async fn create_session(&self, session: &Session) -> Result<(), sqlx::Error> {
        self.lock().sessions.insert(session.token, session.clone());
        Ok(())
    }

    async fn find_session(&self, token: Uuid) -> Result<Option<Session>, sqlx::Error> {
        Ok(self.lock().sessions.get(&token).cloned())
    }

    async fn delete_session(&self, token: Uuid) -> Result<(), sqlx::Error> {
        self.lock().sessions.remove(&token);
        Ok(())
    }

    async fn delete_user_sessions(&self, user_id: Uuid) -> Result<(), sqlx::Error> {
        self.lock().sessions.retain(|_, s| s.user_id != user_id);
        Ok(())
    }

    async fn create_password_reset(&self, reset: &PasswordReset) -> Result<(), sqlx::Error> {
        self.lock().resets.insert(reset.token, reset.clone());
        Ok(())
    }

    async fn take_password_reset(
        &self,
        token: Uuid,
    ) -> Result<Option<PasswordReset>, sqlx::Error> {
        Ok(self.lock().resets.remove(&token))
    }
}
