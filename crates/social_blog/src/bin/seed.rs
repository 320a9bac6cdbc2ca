use anyhow::Context;
use dotenv::dotenv;
use social_blog::{container::ServiceContainer, settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let settings = settings::load_settings().context("Failed to load settings")?;
    social_blog::init_tracing(&settings);

    let db = social_blog::setup_database(&settings).await?;
    let container = ServiceContainer::postgres(&settings, db.clone());

    seed::seed_data(&db, &container).await?;

    Ok(())
}

mod seed {
    use fake::{
        faker::{
            internet::en::{SafeEmail, Username},
            lorem::en::{Paragraphs, Sentence},
        },
        Fake,
    };
    use rand::seq::SliceRandom;
    use social_blog::{
        apis::api_models::request::{CommentRequest, PostRequest, RegisterRequest},
        container::ServiceContainer,
        models::users::User,
    };
    use sqlx::PgPool;
    use tracing::{info, warn};

    /// Every seeded account logs in with this password.
    const SEED_PASSWORD: &str = "password";

    #[derive(sqlx::FromRow)]
    struct UserCount {
        count: i64,
    }

    pub async fn seed_data(db: &PgPool, container: &ServiceContainer) -> anyhow::Result<()> {
        let user_count = sqlx::query_as::<_, UserCount>("SELECT COUNT(*) AS count FROM users")
            .fetch_one(db)
            .await?;
        if user_count.count > 0 {
            info!("Data already exists, skipping seed");
            return Ok(());
        }

        let users = seed_users(container, 10).await?;
        let slugs = seed_posts(container, &users, 30).await?;
        seed_follows(container, &users, 20).await?;
        seed_comments(container, &users, &slugs, 60).await?;

        info!("Seed data inserted successfully");
        Ok(())
    }

    async fn seed_users(container: &ServiceContainer, count: usize) -> anyhow::Result<Vec<User>> {
        let mut users = Vec::with_capacity(count);

        for _ in 0..count * 3 {
            if users.len() == count {
                break;
            }
            let mut username: String = Username().fake();
            username.truncate(20);
            let request = RegisterRequest {
                username,
                email: SafeEmail().fake(),
                password: SEED_PASSWORD.to_string(),
                confirm_password: SEED_PASSWORD.to_string(),
            };

            match container.auth_service.register(&request).await {
                Ok(user) => users.push(user),
                // fake occasionally repeats a name
                Err(e) => warn!("Skipping {}: {}", request.username, e),
            }
        }

        Ok(users)
    }

    async fn seed_posts(
        container: &ServiceContainer,
        users: &[User],
        count: usize,
    ) -> anyhow::Result<Vec<String>> {
        let mut slugs = Vec::with_capacity(count);

        for _ in 0..count {
            let Some(author) = users.choose(&mut rand::thread_rng()) else {
                break;
            };
            let mut title: String = Sentence(3..8).fake();
            title.truncate(100);
            let paragraphs: Vec<String> = Paragraphs(1..4).fake();
            let request = PostRequest {
                title,
                content: paragraphs.join("\n\n"),
            };

            let post = container.post_service.create_post(author, &request).await?;
            slugs.push(post.slug);
        }

        Ok(slugs)
    }

    async fn seed_follows(
        container: &ServiceContainer,
        users: &[User],
        count: usize,
    ) -> anyhow::Result<()> {
        for _ in 0..count {
            let pair: Vec<&User> = users.choose_multiple(&mut rand::thread_rng(), 2).collect();
            if let [follower, followed] = pair.as_slice() {
                container
                    .user_service
                    .follow_user(follower, &followed.username)
                    .await?;
            }
        }

        Ok(())
    }

    async fn seed_comments(
        container: &ServiceContainer,
        users: &[User],
        slugs: &[String],
        count: usize,
    ) -> anyhow::Result<()> {
        for _ in 0..count {
            let mut rng = rand::thread_rng();
            let (Some(author), Some(slug)) = (users.choose(&mut rng), slugs.choose(&mut rng))
            else {
                break;
            };
            let request = CommentRequest {
                body: Sentence(2..12).fake(),
            };

            container
                .comment_service
                .add_comment(author, slug, &request)
                .await?;
        }

        Ok(())
    }
}
