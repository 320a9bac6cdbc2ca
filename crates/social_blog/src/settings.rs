use config::{Config, Environment};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub environment: Option<String>,
    pub database_url: String,
    pub database_max_connections: Option<u32>,
    pub port: Option<u16>,
    /// Directory avatars are written to and served from
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,
    /// Base URL used when building links sent by email
    #[serde(default = "default_public_url")]
    pub public_url: String,
    #[serde(default = "default_session_ttl_hours")]
    pub session_ttl_hours: i64,
    #[serde(default = "default_remember_me_days")]
    pub remember_me_days: i64,
    #[serde(default = "default_reset_token_ttl_secs")]
    pub reset_token_ttl_secs: i64,
}

impl Settings {
    pub fn is_production(&self) -> bool {
        self.environment.as_deref() == Some("PROD")
    }
}

fn default_upload_dir() -> String {
    "uploads/avatars".to_string()
}

fn default_public_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_session_ttl_hours() -> i64 {
    24
}

fn default_remember_me_days() -> i64 {
    30
}

fn default_reset_token_ttl_secs() -> i64 {
    1800
}

pub fn load_settings() -> Result<Settings, config::ConfigError> {
    let settings = Config::builder();
    let settings = settings.add_source(Environment::default().try_parsing(true));
    settings.build()?.try_deserialize()
}

#[cfg(test)]
impl Default for Settings {
    fn default() -> Self {
        Settings {
            environment: Some("TEST".to_string()),
            database_url: String::new(),
            database_max_connections: None,
            port: None,
            upload_dir: std::env::temp_dir()
                .join("social_blog_test_avatars")
                .to_string_lossy()
                .into_owned(),
            public_url: default_public_url(),
            session_ttl_hours: default_session_ttl_hours(),
            remember_me_days: default_remember_me_days(),
            reset_token_ttl_secs: default_reset_token_ttl_secs(),
        }
    }
}
