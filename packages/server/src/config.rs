use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// When unset, cards live in the in-memory store (development only).
    pub database_url: Option<String>,
    /// When unset, events are logged instead of published and no trigger
    /// subscription is started.
    pub nats_url: Option<String>,
    pub nats_topics_subject: String,
    pub nats_flashcards_subject: String,
    pub kb_root: String,
    pub completion_endpoint: String,
    pub completion_auth_token: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            database_url: env::var("DATABASE_URL").ok(),
            nats_url: env::var("NATS_URL").ok(),
            nats_topics_subject: env::var("NATS_TOPICS_SUBJECT")
                .unwrap_or_else(|_| "tome.topics.events".to_string()),
            nats_flashcards_subject: env::var("NATS_FLASHCARDS_SUBJECT")
                .unwrap_or_else(|_| "tome.flashcards.events".to_string()),
            kb_root: env::var("KB_ROOT").unwrap_or_else(|_| "./kb".to_string()),
            completion_endpoint: env::var("COMPLETION_ENDPOINT")
                .context("COMPLETION_ENDPOINT must be set")?,
            completion_auth_token: env::var("COMPLETION_AUTH_TOKEN")
                .context("COMPLETION_AUTH_TOKEN must be set")?,
        })
    }
}
