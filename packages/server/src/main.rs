// Main entry point for the flashcards service

mod config;
mod nats;
mod routes;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use completion_client::CompletionClient;
use flashcards::{
    CardStore, Completion, EventPublisher, FsKnowledgeBase, GenerationOrchestrator, MemoryStore,
    PostgresStore,
};

use crate::config::Config;
use crate::nats::{run_subscriber, LogPublisher, NatsPublisher};
use crate::routes::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,flashcards=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Tome flashcards service");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;

    // Storage
    let store: Arc<dyn CardStore> = match &config.database_url {
        Some(url) => {
            tracing::info!("Connecting to database...");
            let store = PostgresStore::new(url)
                .await
                .context("Failed to connect to database")?;
            tracing::info!("Database connected");
            Arc::new(store)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, cards will not survive a restart");
            Arc::new(MemoryStore::new())
        }
    };

    // Completion service
    let completion: Arc<dyn Completion> = Arc::new(CompletionClient::new(
        &config.completion_endpoint,
        &config.completion_auth_token,
    ));

    // Corpus
    let kb = Arc::new(FsKnowledgeBase::new(&config.kb_root));

    // Event bus
    let (publisher, nats_client): (Arc<dyn EventPublisher>, Option<async_nats::Client>) =
        match &config.nats_url {
            Some(url) => {
                let client = async_nats::connect(url)
                    .await
                    .context("Failed to connect to NATS")?;
                tracing::info!(url = %url, "NATS connected");
                let publisher =
                    NatsPublisher::new(client.clone(), config.nats_flashcards_subject.clone());
                (Arc::new(publisher), Some(client))
            }
            None => {
                tracing::warn!("NATS_URL not set, events will be logged only");
                (Arc::new(LogPublisher), None)
            }
        };

    let orchestrator = Arc::new(GenerationOrchestrator::new(
        kb,
        store.clone(),
        publisher,
        completion.clone(),
    ));

    // Trigger consumers, one per subject
    if let Some(client) = nats_client {
        for subject in [
            config.nats_topics_subject.clone(),
            config.nats_flashcards_subject.clone(),
        ] {
            let client = client.clone();
            let orchestrator = orchestrator.clone();
            tokio::spawn(async move {
                if let Err(e) = run_subscriber(client, subject, orchestrator).await {
                    tracing::error!(error = %e, "trigger subscriber stopped");
                }
            });
        }
    }

    // HTTP surface
    let app = routes::router(AppState {
        store,
        completion: completion.clone(),
    });

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;
    axum::serve(listener, app)
        .await
        .context("Server exited with error")?;

    Ok(())
}
