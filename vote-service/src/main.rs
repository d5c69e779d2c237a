use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use shared::observability::{init_logging, LogConfig, MetricsCollector};
use shared::KafkaClient;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

mod config;
mod handlers;
mod identity;
mod models;
mod pages;
mod publisher;

#[cfg(test)]
mod test_support;

use config::Config;
use identity::IdentityManager;
use pages::PageRenderer;
use publisher::VotePublisher;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub publisher: Arc<VotePublisher>,
    pub identities: Arc<IdentityManager>,
    pub pages: Arc<PageRenderer>,
    pub metrics: Arc<MetricsCollector>,
}

fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::vote::index))
        .route("/vote", post(handlers::vote::submit_vote))
        .route("/health", get(handlers::health::health_check))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

/// A producer that cannot be created leaves voting disabled but the
/// process, and the ballot page, up.
fn build_publisher(config: &Config, metrics: Arc<MetricsCollector>) -> VotePublisher {
    let topic = config.voting.topic.clone();
    let timeout = config.voting.delivery_timeout;

    match KafkaClient::new(config.kafka.clone()) {
        Ok(client) => VotePublisher::new(Arc::new(client), topic, timeout, metrics),
        Err(e) => {
            error!(error = %e, "Failed to initialize Kafka producer");
            VotePublisher::unavailable(topic, timeout, metrics)
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env().context("Failed to load configuration")?;

    init_logging(LogConfig {
        format: config.log_format,
        service_name: "vote-service".to_string(),
        ..Default::default()
    })?;

    info!("Starting vote service v{}", env!("CARGO_PKG_VERSION"));
    info!(
        brokers = %config.kafka.brokers,
        topic = %config.voting.topic,
        delivery_timeout = ?config.voting.delivery_timeout,
        "Configuration loaded"
    );

    let metrics = Arc::new(MetricsCollector::new());
    let publisher = Arc::new(build_publisher(&config, metrics.clone()));

    let state = AppState {
        publisher: publisher.clone(),
        identities: Arc::new(IdentityManager::new(config.secure_cookies)),
        pages: Arc::new(PageRenderer::new()?),
        metrics,
    };

    let app = create_router(state);

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Vote service listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // Requests cut short by shutdown may have left records in the buffer
    match tokio::task::spawn_blocking(move || publisher.flush()).await {
        Ok(Ok(())) => info!("Producer flushed"),
        Ok(Err(e)) => warn!(error = %e, "Producer flush incomplete"),
        Err(e) => warn!(error = %e, "Producer flush task failed"),
    }

    info!("Vote service shut down gracefully");
    Ok(())
}
