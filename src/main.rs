//! RxGate - Compliance Gateway for Pharmaceutical Sales AI
//!
//! This service mediates rep questions to a generative text backend,
//! enforcing off-label content policy both before and after generation.

use std::sync::Arc;

use tokio::net::TcpListener;

mod api;
mod config;
mod domain;
mod engine;
mod error;
mod logging;
mod prompts;

use crate::api::build_router;
use crate::config::Config;
use crate::engine::{
    AgentRegistry, AgentRole, AgentRouter, ChatBackend, ConversationAnalyzer, OffLabelDetector,
    Orchestrator, PolicyGuardian, SalesAgent,
};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The pipeline orchestrator.
    pub orchestrator: Arc<Orchestrator>,
    /// Offline conversation scorer.
    pub analyzer: Arc<ConversationAnalyzer>,
    /// Whether a backend API key is configured.
    pub backend_configured: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file (if present)
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("Note: No .env file loaded ({e})");
    }

    // Initialize logging
    logging::init();

    tracing::info!("Starting RxGate v{}", env!("CARGO_PKG_VERSION"));

    // Load and validate configuration
    let config = Config::load().map_err(|e| {
        tracing::error!(error = %e, "Failed to load configuration");
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    config.validate().map_err(|e| {
        tracing::error!(error = %e, "Configuration is incomplete");
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    tracing::info!(
        host = %config.server.host,
        port = %config.server.port,
        model = %config.backend.model,
        "Configuration loaded"
    );

    // Build the compliance engine
    let detector = OffLabelDetector::from_policy(&config.compliance).map_err(|e| {
        tracing::error!(error = %e, "Failed to build violation detector");
        anyhow::anyhow!("Configuration error: {}", e)
    })?;
    let guardian = PolicyGuardian::new(detector);
    let router = AgentRouter::from_config(&config.routing);

    // Build the generation side
    let backend = Arc::new(ChatBackend::new(config.backend.clone()));
    let backend_configured = backend.is_configured();

    if !backend_configured {
        tracing::warn!("Backend API key not set - generation requests will fail");
    }

    let mut registry = AgentRegistry::new();
    registry.register(AgentRole::Sales, Arc::new(SalesAgent::new(backend.clone())));

    let orchestrator = Arc::new(Orchestrator::new(guardian, router, registry));
    let analyzer = Arc::new(ConversationAnalyzer::new(backend));

    tracing::info!(backend_configured, "Agents initialized");

    // Build application state
    let state = AppState {
        orchestrator,
        analyzer,
        backend_configured,
    };

    // Build router
    let app = build_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!(address = %addr, "Server listening");
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(listener, app).await?;

    tracing::info!("RxGate shutting down");

    Ok(())
}
