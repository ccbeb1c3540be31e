//! Menu Voice Server Entry Point

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use menu_voice_config::{load_settings, Settings};
use menu_voice_core::EnrichmentStore;
use menu_voice_llm::{create_backend, LlmMenuEnricher};
use menu_voice_persistence::InMemoryEnrichmentStore;
use menu_voice_server::{create_router, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Priority: env vars > config/{env} > config/default > defaults
    let env = std::env::var("MENU_VOICE_ENV").ok();
    let config = match load_settings(env.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            // Tracing not yet initialized
            eprintln!("Warning: Failed to load config: {}. Using defaults.", e);
            Settings::default()
        }
    };

    init_tracing(&config);

    tracing::info!("Starting Menu Voice Server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        environment = ?config.environment,
        config_path = env.as_deref().unwrap_or("default"),
        cuisine = %config.cuisine,
        "Configuration loaded"
    );

    let store: Arc<dyn EnrichmentStore> = match &config.enrichment.snapshot_path {
        Some(path) => Arc::new(InMemoryEnrichmentStore::with_snapshot(path)?),
        None => {
            tracing::info!("No snapshot path configured, enrichment is in-memory only");
            Arc::new(InMemoryEnrichmentStore::new())
        }
    };

    let mut state = AppState::with_store(config.clone(), store)?;

    if config.enrichment.enabled {
        let backend = create_backend(&config.llm)?;
        state = state
            .with_enricher(Arc::new(LlmMenuEnricher::new(Arc::clone(&backend))))
            .with_llm(backend);
        tracing::info!(
            provider = ?config.llm.provider,
            model = %config.llm.model,
            batch_size = config.enrichment.batch_size,
            "Background enrichment enabled"
        );
    } else {
        tracing::info!("Enrichment disabled, catalogs are served as synced");
    }

    let app = create_router(state);

    let listener =
        tokio::net::TcpListener::bind((config.server.host.as_str(), config.server.port)).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}

fn init_tracing(config: &Settings) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = &config.observability.log_level;
        format!("menu_voice={},tower_http=debug", level).into()
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);
    let fmt_layer = if config.observability.log_json {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };
    subscriber.with(fmt_layer).init();
}
