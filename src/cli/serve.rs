//! Serve command implementation

use crate::api::{create_router, AppState};
use crate::cli::ServeArgs;
use crate::config::{LogFormat, TriageConfig};
use crate::retrieval::{HttpEmbedder, Retriever, VectorIndex, VectorRetriever};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Load configuration with CLI overrides
pub fn load_config_with_overrides(
    args: &ServeArgs,
) -> Result<TriageConfig, Box<dyn std::error::Error>> {
    // File, then environment
    let mut config = super::load_config(&args.config)?;

    // Apply CLI overrides (highest priority)
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(ref host) = args.host {
        config.server.host = host.clone();
    }
    if let Some(ref log_level) = args.log_level {
        config.logging.level = log_level.clone();
    }
    if let Some(threshold) = args.threshold {
        config.escalation.threshold = threshold;
    }

    Ok(config)
}

/// Initialize tracing based on configuration
pub fn init_tracing(
    config: &crate::config::LoggingConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    // Build filter directives using helper function
    let filter_str = crate::logging::build_filter_directives(config);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    // Warn if content logging is enabled
    if config.enable_content_logging {
        eprintln!("WARNING: Content logging is enabled. Customer query previews will be logged.");
        eprintln!("         Queries may include personal data. Use only for debugging.");
    }

    match config.format {
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .try_init()?;
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .try_init()?;
        }
    }

    Ok(())
}

/// Load the persisted vector index and wrap it in a retriever.
///
/// A missing or unreadable index is not fatal: the server runs without
/// retrieval and every query is treated as having no documentation.
pub fn load_retriever(config: &TriageConfig) -> Option<Arc<dyn Retriever>> {
    let index_path = &config.retrieval.index_path;
    let index = match VectorIndex::load(index_path) {
        Ok(index) if !index.is_empty() => index,
        Ok(_) => {
            tracing::warn!(path = %index_path.display(), "vector index is empty, retrieval disabled");
            return None;
        }
        Err(e) => {
            tracing::warn!(
                path = %index_path.display(),
                error = %e,
                "vector database not available, run `triage index build` to enable retrieval"
            );
            return None;
        }
    };

    if index.model() != config.retrieval.embedding.model {
        tracing::warn!(
            index_model = index.model(),
            configured_model = %config.retrieval.embedding.model,
            "vector index was built with a different embedding model"
        );
    }

    tracing::info!(chunks = index.len(), dimensions = index.dimensions(), "vector index loaded");
    let embedder = HttpEmbedder::from_config(
        &config.retrieval.embedding,
        Arc::new(reqwest::Client::new()),
    );
    Some(Arc::new(VectorRetriever::new(
        Arc::new(embedder),
        Arc::new(index),
    )))
}

/// Wait for shutdown signal (SIGINT or SIGTERM)
async fn shutdown_signal(cancel_token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install CTRL+C handler");
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
            tracing::info!("Received SIGINT, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
        _ = cancel_token.cancelled() => {}
    }

    cancel_token.cancel();
}

/// Main serve command handler
pub async fn run_serve(args: ServeArgs) -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load and merge configuration
    let config = load_config_with_overrides(&args)?;
    config.validate()?;

    // 2. Initialize tracing
    init_tracing(&config.logging)?;

    tracing::info!("Starting triage copilot");
    tracing::debug!(?config, "Loaded configuration");

    // 3. Collaborators
    let retriever = if args.no_retrieval {
        tracing::info!("Retrieval disabled");
        None
    } else {
        load_retriever(&config)
    };

    let config = Arc::new(config);
    let app_state = Arc::new(AppState::from_config(Arc::clone(&config), retriever)?);
    let app = create_router(app_state);

    // 4. Bind and serve
    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!(
        addr = %addr,
        threshold = config.escalation.threshold,
        "Triage API server listening"
    );

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let cancel_token = CancellationToken::new();

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cancel_token.clone()))
        .await?;

    tracing::info!("Triage server stopped");
    Ok(())
}
