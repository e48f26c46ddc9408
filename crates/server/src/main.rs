use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scribe_core::{
    config_path, load_config, validate_config, BlobStore, BlobStoreBackend, CalendarDispatcher,
    FfmpegTransformer, FsBlobStore, MediaPipeline, MediaTransformer, NotetakerProvider,
    NylasProvider, ProviderBackend, ResultStore, SqliteResultStore,
};

use scribe_server::api::create_router;
use scribe_server::state::AppState;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config_path = config_path();
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Database path: {:?}", config.database.path);

    // Create SQLite result store
    let store: Arc<dyn ResultStore> = Arc::new(
        SqliteResultStore::new(&config.database.path).context("Failed to create result store")?,
    );
    info!("Result store initialized");

    // Create notetaker provider
    let provider: Arc<dyn NotetakerProvider> = match config.provider.backend {
        ProviderBackend::Nylas => {
            let Some(nylas_config) = config.provider.nylas.clone() else {
                bail!("Nylas backend selected but no nylas config provided");
            };
            info!("Initializing Nylas provider at {}", nylas_config.api_url);
            Arc::new(NylasProvider::new(nylas_config).context("Failed to create Nylas provider")?)
        }
    };

    // Create blob store
    let blobs: Arc<dyn BlobStore> = match config.blob_store.backend {
        BlobStoreBackend::Fs => {
            info!(
                "Initializing filesystem blob store at {:?}",
                config.blob_store.fs.root_dir
            );
            std::fs::create_dir_all(&config.blob_store.fs.root_dir)
                .context("Failed to create blob store root directory")?;
            Arc::new(FsBlobStore::new(config.blob_store.fs.clone()))
        }
    };

    // Create media transformer
    let transformer = FfmpegTransformer::new(config.transform.clone());
    if let Err(e) = transformer.validate().await {
        warn!(
            "Media transformer validation failed ({}); video transformation will not work",
            e
        );
    }
    let transformer: Arc<dyn MediaTransformer> = Arc::new(transformer);

    // Create media pipeline
    let pipeline = Arc::new(
        MediaPipeline::new(
            config.pipeline.clone(),
            Arc::clone(&provider),
            Arc::clone(&store),
            Arc::clone(&blobs),
            transformer,
        )
        .context("Failed to create media pipeline")?,
    );
    info!("Media pipeline initialized");

    // Create dispatcher if enabled
    let dispatcher = if config.dispatcher.enabled {
        let dispatcher = Arc::new(CalendarDispatcher::new(
            config.dispatcher.clone(),
            Arc::clone(&provider),
            Arc::clone(&store),
            Arc::clone(&pipeline),
        ));
        dispatcher.start();
        info!("Calendar dispatcher started");
        Some(dispatcher)
    } else {
        info!("Calendar dispatcher disabled in config");
        None
    };

    // Create app state
    let state = Arc::new(AppState::new(
        config.clone(),
        provider,
        store,
        blobs,
        Arc::clone(&pipeline),
        dispatcher.clone(),
    ));

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // Stop dispatcher if running
    if let Some(ref dispatcher) = dispatcher {
        info!("Stopping dispatcher...");
        dispatcher.stop();
    }

    // Abort in-flight pipeline jobs; unfinished jobs read as processing
    // and can be restarted via the API.
    info!("Server shutting down...");
    pipeline.shutdown().await;
    info!("Pipeline stopped");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
