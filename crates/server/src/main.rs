use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::info;

use veridoc_server::api::{self, AppState};
use veridoc_server::config::VeridocConfig;
use veridoc_workflow::{RetryPolicy, WorkflowBuilder};

/// Veridoc document verification HTTP server.
#[derive(Parser, Debug)]
#[command(name = "veridoc-server", about = "Standalone HTTP server for Veridoc")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "veridoc.toml")]
    config: String,

    /// Override the bind host.
    #[arg(long)]
    host: Option<String>,

    /// Override the bind port.
    #[arg(long)]
    port: Option<u16>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run database migrations for the configured store backend, then exit.
    Migrate,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Load configuration from TOML file, or use defaults if the file does not exist.
    let config: VeridocConfig = if Path::new(&cli.config).exists() {
        let contents = std::fs::read_to_string(&cli.config)?;
        toml::from_str(&contents)?
    } else {
        info!(path = %cli.config, "config file not found, using defaults");
        toml::from_str("")?
    };

    if let Some(Commands::Migrate) = cli.command {
        return run_migrate(&config).await;
    }

    // Build the backends named by the config.
    let (documents, notifications) = veridoc_server::store_factory::build_stores(&config.store)
        .await?;
    info!(backend = %config.store.backend, "store initialized");

    let blobs = veridoc_server::blob_factory::build_blob_store(&config.storage).await?;
    info!(backend = %config.storage.backend, "blob store initialized");

    let extractor = veridoc_server::extractor_factory::build_extractor(&config.extraction)?;
    info!(provider = %config.extraction.provider, "extractor initialized");

    let workflow = WorkflowBuilder::new()
        .document_store(documents)
        .notification_store(notifications)
        .blob_store(blobs)
        .extractor(extractor)
        .retry_policy(RetryPolicy {
            max_attempts: config.workflow.max_attempts,
            backoff: Duration::from_millis(config.workflow.backoff_ms),
        })
        .expiry_warning_days(config.workflow.expiry_warning_days)
        .download_url_ttl(Duration::from_secs(config.workflow.download_url_ttl_seconds))
        .build()?;

    let state = AppState {
        workflow: Arc::new(workflow),
    };
    let app = api::router(state, config.server.max_upload_bytes);

    // Resolve the bind address (CLI overrides take precedence).
    let host = cli.host.unwrap_or(config.server.host);
    let port = cli.port.unwrap_or(config.server.port);
    let addr = format!("{host}:{port}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(address = %addr, "veridoc-server listening");

    // Serve with graceful shutdown on SIGINT / SIGTERM.
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("veridoc-server shut down");
    Ok(())
}

/// Run the `migrate` subcommand: initialize the database schema and exit.
async fn run_migrate(config: &VeridocConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!(backend = %config.store.backend, "running store migrations...");
    let _stores = veridoc_server::store_factory::build_stores(&config.store).await?;
    info!(backend = %config.store.backend, "store migrations complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => { info!("received SIGINT"); }
        () = terminate => { info!("received SIGTERM"); }
    }
}
