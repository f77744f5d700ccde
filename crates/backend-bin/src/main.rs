// ============================
// sso-backend-bin/src/main.rs
// ============================
//! Tokio / Axum entry-point for the SSO credential server.
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use sso_backend_lib::{
    config::{LogSettings, Settings, StorageBackend},
    router, storage, AppState,
};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "sso", about = "SSO credential server")]
struct Cli {
    /// Explicit config file (TOML or YAML). Defaults to ./config.toml and ./config.yaml
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn init_tracing(log: &LogSettings) {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    let registry = tracing_subscriber::registry().with(filter);

    if log.json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Wired application state plus whatever must be released on shutdown
struct Backend {
    state: AppState,
    #[cfg(feature = "postgres")]
    pool: Option<storage::PgStorage>,
}

impl Backend {
    async fn close(self) {
        #[cfg(feature = "postgres")]
        if let Some(pool) = self.pool {
            pool.close().await;
            info!("postgres pool closed");
        }
    }
}

async fn build_backend(settings: &Settings) -> anyhow::Result<Backend> {
    let apps = settings.storage.apps.iter().cloned().map(storage::App::from);

    match settings.storage.backend {
        StorageBackend::Memory => {
            let storage = Arc::new(storage::MemoryStorage::with_apps(apps));
            info!(apps = settings.storage.apps.len(), "using in-memory storage");
            Ok(Backend {
                state: AppState::new(storage, settings.clone())?,
                #[cfg(feature = "postgres")]
                pool: None,
            })
        },
        #[cfg(feature = "postgres")]
        StorageBackend::Postgres => {
            let url = settings
                .storage
                .database_url
                .as_deref()
                .context("storage.database_url is not set")?;
            let storage = storage::PgStorage::connect(url, settings.storage.max_connections)
                .await
                .context("failed to connect to postgres")?;
            storage.ensure_schema().await.context("failed to create schema")?;
            for app in apps {
                storage.upsert_app(&app).await.context("failed to provision app")?;
            }
            info!("using postgres storage");
            Ok(Backend {
                state: AppState::new(Arc::new(storage.clone()), settings.clone())?,
                pool: Some(storage),
            })
        },
        #[cfg(not(feature = "postgres"))]
        StorageBackend::Postgres => {
            anyhow::bail!("postgres backend requested but the binary was built without the `postgres` feature")
        },
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            },
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("shutdown signal received, draining in-flight requests");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    }
    .context("failed to load configuration")?;

    init_tracing(&settings.log);

    let backend = build_backend(&settings).await?;
    let app = router::create_router(Arc::new(backend.state.clone()));

    let addr = settings.server.bind_addr;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    backend.close().await;
    info!("server stopped");
    Ok(())
}
