//! HTTP server initialization and runtime setup.
//!
//! Handles store connections, worker spawning, and Axum server lifecycle.

use crate::config::{Config, StoreBackend};
use crate::domain::click_worker::run_click_worker;
use crate::infrastructure::persistence::KvClickRepository;
use crate::infrastructure::store::{
    KeyValueStore, ReconnectingStore, RedisStore, StoreNamespaces,
};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio::sync::mpsc;

/// Time allowed for queued clicks to drain after the server stops.
const CLICK_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Minimum gap between connection attempts to an unreachable click counter.
const CLICK_RECONNECT_INTERVAL: Duration = Duration::from_secs(30);

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Store namespaces (Redis or in-memory)
/// - Background click worker
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - The link table or quota tracker cannot be reached
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let stores = connect_stores(&config).await?;

    let (click_tx, click_rx) = mpsc::channel(config.click_queue_capacity);

    let click_repository = Arc::new(KvClickRepository::new(stores.clicks.clone()));
    let worker = tokio::spawn(run_click_worker(
        click_rx,
        click_repository,
        config.click_worker_concurrency,
    ));
    tracing::info!(
        concurrency = config.click_worker_concurrency,
        "Click worker started"
    );

    let state = AppState::new(stores, click_tx, &config.settings());

    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    // the router owned the last click sender, so the worker drains and exits
    match tokio::time::timeout(CLICK_DRAIN_TIMEOUT, worker).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::error!("Click worker panicked: {}", e),
        Err(_) => tracing::warn!("Click worker did not drain within {:?}", CLICK_DRAIN_TIMEOUT),
    }

    tracing::info!("Server stopped");
    Ok(())
}

/// Opens the three store namespaces.
///
/// The link table and quota tracker are required. The click counter is
/// best-effort: while it cannot be reached clicks are discarded, and the
/// connection is retried every [`CLICK_RECONNECT_INTERVAL`] until it succeeds.
pub async fn connect_stores(config: &Config) -> Result<StoreNamespaces> {
    match config.store_backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; data is lost on restart");
            Ok(StoreNamespaces::in_memory())
        }
        StoreBackend::Redis => {
            let links = connect_redis(config, config.link_db)
                .await
                .context("Failed to connect to link table")?;
            let quotas = connect_redis(config, config.quota_db)
                .await
                .context("Failed to connect to quota tracker")?;

            let clicks = deferred_redis(config, config.click_db);
            if let Err(e) = clicks.try_connect().await {
                tracing::warn!(
                    "Click counter unavailable: {}. Clicks are discarded until it reconnects.",
                    e
                );
            }

            Ok(StoreNamespaces {
                links,
                quotas,
                clicks: Arc::new(clicks),
            })
        }
    }
}

async fn connect_redis(config: &Config, db: u8) -> Result<Arc<dyn KeyValueStore>> {
    let store = RedisStore::connect(
        &config.redis_url(db),
        db,
        config.store_connect_timeout(),
        config.store_op_timeout(),
    )
    .await?;

    Ok(Arc::new(store))
}

/// A Redis namespace that connects on first use and retries while unreachable.
fn deferred_redis(config: &Config, db: u8) -> ReconnectingStore {
    let url = config.redis_url(db);
    let connect_timeout = config.store_connect_timeout();
    let op_timeout = config.store_op_timeout();

    ReconnectingStore::new(CLICK_RECONNECT_INTERVAL, move || {
        let url = url.clone();
        async move {
            RedisStore::connect(&url, db, connect_timeout, op_timeout)
                .await
                .map(|store| Arc::new(store) as Arc<dyn KeyValueStore>)
        }
    })
}

/// Completes on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, initiating graceful shutdown"),
        _ = terminate => tracing::info!("Received terminate signal, initiating graceful shutdown"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[tokio::test]
    #[serial]
    async fn test_connect_memory_stores() {
        let mut config = crate::config::Config::from_env().unwrap();
        config.store_backend = StoreBackend::Memory;

        let stores = connect_stores(&config).await.unwrap();

        assert!(stores.links.ping().await.is_ok());
        assert!(stores.quotas.ping().await.is_ok());
        assert!(stores.clicks.ping().await.is_ok());
    }

    #[tokio::test]
    #[serial]
    async fn test_unreachable_click_counter_is_deferred() {
        let mut config = crate::config::Config::from_env().unwrap();
        config.redis_addr = "127.0.0.1:1".to_string();
        config.store_connect_timeout = 1;

        let clicks = deferred_redis(&config, config.click_db);

        assert!(clicks.try_connect().await.is_err());
        assert!(!clicks.is_connected().await);
        // writes are discarded rather than failing the caller
        assert_eq!(clicks.increment("abc").await.unwrap(), 0);
    }
}
