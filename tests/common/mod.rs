#![allow(dead_code)]

use async_trait::async_trait;
use axum::{Router, extract::ConnectInfo};
use axum_test::TestServer;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use url_redirector::config::ShortenerSettings;
use url_redirector::domain::click_event::ClickEvent;
use url_redirector::domain::click_worker::run_click_worker;
use url_redirector::infrastructure::persistence::KvClickRepository;
use url_redirector::infrastructure::store::{
    KeyValueStore, StoreError, StoreNamespaces, StoreResult, WindowedDecrement,
};
use url_redirector::routes::router;
use url_redirector::state::AppState;

pub const TEST_DOMAIN: &str = "https://s.example.com";

/// Quota of 2 per 60 seconds, so exhaustion is reached quickly.
pub fn test_settings() -> ShortenerSettings {
    ShortenerSettings {
        domain: TEST_DOMAIN.to_string(),
        quota_ceiling: 2,
        quota_window: Duration::from_secs(60),
        ..ShortenerSettings::default()
    }
}

pub fn create_test_state(stores: StoreNamespaces) -> (AppState, mpsc::Receiver<ClickEvent>) {
    let (tx, rx) = mpsc::channel(100);
    let state = AppState::new(stores, tx, &test_settings());

    (state, rx)
}

/// State whose click events are applied by a running click worker.
pub fn create_state_with_worker(stores: StoreNamespaces) -> AppState {
    let (state, rx) = create_test_state(stores.clone());
    let clicks = Arc::new(KvClickRepository::new(stores.clicks));
    tokio::spawn(run_click_worker(rx, clicks, 2));

    state
}

/// Test server that sees every request as coming from `127.0.0.1`.
pub fn test_server(state: AppState) -> TestServer {
    TestServer::new(router(state).layer(MockConnectInfoLayer::default())).unwrap()
}

/// Test server without connect info, as if the peer address were unknown.
pub fn test_server_without_peer(state: AppState) -> TestServer {
    TestServer::new(router(state)).unwrap()
}

#[derive(Clone)]
pub struct MockConnectInfoLayer {
    addr: SocketAddr,
}

impl MockConnectInfoLayer {
    pub fn new(addr: &str) -> Self {
        Self {
            addr: addr.parse().unwrap(),
        }
    }
}

impl Default for MockConnectInfoLayer {
    fn default() -> Self {
        Self::new("127.0.0.1:12345")
    }
}

impl<S> tower::Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService {
            inner,
            addr: self.addr,
        }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
    addr: SocketAddr,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        req.extensions_mut().insert(ConnectInfo(self.addr));
        self.inner.call(req)
    }
}

/// A namespace whose every command fails, standing in for an unreachable database.
pub struct FailingStore;

fn down<T>(command: &'static str) -> StoreResult<T> {
    Err(StoreError::command(command, "connection refused"))
}

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn get(&self, _key: &str) -> StoreResult<Option<String>> {
        down("GET")
    }

    async fn set_with_ttl(&self, _key: &str, _value: &str, _ttl: Duration) -> StoreResult<()> {
        down("SET")
    }

    async fn set_if_absent(&self, _key: &str, _value: &str, _ttl: Duration) -> StoreResult<bool> {
        down("SET NX")
    }

    async fn increment(&self, _key: &str) -> StoreResult<i64> {
        down("INCR")
    }

    async fn decrement(&self, _key: &str) -> StoreResult<i64> {
        down("DECR")
    }

    async fn time_to_live(&self, _key: &str) -> StoreResult<Option<Duration>> {
        down("PTTL")
    }

    async fn delete(&self, _key: &str) -> StoreResult<bool> {
        down("DEL")
    }

    async fn decrement_within_window(
        &self,
        _key: &str,
        _ceiling: i64,
        _window: Duration,
    ) -> StoreResult<WindowedDecrement> {
        down("EVALSHA")
    }

    async fn ping(&self) -> StoreResult<()> {
        down("PING")
    }
}

/// Extracts the token from a returned short URL.
pub fn token_of(short_url: &str) -> String {
    short_url.rsplit('/').next().unwrap().to_string()
}
