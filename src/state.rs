//! Shared application state injected into every handler.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::application::services::{ResolveService, ShortenService, StatsService};
use crate::config::ShortenerSettings;
use crate::domain::click_event::ClickEvent;
use crate::infrastructure::persistence::{KvClickRepository, KvLinkRepository, KvQuotaRepository};
use crate::infrastructure::store::StoreNamespaces;

pub type AppShortenService = ShortenService<KvLinkRepository, KvQuotaRepository>;
pub type AppResolveService = ResolveService<KvLinkRepository>;
pub type AppStatsService = StatsService<KvLinkRepository, KvClickRepository>;

#[derive(Clone)]
pub struct AppState {
    pub shorten_service: Arc<AppShortenService>,
    pub resolve_service: Arc<AppResolveService>,
    pub stats_service: Arc<AppStatsService>,
    /// Raw namespace handles, used by the health check.
    pub stores: StoreNamespaces,
    pub click_sender: mpsc::Sender<ClickEvent>,
    pub behind_proxy: bool,
}

impl AppState {
    /// Wires the repositories and services over `stores`.
    pub fn new(
        stores: StoreNamespaces,
        click_sender: mpsc::Sender<ClickEvent>,
        settings: &ShortenerSettings,
    ) -> Self {
        let link_repository = Arc::new(KvLinkRepository::new(stores.links.clone()));
        let quota_repository = Arc::new(KvQuotaRepository::new(
            stores.quotas.clone(),
            settings.quota_ceiling,
            settings.quota_window,
        ));
        let click_repository = Arc::new(KvClickRepository::new(stores.clicks.clone()));

        Self {
            shorten_service: Arc::new(ShortenService::new(
                link_repository.clone(),
                quota_repository,
                settings,
            )),
            resolve_service: Arc::new(ResolveService::new(
                link_repository.clone(),
                click_sender.clone(),
            )),
            stats_service: Arc::new(StatsService::new(link_repository, click_repository)),
            stores,
            click_sender,
            behind_proxy: settings.behind_proxy,
        }
    }
}
