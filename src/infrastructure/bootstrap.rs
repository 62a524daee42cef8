//! Composition root: wires storage, the session, the backend client and
//! the application services.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::adapter::outbound::api::ApiClient;
use crate::adapter::outbound::storage::FileStorage;
use crate::application::{
    AccountService, BalanceService, ClanService, EventCatalog, OrderPanel, Poller, PredictionFeed,
    PredictionGrouper, SessionStore,
};
use crate::domain::{EventId, ListView, Question};
use crate::infrastructure::config::Config;
use crate::port::{AccountGateway, ClanGateway, KeyValueStorage, TradingGateway};

/// Fully wired client.
///
/// Gateways are held per port so tests can substitute a scripted backend
/// through [`App::with_gateways`].
pub struct App {
    config: Config,
    session: Arc<SessionStore>,
    trading: Arc<dyn TradingGateway>,
    account: Arc<dyn AccountGateway>,
    clans: Arc<dyn ClanGateway>,
}

impl App {
    /// Build against the REST backend, persisting the session at
    /// `default_session_path` unless the config names another file.
    #[must_use]
    pub fn build(config: Config, default_session_path: &Path) -> Self {
        let path = config
            .storage
            .session_path
            .clone()
            .unwrap_or_else(|| default_session_path.to_path_buf());
        debug!(path = %path.display(), "Opening session storage");
        let storage: Arc<dyn KeyValueStorage> = Arc::new(FileStorage::open(path));
        let session = Arc::new(SessionStore::new(storage));

        let client = Arc::new(ApiClient::from_config(&config.api, Arc::clone(&session)));
        info!(base_url = %client.base_url(), "Backend client ready");

        let trading: Arc<dyn TradingGateway> = client.clone();
        let account: Arc<dyn AccountGateway> = client.clone();
        let clans: Arc<dyn ClanGateway> = client;
        Self::with_gateways(config, session, trading, account, clans)
    }

    #[must_use]
    pub fn with_gateways(
        config: Config,
        session: Arc<SessionStore>,
        trading: Arc<dyn TradingGateway>,
        account: Arc<dyn AccountGateway>,
        clans: Arc<dyn ClanGateway>,
    ) -> Self {
        Self {
            config,
            session,
            trading,
            account,
            clans,
        }
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    #[must_use]
    pub fn account(&self) -> AccountService {
        AccountService::new(Arc::clone(&self.account), Arc::clone(&self.session))
    }

    #[must_use]
    pub fn catalog(&self) -> EventCatalog {
        EventCatalog::new(Arc::clone(&self.trading), Arc::clone(&self.session))
    }

    #[must_use]
    pub fn balances(&self) -> BalanceService {
        BalanceService::new(Arc::clone(&self.trading), Arc::clone(&self.session))
    }

    #[must_use]
    pub fn clans(&self) -> ClanService {
        ClanService::new(Arc::clone(&self.clans), Arc::clone(&self.session))
    }

    #[must_use]
    pub fn grouper(&self) -> Arc<PredictionGrouper> {
        Arc::new(PredictionGrouper::new(
            Arc::clone(&self.trading),
            Arc::clone(&self.session),
        ))
    }

    /// Feed for one list view, optionally narrowed to one event.
    #[must_use]
    pub fn feed(&self, view: ListView, event: Option<EventId>) -> Arc<PredictionFeed> {
        let feed = PredictionFeed::new(self.grouper(), view);
        Arc::new(match event {
            Some(event_id) => feed.with_event(event_id),
            None => feed,
        })
    }

    /// Poller for `feed`. Only the account-wide live feed refreshes at the
    /// live interval; every other list, including the live tab of a single
    /// event, uses the tab interval.
    #[must_use]
    pub fn poller(&self, feed: &PredictionFeed) -> Poller {
        match (feed.view(), feed.event_filter()) {
            (ListView::Live, None) => Poller::new(self.config.polling.live_feed()),
            _ => Poller::new(self.config.polling.tab()),
        }
    }

    #[must_use]
    pub fn order_panel(&self, event_id: EventId, question: Question) -> OrderPanel {
        OrderPanel::new(
            Arc::clone(&self.trading),
            Arc::clone(&self.session),
            event_id,
            question,
        )
    }
}
