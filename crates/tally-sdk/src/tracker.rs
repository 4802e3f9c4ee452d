use std::sync::Arc;
use std::time::Duration;

use tally_state::{CandidateSource, CookieWrite, PersistenceSink, StateStore};
use tally_types::{Expiration, StoreFormat, StorePolicy};
use tracing::debug;

use crate::config::SdkConfig;
use crate::error::SdkResult;
use crate::event::TrackingEvent;

/// Visitor identity store.
pub const VISITOR_STORE: &str = "v";
/// Session counters store.
pub const SESSION_STORE: &str = "s";
/// Per-browser-session store.
pub const BROWSER_SESSION_STORE: &str = "b";
/// Campaign attribution store.
pub const CAMPAIGN_STORE: &str = "c";

const CAMPAIGN_LIFETIME: Duration = Duration::from_secs(60 * 24 * 3600);

/// Register the stores every tracker uses.
pub fn register_default_stores(state: &mut StateStore) {
    state.register(
        VISITOR_STORE,
        StorePolicy::new(Expiration::Permanent)
            .with_format(StoreFormat::PairList)
            .with_fingerprint(true),
    );
    state.register(
        SESSION_STORE,
        StorePolicy::new(Expiration::Permanent)
            .with_format(StoreFormat::PairList)
            .with_fingerprint(true),
    );
    state.register(
        BROWSER_SESSION_STORE,
        StorePolicy::new(Expiration::Session).with_fingerprint(true),
    );
    state.register(
        CAMPAIGN_STORE,
        StorePolicy::new(Expiration::after(CAMPAIGN_LIFETIME)),
    );
}

/// Tracker client: builds events and owns the request's cookie state.
#[derive(Debug)]
pub struct Tracker {
    config: SdkConfig,
    state: StateStore,
}

impl Tracker {
    pub fn new(
        config: SdkConfig,
        source: &dyn CandidateSource,
        sink: Arc<dyn PersistenceSink>,
    ) -> Self {
        let mut state = StateStore::new(config.state_config(), source, sink);
        register_default_stores(&mut state);
        debug!(
            domain = %config.cookie_domain,
            prefix = %config.cookie_prefix,
            pending = state.pending_stores().len(),
            "tracker created"
        );
        Self { config, state }
    }

    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    pub fn state(&self) -> &StateStore {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut StateStore {
        &mut self.state
    }

    /// A new event of the given type, stamped with the configured site id.
    pub fn new_event(&self, event_type: impl Into<String>) -> TrackingEvent {
        let mut event = TrackingEvent::new();
        event.set_event_type(event_type);
        if let Some(site_id) = &self.config.site_id {
            event.set("site_id", site_id.as_str());
        }
        event
    }

    /// Persist one store, reporting why nothing was written.
    pub fn persist_store(&self, store: &str) -> SdkResult<CookieWrite> {
        Ok(self.state.try_persist(store)?)
    }

    /// Persist every live registered store. Returns the write count.
    pub fn flush(&self) -> usize {
        self.state.persist_all()
    }
}
