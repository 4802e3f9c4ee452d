use std::sync::Arc;

use serde_json::{Map, Value};
use tally_state::{CandidateSource, PersistenceSink};
use tracing::{debug, info};

use crate::config::SdkConfig;
use crate::error::{SdkError, SdkResult};
use crate::manifest::lookup_service;
use crate::tracker::Tracker;

/// A client built by the factory.
#[derive(Debug)]
#[non_exhaustive]
pub enum Client {
    Tracker(Tracker),
}

impl Client {
    pub fn as_tracker(&self) -> Option<&Tracker> {
        match self {
            Client::Tracker(tracker) => Some(tracker),
        }
    }

    pub fn into_tracker(self) -> Option<Tracker> {
        match self {
            Client::Tracker(tracker) => Some(tracker),
        }
    }
}

/// Client factory.
///
/// Holds the base configuration plus the request's cookie source and the
/// sink that receives cookie writes. Every client it creates shares both.
pub struct Tally {
    config: SdkConfig,
    source: Arc<dyn CandidateSource>,
    sink: Arc<dyn PersistenceSink>,
}

impl std::fmt::Debug for Tally {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tally").field("config", &self.config).finish()
    }
}

impl Tally {
    pub fn new(
        config: SdkConfig,
        source: Arc<dyn CandidateSource>,
        sink: Arc<dyn PersistenceSink>,
    ) -> Self {
        if config.debug {
            info!(domain = %config.cookie_domain, prefix = %config.cookie_prefix, "tally sdk ready");
        }
        Self { config, source, sink }
    }

    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    /// Look up a base setting by name.
    pub fn get_setting(&self, name: &str) -> Option<Value> {
        self.config.get_setting(name)
    }

    /// Build the named client.
    ///
    /// The name is matched case-insensitively against the service manifest.
    /// The service namespace and `overrides` are merged over the base
    /// config, overrides last.
    pub fn create_client(&self, name: &str, overrides: &Map<String, Value>) -> SdkResult<Client> {
        let service =
            lookup_service(name).ok_or_else(|| SdkError::UnknownService(name.to_string()))?;

        let mut settings = Map::new();
        settings.insert("namespace".into(), Value::from(service.namespace));
        for (key, value) in overrides {
            settings.insert(key.clone(), value.clone());
        }
        let config = self.config.merged_with(&settings)?;
        debug!(service = service.name, "creating client");

        match service.name {
            "tracker" => Ok(Client::Tracker(Tracker::new(
                config,
                self.source.as_ref(),
                Arc::clone(&self.sink),
            ))),
            other => Err(SdkError::UnknownService(other.to_string())),
        }
    }

    /// Shorthand for a tracker with no overrides.
    pub fn create_tracker(&self) -> SdkResult<Tracker> {
        self.create_client("tracker", &Map::new())?
            .into_tracker()
            .ok_or_else(|| SdkError::UnknownService("tracker".into()))
    }
}
