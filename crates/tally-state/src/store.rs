use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tally_codec::{DomainFingerprint, FINGERPRINT_FIELD};
use tally_types::{Fields, StorePolicy, StoreValue};
use tracing::{debug, warn};

use crate::config::StateConfig;
use crate::error::{StateError, StateResult};
use crate::loader::PendingCandidates;
use crate::persist::CookieWrite;
use crate::registry::StoreRegistry;
use crate::resolver::resolve_candidates;
use crate::traits::{CandidateSource, PersistenceSink};

/// Live state for one request.
///
/// Raw candidates are read once at construction. A store's value is
/// materialized lazily on first access and written back through the sink
/// on every mutation when its policy is eager.
///
/// No operation fails: a missing store or field reads as `None`, and
/// persisting an unknown or empty store is a logged no-op.
pub struct StateStore {
    config: StateConfig,
    fingerprint: DomainFingerprint,
    registry: StoreRegistry,
    pending: PendingCandidates,
    live: HashMap<String, StoreValue>,
    sink: Arc<dyn PersistenceSink>,
}

impl std::fmt::Debug for StateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateStore")
            .field("config", &self.config)
            .field("fingerprint", &self.fingerprint.as_str())
            .field("registered", &self.registry.len())
            .field("pending", &self.pending.len())
            .field("live", &self.live.len())
            .finish()
    }
}

impl StateStore {
    /// Create a store, loading raw candidates from `source` under the
    /// configured namespace.
    pub fn new(
        config: StateConfig,
        source: &dyn CandidateSource,
        sink: Arc<dyn PersistenceSink>,
    ) -> Self {
        let pending = PendingCandidates::load(source, &config.namespace);
        let fingerprint = DomainFingerprint::of(&config.cookie_domain);
        Self {
            config,
            fingerprint,
            registry: StoreRegistry::new(),
            pending,
            live: HashMap::new(),
            sink,
        }
    }

    // ---- Registry ----

    /// Register (or replace) the policy for a store.
    pub fn register(&mut self, name: impl Into<String>, policy: StorePolicy) {
        self.registry.register(name, policy);
    }

    pub fn policy(&self, store: &str) -> Option<&StorePolicy> {
        self.registry.get(store)
    }

    pub fn registry(&self) -> &StoreRegistry {
        &self.registry
    }

    pub fn config(&self) -> &StateConfig {
        &self.config
    }

    /// Fingerprint of the configured cookie domain.
    pub fn domain_fingerprint(&self) -> &DomainFingerprint {
        &self.fingerprint
    }

    /// Fingerprint of an arbitrary domain.
    pub fn fingerprint_for(domain: &str) -> DomainFingerprint {
        DomainFingerprint::of(domain)
    }

    // ---- Candidates and resolution ----

    /// Add raw candidates for `store` after construction. Empty input is
    /// ignored.
    pub fn set_initial_state(&mut self, store: impl Into<String>, candidates: Vec<String>) {
        self.pending.add(store, candidates);
    }

    /// Returns `true` if `store` has a live value.
    pub fn is_live(&self, store: &str) -> bool {
        self.live.contains_key(store)
    }

    /// Returns `true` if `store` still has unresolved candidates.
    pub fn has_pending(&self, store: &str) -> bool {
        self.pending.contains(store)
    }

    /// Store names with unresolved candidates, in discovery order.
    pub fn pending_stores(&self) -> Vec<&str> {
        self.pending.store_names()
    }

    /// Resolve `store` from its pending candidates.
    ///
    /// Consumes the candidates, so a second call is a no-op. Returns `true`
    /// if a value was installed.
    pub fn resolve(&mut self, store: &str) -> bool {
        let Some(candidates) = self.pending.take(store) else {
            return false;
        };
        let fingerprint = self
            .registry
            .is_fingerprint_required(store)
            .then_some(&self.fingerprint);
        match resolve_candidates(store, &candidates, fingerprint) {
            Some(value) => self.set_state(store, "", value.into_value()),
            None => {
                debug!(store, candidates = candidates.len(), "no candidate installed");
                false
            }
        }
    }

    fn ensure_resolved(&mut self, store: &str) {
        if !self.live.contains_key(store) {
            self.resolve(store);
        }
    }

    // ---- Accessors ----

    /// The whole value of `store`, resolving it first if needed.
    pub fn get(&mut self, store: &str) -> Option<&StoreValue> {
        debug!(store, "getting state");
        self.ensure_resolved(store);
        self.live.get(store)
    }

    /// One field of `store`. `None` if the store is absent, scalar, or lacks
    /// the field.
    pub fn get_field(&mut self, store: &str, field: &str) -> Option<&Value> {
        debug!(store, field, "getting state field");
        self.ensure_resolved(store);
        self.live.get(store).and_then(|value| value.field(field))
    }

    /// Live values, in no particular order.
    pub fn live_stores(&self) -> impl Iterator<Item = (&str, &StoreValue)> {
        self.live.iter().map(|(name, value)| (name.as_str(), value))
    }

    // ---- Mutators ----

    /// Write into live state without resolving or persisting.
    ///
    /// An empty `field` replaces the whole value, subject to the store's
    /// fingerprint rule (see [`StateStore::add_stores`]). Otherwise the field
    /// is set on the store's mapping; a scalar or absent store first becomes
    /// a fresh mapping, seeded with `cdh` when the policy requires a
    /// fingerprint.
    ///
    /// Returns `false` if a whole value was refused.
    pub fn set_state(&mut self, store: &str, field: &str, value: impl Into<Value>) -> bool {
        let value = value.into();
        debug!(store, field, %value, "populating state");

        if field.is_empty() {
            let Some(value) = self.admit(store, StoreValue::from(value)) else {
                return false;
            };
            self.live.insert(store.to_string(), value);
            return true;
        }

        if let Some(StoreValue::Fields(fields)) = self.live.get_mut(store) {
            fields.insert(field.to_string(), value);
            return true;
        }

        let mut fields = self.seeded_fields(store);
        fields.insert(field.to_string(), value);
        self.live.insert(store.to_string(), StoreValue::Fields(fields));
        true
    }

    /// Apply the fingerprint rule to a whole value bound for `store`.
    ///
    /// For stores that require a fingerprint, a mapping without `cdh` gets
    /// the current one stamped first, and a mapping carrying a different
    /// `cdh` is refused.
    fn admit(&self, store: &str, value: StoreValue) -> Option<StoreValue> {
        if !self.registry.is_fingerprint_required(store) {
            return Some(value);
        }
        let fields = match value {
            StoreValue::Fields(fields) => fields,
            scalar => return Some(scalar),
        };
        match fields.get(FINGERPRINT_FIELD).cloned() {
            Some(found) if self.fingerprint.matches(&found) => Some(StoreValue::Fields(fields)),
            Some(found) => {
                debug!(
                    store,
                    runtime = %self.fingerprint,
                    value = %found,
                    "domain fingerprints differ; refusing install"
                );
                None
            }
            None => {
                let mut stamped = self.seeded_fields(store);
                stamped.extend(fields);
                Some(StoreValue::Fields(stamped))
            }
        }
    }

    fn seeded_fields(&self, store: &str) -> Fields {
        let mut fields = Fields::new();
        if self.registry.is_fingerprint_required(store) {
            fields.insert(FINGERPRINT_FIELD.to_string(), self.fingerprint.to_value());
        }
        fields
    }

    /// Resolve if needed, write, and persist when the store is eager.
    pub fn set(&mut self, store: &str, field: &str, value: impl Into<Value>) {
        self.ensure_resolved(store);
        if self.set_state(store, field, value) && self.registry.is_eager(store) {
            self.persist(store);
        }
    }

    /// Remove a whole store. Eager stores also get a delete write.
    pub fn clear(&mut self, store: &str) {
        self.ensure_resolved(store);
        if self.live.remove(store).is_none() {
            return;
        }
        debug!(store, "cleared store");
        if self.registry.is_eager(store) {
            let write = CookieWrite::delete(&self.config, store, Utc::now());
            self.sink.write(&write);
        }
    }

    /// Remove one field, leaving its siblings. Eager stores are re-persisted.
    pub fn clear_field(&mut self, store: &str, field: &str) {
        self.ensure_resolved(store);
        let removed = self
            .live
            .get_mut(store)
            .and_then(StoreValue::as_fields_mut)
            .and_then(|fields| fields.shift_remove(field))
            .is_some();
        if !removed {
            return;
        }
        debug!(store, field, "cleared field");
        if self.registry.is_eager(store) {
            self.persist(store);
        }
    }

    /// Install values directly, bypassing resolution and persistence.
    ///
    /// An installed store's pending candidates are discarded. Mappings for
    /// stores that require a fingerprint must carry the current `cdh`: a
    /// missing one is stamped, a different one makes the install a no-op.
    pub fn add_stores<I, K>(&mut self, stores: I)
    where
        I: IntoIterator<Item = (K, StoreValue)>,
        K: Into<String>,
    {
        for (name, value) in stores {
            let name = name.into();
            if let Some(value) = self.admit(&name, value) {
                self.pending.take(&name);
                self.live.insert(name, value);
            }
        }
    }

    // ---- Persistence ----

    /// Persist `store`, logging instead of failing.
    pub fn persist(&self, store: &str) {
        match self.try_persist(store) {
            Ok(write) => debug!(store, cookie = %write.name, "persisted state store"),
            Err(e @ StateError::Codec(_)) => warn!(store, error = %e, "cannot persist state"),
            Err(e) => debug!(store, error = %e, "cannot persist state"),
        }
    }

    /// Persist `store` and return the write handed to the sink.
    pub fn try_persist(&self, store: &str) -> StateResult<CookieWrite> {
        let policy = self
            .registry
            .get(store)
            .ok_or_else(|| StateError::UnknownStore(store.to_string()))?;
        let value = self
            .live
            .get(store)
            .ok_or_else(|| StateError::NotMaterialized(store.to_string()))?;
        let write = CookieWrite::for_store(&self.config, store, policy, value, Utc::now())?;
        self.sink.write(&write);
        Ok(write)
    }

    /// Persist every live store that has a policy. Returns the write count.
    pub fn persist_all(&self) -> usize {
        let mut names: Vec<&str> = self
            .live
            .keys()
            .map(String::as_str)
            .filter(|name| self.registry.contains(name))
            .collect();
        names.sort_unstable();
        names
            .into_iter()
            .filter(|name| self.try_persist(name).is_ok())
            .count()
    }
}
