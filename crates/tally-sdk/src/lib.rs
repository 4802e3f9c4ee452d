//! High-level SDK for Tally.
//!
//! Provides the client factory and the tracker client that applications
//! embed. The tracker owns a [`StateStore`] preloaded with the standard
//! visitor, session, browser-session and campaign stores.

pub mod client;
pub mod config;
pub mod error;
pub mod event;
pub mod manifest;
pub mod tracker;

pub use client::{Client, Tally};
pub use config::SdkConfig;
pub use error::{SdkError, SdkResult};
pub use event::TrackingEvent;
pub use manifest::{lookup_service, ServiceDescriptor};
pub use tracker::{
    register_default_stores, Tracker, BROWSER_SESSION_STORE, CAMPAIGN_STORE, SESSION_STORE,
    VISITOR_STORE,
};

// Re-export key types
pub use tally_codec::DomainFingerprint;
pub use tally_state::{
    CandidateSource, CookieHeaderSource, CookieWrite, InMemoryCandidateSource, InMemorySink,
    PersistenceSink, SetCookieSink, StateConfig, StateStore,
};
pub use tally_types::{Expiration, PersistenceClass, StoreFormat, StorePolicy, StoreValue};
