//! Multi-candidate state store for Tally.
//!
//! A tracker keeps small named fragments of state (visitor id, session
//! counters, campaign data) in client-origin storage. The storage medium can
//! hand back several values for one name, for instance when the same cookie
//! was planted on `www.example.com` and on `.example.com`. This crate decides
//! which of those values is live and writes changes back.
//!
//! # Architecture
//!
//! - **Registry** ([`StoreRegistry`]): immutable per-store policy.
//! - **Loader** ([`PendingCandidates`]): raw values grouped by store name
//!   after stripping the namespace prefix.
//! - **Resolver** ([`resolve_candidates`]): picks the live value, which is the first
//!   candidate with a matching domain fingerprint, or the last candidate for
//!   stores that do not require one.
//! - **Mutator** ([`StateStore`]): get/set/clear over live values with lazy
//!   resolution and eager persistence.
//! - **Persister** ([`CookieWrite`]): encodes a value and hands it to the
//!   [`PersistenceSink`].
//!
//! # Collaborators
//!
//! - [`CandidateSource`]: read side of the medium. [`CookieHeaderSource`]
//!   parses an HTTP `Cookie:` header; [`InMemoryCandidateSource`] is for tests.
//! - [`PersistenceSink`]: write side of the medium. [`SetCookieSink`] renders
//!   `Set-Cookie` lines; [`InMemorySink`] records writes for tests.

pub mod config;
pub mod cookie;
pub mod error;
pub mod loader;
pub mod memory;
pub mod persist;
pub mod registry;
pub mod resolver;
pub mod store;
pub mod traits;

pub use config::StateConfig;
pub use cookie::{CookieHeaderSource, SetCookieSink};
pub use error::{StateError, StateResult};
pub use loader::PendingCandidates;
pub use memory::{InMemoryCandidateSource, InMemorySink};
pub use persist::CookieWrite;
pub use registry::StoreRegistry;
pub use resolver::resolve_candidates;
pub use store::StateStore;
pub use traits::{CandidateSource, PersistenceSink, RawCandidates};
