//! Collaborator interfaces to the persistence medium.
//!
//! The state store never touches cookies, headers or storage APIs directly.
//! It reads every raw value once through a [`CandidateSource`] and hands
//! each write to a [`PersistenceSink`].

use indexmap::IndexMap;

use crate::persist::CookieWrite;

/// Raw external name to every value found under it, in discovery order.
pub type RawCandidates = IndexMap<String, Vec<String>>;

/// Read side of the persistence medium.
pub trait CandidateSource: Send + Sync {
    /// Everything available to the current request, keyed by raw name.
    ///
    /// Duplicate names must keep all of their values, in the order the
    /// medium exposed them.
    fn read_all(&self) -> RawCandidates;
}

/// Write side of the persistence medium.
///
/// Writes are fire-and-forget: implementations do not report failure and
/// the store never waits for an acknowledgement. A deletion is a write with
/// an empty payload and the delete flag set (see [`CookieWrite::is_delete`]).
pub trait PersistenceSink: Send + Sync {
    fn write(&self, write: &CookieWrite);
}
