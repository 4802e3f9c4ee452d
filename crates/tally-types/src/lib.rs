//! Foundation types for Tally.
//!
//! Every other Tally crate depends on `tally-types`. The types here carry no
//! behavior beyond construction, inspection, and conversion.
//!
//! # Key Types
//!
//! - [`StoreValue`]: The live value of a store: a scalar string or a field map
//! - [`Fields`]: Insertion-ordered field map used by mapping values
//! - [`StorePolicy`]: Per-store persistence policy registered at startup
//! - [`StoreFormat`]: Serialization format used when a store is written
//! - [`PersistenceClass`]: Whether mutations persist immediately
//! - [`Expiration`] / [`Expiry`]: Expiration hint and its resolved form

pub mod error;
pub mod expiration;
pub mod policy;
pub mod value;

pub use error::TypeError;
pub use expiration::{Expiration, Expiry, PERMANENT_LIFETIME_SECS};
pub use policy::{PersistenceClass, StoreFormat, StorePolicy};
pub use value::{Fields, StoreValue};
