use std::fmt;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Lifetime of a "permanent" store: fifteen years.
pub const PERMANENT_LIFETIME_SECS: i64 = 3600 * 24 * 365 * 15;

/// How far in the past a deletion expiry is placed: twenty-five hours.
const DELETION_BACKDATE_SECS: i64 = 3600 * 25;

/// Expiration hint registered with a store policy.
///
/// The hint is only consulted when a store is persisted; relative variants
/// are resolved against the clock at that moment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expiration {
    /// Lives until the client session ends.
    Session,
    /// Fifteen years from the time of writing.
    Permanent,
    /// A fixed number of seconds from the time of writing.
    AfterSecs(u64),
    /// A fixed point in time.
    At(DateTime<Utc>),
}

impl Expiration {
    /// Relative expiration from a standard duration.
    pub fn after(duration: Duration) -> Self {
        Self::AfterSecs(duration.as_secs())
    }

    /// Resolve the hint into a concrete expiry relative to `now`.
    pub fn resolve(&self, now: DateTime<Utc>) -> Expiry {
        match self {
            Self::Session => Expiry::Session,
            Self::Permanent => Expiry::At(now + TimeDelta::seconds(PERMANENT_LIFETIME_SECS)),
            Self::AfterSecs(secs) => {
                let delta = i64::try_from(*secs)
                    .ok()
                    .and_then(TimeDelta::try_seconds)
                    .unwrap_or(TimeDelta::MAX);
                Expiry::At(now.checked_add_signed(delta).unwrap_or(DateTime::<Utc>::MAX_UTC))
            }
            Self::At(at) => Expiry::At(*at),
        }
    }
}

/// A resolved expiry handed to the persistence sink.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expiry {
    /// Session-only: no explicit expiry.
    Session,
    /// Expires at the given instant.
    At(DateTime<Utc>),
}

impl Expiry {
    /// An expiry already in the past, used to delete a value.
    pub fn deletion(now: DateTime<Utc>) -> Self {
        Self::At(now - TimeDelta::seconds(DELETION_BACKDATE_SECS))
    }

    /// Returns `true` if this expiry lies strictly before `now`.
    pub fn is_past(&self, now: DateTime<Utc>) -> bool {
        match self {
            Self::Session => false,
            Self::At(at) => *at < now,
        }
    }

    /// Unix timestamp in seconds; session expiries are `0`.
    pub fn unix_timestamp(&self) -> i64 {
        match self {
            Self::Session => 0,
            Self::At(at) => at.timestamp(),
        }
    }
}

impl fmt::Display for Expiry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Session => f.write_str("session"),
            Self::At(at) => write!(f, "{}", at.to_rfc3339()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn session_stays_session() {
        assert_eq!(Expiration::Session.resolve(t0()), Expiry::Session);
    }

    #[test]
    fn permanent_is_fifteen_years() {
        let expiry = Expiration::Permanent.resolve(t0());
        assert_eq!(
            expiry.unix_timestamp() - t0().timestamp(),
            PERMANENT_LIFETIME_SECS
        );
    }

    #[test]
    fn after_is_relative_to_now() {
        let expiry = Expiration::after(Duration::from_secs(1800)).resolve(t0());
        assert_eq!(expiry, Expiry::At(t0() + TimeDelta::seconds(1800)));
    }

    #[test]
    fn after_saturates() {
        let expiry = Expiration::AfterSecs(u64::MAX).resolve(t0());
        assert!(matches!(expiry, Expiry::At(_)));
        assert!(!expiry.is_past(t0()));
    }

    #[test]
    fn absolute_is_unchanged() {
        let at = Utc.with_ymd_and_hms(2030, 6, 1, 12, 0, 0).unwrap();
        assert_eq!(Expiration::At(at).resolve(t0()), Expiry::At(at));
    }

    #[test]
    fn deletion_is_in_the_past() {
        let expiry = Expiry::deletion(t0());
        assert!(expiry.is_past(t0()));
        assert_eq!(t0().timestamp() - expiry.unix_timestamp(), 3600 * 25);
    }

    #[test]
    fn session_timestamp_is_zero() {
        assert_eq!(Expiry::Session.unix_timestamp(), 0);
        assert!(!Expiry::Session.is_past(t0()));
    }

    #[test]
    fn serde_roundtrip() {
        let exp = Expiration::AfterSecs(60);
        let json = serde_json::to_string(&exp).unwrap();
        assert_eq!(json, r#"{"after_secs":60}"#);
        let parsed: Expiration = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, exp);
        let parsed: Expiration = serde_json::from_str(r#""permanent""#).unwrap();
        assert_eq!(parsed, Expiration::Permanent);
    }
}
