//! HTTP cookie adapters for the persistence medium.
//!
//! A browser sends every cookie visible to the request in one `Cookie:`
//! header. Cookies set on different domains can share a name, and most
//! frameworks collapse them into a map that keeps only one. Parsing the raw
//! header keeps every occurrence.

use std::sync::RwLock;

use tally_types::Expiry;
use tracing::debug;

use crate::persist::CookieWrite;
use crate::traits::{CandidateSource, PersistenceSink, RawCandidates};

const SAME_SITE: &str = "Lax";

/// Candidate source parsed from a raw `Cookie:` header value.
#[derive(Clone, Debug, Default)]
pub struct CookieHeaderSource {
    candidates: RawCandidates,
}

impl CookieHeaderSource {
    /// Parse `name=value; name=value` text.
    ///
    /// Each piece is split at its first `=`. Values are URL-decoded (`+` is
    /// a space); a value that does not decode is kept as sent. Pieces
    /// without `=` are skipped.
    pub fn parse(header: &str) -> Self {
        let mut candidates = RawCandidates::new();
        for piece in header.split(';') {
            let Some((name, value)) = piece.trim().split_once('=') else {
                continue;
            };
            if name.is_empty() {
                continue;
            }
            candidates
                .entry(name.to_string())
                .or_default()
                .push(url_decode(value));
        }
        debug!(names = candidates.len(), "parsed cookie header");
        Self { candidates }
    }
}

impl CandidateSource for CookieHeaderSource {
    fn read_all(&self) -> RawCandidates {
        self.candidates.clone()
    }
}

fn url_decode(value: &str) -> String {
    let spaced = value.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => spaced,
    }
}

impl CookieWrite {
    /// Render as the value of a `Set-Cookie` response header.
    pub fn to_set_cookie(&self) -> String {
        let mut out = format!("{}={}", self.name, urlencoding::encode(&self.value));
        if let Expiry::At(at) = self.expiry {
            out.push_str("; Expires=");
            out.push_str(&at.format("%a, %d %b %Y %H:%M:%S GMT").to_string());
        }
        if !self.path.is_empty() {
            out.push_str("; Path=");
            out.push_str(&self.path);
        }
        if !self.domain.is_empty() {
            out.push_str("; Domain=");
            out.push_str(&self.domain);
        }
        out.push_str("; SameSite=");
        out.push_str(SAME_SITE);
        out
    }
}

/// A sink that renders each write as a `Set-Cookie` header line.
#[derive(Debug, Default)]
pub struct SetCookieSink {
    writes: RwLock<Vec<CookieWrite>>,
}

impl SetCookieSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rendered header values, in write order.
    pub fn headers(&self) -> Vec<String> {
        self.writes
            .read()
            .expect("lock poisoned")
            .iter()
            .map(CookieWrite::to_set_cookie)
            .collect()
    }

    /// The writes behind [`SetCookieSink::headers`], in write order.
    pub fn writes(&self) -> Vec<CookieWrite> {
        self.writes.read().expect("lock poisoned").clone()
    }
}

impl PersistenceSink for SetCookieSink {
    fn write(&self, write: &CookieWrite) {
        debug!(cookie = %write.name, delete = write.is_delete(), "set-cookie");
        self.writes.write().expect("lock poisoned").push(write.clone());
    }
}
