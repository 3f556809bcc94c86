//! Server-side "already counted this session" table.
//!
//! Keys are opaque client session tokens. A token is claimed before the
//! increment and released if the increment fails, so concurrent duplicates
//! cannot both count. The map is bounded: once it reaches `max_entries`,
//! expired entries are swept (at most once per `ttl / SWEEP_DIVISOR`), and if
//! it is still full new tokens are counted without being remembered.

use std::sync::{Mutex, TryLockError};
use std::time::{Duration, Instant};

use axum::http::HeaderMap;
use dashmap::{mapref::entry::Entry, DashMap};

/// Header carrying the client's session token.
pub const SESSION_HEADER: &str = "x-visitor-session";
const MAX_TOKEN_LEN: usize = 128;
const SWEEP_DIVISOR: u32 = 16;

#[derive(Debug)]
pub struct SessionDedup {
    ttl: Duration,
    max_entries: usize,
    seen: DashMap<String, Instant>,
    last_sweep: Mutex<Option<Instant>>,
}

impl SessionDedup {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            ttl,
            max_entries: max_entries.max(1),
            seen: DashMap::new(),
            last_sweep: Mutex::new(None),
        }
    }

    pub fn enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Claim `token`. Returns false when it was already counted within the TTL.
    pub fn claim(&self, token: &str) -> bool {
        self.claim_at(token, Instant::now())
    }

    fn claim_at(&self, token: &str, now: Instant) -> bool {
        if !self.enabled() {
            return true;
        }

        if self.seen.len() >= self.max_entries && !self.seen.contains_key(token) {
            if self.sweep_due(now) {
                self.sweep(now);
            }
            if self.seen.len() >= self.max_entries {
                tracing::warn!(len = self.seen.len(), "session dedup table full, not remembering token");
                return true;
            }
        }

        match self.seen.entry(token.to_string()) {
            Entry::Occupied(mut e) => {
                if now.duration_since(*e.get()) < self.ttl {
                    false
                } else {
                    e.insert(now);
                    true
                }
            }
            Entry::Vacant(e) => {
                e.insert(now);
                true
            }
        }
    }

    /// Release a claim whose increment did not happen.
    pub fn release(&self, token: &str) {
        self.seen.remove(token);
    }

    /// One sweep per interval; concurrent callers skip instead of waiting.
    fn sweep_due(&self, now: Instant) -> bool {
        let mut last = match self.last_sweep.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::Poisoned(p)) => p.into_inner(),
            Err(TryLockError::WouldBlock) => return false,
        };
        let interval = self.ttl / SWEEP_DIVISOR;
        match *last {
            Some(at) if now.saturating_duration_since(at) < interval => false,
            _ => {
                *last = Some(now);
                true
            }
        }
    }

    fn sweep(&self, now: Instant) {
        let ttl = self.ttl;
        self.seen.retain(|_, at| now.duration_since(*at) < ttl);
        tracing::debug!(len = self.seen.len(), "session dedup table swept");
    }
}

/// Token from the session header, if present and well-formed.
pub fn session_token(headers: &HeaderMap) -> Option<&str> {
    let raw = headers.get(SESSION_HEADER)?.to_str().ok()?.trim();
    let ok = !raw.is_empty()
        && raw.len() <= MAX_TOKEN_LEN
        && raw.chars().all(|c| c.is_ascii_graphic());
    ok.then_some(raw)
}
