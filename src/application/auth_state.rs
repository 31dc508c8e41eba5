//! Short-lived OAuth handshake state.
//!
//! Maps a random nonce to the (user, org) pair that started a
//! third-party OAuth handshake, defending the callback against CSRF.
//! Each nonce is single-use: the lookup atomically retrieves and
//! deletes, and unread entries become unreachable after ten minutes.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::domain::foundation::{OrgId, UserId};

/// The correlation payload stored per nonce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthStateRecord {
    pub user_id: UserId,
    pub org_id: OrgId,
}

/// Default nonce lifetime.
const TTL: Duration = Duration::from_secs(10 * 60);

/// In-process nonce store shared by the handshake issuer and the
/// one-time consumer.
pub struct AuthStateStore {
    entries: Mutex<HashMap<String, (AuthStateRecord, Instant)>>,
    ttl: Duration,
}

impl AuthStateStore {
    pub fn new() -> Self {
        Self::with_ttl(TTL)
    }

    /// Custom lifetime, for tests.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Stores a nonce; also sweeps entries past their expiry so the
    /// map cannot grow without bound.
    pub fn put(&self, nonce: impl Into<String>, record: AuthStateRecord) {
        let now = Instant::now();
        let mut entries = self.entries.lock().unwrap();
        entries.retain(|_, (_, expires)| *expires > now);
        entries.insert(nonce.into(), (record, now + self.ttl));
    }

    /// Atomic retrieve-and-delete. A second lookup for the same nonce,
    /// or a lookup after expiry, returns `None`.
    pub fn take(&self, nonce: &str) -> Option<AuthStateRecord> {
        let (record, expires) = self.entries.lock().unwrap().remove(nonce)?;
        if expires <= Instant::now() {
            return None;
        }
        Some(record)
    }
}

impl Default for AuthStateStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> AuthStateRecord {
        AuthStateRecord {
            user_id: UserId::new(),
            org_id: OrgId::new(),
        }
    }

    #[test]
    fn nonce_is_single_use() {
        let store = AuthStateStore::new();
        let expected = record();
        store.put("nonce-1", expected);

        assert_eq!(store.take("nonce-1"), Some(expected));
        assert_eq!(store.take("nonce-1"), None);
    }

    #[test]
    fn unknown_nonce_returns_none() {
        let store = AuthStateStore::new();
        assert_eq!(store.take("never-stored"), None);
    }

    #[test]
    fn expired_nonce_is_unreachable() {
        let store = AuthStateStore::with_ttl(Duration::ZERO);
        store.put("nonce-1", record());
        assert_eq!(store.take("nonce-1"), None);
    }

    #[test]
    fn put_sweeps_expired_entries() {
        let store = AuthStateStore::with_ttl(Duration::ZERO);
        store.put("stale", record());
        store.put("fresh", record());
        // The second put swept the first; neither is readable with a
        // zero TTL, but the map holds only the fresh entry.
        assert_eq!(store.entries.lock().unwrap().len(), 1);
    }
}
