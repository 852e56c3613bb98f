//! Object store backends.
//!
//! Backends implement [`ObjectStore`](super::ObjectStore) for different storage types.

mod local;
mod memory;

pub use local::LocalStore;
pub use memory::MemoryStore;

use std::collections::HashMap;
use std::time::{Duration, SystemTime};

use parking_lot::Mutex;

/// Signed-URL tokens issued by a backend: token → (key, expiry).
#[derive(Debug, Default)]
pub(crate) struct TokenTable {
    tokens: Mutex<HashMap<String, (String, SystemTime)>>,
}

impl TokenTable {
    /// Issue a fresh token for `key`, dropping any that have expired.
    pub(crate) fn issue(&self, key: &str, ttl: Duration) -> (String, SystemTime) {
        let token = uuid::Uuid::new_v4().simple().to_string();
        let now = SystemTime::now();
        let expires_at = now + ttl;

        let mut tokens = self.tokens.lock();
        tokens.retain(|_, (_, exp)| *exp > now);
        tokens.insert(token.clone(), (key.to_string(), expires_at));
        (token, expires_at)
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.tokens.lock().len()
    }

    /// Key a live token grants, or `None` if unknown or expired.
    pub(crate) fn redeem(&self, token: &str) -> Option<String> {
        let mut tokens = self.tokens.lock();
        let (key, expires_at) = tokens.get(token)?.clone();
        if SystemTime::now() >= expires_at {
            tokens.remove(token);
            return None;
        }
        Some(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_drops_expired_tokens() {
        let table = TokenTable::default();
        for _ in 0..1000 {
            table.issue("a.txt", Duration::ZERO);
        }
        assert!(table.len() <= 1);

        let (live, _) = table.issue("b.txt", Duration::from_secs(60));
        assert_eq!(table.len(), 1);
        assert_eq!(table.redeem(&live).as_deref(), Some("b.txt"));
    }

    #[test]
    fn test_redeem_expired_forgets_token() {
        let table = TokenTable::default();
        let (token, _) = table.issue("a.txt", Duration::ZERO);
        assert_eq!(table.redeem(&token), None);
        assert_eq!(table.len(), 0);
        assert_eq!(table.redeem("nope"), None);
    }
}
