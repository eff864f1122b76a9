//! The injected session-store seam. The adapter never holds a global
//! singleton for credential storage — it asks an injected
//! [`SessionStore`] for the bearer/session token it needs and forgets it
//! again once the HTTP/WebSocket conversation that needed it is done.
//! Encryption, on-disk persistence, and token refresh policy are all the
//! store implementation's concern, not the adapter's.

/// A caller-supplied secret, opaque to the adapter beyond the one call that
/// consumes it.
#[derive(Clone)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wrap a raw token string.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Borrow the token for use in a single request's `Authorization`
    /// header or WebSocket handshake query string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SessionToken").field(&"<redacted>").finish()
    }
}

/// An injected source of session credentials. Implementations may read
/// from an OS keychain, an encrypted file, or (in tests) a fixed in-memory
/// value; the adapter treats all three identically.
pub trait SessionStore: Send + Sync {
    /// Fetch the current session token for `account_id`, if one is held.
    fn token(&self, account_id: &str) -> Option<SessionToken>;
}

/// A [`SessionStore`] backed by a fixed in-memory token, for tests and for
/// the `optionx` binary's non-interactive demo/CI mode.
#[derive(Debug, Clone)]
pub struct StaticSessionStore {
    account_id: String,
    token: String,
}

impl StaticSessionStore {
    /// Always answer `token` for `account_id`, and `None` for any other.
    #[must_use]
    pub fn new(account_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            token: token.into(),
        }
    }
}

impl SessionStore for StaticSessionStore {
    fn token(&self, account_id: &str) -> Option<SessionToken> {
        if account_id == self.account_id {
            Some(SessionToken::new(self.token.clone()))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_store_answers_only_the_configured_account() {
        let store = StaticSessionStore::new("acct-1", "secret-token");
        assert!(store.token("acct-1").is_some());
        assert!(store.token("acct-2").is_none());
    }

    #[test]
    fn session_token_debug_does_not_leak_the_raw_value() {
        let token = SessionToken::new("super-secret");
        assert_eq!(format!("{token:?}"), "SessionToken(\"<redacted>\")");
    }
}
