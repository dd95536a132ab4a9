// Session providers resolve bearer tokens to caller identities.
// Supports Redis and in-memory backends

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use thiserror::Error;

use super::CallerIdentity;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session backend unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Look up the identity bound to `token`; `None` when the session is unknown or expired.
    async fn resolve(&self, token: &str) -> Result<Option<CallerIdentity>, SessionError>;

    fn backend(&self) -> &'static str {
        "custom"
    }
}

/// Sessions stored as `{prefix}:{token}` -> identity, with TTL managed by whoever writes them.
pub struct RedisSessionProvider {
    conn: ConnectionManager,
    key_prefix: String,
}

impl RedisSessionProvider {
    pub fn new(conn: ConnectionManager, key_prefix: impl Into<String>) -> Self {
        Self {
            conn,
            key_prefix: key_prefix.into(),
        }
    }

    fn key(&self, token: &str) -> String {
        format!("{}:{}", self.key_prefix, token)
    }
}

#[async_trait]
impl SessionProvider for RedisSessionProvider {
    async fn resolve(&self, token: &str) -> Result<Option<CallerIdentity>, SessionError> {
        let mut conn = self.conn.clone();
        let stored: Option<String> = redis::cmd("GET")
            .arg(self.key(token))
            .query_async(&mut conn)
            .await
            .map_err(|e| SessionError::Unavailable(e.to_string()))?;

        Ok(stored.map(CallerIdentity::new))
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}

// In-memory sessions for local runs and tests
#[derive(Default)]
pub struct MemorySessionProvider {
    sessions: Arc<RwLock<HashMap<String, CallerIdentity>>>,
}

impl MemorySessionProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sessions(sessions: HashMap<String, CallerIdentity>) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(sessions)),
        }
    }

    /// Create a fresh session for `identity` and return its token.
    pub fn issue(&self, identity: CallerIdentity) -> Result<String, SessionError> {
        let token = deposit_auth::generate_token();
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| SessionError::Unavailable("session map poisoned".to_string()))?;
        sessions.insert(token.clone(), identity);
        Ok(token)
    }

    #[cfg(test)]
    pub fn revoke(&self, token: &str) -> Result<(), SessionError> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| SessionError::Unavailable("session map poisoned".to_string()))?;
        sessions.remove(token);
        Ok(())
    }
}

#[async_trait]
impl SessionProvider for MemorySessionProvider {
    async fn resolve(&self, token: &str) -> Result<Option<CallerIdentity>, SessionError> {
        let sessions = self
            .sessions
            .read()
            .map_err(|_| SessionError::Unavailable("session map poisoned".to_string()))?;
        Ok(sessions.get(token).cloned())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_rt::test]
    async fn revoked_session_no_longer_resolves() {
        let provider = MemorySessionProvider::new();
        let token = provider.issue(CallerIdentity::new("user-7")).unwrap();
        assert_eq!(
            provider.resolve(&token).await.unwrap(),
            Some(CallerIdentity::new("user-7"))
        );

        provider.revoke(&token).unwrap();
        assert_eq!(provider.resolve(&token).await.unwrap(), None);
    }

    #[actix_rt::test]
    async fn preloaded_sessions_resolve() {
        let token = deposit_auth::generate_token();
        let provider = MemorySessionProvider::with_sessions(HashMap::from([(
            token.clone(),
            CallerIdentity::new("user-9"),
        )]));
        assert_eq!(
            provider.resolve(&token).await.unwrap(),
            Some(CallerIdentity::new("user-9"))
        );
        assert_eq!(provider.resolve("unknown").await.unwrap(), None);
    }
}
