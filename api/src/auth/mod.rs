/// Caller authentication
///
/// Turns an explicitly supplied credential into a `CallerIdentity` by
/// validating the token shape locally and resolving it against the
/// configured session provider.

pub mod session;

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

pub use session::{MemorySessionProvider, RedisSessionProvider, SessionError, SessionProvider};

/// Opaque identifier of the authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallerIdentity(String);

impl CallerIdentity {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Session provider unavailable: {0}")]
    ProviderUnavailable(String),
}

#[derive(Clone)]
pub struct Authenticator {
    sessions: Arc<dyn SessionProvider>,
    scheme: String,
}

impl Authenticator {
    pub fn new(sessions: Arc<dyn SessionProvider>, scheme: impl Into<String>) -> Self {
        Self {
            sessions,
            scheme: scheme.into(),
        }
    }

    /// Resolve the raw authorization header value to a caller.
    pub async fn authenticate(&self, credential: Option<&str>) -> Result<CallerIdentity, AuthError> {
        let token = deposit_auth::parse_credential(credential, &self.scheme)
            .map_err(|e| AuthError::Unauthorized(e.to_string()))?;

        match self.sessions.resolve(token).await {
            Ok(Some(identity)) => Ok(identity),
            Ok(None) => Err(AuthError::Unauthorized("unknown session".to_string())),
            Err(e) => Err(AuthError::ProviderUnavailable(e.to_string())),
        }
    }
}
