/// Application state

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Context;
use redis::aio::ConnectionManager;
use serde::Deserialize;
use sqlx::PgPool;

use crate::assembler::ResponseAssembler;
use crate::auth::{
    Authenticator, CallerIdentity, MemorySessionProvider, RedisSessionProvider, SessionProvider,
};
use crate::config::{Config, ServiceConfig};
use crate::pagination::Paginator;
use crate::query::QueryExecutor;
use crate::repository::{Deposit, MemoryDepositStore, PgDepositStore, RecordStore};

/// Contents pre-loaded into the in-memory backends.
#[derive(Debug, Default, Deserialize)]
pub struct MemorySeed {
    /// token -> user id
    #[serde(default)]
    pub sessions: HashMap<String, String>,
    #[serde(default)]
    pub deposits: Vec<Deposit>,
}

impl MemorySeed {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read memory seed file '{}'", path))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("invalid memory seed file '{}'", path))
    }
}

#[derive(Clone)]
pub struct AppState {
    pub service_config: ServiceConfig,
    /// Header the credential is read from.
    pub auth_header: String,
    pub deposits: ResponseAssembler,
    pub record_backend: &'static str,
    pub session_backend: &'static str,
    // Raw handles kept for readiness checks
    pub postgres: Option<PgPool>,
    pub redis: Option<ConnectionManager>,
}

impl AppState {
    pub fn new(
        config: &Config,
        records: Arc<dyn RecordStore>,
        sessions: Arc<dyn SessionProvider>,
        postgres: Option<PgPool>,
        redis: Option<ConnectionManager>,
    ) -> Self {
        let record_backend = records.backend();
        let session_backend = sessions.backend();
        let deposits = ResponseAssembler::new(
            Authenticator::new(sessions, config.auth.scheme.clone()),
            Paginator::from_config(&config.pagination),
            QueryExecutor::new(records),
        );

        Self {
            service_config: config.service.clone(),
            auth_header: config.auth.header.clone(),
            deposits,
            record_backend,
            session_backend,
            postgres,
            redis,
        }
    }

    /// Pick store adapters from config and the integrations that came up.
    pub fn from_integrations(
        config: &Config,
        postgres: Option<PgPool>,
        redis: Option<ConnectionManager>,
    ) -> anyhow::Result<Self> {
        let seed = if config.store.memory_seed_path.is_empty() {
            MemorySeed::default()
        } else {
            MemorySeed::load(&config.store.memory_seed_path)?
        };
        let MemorySeed {
            sessions: seeded_sessions,
            deposits: seeded_deposits,
        } = seed;

        let records: Arc<dyn RecordStore> = match config.store.records.as_str() {
            "memory" => {
                tracing::warn!(
                    seeded = seeded_deposits.len(),
                    "Using in-memory deposit store"
                );
                Arc::new(MemoryDepositStore::with_deposits(seeded_deposits))
            }
            "postgres" => {
                let pool = postgres
                    .clone()
                    .ok_or_else(|| anyhow::anyhow!("record store 'postgres' requires a database connection"))?;
                Arc::new(PgDepositStore::new(pool))
            }
            other => anyhow::bail!("unknown record store backend '{}'", other),
        };

        let sessions: Arc<dyn SessionProvider> = match config.store.sessions.as_str() {
            "memory" => {
                tracing::warn!(
                    seeded = seeded_sessions.len(),
                    "Using in-memory session provider"
                );
                Arc::new(MemorySessionProvider::with_sessions(
                    seeded_sessions
                        .into_iter()
                        .map(|(token, user_id)| (token, CallerIdentity::new(user_id)))
                        .collect(),
                ))
            }
            "redis" => {
                let conn = redis
                    .clone()
                    .ok_or_else(|| anyhow::anyhow!("session provider 'redis' requires a Redis connection"))?;
                Arc::new(RedisSessionProvider::new(
                    conn,
                    config.auth.session_key_prefix.clone(),
                ))
            }
            other => anyhow::bail!("unknown session backend '{}'", other),
        };

        Ok(Self::new(config, records, sessions, postgres, redis))
    }
}
