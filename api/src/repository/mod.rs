// Repository layer for record lookups
// Store adapters sit behind `RecordStore` so the query path does not depend on sqlx directly

pub mod deposits;

pub use deposits::{Deposit, MemoryDepositStore, PgDepositStore};

use std::collections::BTreeMap;

use async_trait::async_trait;
use thiserror::Error;

use crate::auth::CallerIdentity;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Unavailable(err.to_string())
    }
}

/// Columns a caller may match on besides the owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MatchField {
    Status,
    Currency,
}

impl MatchField {
    pub fn column(&self) -> &'static str {
        match self {
            MatchField::Status => "status",
            MatchField::Currency => "currency",
        }
    }
}

/// Field/value equality filter, always scoped to one owner.
///
/// The owner is fixed at construction; `with` can only add non-owner fields,
/// so a filter can never widen past the caller's own records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryFilter {
    owner: String,
    matches: BTreeMap<MatchField, String>,
}

impl QueryFilter {
    pub const OWNER_COLUMN: &'static str = "user_id";

    pub fn owned_by(owner: &CallerIdentity) -> Self {
        Self {
            owner: owner.as_str().to_string(),
            matches: BTreeMap::new(),
        }
    }

    pub fn with(mut self, field: MatchField, value: impl Into<String>) -> Self {
        self.matches.insert(field, value.into());
        self
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    #[cfg(test)]
    pub fn get(&self, field: MatchField) -> Option<&str> {
        self.matches.get(&field).map(String::as_str)
    }

    /// Column/value pairs, owner first.
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, &str)> {
        std::iter::once((Self::OWNER_COLUMN, self.owner.as_str())).chain(
            self.matches
                .iter()
                .map(|(field, value)| (field.column(), value.as_str())),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    CreatedAt,
}

impl SortField {
    pub fn column(&self) -> &'static str {
        match self {
            SortField::CreatedAt => "created_at",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Sort {
    pub fn newest_first() -> Self {
        Self {
            field: SortField::CreatedAt,
            direction: SortDirection::Desc,
        }
    }
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// One page of matching records in `sort` order.
    async fn find(
        &self,
        filter: &QueryFilter,
        sort: Sort,
        skip: u64,
        limit: u32,
    ) -> Result<Vec<Deposit>, StoreError>;

    /// Count of all matching records, ignoring pagination.
    async fn count(&self, filter: &QueryFilter) -> Result<u64, StoreError>;

    /// Backend name reported by `/version`.
    fn backend(&self) -> &'static str {
        "custom"
    }
}
