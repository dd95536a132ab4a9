use std::cmp::Ordering;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::{QueryFilter, RecordStore, Sort, SortDirection, SortField, StoreError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Deposit {
    pub id: Uuid,
    pub user_id: String,
    /// Minor currency units.
    pub amount: i64,
    pub currency: String,
    pub status: String,
    pub tx_reference: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Deposit {
    fn column(&self, column: &str) -> Option<&str> {
        match column {
            "user_id" => Some(&self.user_id),
            "currency" => Some(&self.currency),
            "status" => Some(&self.status),
            _ => None,
        }
    }

    fn matches(&self, filter: &QueryFilter) -> bool {
        filter
            .entries()
            .all(|(column, value)| self.column(column) == Some(value))
    }
}

const SELECT_DEPOSITS: &str =
    "SELECT id, user_id, amount, currency, status, tx_reference, created_at FROM deposits WHERE 1=1";

pub struct PgDepositStore {
    pool: PgPool,
}

impl PgDepositStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn push_filter(query_builder: &mut QueryBuilder<'_, Postgres>, filter: &QueryFilter) {
    for (column, value) in filter.entries() {
        query_builder.push(format!(" AND {} = ", column));
        query_builder.push_bind(value.to_string());
    }
}

fn find_query(
    filter: &QueryFilter,
    sort: Sort,
    skip: u64,
    limit: u32,
) -> QueryBuilder<'static, Postgres> {
    let mut query_builder = QueryBuilder::<Postgres>::new(SELECT_DEPOSITS);
    push_filter(&mut query_builder, filter);

    // id breaks ties between rows created in the same instant
    let order = sort.direction.as_sql();
    query_builder.push(format!(
        " ORDER BY {} {}, id {} LIMIT ",
        sort.field.column(),
        order,
        order
    ));
    query_builder.push_bind(i64::from(limit));
    query_builder.push(" OFFSET ");
    query_builder.push_bind(i64::try_from(skip).unwrap_or(i64::MAX));
    query_builder
}

fn count_query(filter: &QueryFilter) -> QueryBuilder<'static, Postgres> {
    let mut query_builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM deposits WHERE 1=1");
    push_filter(&mut query_builder, filter);
    query_builder
}

#[async_trait]
impl RecordStore for PgDepositStore {
    async fn find(
        &self,
        filter: &QueryFilter,
        sort: Sort,
        skip: u64,
        limit: u32,
    ) -> Result<Vec<Deposit>, StoreError> {
        let mut query_builder = find_query(filter, sort, skip, limit);
        let deposits = query_builder
            .build_query_as::<Deposit>()
            .fetch_all(&self.pool)
            .await?;

        Ok(deposits)
    }

    async fn count(&self, filter: &QueryFilter) -> Result<u64, StoreError> {
        let mut query_builder = count_query(filter);
        let total = query_builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        Ok(total.max(0) as u64)
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}

// In-memory deposit store for local runs and tests
#[derive(Default)]
pub struct MemoryDepositStore {
    deposits: Arc<RwLock<Vec<Deposit>>>,
}

impl MemoryDepositStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_deposits(deposits: Vec<Deposit>) -> Self {
        Self {
            deposits: Arc::new(RwLock::new(deposits)),
        }
    }

    pub fn insert(&self, deposit: Deposit) -> Result<(), StoreError> {
        let mut deposits = self
            .deposits
            .write()
            .map_err(|_| StoreError::Unavailable("deposit list poisoned".to_string()))?;
        deposits.push(deposit);
        Ok(())
    }

    fn snapshot(&self) -> Result<Vec<Deposit>, StoreError> {
        self.deposits
            .read()
            .map(|deposits| deposits.clone())
            .map_err(|_| StoreError::Unavailable("deposit list poisoned".to_string()))
    }
}

fn compare(a: &Deposit, b: &Deposit, sort: Sort) -> Ordering {
    let ordering = match sort.field {
        SortField::CreatedAt => a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)),
    };
    match sort.direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

#[async_trait]
impl RecordStore for MemoryDepositStore {
    async fn find(
        &self,
        filter: &QueryFilter,
        sort: Sort,
        skip: u64,
        limit: u32,
    ) -> Result<Vec<Deposit>, StoreError> {
        let mut matching: Vec<Deposit> = self
            .snapshot()?
            .into_iter()
            .filter(|d| d.matches(filter))
            .collect();
        matching.sort_by(|a, b| compare(a, b, sort));

        let skip = usize::try_from(skip).unwrap_or(usize::MAX);
        Ok(matching
            .into_iter()
            .skip(skip)
            .take(limit as usize)
            .collect())
    }

    async fn count(&self, filter: &QueryFilter) -> Result<u64, StoreError> {
        let deposits = self.snapshot()?;
        Ok(deposits.iter().filter(|d| d.matches(filter)).count() as u64)
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
