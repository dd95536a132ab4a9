use std::sync::Arc;

use crate::repository::{Deposit, QueryFilter, RecordStore, Sort, StoreError};

/// Runs a paged lookup and the matching total against one record store.
#[derive(Clone)]
pub struct QueryExecutor {
    store: Arc<dyn RecordStore>,
}

impl QueryExecutor {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Returns the requested page plus the count of every record matching `filter`.
    ///
    /// Failures from either lookup are returned as-is; nothing is retried.
    pub async fn execute(
        &self,
        filter: &QueryFilter,
        sort: Sort,
        skip: u64,
        limit: u32,
    ) -> Result<(Vec<Deposit>, u64), StoreError> {
        let records = self.store.find(filter, sort, skip, limit).await?;
        let total = self.store.count(filter).await?;

        tracing::debug!(
            owner = %filter.owner(),
            skip = skip,
            limit = limit,
            returned = records.len(),
            total = total,
            "Executed paged query"
        );

        Ok((records, total))
    }
}
