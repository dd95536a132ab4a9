/// Deposit history request handling
///
/// Authenticate, paginate, query, then build the response envelope. A failed
/// step ends the request; no partial page is ever returned.
use serde::{Deserialize, Serialize};

use crate::auth::Authenticator;
use crate::errors::ApiError;
use crate::pagination::{total_pages, Paginator};
use crate::query::QueryExecutor;
use crate::repository::{Deposit, MatchField, QueryFilter, Sort};

/// Everything one list call needs, passed in explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListRequest {
    pub credential: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
    pub status: Option<String>,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultPage {
    pub data: Vec<Deposit>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
}

#[derive(Clone)]
pub struct ResponseAssembler {
    authenticator: Authenticator,
    paginator: Paginator,
    executor: QueryExecutor,
}

impl ResponseAssembler {
    pub fn new(authenticator: Authenticator, paginator: Paginator, executor: QueryExecutor) -> Self {
        Self {
            authenticator,
            paginator,
            executor,
        }
    }

    pub async fn handle(&self, request: ListRequest) -> Result<ResultPage, ApiError> {
        let caller = self
            .authenticator
            .authenticate(request.credential.as_deref())
            .await?;

        let page_request = self
            .paginator
            .paginate(request.page.as_deref(), request.limit.as_deref());

        let mut filter = QueryFilter::owned_by(&caller);
        if let Some(status) = non_empty(request.status) {
            filter = filter.with(MatchField::Status, status);
        }
        if let Some(currency) = non_empty(request.currency) {
            filter = filter.with(MatchField::Currency, currency);
        }

        let (data, total) = self
            .executor
            .execute(
                &filter,
                Sort::newest_first(),
                page_request.skip,
                page_request.limit,
            )
            .await?;

        tracing::info!(
            caller = %caller,
            page = page_request.page,
            limit = page_request.limit,
            returned = data.len(),
            total = total,
            "Deposit history served"
        );

        Ok(ResultPage {
            data,
            pagination: PaginationInfo {
                total,
                page: page_request.page,
                limit: page_request.limit,
                total_pages: total_pages(total, page_request.limit),
            },
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
