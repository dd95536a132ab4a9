use actix_web::{web, HttpRequest, HttpResponse};

use crate::app_state::AppState;
use crate::assembler::ListRequest;
use crate::errors::ApiError;

// Kept as raw strings; the paginator decides what a bad value means
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub status: Option<String>,
    pub currency: Option<String>,
}

impl ListQuery {
    /// Read known keys pair by pair. The first value of a repeated key wins,
    /// unknown keys are ignored, and an undecodable query string reads as empty.
    pub fn from_query_string(raw: &str) -> Self {
        let pairs = web::Query::<Vec<(String, String)>>::from_query(raw)
            .map(web::Query::into_inner)
            .unwrap_or_default();

        let mut query = ListQuery::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "page" => &mut query.page,
                "limit" => &mut query.limit,
                "status" => &mut query.status,
                "currency" => &mut query.currency,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        query
    }
}

// GET /api/deposits
pub async fn list_deposits(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let credential = req
        .headers()
        .get(state.auth_header.as_str())
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string());

    let query = ListQuery::from_query_string(req.query_string());
    let request = ListRequest {
        credential,
        page: query.page,
        limit: query.limit,
        status: query.status,
        currency: query.currency,
    };

    let page = state.deposits.handle(request).await?;
    Ok(HttpResponse::Ok().json(page))
}
