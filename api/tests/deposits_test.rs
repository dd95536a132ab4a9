use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use actix_web::{http::StatusCode, test, web, App};
use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use uuid::Uuid;

use deposit_api::app_state::AppState;
use deposit_api::auth::{CallerIdentity, MemorySessionProvider};
use deposit_api::config::Config;
use deposit_api::http::middleware::{logger::OutcomeLogger, request_id::RequestId};
use deposit_api::http::routes;
use deposit_api::repository::{
    Deposit, MemoryDepositStore, QueryFilter, RecordStore, Sort, StoreError,
};

struct FailingStore {
    calls: AtomicUsize,
}

#[async_trait]
impl RecordStore for FailingStore {
    async fn find(
        &self,
        _filter: &QueryFilter,
        _sort: Sort,
        _skip: u64,
        _limit: u32,
    ) -> Result<Vec<Deposit>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn count(&self, _filter: &QueryFilter) -> Result<u64, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
}

fn seeded_store(owner: &str, n: i64) -> MemoryDepositStore {
    let store = MemoryDepositStore::new();
    let base = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
    for i in 0..n {
        store
            .insert(Deposit {
                id: Uuid::new_v4(),
                user_id: owner.to_string(),
                amount: i + 1,
                currency: "USD".to_string(),
                status: if i % 5 == 0 { "pending" } else { "confirmed" }.to_string(),
                tx_reference: None,
                created_at: base + Duration::minutes(i),
            })
            .unwrap();
    }
    store
        .insert(Deposit {
            id: Uuid::new_v4(),
            user_id: "mallory".to_string(),
            amount: 999_999,
            currency: "USD".to_string(),
            status: "confirmed".to_string(),
            tx_reference: None,
            created_at: base + Duration::days(30),
        })
        .unwrap();
    store
}

/// Build state with an issued session for "alice"; returns the state and the header value.
fn state_with(records: Arc<dyn RecordStore>) -> (AppState, String) {
    let sessions = Arc::new(MemorySessionProvider::new());
    let token = sessions.issue(CallerIdentity::new("alice")).unwrap();
    let state = AppState::new(&Config::default(), records, sessions, None, None);
    (state, format!("Bearer {}", token))
}

macro_rules! app {
    ($state:expr) => {{
        let config = Config::default();
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .app_data(web::Data::new(config.auth.clone()))
                .app_data(web::Data::new(config.pagination.clone()))
                .wrap(OutcomeLogger)
                .wrap(RequestId::new(config.telemetry.request_id_header.clone()))
                .configure(routes::configure),
        )
        .await
    }};
}

#[actix_rt::test]
async fn test_second_page() {
    let (state, credential) = state_with(Arc::new(seeded_store("alice", 25)));
    let app = app!(state);

    let req = test::TestRequest::get()
        .uri("/api/deposits?page=2&limit=10")
        .insert_header(("Authorization", credential))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["pagination"],
        json!({ "total": 25, "page": 2, "limit": 10, "totalPages": 3 })
    );
    let amounts: Vec<i64> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["amount"].as_i64().unwrap())
        .collect();
    assert_eq!(amounts, (6..=15).rev().collect::<Vec<i64>>());
}

#[actix_rt::test]
async fn test_defaults_without_paging_params() {
    let (state, credential) = state_with(Arc::new(seeded_store("alice", 3)));
    let app = app!(state);

    let req = test::TestRequest::get()
        .uri("/api/deposits")
        .insert_header(("Authorization", credential))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(
        body["pagination"],
        json!({ "total": 3, "page": 1, "limit": 10, "totalPages": 1 })
    );
    assert!(body["data"]
        .as_array()
        .unwrap()
        .iter()
        .all(|d| d["user_id"] == "alice"));
}

#[actix_rt::test]
async fn test_bad_paging_params_fall_back() {
    let (state, credential) = state_with(Arc::new(seeded_store("alice", 3)));
    let app = app!(state);

    let req = test::TestRequest::get()
        .uri("/api/deposits?page=-4&limit=5000")
        .insert_header(("Authorization", credential.clone()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["pagination"]["page"], 1);
    assert_eq!(body["pagination"]["limit"], 100);

    let req = test::TestRequest::get()
        .uri("/api/deposits?page=abc&limit=")
        .insert_header(("Authorization", credential))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["pagination"]["page"], 1);
    assert_eq!(body["pagination"]["limit"], 10);
}

#[actix_rt::test]
async fn test_status_filter() {
    let (state, credential) = state_with(Arc::new(seeded_store("alice", 25)));
    let app = app!(state);

    let req = test::TestRequest::get()
        .uri("/api/deposits?status=pending")
        .insert_header(("Authorization", credential))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["pagination"]["total"], 5);
    assert!(body["data"]
        .as_array()
        .unwrap()
        .iter()
        .all(|d| d["status"] == "pending"));
}

#[actix_rt::test]
async fn test_repeated_param_keeps_filters() {
    let (state, credential) = state_with(Arc::new(seeded_store("alice", 3)));
    let app = app!(state);

    let req = test::TestRequest::get()
        .uri("/api/deposits?status=pending&page=1&page=1")
        .insert_header(("Authorization", credential))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["pagination"]["total"], 1);
    assert!(body["data"]
        .as_array()
        .unwrap()
        .iter()
        .all(|d| d["status"] == "pending"));
}

#[actix_rt::test]
async fn test_unauthorized_never_touches_store() {
    let store = Arc::new(FailingStore {
        calls: AtomicUsize::new(0),
    });
    let (state, _) = state_with(store.clone());
    let app = app!(state);

    let headers = [
        None,
        Some("Bearer"),
        Some("Basic YWxpY2U6c2VjcmV0"),
        Some("Bearer 11111111111111111111111111111111"),
    ];
    for header in headers {
        let mut req = test::TestRequest::get().uri("/api/deposits?page=2");
        if let Some(value) = header {
            req = req.insert_header(("Authorization", value));
        }
        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "header {:?}", header);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "error": "Unauthorized" }));
    }

    assert_eq!(store.calls.load(Ordering::SeqCst), 0);
}

#[actix_rt::test]
async fn test_store_failure_is_generic_500() {
    let store = Arc::new(FailingStore {
        calls: AtomicUsize::new(0),
    });
    let (state, credential) = state_with(store);
    let app = app!(state);

    let req = test::TestRequest::get()
        .uri("/api/deposits")
        .insert_header(("Authorization", credential))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(resp.headers().contains_key("x-request-id"));

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "error": "Internal server error" }));
}

#[actix_rt::test]
async fn test_repeated_request_is_stable() {
    let (state, credential) = state_with(Arc::new(seeded_store("alice", 12)));
    let app = app!(state);

    let mut bodies = Vec::new();
    for _ in 0..2 {
        let req = test::TestRequest::get()
            .uri("/api/deposits?page=2&limit=5")
            .insert_header(("Authorization", credential.clone()))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        bodies.push(body);
    }
    assert_eq!(bodies[0], bodies[1]);
}

#[actix_rt::test]
async fn test_probes_and_docs() {
    let (state, _) = state_with(Arc::new(MemoryDepositStore::new()));
    let app = app!(state);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/healthz").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/readyz").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["ready"], true);
    assert_eq!(body["checks"]["postgres"]["enabled"], false);

    let req = test::TestRequest::get().uri("/version").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["name"], "deposit-api");
    assert_eq!(body["record_store"], "memory");
    assert_eq!(body["session_provider"], "memory");

    let req = test::TestRequest::get().uri("/api-docs/openapi.json").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body["paths"]["/api/deposits"]["get"].is_object());
}
