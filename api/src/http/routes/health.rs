/// Health check routes

use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use serde::Serialize;
use std::collections::HashMap;

use crate::app_state::AppState;
use crate::infra::{postgres, redis};

#[derive(Serialize)]
struct HealthResponse {
    status: String,
}

#[derive(Serialize)]
struct ReadyResponse {
    ready: bool,
    checks: HashMap<String, CheckResult>,
}

#[derive(Serialize)]
struct CheckResult {
    enabled: bool,
    ok: bool,
    details: String,
}

impl CheckResult {
    fn disabled() -> Self {
        Self {
            enabled: false,
            ok: true,
            details: "disabled".to_string(),
        }
    }

    fn from_probe(result: Result<(), String>) -> Self {
        match result {
            Ok(()) => Self {
                enabled: true,
                ok: true,
                details: "healthy".to_string(),
            },
            Err(e) => Self {
                enabled: true,
                ok: false,
                details: e,
            },
        }
    }
}

pub async fn healthz() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
    })
}

pub async fn readyz(state: web::Data<AppState>) -> impl Responder {
    let mut checks = HashMap::new();

    let postgres_check = match state.postgres {
        Some(ref pool) => CheckResult::from_probe(postgres::check_postgres_health(pool).await),
        None => CheckResult::disabled(),
    };
    checks.insert("postgres".to_string(), postgres_check);

    let redis_check = match state.redis.clone() {
        Some(mut conn) => CheckResult::from_probe(redis::check_redis_health(&mut conn).await),
        None => CheckResult::disabled(),
    };
    checks.insert("redis".to_string(), redis_check);

    let ready = checks.values().all(|c| c.ok);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    HttpResponse::build(status).json(ReadyResponse { ready, checks })
}
