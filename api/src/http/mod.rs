/// HTTP server module

pub mod middleware;
pub mod routes;

use actix_cors::Cors;
use actix_web::{http, web, App, HttpServer};
use std::io;

use crate::app_state::AppState;
use crate::config::{Config, SecurityConfig};
use middleware::{logger::OutcomeLogger, request_id::RequestId};

fn build_cors(config: &SecurityConfig) -> Cors {
    let mut cors = Cors::default();
    for origin in &config.cors_allowed_origins {
        if origin == "*" {
            cors = cors.allow_any_origin();
            break;
        }
        cors = cors.allowed_origin(origin);
    }

    let methods: Vec<http::Method> = config
        .cors_allowed_methods
        .iter()
        .filter_map(|m| m.parse::<http::Method>().ok())
        .collect();
    cors = cors.allowed_methods(methods);

    if config.cors_allowed_headers.iter().any(|h| h == "*") {
        cors.allow_any_header()
    } else {
        cors.allowed_headers(
            config
                .cors_allowed_headers
                .iter()
                .filter_map(|h| h.parse::<http::header::HeaderName>().ok())
                .collect::<Vec<_>>(),
        )
    }
}

pub async fn start_server(config: Config, app_state: AppState) -> io::Result<()> {
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);

    tracing::info!(
        service_name = %config.service.name,
        service_version = %config.service.version,
        bind_addr = %bind_addr,
        record_store = %config.store.records,
        session_provider = %config.store.sessions,
        log_level = %config.telemetry.log_level,
        log_format = %config.telemetry.log_format,
        "Starting HTTP server"
    );

    let app_state = web::Data::new(app_state);
    let auth_config = web::Data::new(config.auth.clone());
    let pagination_config = web::Data::new(config.pagination.clone());
    let request_id_header = config.telemetry.request_id_header.clone();
    let security = config.security.clone();
    let body_limit = config.server.request_body_limit_bytes;

    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .app_data(auth_config.clone())
            .app_data(pagination_config.clone())
            .app_data(web::PayloadConfig::new(body_limit))
            .wrap(build_cors(&security))
            .wrap(OutcomeLogger)
            .wrap(RequestId::new(request_id_header.clone()))
            .configure(routes::configure)
    });

    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server.bind(&bind_addr)?.run().await
}
