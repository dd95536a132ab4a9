/// Version route
///
/// Reports the build and which record/session backends this instance serves from.
use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;

use crate::app_state::AppState;

#[derive(Serialize)]
struct VersionResponse<'a> {
    name: &'a str,
    version: &'a str,
    record_store: &'static str,
    session_provider: &'static str,
}

pub async fn version(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(VersionResponse {
        name: &state.service_config.name,
        version: &state.service_config.version,
        record_store: state.record_backend,
        session_provider: state.session_backend,
    })
}
