use actix_web::{web, HttpResponse, Responder};

use crate::app_state::AppState;
use crate::config::{AuthConfig, PaginationConfig};

pub async fn openapi_json(
    state: web::Data<AppState>,
    auth: web::Data<AuthConfig>,
    pagination: web::Data<PaginationConfig>,
) -> impl Responder {
    let spec = crate::openapi::generate_openapi_spec(
        &state.service_config.version,
        &auth,
        &pagination,
    );
    HttpResponse::Ok().json(spec)
}
