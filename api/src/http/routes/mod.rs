/// Route modules

pub mod deposits;
pub mod health;
pub mod openapi_routes;
pub mod version;

use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/healthz", web::get().to(health::healthz))
        .route("/readyz", web::get().to(health::readyz))
        .route("/version", web::get().to(version::version))
        .service(
            web::scope("/api-docs")
                .route("/openapi.json", web::get().to(openapi_routes::openapi_json)),
        )
        .service(
            web::scope("/api").service(
                web::scope("/deposits").route("", web::get().to(deposits::list_deposits)),
            ),
        );
}
