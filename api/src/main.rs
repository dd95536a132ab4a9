use deposit_api::app_state::AppState;
use deposit_api::config::load_config;
use deposit_api::http;
use deposit_api::infra::{postgres, redis};
use deposit_api::telemetry::init_telemetry;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if exists
    let _ = dotenvy::dotenv();

    let config = load_config()?;

    init_telemetry(&config.telemetry);

    tracing::info!("Initializing integrations...");

    let pg_pool = postgres::init_postgres(&config.integrations, &config.db).await;
    let redis_conn = redis::init_redis(&config.integrations).await;

    let app_state = AppState::from_integrations(&config, pg_pool.clone(), redis_conn)?;

    let server = http::start_server(config, app_state);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!(error = %e, "Server error");
                return Err(e.into());
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    if let Some(pool) = pg_pool {
        tracing::info!("Closing PostgreSQL connection pool");
        pool.close().await;
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
