mod config;
mod error;
mod logging;
mod models;
mod rest;

use config::CONFIG;
use tracing::info;

#[tokio::main]
pub async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_tracing(CONFIG.log_filter(), CONFIG.trace_stdout());
    info!(
        version = env!("CARGO_PKG_VERSION"),
        core = fieldlab_core::CORE_VERSION,
        "Starting fieldlab"
    );

    let conn =
        models::establish_db_connection(CONFIG.database_url(), CONFIG.db_max_connections())
            .await?;
    models::migrate(&conn).await?;
    info!("Database migrated");

    let routes = rest::routes(conn.clone(), CONFIG.body_limit_bytes());
    let (addr, server) = warp::serve(routes)
        .try_bind_with_graceful_shutdown(CONFIG.server_addr(), async {
            tokio::signal::ctrl_c().await.ok();
            info!("Received SIGINT, shutting down");
        })?;
    info!(%addr, "Listening");

    server.await;
    conn.close().await;
    opentelemetry::global::shutdown_tracer_provider();
    Ok(())
}
