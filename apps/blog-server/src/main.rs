//! # Blog API Server
//!
//! The main entry point for the Actix-web HTTP server.

use blog_server::BlogServer;
use blog_server::config::AppConfig;
use blog_server::telemetry::{TelemetryConfig, init_telemetry};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();
    let database_url = config.database_url.clone();

    tracing::info!(
        "Starting Blog API Server on {}:{}",
        config.host,
        config.port
    );

    let server = BlogServer::new(config);
    let addr = server.run_server(&database_url).await?;
    tracing::info!("Listening on http://{}", addr);

    actix_rt::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");

    server.close_server().await?;
    Ok(())
}
