//! Server lifecycle - start and stop the HTTP server around a post store.

use std::net::SocketAddr;

use actix_web::dev::ServerHandle;
use actix_web::{App, HttpServer, web};
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing_actix_web::TracingLogger;

use blog_core::error::RepoError;

use crate::config::AppConfig;
use crate::handlers;
use crate::observability::RequestIdMiddleware;
use crate::state::AppState;

/// Server lifecycle errors.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Server is already running on {0}")]
    AlreadyRunning(SocketAddr),

    #[error("Post store unavailable: {0}")]
    Store(#[from] RepoError),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}

struct RunningServer {
    addr: SocketAddr,
    handle: ServerHandle,
    task: JoinHandle<std::io::Result<()>>,
    state: AppState,
}

/// HTTP server that can be started and stopped repeatedly.
///
/// Must be driven from an actix runtime (`#[actix_web::main]` or
/// `#[actix_web::test]`), which polls the spawned server task.
pub struct BlogServer {
    config: AppConfig,
    running: Mutex<Option<RunningServer>>,
}

impl BlogServer {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            running: Mutex::new(None),
        }
    }

    /// Open the store for `database_url`, bind the routes and start listening.
    ///
    /// Returns the bound address, which differs from the configured one when
    /// the configured port is 0.
    pub async fn run_server(&self, database_url: &str) -> Result<SocketAddr, ServerError> {
        let mut running = self.running.lock().await;
        if let Some(server) = running.as_ref() {
            return Err(ServerError::AlreadyRunning(server.addr));
        }

        let state = AppState::connect(&self.config.database_config(database_url)).await?;

        let data = web::Data::new(state.clone());
        let mut http = HttpServer::new(move || {
            App::new()
                .wrap(TracingLogger::default())
                .wrap(RequestIdMiddleware)
                .app_data(data.clone())
                .configure(handlers::configure_routes)
        })
        .disable_signals();

        if let Some(workers) = self.config.workers {
            http = http.workers(workers);
        }

        let http = match http.bind((self.config.host.as_str(), self.config.port)) {
            Ok(http) => http,
            Err(source) => {
                release(state).await;
                return Err(ServerError::Bind {
                    addr: format!("{}:{}", self.config.host, self.config.port),
                    source,
                });
            }
        };

        let Some(addr) = http.addrs().first().copied() else {
            drop(http);
            release(state).await;
            return Err(ServerError::Bind {
                addr: format!("{}:{}", self.config.host, self.config.port),
                source: std::io::Error::new(
                    std::io::ErrorKind::AddrNotAvailable,
                    "no listening address",
                ),
            });
        };

        let server = http.run();
        let handle = server.handle();
        let task = actix_rt::spawn(server);

        tracing::info!(%addr, "Blog API server started");

        *running = Some(RunningServer {
            addr,
            handle,
            task,
            state,
        });

        Ok(addr)
    }

    /// Stop listening, wait for in-flight requests, then release the store.
    ///
    /// Does nothing when the server is not running.
    pub async fn close_server(&self) -> Result<(), ServerError> {
        // Held through shutdown; run_server waits on it.
        let mut running = self.running.lock().await;
        let Some(server) = running.take() else {
            tracing::debug!("close_server called while not running");
            return Ok(());
        };

        server.handle.stop(true).await;
        match server.task.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!("Server exited with error: {}", e),
            Err(e) => tracing::warn!("Server task failed: {}", e),
        }

        server.state.close().await?;
        tracing::info!(addr = %server.addr, "Blog API server stopped");
        Ok(())
    }

    /// Address the server is listening on, if running.
    pub async fn local_addr(&self) -> Option<SocketAddr> {
        self.running.lock().await.as_ref().map(|s| s.addr)
    }
}

async fn release(state: AppState) {
    if let Err(e) = state.close().await {
        tracing::warn!("Failed to release post store: {}", e);
    }
}
