//! # Blog Server
//!
//! Actix-web application serving the blog posts REST API.
//! The binary in `main.rs` is a thin wrapper around [`server::BlogServer`].

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod server;
pub mod state;
pub mod telemetry;

pub use config::AppConfig;
pub use server::{BlogServer, ServerError};
pub use state::AppState;
