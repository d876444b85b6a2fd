//! # Blog Infrastructure
//!
//! Concrete implementations of the store port defined in `blog-core`.
//!
//! ## Feature Flags
//!
//! - `postgres` (default) - PostgreSQL store via SeaORM. Without it only the
//!   in-memory store is built and SeaORM is not linked.

pub mod database;

pub use database::{DatabaseConfig, InMemoryPostRepository, StoreKind};

#[cfg(feature = "postgres")]
pub use database::{DatabaseConnections, PostgresPostRepository};
