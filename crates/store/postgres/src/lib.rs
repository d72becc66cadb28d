//! PostgreSQL store backend for Veridoc.
//!
//! Persists documents and notifications in `PostgreSQL` via `sqlx`, with
//! schema migrations run automatically at startup.

pub mod config;
pub mod migrations;
pub mod store;

pub use config::PostgresConfig;
pub use store::PostgresStore;
