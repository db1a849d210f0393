//! PostgreSQL access layer for wayfarer.
//!
//! Row models, connection pool helpers, and per-table query modules.
//! Migrations are embedded at compile time and applied on startup.

pub mod config;
pub mod models;
pub mod pool;
pub mod queries;
