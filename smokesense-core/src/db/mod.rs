//! Database layer for smokesense
//!
//! This module provides the storage layer using SQLite with:
//! - Schema migrations
//! - Repository pattern for logs and profiles
//! - Change notifications for recomputing views

pub mod repo;
pub mod schema;

pub use repo::{Database, LogChange, LogFilter};
