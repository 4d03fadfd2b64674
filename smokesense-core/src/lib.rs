//! # smokesense-core
//!
//! Core library for smokesense - a smoking-reduction companion.
//!
//! This library provides:
//! - Domain types for logs and profiles
//! - The analytics engine (bucketing, breakdowns, projections, recovery,
//!   archetypes and the views built on them)
//! - Static craving-shield rituals and daily quotes
//! - Database storage layer with SQLite
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Example
//!
//! ```rust,no_run
//! use smokesense_core::analytics::AnalyticsSnapshot;
//! use smokesense_core::{Config, Database, LogFilter};
//!
//! let config = Config::load().expect("failed to load config");
//! let db = Database::open(&Config::database_path()).expect("failed to open database");
//! db.migrate().expect("failed to run migrations");
//!
//! let user = &config.user.id;
//! let logs = db.list_logs(user, &LogFilter::default()).expect("failed to read logs");
//! let profile = db.get_profile(user).expect("failed to read profile");
//! let now = chrono::Local::now();
//! let snapshot = AnalyticsSnapshot::compute(&logs, profile.as_ref(), &config.analytics, &now);
//! println!("{}", snapshot.dashboard.greeting);
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use db::{Database, LogChange, LogFilter};
pub use error::{Error, Result};
pub use types::*;

// Public modules
pub mod analytics;
pub mod config;
pub mod db;
pub mod error;
pub mod format;
pub mod logging;
pub mod types;
pub mod wellness;
