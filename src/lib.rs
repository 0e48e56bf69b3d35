//! # Storegate
//!
//! A REST backend over users and profiles, built around a signed-session
//! authentication core.
//!
//! ## Overview
//!
//! Storegate can be used in two ways:
//!
//! 1. **As a standalone server** - Run the `storegate-server` binary
//! 2. **As a library** - Build the router yourself from an [`AppState`]
//!
//! ### Basic Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use storegate::{api::routes::build_app, auth::jwt::AuthService, db::TursoClient};
//! use storegate::{AppState, StoregateConfig};
//!
//! let state = AppState {
//!     config: Arc::new(StoregateConfig::default()),
//!     db: Arc::new(TursoClient::new_memory().await?),
//!     auth_service: Arc::new(AuthService::new(secret, 24 * 3600)),
//! };
//! let app = build_app(state);
//! ```
//!
//! ## Modules
//!
//! - [`api`] - REST API handlers and routes
//! - [`auth`] - Password hashing, session tokens, session registry, middleware
//! - [`cli`] - Command-line interface
//! - [`db`] - Credential store and session registry (libsql)
//! - [`types`] - Request/response types and error handling
//! - [`utils`] - TOML configuration

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

/// HTTP API handlers and routes.
pub mod api;
/// Session authentication and middleware.
pub mod auth;
/// Command-line interface.
pub mod cli;
/// Database clients (libsql/SQLite).
pub mod db;
/// Core types (requests, responses, errors).
pub mod types;
/// Configuration utilities (TOML).
pub mod utils;

// Re-export commonly used types
pub use db::{DatabaseClient, TursoClient};
pub use types::{AppError, Result};
pub use utils::toml_config::{ConfigError, StoregateConfig};

use crate::auth::jwt::AuthService;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Configuration loaded at startup; never reloaded
    pub config: Arc<StoregateConfig>,
    /// Credential store and session registry
    pub db: Arc<dyn DatabaseClient>,
    /// Session token issuer/verifier holding the signing secret
    pub auth_service: Arc<AuthService>,
}
