//! Database clients.
//!
//! This module provides the persistence layer for:
//! - **Credential store**: identities (`users`) and their profiles (`profiles`)
//! - **Session registry**: digests of issued session tokens (`session_tokens`)
//! - **Gated records**: `products` and `customers`, reachable only with a session
//!
//! Both are backed by the same libsql (SQLite) database through
//! [`TursoClient`]. Handlers only see the [`DatabaseClient`] trait, normally
//! wrapped in a [`DeadlineClient`] so every call is time-bounded.

pub mod deadline;
pub mod traits;
pub mod turso;

// Re-exports
pub use deadline::DeadlineClient;
pub use traits::{CustomerChanges, DatabaseClient, DatabaseProvider, ProfileChanges, UserChanges};
pub use turso::{Customer, Product, Profile, TursoClient, User};
