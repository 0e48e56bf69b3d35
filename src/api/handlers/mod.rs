//! API request handlers.
//!
//! This module contains all HTTP request handlers organized by functionality.

/// Authentication handlers (login, logout, session).
pub mod auth;
/// User registration, lookup and update handlers.
pub mod users;
/// Product catalogue handlers.
pub mod products;
pub mod customers;
