//! HTTP API Handlers and Routes
//!
//! This module provides the REST API layer for Storegate, built on the Axum web framework.
//!
//! # Module Structure
//!
//! - [`api::handlers`](crate::api::handlers) - Request handlers for each endpoint
//! - [`api::routes`](crate::api::routes) - Route definitions and router configuration
//! - [`api::openapi`](crate::api::openapi) - OpenAPI document
//!
//! # API Endpoints
//!
//! ## Authentication (`/api/auth`)
//! - `POST /api/auth/login` - Exchange email + password for a session token and profile
//! - `POST /api/auth/logout` - Revoke the presented session token
//! - `GET /api/auth/session` - Claims of the presented token
//!
//! ## Users (`/api/users`)
//! - `POST /api/users` - Register a user and its profile (public)
//! - `GET /api/users` - List users, `?search=` filters by name
//! - `GET /api/users/{id}` - Get one user with profile
//! - `PATCH /api/users/{id}` - Partially update a user
//! - `PATCH /api/users/{id}/profile` - Partially update a user's profile
//!
//! ## Health (`/api/health`)
//! - `GET /api/health` - Health check endpoint
//!
//! # Authentication
//!
//! Protected endpoints require a valid session token in the `Authorization` header:
//! ```text
//! Authorization: Bearer <token>
//! ```
//! Any verification failure on them answers 401 `{"error": "unauthorized"}`.

/// JSON extractor and path helpers.
pub mod extract;
/// Request and response handlers for all API endpoints.
pub mod handlers;
/// OpenAPI document.
pub mod openapi;
/// Router configuration and route definitions.
pub mod routes;
