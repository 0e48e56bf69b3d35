//! Authentication and session lifecycle.
//!
//! This module covers credential verification, signed-session issuance,
//! session registry bookkeeping and the gate applied to protected routes.
//!
//! # Module Structure
//!
//! - [`auth::password`](crate::auth::password) - Argon2id hashing and verification
//! - [`auth::jwt`](crate::auth::jwt) - Session token issuing and verification
//! - [`auth::session`](crate::auth::session) - Session registry record/revoke
//! - [`auth::middleware`](crate::auth::middleware) - Bearer parsing, Axum layer and extractor
//!
//! # Session Lifecycle
//!
//! 1. `POST /api/auth/login` verifies the password, issues an HS256 token
//!    (`sub` = email, `exp` = now + TTL, `jti` = email) and records its
//!    SHA-256 digest in the registry.
//! 2. Protected routes run [`middleware::auth_middleware`], which checks
//!    algorithm, signature and expiry, and, when
//!    `auth.enforce_revocation` is on, that the token is still registered.
//! 3. `POST /api/auth/logout` checks algorithm and signature (not expiry)
//!    and deletes the registry rows for that token.
//!
//! ## Extracting Claims in Handlers
//!
//! ```ignore
//! async fn protected_handler(AuthUser(claims): AuthUser) -> impl IntoResponse {
//!     format!("Hello, {}!", claims.sub)
//! }
//! ```
//!
//! # Configuration
//!
//! Configure via `storegate.toml`:
//! ```toml
//! [auth]
//! jwt_secret_env = "JWT_SECRET"   # env var holding the signing secret
//! token_ttl_hours = 24
//! enforce_revocation = true
//! ```

/// Session token issuing and verification.
pub mod jwt;
/// Authentication middleware and extractors for protected routes.
pub mod middleware;
/// Password hashing.
pub mod password;
/// Session registry record and revoke operations.
pub mod session;
