//! Session registry bookkeeping.
//!
//! The registry records a digest of every issued token so logout can revoke
//! it. Rows are keyed by their own UUID; the digest column is not unique.
//! Rows whose token has expired are pruned whenever a new token is recorded.

use crate::auth::jwt::{AuthService, IssuedToken};
use crate::db::DatabaseClient;
use crate::types::{AppError, Result};
use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

/// Persist a freshly issued token. Inserting the same token twice adds two rows.
pub async fn record(db: &dyn DatabaseClient, auth: &AuthService, issued: &IssuedToken) -> Result<()> {
    let pruned = db
        .delete_expired_session_tokens(Utc::now().timestamp())
        .await?;
    if pruned > 0 {
        debug!(pruned, "removed expired session tokens");
    }

    let token_hash = auth.hash_token(&issued.token);
    let id = Uuid::new_v4().to_string();

    db.insert_session_token(&id, &token_hash, issued.claims.exp as i64)
        .await
}

/// Remove every registry row holding `token`.
///
/// Fails with `NotFound` when nothing matched, so revoking the same token
/// twice reports NotFound the second time.
pub async fn revoke(db: &dyn DatabaseClient, auth: &AuthService, token: &str) -> Result<()> {
    let removed = db.delete_session_tokens(&auth.hash_token(token)).await?;

    if removed == 0 {
        return Err(AppError::NotFound("Token not found".to_string()));
    }

    Ok(())
}

/// Whether `token` is still present in the registry.
pub async fn is_registered(db: &dyn DatabaseClient, auth: &AuthService, token: &str) -> Result<bool> {
    db.session_token_exists(&auth.hash_token(token)).await
}
