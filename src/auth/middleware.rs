use crate::auth::session;
use crate::types::{AppError, Claims, Result};
use crate::AppState;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::debug;

const BEARER_PREFIX: &str = "Bearer ";

/// Extract the token from an `Authorization: Bearer <token>` header.
///
/// An absent header, a different scheme or an empty token is a client error.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::InvalidInput("Invalid authorization header".to_string()))
}

fn unauthorized() -> AppError {
    AppError::Auth("unauthorized".to_string())
}

/// Run the full verification gate over a request's headers.
///
/// Every rejection collapses into a generic 401. Store faults during the
/// registry check stay 500.
pub async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<Claims> {
    let token = bearer_token(headers).map_err(|_| unauthorized())?;

    let claims = state.auth_service.verify_token(token).map_err(|e| {
        debug!("rejected session token: {}", e);
        unauthorized()
    })?;

    if state.config.auth.enforce_revocation
        && !session::is_registered(state.db.as_ref(), &state.auth_service, token).await?
    {
        debug!(email = %claims.sub, "rejected revoked session token");
        return Err(unauthorized());
    }

    Ok(claims)
}

pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> std::result::Result<Response, AppError> {
    let claims = authenticate(&state, req.headers()).await?;

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

// Extractor for claims
pub struct AuthUser(pub Claims);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(unauthorized)
    }
}
