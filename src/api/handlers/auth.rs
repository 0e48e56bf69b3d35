use crate::{
    api::extract::ApiJson,
    auth::{
        middleware::{bearer_token, AuthUser},
        password, session,
    },
    types::{AppError, LoginRequest, LoginResponse, LogoutResponse, Result, SessionResponse},
    AppState,
};
use axum::{extract::State, http::HeaderMap, Json};
use tracing::{info, warn};

/// Login with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Invalid request body"),
        (status = 401, description = "Passwords do not match"),
        (status = 404, description = "User or profile not found")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    // Get user
    let user = state
        .db
        .get_user_by_email(&payload.email)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    // Verify password
    let matches =
        password::spawn_verify_password(payload.password, user.password_hash.clone()).await?;
    if !matches {
        warn!(user_id = %user.id, "login rejected: password mismatch");
        return Err(AppError::Auth("Passwords do not match".to_string()));
    }

    // A user without a profile should not exist, but registration is not atomic
    let profile = state
        .db
        .get_profile_by_user_id(&user.id)
        .await?
        .ok_or_else(|| {
            warn!(user_id = %user.id, "login rejected: user has no profile");
            AppError::NotFound("Profile not found".to_string())
        })?;

    let issued = state.auth_service.issue_token(&user.email)?;

    // Store token for revocation
    session::record(state.db.as_ref(), &state.auth_service, &issued).await?;

    info!(user_id = %user.id, "login successful");

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token: issued.token,
        profile: profile.into(),
    }))
}

/// Revoke the presented session token
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Logout successful", body = LogoutResponse),
        (status = 400, description = "Invalid authorization header"),
        (status = 401, description = "Invalid token"),
        (status = 404, description = "Token not found")
    ),
    tag = "auth",
    security(("bearer" = []))
)]
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<LogoutResponse>> {
    let token = bearer_token(&headers)?;

    // Signature and algorithm only: an expired token can still be cleared out
    let claims = state.auth_service.verify_signature(token)?;

    session::revoke(state.db.as_ref(), &state.auth_service, token).await?;

    info!(email = %claims.sub, "logout successful");

    Ok(Json(LogoutResponse {
        message: "Logout successful".to_string(),
    }))
}

/// Describe the session the presented token belongs to
#[utoipa::path(
    get,
    path = "/api/auth/session",
    responses(
        (status = 200, description = "Session is valid", body = SessionResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "auth",
    security(("bearer" = []))
)]
pub async fn current_session(AuthUser(claims): AuthUser) -> Json<SessionResponse> {
    Json(SessionResponse {
        email: claims.sub,
        expires_at: claims.exp,
        token_id: claims.jti,
    })
}
