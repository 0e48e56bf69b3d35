//! User and profile handlers.
//!
//! Registration is public; everything else sits behind the session gate.

use crate::{
    api::extract::{parse_id, ApiJson},
    auth::password,
    db::{Profile, ProfileChanges, User, UserChanges},
    types::{
        AppError, ProfileResponse, RegisterRequest, Result, UpdateProfileRequest,
        UpdateUserRequest, UserListResponse, UserResponse,
    },
    AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::{error, info, warn};
use utoipa::IntoParams;
use uuid::Uuid;

/// Query parameters for the user listing.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListUsersQuery {
    /// Case-insensitive substring of the user's name
    pub search: Option<String>,
}

/// Register a new user together with its profile
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid input or email already exists")
    ),
    tag = "users"
)]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>)> {
    if payload.email.trim().is_empty() || payload.password.is_empty() {
        return Err(AppError::InvalidInput(
            "Email and password are required".to_string(),
        ));
    }

    if state.db.email_exists(&payload.email).await? {
        return Err(AppError::InvalidInput("Email already exists".to_string()));
    }

    let password_hash = password::spawn_hash_password(payload.password).await?;

    let now = Utc::now().timestamp();
    let user = User {
        id: Uuid::new_v4().to_string(),
        name: payload.name,
        email: payload.email,
        password_hash,
        role: payload.role,
        created_at: now,
        updated_at: now,
    };
    state.db.create_user(&user).await?;

    let details = payload.profile.unwrap_or_default();
    let profile = Profile {
        id: Uuid::new_v4().to_string(),
        user_id: user.id.clone(),
        first_name: details.first_name,
        last_name: details.last_name,
        phone: details.phone,
    };

    // Second phase; undo the first on failure so no profile-less user remains
    if let Err(e) = state.db.create_profile(&profile).await {
        warn!(user_id = %user.id, "profile insert failed, removing user");
        if let Err(cleanup) = state.db.delete_user(&user.id).await {
            error!(user_id = %user.id, "failed to remove user after profile failure: {}", cleanup);
        }
        return Err(e);
    }

    info!(user_id = %user.id, "user registered");

    Ok((StatusCode::CREATED, Json(UserResponse::new(user, Some(profile)))))
}

/// List users with their profiles
#[utoipa::path(
    get,
    path = "/api/users",
    params(ListUsersQuery),
    responses(
        (status = 200, description = "Users", body = UserListResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "users",
    security(("bearer" = []))
)]
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<UserListResponse>> {
    let search = query.search.as_deref().filter(|s| !s.is_empty());
    let users = state.db.list_users(search).await?;

    let mut items = Vec::with_capacity(users.len());
    for user in users {
        let profile = state.db.get_profile_by_user_id(&user.id).await?;
        items.push(UserResponse::new(user, profile));
    }

    Ok(Json(UserListResponse {
        total: items.len(),
        items,
    }))
}

/// Get a user by ID
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User details", body = UserResponse),
        (status = 400, description = "Invalid ID"),
        (status = 404, description = "User not found"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "users",
    security(("bearer" = []))
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>> {
    let id = parse_id(&id)?;
    load_user(&state, &id).await.map(Json)
}

/// Partially update a user
#[utoipa::path(
    patch,
    path = "/api/users/{id}",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Invalid ID, empty password or email taken"),
        (status = 404, description = "User not found"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "users",
    security(("bearer" = []))
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<UpdateUserRequest>,
) -> Result<Json<UserResponse>> {
    let id = parse_id(&id)?;

    let current = state
        .db
        .get_user_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if let Some(email) = payload.email.as_deref() {
        if email.trim().is_empty() {
            return Err(AppError::InvalidInput("Email cannot be empty".to_string()));
        }
        if email != current.email && state.db.email_exists(email).await? {
            return Err(AppError::InvalidInput("Email already exists".to_string()));
        }
    }

    let password_hash = match payload.password {
        Some(new_password) if new_password.is_empty() => {
            return Err(AppError::InvalidInput(
                "Password cannot be empty".to_string(),
            ))
        }
        Some(new_password) => Some(password::spawn_hash_password(new_password).await?),
        None => None,
    };

    let changes = UserChanges {
        name: payload.name,
        email: payload.email,
        password_hash,
        role: payload.role,
    };

    if !state.db.update_user(&id, &changes).await? {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    info!(user_id = %id, "user updated");

    load_user(&state, &id).await.map(Json)
}

/// Partially update the profile owned by a user
#[utoipa::path(
    patch,
    path = "/api/users/{id}/profile",
    params(
        ("id" = String, Path, description = "ID of the user owning the profile")
    ),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ProfileResponse),
        (status = 400, description = "Invalid ID"),
        (status = 404, description = "Profile not found"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "users",
    security(("bearer" = []))
)]
pub async fn update_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>> {
    let id = parse_id(&id)?;

    let changes = ProfileChanges {
        first_name: payload.first_name,
        last_name: payload.last_name,
        phone: payload.phone,
    };

    if !state.db.update_profile(&id, &changes).await? {
        return Err(AppError::NotFound("Profile not found".to_string()));
    }

    let profile = state
        .db
        .get_profile_by_user_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;

    Ok(Json(profile.into()))
}

async fn load_user(state: &AppState, id: &str) -> Result<UserResponse> {
    let user = state
        .db
        .get_user_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let profile = state.db.get_profile_by_user_id(&user.id).await?;

    Ok(UserResponse::new(user, profile))
}
