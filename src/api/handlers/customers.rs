//! Customer account handlers. Every route sits behind the session gate.
//!
//! Customers carry their own Argon2 credentials. They cannot log in here,
//! and the hash is never returned.

use crate::{
    api::extract::{parse_id, ApiJson},
    auth::password,
    db::{Customer, CustomerChanges},
    types::{
        AppError, CreateCustomerRequest, CustomerListResponse, CustomerResponse, DeleteResponse,
        Result, UpdateCustomerRequest,
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
use tracing::info;
use utoipa::IntoParams;
use uuid::Uuid;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListCustomersQuery {
    /// Case-insensitive substring of the customer name
    pub search: Option<String>,
}

/// List customers
#[utoipa::path(
    get,
    path = "/api/customers",
    params(ListCustomersQuery),
    responses(
        (status = 200, description = "Customers", body = CustomerListResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "customers",
    security(("bearer" = []))
)]
pub async fn list_customers(
    State(state): State<AppState>,
    Query(query): Query<ListCustomersQuery>,
) -> Result<Json<CustomerListResponse>> {
    let search = query.search.as_deref().filter(|s| !s.is_empty());
    let items: Vec<CustomerResponse> = state
        .db
        .list_customers(search)
        .await?
        .into_iter()
        .map(CustomerResponse::from)
        .collect();

    Ok(Json(CustomerListResponse {
        total: items.len(),
        items,
    }))
}

/// Create a customer
#[utoipa::path(
    post,
    path = "/api/customers",
    request_body = CreateCustomerRequest,
    responses(
        (status = 201, description = "Customer created", body = CustomerResponse),
        (status = 400, description = "Invalid input or email already exists"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "customers",
    security(("bearer" = []))
)]
pub async fn create_customer(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<CustomerResponse>)> {
    if payload.email.trim().is_empty() || payload.password.is_empty() {
        return Err(AppError::InvalidInput(
            "Email and password are required".to_string(),
        ));
    }

    if state.db.customer_email_exists(&payload.email).await? {
        return Err(AppError::InvalidInput("Email already exists".to_string()));
    }

    let customer = Customer {
        id: Uuid::new_v4().to_string(),
        name: payload.name,
        email: payload.email,
        password_hash: password::spawn_hash_password(payload.password).await?,
        phone: payload.phone,
        affiliate_id: payload.affiliate_id,
        created_at: Utc::now().timestamp(),
    };
    state.db.create_customer(&customer).await?;

    info!(customer_id = %customer.id, "customer created");

    Ok((StatusCode::CREATED, Json(customer.into())))
}

/// Get a customer by ID
#[utoipa::path(
    get,
    path = "/api/customers/{id}",
    params(("id" = String, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "Customer details", body = CustomerResponse),
        (status = 400, description = "Invalid ID"),
        (status = 404, description = "Customer not found"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "customers",
    security(("bearer" = []))
)]
pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CustomerResponse>> {
    let id = parse_id(&id)?;
    load_customer(&state, &id).await.map(Json)
}

/// Partially update a customer
#[utoipa::path(
    patch,
    path = "/api/customers/{id}",
    params(("id" = String, Path, description = "Customer ID")),
    request_body = UpdateCustomerRequest,
    responses(
        (status = 200, description = "Customer updated", body = CustomerResponse),
        (status = 400, description = "Invalid ID, empty email or password, or email taken"),
        (status = 404, description = "Customer not found"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "customers",
    security(("bearer" = []))
)]
pub async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<UpdateCustomerRequest>,
) -> Result<Json<CustomerResponse>> {
    let id = parse_id(&id)?;
    let current = load_customer(&state, &id).await?;

    if let Some(email) = payload.email.as_deref() {
        if email.trim().is_empty() {
            return Err(AppError::InvalidInput("Email cannot be empty".to_string()));
        }
        if email != current.email && state.db.customer_email_exists(email).await? {
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

    let changes = CustomerChanges {
        name: payload.name,
        email: payload.email,
        password_hash,
        phone: payload.phone,
        affiliate_id: payload.affiliate_id,
    };

    if !state.db.update_customer(&id, &changes).await? {
        return Err(AppError::NotFound("Customer not found".to_string()));
    }

    info!(customer_id = %id, "customer updated");

    load_customer(&state, &id).await.map(Json)
}

/// Delete a customer
#[utoipa::path(
    delete,
    path = "/api/customers/{id}",
    params(("id" = String, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "Customer deleted", body = DeleteResponse),
        (status = 400, description = "Invalid ID"),
        (status = 404, description = "Customer not found"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "customers",
    security(("bearer" = []))
)]
pub async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>> {
    let id = parse_id(&id)?;

    if !state.db.delete_customer(&id).await? {
        return Err(AppError::NotFound("Customer not found".to_string()));
    }

    info!(customer_id = %id, "customer deleted");

    Ok(Json(DeleteResponse {
        message: "Customer deleted successfully".to_string(),
        id,
    }))
}

async fn load_customer(state: &AppState, id: &str) -> Result<CustomerResponse> {
    state
        .db
        .get_customer_by_id(id)
        .await?
        .map(CustomerResponse::from)
        .ok_or_else(|| AppError::NotFound("Customer not found".to_string()))
}
