use crate::db::{Customer, Product, Profile, User};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ============= Authentication Types =============

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub profile: ProfileResponse,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LogoutResponse {
    pub message: String,
}

/// Verified claims of the token presented to `GET /api/auth/session`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionResponse {
    pub email: String,
    /// Unix timestamp (seconds) after which the token is rejected
    pub expires_at: usize,
    pub token_id: String,
}

/// Claims carried inside a signed session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the email the token was issued to
    pub sub: String,
    pub exp: usize,
    pub iat: usize,
    /// Token identifier; set to the subject email
    pub jti: String,
}

// ============= User / Profile Types =============

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct NewProfile {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub profile: Option<NewProfile>,
}

/// Partial update of an identity.
///
/// A missing (or `null`) field leaves the stored value untouched; any
/// string, including `""`, replaces it.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Partial update of a profile, same field semantics as [`UpdateUserRequest`].
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    pub id: String,
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

impl From<Profile> for ProfileResponse {
    fn from(p: Profile) -> Self {
        Self {
            id: p.id,
            user_id: p.user_id,
            first_name: p.first_name,
            last_name: p.last_name,
            phone: p.phone,
        }
    }
}

/// Identity as exposed over the API. The password hash never leaves the store layer.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub profile: Option<ProfileResponse>,
}

impl UserResponse {
    pub fn new(user: User, profile: Option<Profile>) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            profile: profile.map(ProfileResponse::from),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserListResponse {
    pub items: Vec<UserResponse>,
    pub total: usize,
}

// ============= Product Types =============

/// Body of product create and replace requests.
///
/// Replace is a full overwrite: omitted text fields become `""`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductRequest {
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    pub category: String,
    pub image: String,
    pub description: String,
    pub price: f64,
}

impl From<Product> for ProductResponse {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            name: p.name,
            category: p.category,
            image: p.image,
            description: p.description,
            price: p.price,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductListResponse {
    pub items: Vec<ProductResponse>,
    pub total: usize,
}

// ============= Customer Types =============

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateCustomerRequest {
    #[serde(default)]
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub affiliate_id: String,
}

/// Partial update of a customer, same field semantics as [`UpdateUserRequest`].
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateCustomerRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub affiliate_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CustomerResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub affiliate_id: String,
}

impl From<Customer> for CustomerResponse {
    fn from(c: Customer) -> Self {
        Self {
            id: c.id,
            name: c.name,
            email: c.email,
            phone: c.phone,
            affiliate_id: c.affiliate_id,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CustomerListResponse {
    pub items: Vec<CustomerResponse>,
    pub total: usize,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteResponse {
    pub message: String,
    pub id: String,
}

// ============= Error Types =============

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::Database(msg) | AppError::Internal(msg) => {
                // Store and hashing faults stay in the logs, never in the body.
                tracing::error!(error = %msg, "request failed with internal fault");
                (
                    axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Auth(msg) => (axum::http::StatusCode::UNAUTHORIZED, msg),
            AppError::NotFound(msg) => (axum::http::StatusCode::NOT_FOUND, msg),
            AppError::InvalidInput(msg) => (axum::http::StatusCode::BAD_REQUEST, msg),
        };

        let body = serde_json::json!({
            "error": message
        });

        (status, axum::Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, response::IntoResponse};

    #[test]
    fn test_error_status_codes() {
        let cases = [
            (AppError::Database("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (AppError::Auth("x".into()), StatusCode::UNAUTHORIZED),
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (AppError::InvalidInput("x".into()), StatusCode::BAD_REQUEST),
            (AppError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_update_request_distinguishes_absent_from_empty() {
        let patch: UpdateUserRequest =
            serde_json::from_str(r#"{"name": "", "role": null}"#).expect("should parse");

        assert_eq!(patch.name.as_deref(), Some(""));
        assert!(patch.email.is_none());
        assert!(patch.password.is_none());
        assert!(patch.role.is_none());
    }

    #[test]
    fn test_product_request_requires_price() {
        let missing: std::result::Result<ProductRequest, _> =
            serde_json::from_str(r#"{"name": "Lamp"}"#);
        assert!(missing.is_err());

        let req: ProductRequest =
            serde_json::from_str(r#"{"name": "Lamp", "price": 19.5}"#).expect("should parse");
        assert_eq!(req.category, "");
        assert_eq!(req.price, 19.5);
    }

    #[test]
    fn test_customer_response_has_no_password_field() {
        let customer = Customer {
            id: "c1".into(),
            name: "Ana".into(),
            email: "ana@x.com".into(),
            password_hash: "$argon2id$secret".into(),
            phone: String::new(),
            affiliate_id: String::new(),
            created_at: 0,
        };

        let body = serde_json::to_value(CustomerResponse::from(customer)).expect("serialize");
        assert!(body.get("password_hash").is_none());
        assert!(!body.to_string().contains("argon2"));
    }

    #[test]
    fn test_register_request_defaults() {
        let req: RegisterRequest = serde_json::from_str(
            r#"{"name": "A", "email": "a@x.com", "password": "Secret1"}"#,
        )
        .expect("should parse");

        assert_eq!(req.role, "");
        assert!(req.profile.is_none());
    }
}
