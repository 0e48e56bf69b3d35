//! Database abstraction traits
//!
//! This module provides the `DatabaseClient` trait that abstracts over the
//! credential store (identities and profiles), the session registry
//! (issued token digests) and the gated business records (products and
//! customers). All of them live in the same backing database.
//!
//! # Example
//!
//! ```rust,ignore
//! use storegate::db::DatabaseProvider;
//!
//! // Use in-memory database (default for development/testing)
//! let db = DatabaseProvider::Memory.create_client().await?;
//!
//! // Use file-based SQLite
//! let db = DatabaseProvider::SQLite { path: "data.db".into() }.create_client().await?;
//! ```

use crate::types::Result;
use async_trait::async_trait;

/// User record from the database
pub use super::turso::User;

/// Profile record from the database
pub use super::turso::Profile;

/// Product record from the database
pub use super::turso::Product;

/// Customer record from the database
pub use super::turso::Customer;

/// Database provider configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DatabaseProvider {
    /// In-memory SQLite database (ephemeral, lost on restart)
    #[default]
    Memory,
    /// File-based SQLite database
    SQLite {
        /// Path to the SQLite database file
        path: String,
    },
}

impl DatabaseProvider {
    /// Create a database client from this provider configuration
    pub async fn create_client(&self) -> Result<Box<dyn DatabaseClient>> {
        match self {
            DatabaseProvider::Memory => {
                let client = super::turso::TursoClient::new_memory().await?;
                Ok(Box::new(client))
            }
            DatabaseProvider::SQLite { path } => {
                let client = super::turso::TursoClient::new_local(path).await?;
                Ok(Box::new(client))
            }
        }
    }

    /// Pick a provider from a configured database URL (`:memory:` or a file path)
    pub fn from_url(url: &str) -> Self {
        if url.is_empty() || url == ":memory:" {
            DatabaseProvider::Memory
        } else {
            DatabaseProvider::SQLite {
                path: url.to_string(),
            }
        }
    }
}

/// Fields of an identity to overwrite; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<String>,
}

/// Fields of a profile to overwrite; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
}

/// Fields of a customer to overwrite; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct CustomerChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub phone: Option<String>,
    pub affiliate_id: Option<String>,
}

/// Abstract trait for database operations
///
/// Every call is a single statement against the store; there are no
/// transactions spanning calls. Multi-step flows (registration, login)
/// sequence these calls themselves.
#[async_trait]
pub trait DatabaseClient: Send + Sync {
    // ============== User Operations ==============

    /// Insert a new identity. A duplicate email fails with `InvalidInput`.
    async fn create_user(&self, user: &User) -> Result<()>;

    /// Check whether an identity with this exact email exists
    async fn email_exists(&self, email: &str) -> Result<bool>;

    /// Get a user by email (case-sensitive)
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Get a user by ID
    async fn get_user_by_id(&self, id: &str) -> Result<Option<User>>;

    /// List users, optionally filtered by a case-insensitive name substring
    async fn list_users(&self, search: Option<&str>) -> Result<Vec<User>>;

    /// Apply changes to a user; returns false when no such user exists
    async fn update_user(&self, id: &str, changes: &UserChanges) -> Result<bool>;

    /// Delete a user and its profile; returns false when no such user exists
    async fn delete_user(&self, id: &str) -> Result<bool>;

    // ============== Profile Operations ==============

    /// Insert the profile belonging to a user
    async fn create_profile(&self, profile: &Profile) -> Result<()>;

    /// Get the profile owned by a user
    async fn get_profile_by_user_id(&self, user_id: &str) -> Result<Option<Profile>>;

    /// Apply changes to a user's profile; returns false when it has none
    async fn update_profile(&self, user_id: &str, changes: &ProfileChanges) -> Result<bool>;

    // ============== Session Registry Operations ==============

    /// Record an issued token digest. Duplicates are allowed.
    async fn insert_session_token(&self, id: &str, token_hash: &str, expires_at: i64)
        -> Result<()>;

    /// Check whether at least one row holds this token digest
    async fn session_token_exists(&self, token_hash: &str) -> Result<bool>;

    /// Delete every row holding this token digest; returns the number removed
    async fn delete_session_tokens(&self, token_hash: &str) -> Result<u64>;

    /// Delete rows whose token expired before `now` (unix seconds)
    async fn delete_expired_session_tokens(&self, now: i64) -> Result<u64>;

    // ============== Product Operations ==============

    async fn create_product(&self, product: &Product) -> Result<()>;

    async fn get_product_by_id(&self, id: &str) -> Result<Option<Product>>;

    /// List products, optionally filtered by a case-insensitive name substring
    async fn list_products(&self, search: Option<&str>) -> Result<Vec<Product>>;

    /// Overwrite a product's editable fields; returns false when no such product exists
    async fn replace_product(&self, product: &Product) -> Result<bool>;

    async fn delete_product(&self, id: &str) -> Result<bool>;

    // ============== Customer Operations ==============

    /// Insert a customer. A duplicate email fails with `InvalidInput`.
    async fn create_customer(&self, customer: &Customer) -> Result<()>;

    async fn customer_email_exists(&self, email: &str) -> Result<bool>;

    async fn get_customer_by_id(&self, id: &str) -> Result<Option<Customer>>;

    /// List customers, optionally filtered by a case-insensitive name substring
    async fn list_customers(&self, search: Option<&str>) -> Result<Vec<Customer>>;

    /// Apply changes to a customer; returns false when no such customer exists
    async fn update_customer(&self, id: &str, changes: &CustomerChanges) -> Result<bool>;

    async fn delete_customer(&self, id: &str) -> Result<bool>;
}

// ============== Implement DatabaseClient for TursoClient ==============

#[async_trait]
impl DatabaseClient for super::turso::TursoClient {
    async fn create_user(&self, user: &User) -> Result<()> {
        super::turso::TursoClient::create_user(self, user).await
    }

    async fn email_exists(&self, email: &str) -> Result<bool> {
        super::turso::TursoClient::email_exists(self, email).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        super::turso::TursoClient::get_user_by_email(self, email).await
    }

    async fn get_user_by_id(&self, id: &str) -> Result<Option<User>> {
        super::turso::TursoClient::get_user_by_id(self, id).await
    }

    async fn list_users(&self, search: Option<&str>) -> Result<Vec<User>> {
        super::turso::TursoClient::list_users(self, search).await
    }

    async fn update_user(&self, id: &str, changes: &UserChanges) -> Result<bool> {
        super::turso::TursoClient::update_user(self, id, changes).await
    }

    async fn delete_user(&self, id: &str) -> Result<bool> {
        super::turso::TursoClient::delete_user(self, id).await
    }

    async fn create_profile(&self, profile: &Profile) -> Result<()> {
        super::turso::TursoClient::create_profile(self, profile).await
    }

    async fn get_profile_by_user_id(&self, user_id: &str) -> Result<Option<Profile>> {
        super::turso::TursoClient::get_profile_by_user_id(self, user_id).await
    }

    async fn update_profile(&self, user_id: &str, changes: &ProfileChanges) -> Result<bool> {
        super::turso::TursoClient::update_profile(self, user_id, changes).await
    }

    async fn insert_session_token(
        &self,
        id: &str,
        token_hash: &str,
        expires_at: i64,
    ) -> Result<()> {
        super::turso::TursoClient::insert_session_token(self, id, token_hash, expires_at).await
    }

    async fn session_token_exists(&self, token_hash: &str) -> Result<bool> {
        super::turso::TursoClient::session_token_exists(self, token_hash).await
    }

    async fn delete_session_tokens(&self, token_hash: &str) -> Result<u64> {
        super::turso::TursoClient::delete_session_tokens(self, token_hash).await
    }

    async fn delete_expired_session_tokens(&self, now: i64) -> Result<u64> {
        super::turso::TursoClient::delete_expired_session_tokens(self, now).await
    }

    async fn create_product(&self, product: &Product) -> Result<()> {
        super::turso::TursoClient::create_product(self, product).await
    }

    async fn get_product_by_id(&self, id: &str) -> Result<Option<Product>> {
        super::turso::TursoClient::get_product_by_id(self, id).await
    }

    async fn list_products(&self, search: Option<&str>) -> Result<Vec<Product>> {
        super::turso::TursoClient::list_products(self, search).await
    }

    async fn replace_product(&self, product: &Product) -> Result<bool> {
        super::turso::TursoClient::replace_product(self, product).await
    }

    async fn delete_product(&self, id: &str) -> Result<bool> {
        super::turso::TursoClient::delete_product(self, id).await
    }

    async fn create_customer(&self, customer: &Customer) -> Result<()> {
        super::turso::TursoClient::create_customer(self, customer).await
    }

    async fn customer_email_exists(&self, email: &str) -> Result<bool> {
        super::turso::TursoClient::customer_email_exists(self, email).await
    }

    async fn get_customer_by_id(&self, id: &str) -> Result<Option<Customer>> {
        super::turso::TursoClient::get_customer_by_id(self, id).await
    }

    async fn list_customers(&self, search: Option<&str>) -> Result<Vec<Customer>> {
        super::turso::TursoClient::list_customers(self, search).await
    }

    async fn update_customer(&self, id: &str, changes: &CustomerChanges) -> Result<bool> {
        super::turso::TursoClient::update_customer(self, id, changes).await
    }

    async fn delete_customer(&self, id: &str) -> Result<bool> {
        super::turso::TursoClient::delete_customer(self, id).await
    }
}
