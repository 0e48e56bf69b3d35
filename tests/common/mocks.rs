//! Store doubles for testing.
//!
//! These wrap a real in-memory `TursoClient` and override single operations
//! to simulate faults that a healthy SQLite file never produces.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use storegate::db::{
    Customer, CustomerChanges, DatabaseClient, Product, Profile, ProfileChanges, TursoClient,
    User, UserChanges,
};
use storegate::types::{AppError, Result};

/// The single operation a [`FaultyStore`] misbehaves on.
#[derive(Debug, Clone, Copy)]
pub enum Fault {
    /// `create_profile` fails
    ProfileInsert,
    /// `get_profile_by_user_id` finds nothing, as if the profile row were lost
    MissingProfile,
    /// `insert_session_token` fails
    SessionInsert,
    /// `get_user_by_email` hangs for the given time before answering
    Stall(Duration),
}

/// A store that forwards to a real client except for one injected fault.
///
/// The wrapped client stays reachable, so a test can inspect what a failed
/// flow left behind.
#[derive(Clone)]
pub struct FaultyStore {
    pub inner: Arc<TursoClient>,
    fault: Fault,
}

impl FaultyStore {
    pub fn new(inner: Arc<TursoClient>, fault: Fault) -> Self {
        Self { inner, fault }
    }
}

#[async_trait]
impl DatabaseClient for FaultyStore {
    async fn create_user(&self, user: &User) -> Result<()> {
        self.inner.create_user(user).await
    }

    async fn email_exists(&self, email: &str) -> Result<bool> {
        self.inner.email_exists(email).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        if let Fault::Stall(delay) = self.fault {
            tokio::time::sleep(delay).await;
        }
        self.inner.get_user_by_email(email).await
    }

    async fn get_user_by_id(&self, id: &str) -> Result<Option<User>> {
        self.inner.get_user_by_id(id).await
    }

    async fn list_users(&self, search: Option<&str>) -> Result<Vec<User>> {
        self.inner.list_users(search).await
    }

    async fn update_user(&self, id: &str, changes: &UserChanges) -> Result<bool> {
        self.inner.update_user(id, changes).await
    }

    async fn delete_user(&self, id: &str) -> Result<bool> {
        self.inner.delete_user(id).await
    }

    async fn create_profile(&self, profile: &Profile) -> Result<()> {
        match self.fault {
            Fault::ProfileInsert => {
                Err(AppError::Database("Mock profile insert failure".to_string()))
            }
            _ => self.inner.create_profile(profile).await,
        }
    }

    async fn get_profile_by_user_id(&self, user_id: &str) -> Result<Option<Profile>> {
        match self.fault {
            Fault::MissingProfile => Ok(None),
            _ => self.inner.get_profile_by_user_id(user_id).await,
        }
    }

    async fn update_profile(&self, user_id: &str, changes: &ProfileChanges) -> Result<bool> {
        self.inner.update_profile(user_id, changes).await
    }

    async fn insert_session_token(
        &self,
        id: &str,
        token_hash: &str,
        expires_at: i64,
    ) -> Result<()> {
        match self.fault {
            Fault::SessionInsert => {
                Err(AppError::Database("Mock session insert failure".to_string()))
            }
            _ => {
                self.inner
                    .insert_session_token(id, token_hash, expires_at)
                    .await
            }
        }
    }

    async fn session_token_exists(&self, token_hash: &str) -> Result<bool> {
        self.inner.session_token_exists(token_hash).await
    }

    async fn delete_session_tokens(&self, token_hash: &str) -> Result<u64> {
        self.inner.delete_session_tokens(token_hash).await
    }

    async fn delete_expired_session_tokens(&self, now: i64) -> Result<u64> {
        self.inner.delete_expired_session_tokens(now).await
    }

    async fn create_product(&self, product: &Product) -> Result<()> {
        self.inner.create_product(product).await
    }

    async fn get_product_by_id(&self, id: &str) -> Result<Option<Product>> {
        self.inner.get_product_by_id(id).await
    }

    async fn list_products(&self, search: Option<&str>) -> Result<Vec<Product>> {
        self.inner.list_products(search).await
    }

    async fn replace_product(&self, product: &Product) -> Result<bool> {
        self.inner.replace_product(product).await
    }

    async fn delete_product(&self, id: &str) -> Result<bool> {
        self.inner.delete_product(id).await
    }

    async fn create_customer(&self, customer: &Customer) -> Result<()> {
        self.inner.create_customer(customer).await
    }

    async fn customer_email_exists(&self, email: &str) -> Result<bool> {
        self.inner.customer_email_exists(email).await
    }

    async fn get_customer_by_id(&self, id: &str) -> Result<Option<Customer>> {
        self.inner.get_customer_by_id(id).await
    }

    async fn list_customers(&self, search: Option<&str>) -> Result<Vec<Customer>> {
        self.inner.list_customers(search).await
    }

    async fn update_customer(&self, id: &str, changes: &CustomerChanges) -> Result<bool> {
        self.inner.update_customer(id, changes).await
    }

    async fn delete_customer(&self, id: &str) -> Result<bool> {
        self.inner.delete_customer(id).await
    }
}
