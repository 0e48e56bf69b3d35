//! Bounded waits around store calls.
//!
//! [`DeadlineClient`] wraps any [`DatabaseClient`] and gives every call the
//! same deadline, so a stalled store surfaces as a 500 instead of pinning a
//! request task indefinitely.

use super::traits::{
    Customer, CustomerChanges, DatabaseClient, Product, Profile, ProfileChanges, User, UserChanges,
};
use crate::types::{AppError, Result};
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Await `fut`, failing with `AppError::Database` once `deadline` elapses.
pub async fn with_deadline<T, F>(deadline: Duration, operation: &str, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(deadline, fut).await {
        Ok(result) => result,
        Err(_) => {
            warn!(operation, ?deadline, "store call timed out");
            Err(AppError::Database(format!(
                "{} timed out after {:?}",
                operation, deadline
            )))
        }
    }
}

/// A [`DatabaseClient`] that enforces a deadline on every call of the inner client.
pub struct DeadlineClient {
    inner: Arc<dyn DatabaseClient>,
    deadline: Duration,
}

impl DeadlineClient {
    pub fn new(inner: Arc<dyn DatabaseClient>, deadline: Duration) -> Self {
        Self { inner, deadline }
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }
}

#[async_trait]
impl DatabaseClient for DeadlineClient {
    async fn create_user(&self, user: &User) -> Result<()> {
        with_deadline(self.deadline, "create_user", self.inner.create_user(user)).await
    }

    async fn email_exists(&self, email: &str) -> Result<bool> {
        with_deadline(self.deadline, "email_exists", self.inner.email_exists(email)).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        with_deadline(
            self.deadline,
            "get_user_by_email",
            self.inner.get_user_by_email(email),
        )
        .await
    }

    async fn get_user_by_id(&self, id: &str) -> Result<Option<User>> {
        with_deadline(self.deadline, "get_user_by_id", self.inner.get_user_by_id(id)).await
    }

    async fn list_users(&self, search: Option<&str>) -> Result<Vec<User>> {
        with_deadline(self.deadline, "list_users", self.inner.list_users(search)).await
    }

    async fn update_user(&self, id: &str, changes: &UserChanges) -> Result<bool> {
        with_deadline(
            self.deadline,
            "update_user",
            self.inner.update_user(id, changes),
        )
        .await
    }

    async fn delete_user(&self, id: &str) -> Result<bool> {
        with_deadline(self.deadline, "delete_user", self.inner.delete_user(id)).await
    }

    async fn create_profile(&self, profile: &Profile) -> Result<()> {
        with_deadline(
            self.deadline,
            "create_profile",
            self.inner.create_profile(profile),
        )
        .await
    }

    async fn get_profile_by_user_id(&self, user_id: &str) -> Result<Option<Profile>> {
        with_deadline(
            self.deadline,
            "get_profile_by_user_id",
            self.inner.get_profile_by_user_id(user_id),
        )
        .await
    }

    async fn update_profile(&self, user_id: &str, changes: &ProfileChanges) -> Result<bool> {
        with_deadline(
            self.deadline,
            "update_profile",
            self.inner.update_profile(user_id, changes),
        )
        .await
    }

    async fn insert_session_token(
        &self,
        id: &str,
        token_hash: &str,
        expires_at: i64,
    ) -> Result<()> {
        with_deadline(
            self.deadline,
            "insert_session_token",
            self.inner.insert_session_token(id, token_hash, expires_at),
        )
        .await
    }

    async fn session_token_exists(&self, token_hash: &str) -> Result<bool> {
        with_deadline(
            self.deadline,
            "session_token_exists",
            self.inner.session_token_exists(token_hash),
        )
        .await
    }

    async fn delete_session_tokens(&self, token_hash: &str) -> Result<u64> {
        with_deadline(
            self.deadline,
            "delete_session_tokens",
            self.inner.delete_session_tokens(token_hash),
        )
        .await
    }

    async fn delete_expired_session_tokens(&self, now: i64) -> Result<u64> {
        with_deadline(
            self.deadline,
            "delete_expired_session_tokens",
            self.inner.delete_expired_session_tokens(now),
        )
        .await
    }

    async fn create_product(&self, product: &Product) -> Result<()> {
        with_deadline(self.deadline, "create_product", self.inner.create_product(product)).await
    }

    async fn get_product_by_id(&self, id: &str) -> Result<Option<Product>> {
        with_deadline(self.deadline, "get_product_by_id", self.inner.get_product_by_id(id)).await
    }

    async fn list_products(&self, search: Option<&str>) -> Result<Vec<Product>> {
        with_deadline(self.deadline, "list_products", self.inner.list_products(search)).await
    }

    async fn replace_product(&self, product: &Product) -> Result<bool> {
        with_deadline(self.deadline, "replace_product", self.inner.replace_product(product)).await
    }

    async fn delete_product(&self, id: &str) -> Result<bool> {
        with_deadline(self.deadline, "delete_product", self.inner.delete_product(id)).await
    }

    async fn create_customer(&self, customer: &Customer) -> Result<()> {
        with_deadline(
            self.deadline,
            "create_customer",
            self.inner.create_customer(customer),
        )
        .await
    }

    async fn customer_email_exists(&self, email: &str) -> Result<bool> {
        with_deadline(
            self.deadline,
            "customer_email_exists",
            self.inner.customer_email_exists(email),
        )
        .await
    }

    async fn get_customer_by_id(&self, id: &str) -> Result<Option<Customer>> {
        with_deadline(
            self.deadline,
            "get_customer_by_id",
            self.inner.get_customer_by_id(id),
        )
        .await
    }

    async fn list_customers(&self, search: Option<&str>) -> Result<Vec<Customer>> {
        with_deadline(self.deadline, "list_customers", self.inner.list_customers(search)).await
    }

    async fn update_customer(&self, id: &str, changes: &CustomerChanges) -> Result<bool> {
        with_deadline(
            self.deadline,
            "update_customer",
            self.inner.update_customer(id, changes),
        )
        .await
    }

    async fn delete_customer(&self, id: &str) -> Result<bool> {
        with_deadline(self.deadline, "delete_customer", self.inner.delete_customer(id)).await
    }
}
