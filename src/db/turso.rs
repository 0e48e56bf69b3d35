use crate::db::traits::{CustomerChanges, ProfileChanges, UserChanges};
use crate::types::{AppError, Result};
use chrono::Utc;
use libsql::{Builder, Connection, Database, Row};
use std::path::Path;

/// libsql-backed store for identities, profiles and issued session tokens.
///
/// One connection is opened at construction and shared by every operation,
/// which keeps an in-memory database alive (and visible) for the lifetime of
/// the client.
pub struct TursoClient {
    _db: Database,
    conn: Connection,
}

impl TursoClient {
    /// Open an ephemeral in-memory database.
    pub async fn new_memory() -> Result<Self> {
        let db = Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| AppError::Database(format!("Failed to open in-memory database: {}", e)))?;

        Self::from_database(db).await
    }

    /// Open (or create) a SQLite database file at `path`.
    pub async fn new_local(path: &str) -> Result<Self> {
        if path != ":memory:" {
            if let Some(parent) = Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).map_err(|e| {
                        AppError::Database(format!("Failed to create database directory: {}", e))
                    })?;
                }
            }
        }

        let db = Builder::new_local(path)
            .build()
            .await
            .map_err(|e| AppError::Database(format!("Failed to open database {}: {}", path, e)))?;

        Self::from_database(db).await
    }

    async fn from_database(db: Database) -> Result<Self> {
        let conn = db
            .connect()
            .map_err(|e| AppError::Database(format!("Failed to get connection: {}", e)))?;

        let client = Self { _db: db, conn };
        client.initialize_schema().await?;

        Ok(client)
    }

    pub fn connection(&self) -> Result<Connection> {
        Ok(self.conn.clone())
    }

    async fn initialize_schema(&self) -> Result<()> {
        let conn = self.connection()?;

        // Users table
        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT UNIQUE NOT NULL,
                password_hash TEXT NOT NULL,
                role TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            )",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create users table: {}", e)))?;

        // Profiles table, one per user
        conn.execute(
            "CREATE TABLE IF NOT EXISTS profiles (
                id TEXT PRIMARY KEY,
                user_id TEXT UNIQUE NOT NULL,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                phone TEXT NOT NULL,
                FOREIGN KEY (user_id) REFERENCES users(id)
            )",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create profiles table: {}", e)))?;

        // Session registry. No uniqueness on token_hash: re-issuing an
        // identical token simply adds another row.
        conn.execute(
            "CREATE TABLE IF NOT EXISTS session_tokens (
                id TEXT PRIMARY KEY,
                token_hash TEXT NOT NULL,
                expires_at INTEGER NOT NULL,
                created_at INTEGER NOT NULL
            )",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create session_tokens table: {}", e)))?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_session_tokens_hash ON session_tokens (token_hash)",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create session token index: {}", e)))?;

        // Gated business records
        conn.execute(
            "CREATE TABLE IF NOT EXISTS products (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                category TEXT NOT NULL,
                image TEXT NOT NULL,
                description TEXT NOT NULL,
                price REAL NOT NULL,
                created_at INTEGER NOT NULL
            )",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create products table: {}", e)))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS customers (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT UNIQUE NOT NULL,
                password_hash TEXT NOT NULL,
                phone TEXT NOT NULL,
                affiliate_id TEXT NOT NULL,
                created_at INTEGER NOT NULL
            )",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create customers table: {}", e)))?;

        Ok(())
    }

    // User operations
    pub async fn create_user(&self, user: &User) -> Result<()> {
        let conn = self.connection()?;

        conn.execute(
            "INSERT INTO users (id, name, email, password_hash, role, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            (
                user.id.as_str(),
                user.name.as_str(),
                user.email.as_str(),
                user.password_hash.as_str(),
                user.role.as_str(),
                user.created_at,
                user.updated_at,
            ),
        )
        .await
        .map_err(|e| map_write_error("create user", e))?;

        Ok(())
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        let conn = self.connection()?;

        let mut rows = conn
            .query("SELECT 1 FROM users WHERE email = ?", [email])
            .await
            .map_err(|e| AppError::Database(format!("Failed to check email: {}", e)))?;

        Ok(rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .is_some())
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.fetch_user("SELECT id, name, email, password_hash, role, created_at, updated_at
                 FROM users WHERE email = ?", email)
            .await
    }

    pub async fn get_user_by_id(&self, id: &str) -> Result<Option<User>> {
        self.fetch_user("SELECT id, name, email, password_hash, role, created_at, updated_at
                 FROM users WHERE id = ?", id)
            .await
    }

    async fn fetch_user(&self, sql: &str, key: &str) -> Result<Option<User>> {
        let conn = self.connection()?;

        let mut rows = conn
            .query(sql, [key])
            .await
            .map_err(|e| AppError::Database(format!("Failed to query user: {}", e)))?;

        match rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            Some(row) => Ok(Some(User::from_row(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn list_users(&self, search: Option<&str>) -> Result<Vec<User>> {
        let conn = self.connection()?;

        let mut rows = match search {
            Some(term) => {
                conn.query(
                    "SELECT id, name, email, password_hash, role, created_at, updated_at
                     FROM users WHERE instr(lower(name), lower(?)) > 0
                     ORDER BY created_at ASC, email ASC",
                    [term],
                )
                .await
            }
            None => {
                conn.query(
                    "SELECT id, name, email, password_hash, role, created_at, updated_at
                     FROM users ORDER BY created_at ASC, email ASC",
                    (),
                )
                .await
            }
        }
        .map_err(|e| AppError::Database(format!("Failed to list users: {}", e)))?;

        let mut users = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            users.push(User::from_row(&row)?);
        }

        Ok(users)
    }

    pub async fn update_user(&self, id: &str, changes: &UserChanges) -> Result<bool> {
        let conn = self.connection()?;
        let now = Utc::now().timestamp();

        let affected = conn
            .execute(
                "UPDATE users SET
                    name = COALESCE(?, name),
                    email = COALESCE(?, email),
                    password_hash = COALESCE(?, password_hash),
                    role = COALESCE(?, role),
                    updated_at = ?
                 WHERE id = ?",
                (
                    changes.name.as_deref(),
                    changes.email.as_deref(),
                    changes.password_hash.as_deref(),
                    changes.role.as_deref(),
                    now,
                    id,
                ),
            )
            .await
            .map_err(|e| map_write_error("update user", e))?;

        Ok(affected > 0)
    }

    pub async fn delete_user(&self, id: &str) -> Result<bool> {
        let conn = self.connection()?;

        conn.execute("DELETE FROM profiles WHERE user_id = ?", [id])
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete profile: {}", e)))?;

        let affected = conn
            .execute("DELETE FROM users WHERE id = ?", [id])
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete user: {}", e)))?;

        Ok(affected > 0)
    }

    // Profile operations
    pub async fn create_profile(&self, profile: &Profile) -> Result<()> {
        let conn = self.connection()?;

        conn.execute(
            "INSERT INTO profiles (id, user_id, first_name, last_name, phone)
             VALUES (?, ?, ?, ?, ?)",
            (
                profile.id.as_str(),
                profile.user_id.as_str(),
                profile.first_name.as_str(),
                profile.last_name.as_str(),
                profile.phone.as_str(),
            ),
        )
        .await
        .map_err(|e| map_write_error("create profile", e))?;

        Ok(())
    }

    pub async fn get_profile_by_user_id(&self, user_id: &str) -> Result<Option<Profile>> {
        let conn = self.connection()?;

        let mut rows = conn
            .query(
                "SELECT id, user_id, first_name, last_name, phone
                 FROM profiles WHERE user_id = ?",
                [user_id],
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to query profile: {}", e)))?;

        match rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            Some(row) => Ok(Some(Profile::from_row(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn update_profile(&self, user_id: &str, changes: &ProfileChanges) -> Result<bool> {
        let conn = self.connection()?;

        let affected = conn
            .execute(
                "UPDATE profiles SET
                    first_name = COALESCE(?, first_name),
                    last_name = COALESCE(?, last_name),
                    phone = COALESCE(?, phone)
                 WHERE user_id = ?",
                (
                    changes.first_name.as_deref(),
                    changes.last_name.as_deref(),
                    changes.phone.as_deref(),
                    user_id,
                ),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to update profile: {}", e)))?;

        Ok(affected > 0)
    }

    // Session token operations
    pub async fn insert_session_token(
        &self,
        id: &str,
        token_hash: &str,
        expires_at: i64,
    ) -> Result<()> {
        let conn = self.connection()?;
        let now = Utc::now().timestamp();

        conn.execute(
            "INSERT INTO session_tokens (id, token_hash, expires_at, created_at)
             VALUES (?, ?, ?, ?)",
            (id, token_hash, expires_at, now),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to record session token: {}", e)))?;

        Ok(())
    }

    pub async fn session_token_exists(&self, token_hash: &str) -> Result<bool> {
        let conn = self.connection()?;

        let mut rows = conn
            .query(
                "SELECT 1 FROM session_tokens WHERE token_hash = ? LIMIT 1",
                [token_hash],
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to look up session token: {}", e)))?;

        Ok(rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .is_some())
    }

    pub async fn delete_session_tokens(&self, token_hash: &str) -> Result<u64> {
        let conn = self.connection()?;

        conn.execute("DELETE FROM session_tokens WHERE token_hash = ?", [token_hash])
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete session token: {}", e)))
    }

    pub async fn delete_expired_session_tokens(&self, now: i64) -> Result<u64> {
        let conn = self.connection()?;

        conn.execute("DELETE FROM session_tokens WHERE expires_at < ?", [now])
            .await
            .map_err(|e| AppError::Database(format!("Failed to prune session tokens: {}", e)))
    }

    // Product operations
    pub async fn create_product(&self, product: &Product) -> Result<()> {
        let conn = self.connection()?;

        conn.execute(
            "INSERT INTO products (id, name, category, image, description, price, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            (
                product.id.as_str(),
                product.name.as_str(),
                product.category.as_str(),
                product.image.as_str(),
                product.description.as_str(),
                product.price,
                product.created_at,
            ),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create product: {}", e)))?;

        Ok(())
    }

    pub async fn get_product_by_id(&self, id: &str) -> Result<Option<Product>> {
        let conn = self.connection()?;

        let mut rows = conn
            .query(
                "SELECT id, name, category, image, description, price, created_at
                 FROM products WHERE id = ?",
                [id],
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to query product: {}", e)))?;

        match rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            Some(row) => Ok(Some(Product::from_row(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn list_products(&self, search: Option<&str>) -> Result<Vec<Product>> {
        let conn = self.connection()?;

        let mut rows = match search {
            Some(term) => {
                conn.query(
                    "SELECT id, name, category, image, description, price, created_at
                     FROM products WHERE instr(lower(name), lower(?)) > 0
                     ORDER BY created_at ASC, name ASC",
                    [term],
                )
                .await
            }
            None => {
                conn.query(
                    "SELECT id, name, category, image, description, price, created_at
                     FROM products ORDER BY created_at ASC, name ASC",
                    (),
                )
                .await
            }
        }
        .map_err(|e| AppError::Database(format!("Failed to list products: {}", e)))?;

        let mut products = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            products.push(Product::from_row(&row)?);
        }

        Ok(products)
    }

    /// Overwrite every editable field of a product; `created_at` is kept.
    pub async fn replace_product(&self, product: &Product) -> Result<bool> {
        let conn = self.connection()?;

        let affected = conn
            .execute(
                "UPDATE products SET name = ?, category = ?, image = ?, description = ?, price = ?
                 WHERE id = ?",
                (
                    product.name.as_str(),
                    product.category.as_str(),
                    product.image.as_str(),
                    product.description.as_str(),
                    product.price,
                    product.id.as_str(),
                ),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to update product: {}", e)))?;

        Ok(affected > 0)
    }

    pub async fn delete_product(&self, id: &str) -> Result<bool> {
        let conn = self.connection()?;

        let affected = conn
            .execute("DELETE FROM products WHERE id = ?", [id])
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete product: {}", e)))?;

        Ok(affected > 0)
    }

    // Customer operations
    pub async fn create_customer(&self, customer: &Customer) -> Result<()> {
        let conn = self.connection()?;

        conn.execute(
            "INSERT INTO customers (id, name, email, password_hash, phone, affiliate_id, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            (
                customer.id.as_str(),
                customer.name.as_str(),
                customer.email.as_str(),
                customer.password_hash.as_str(),
                customer.phone.as_str(),
                customer.affiliate_id.as_str(),
                customer.created_at,
            ),
        )
        .await
        .map_err(|e| map_write_error("create customer", e))?;

        Ok(())
    }

    pub async fn customer_email_exists(&self, email: &str) -> Result<bool> {
        let conn = self.connection()?;

        let mut rows = conn
            .query("SELECT 1 FROM customers WHERE email = ?", [email])
            .await
            .map_err(|e| AppError::Database(format!("Failed to check customer email: {}", e)))?;

        Ok(rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .is_some())
    }

    pub async fn get_customer_by_id(&self, id: &str) -> Result<Option<Customer>> {
        let conn = self.connection()?;

        let mut rows = conn
            .query(
                "SELECT id, name, email, password_hash, phone, affiliate_id, created_at
                 FROM customers WHERE id = ?",
                [id],
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to query customer: {}", e)))?;

        match rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            Some(row) => Ok(Some(Customer::from_row(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn list_customers(&self, search: Option<&str>) -> Result<Vec<Customer>> {
        let conn = self.connection()?;

        let mut rows = match search {
            Some(term) => {
                conn.query(
                    "SELECT id, name, email, password_hash, phone, affiliate_id, created_at
                     FROM customers WHERE instr(lower(name), lower(?)) > 0
                     ORDER BY created_at ASC, email ASC",
                    [term],
                )
                .await
            }
            None => {
                conn.query(
                    "SELECT id, name, email, password_hash, phone, affiliate_id, created_at
                     FROM customers ORDER BY created_at ASC, email ASC",
                    (),
                )
                .await
            }
        }
        .map_err(|e| AppError::Database(format!("Failed to list customers: {}", e)))?;

        let mut customers = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            customers.push(Customer::from_row(&row)?);
        }

        Ok(customers)
    }

    pub async fn update_customer(&self, id: &str, changes: &CustomerChanges) -> Result<bool> {
        let conn = self.connection()?;

        let affected = conn
            .execute(
                "UPDATE customers SET
                    name = COALESCE(?, name),
                    email = COALESCE(?, email),
                    password_hash = COALESCE(?, password_hash),
                    phone = COALESCE(?, phone),
                    affiliate_id = COALESCE(?, affiliate_id)
                 WHERE id = ?",
                (
                    changes.name.as_deref(),
                    changes.email.as_deref(),
                    changes.password_hash.as_deref(),
                    changes.phone.as_deref(),
                    changes.affiliate_id.as_deref(),
                    id,
                ),
            )
            .await
            .map_err(|e| map_write_error("update customer", e))?;

        Ok(affected > 0)
    }

    pub async fn delete_customer(&self, id: &str) -> Result<bool> {
        let conn = self.connection()?;

        let affected = conn
            .execute("DELETE FROM customers WHERE id = ?", [id])
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete customer: {}", e)))?;

        Ok(affected > 0)
    }
}

/// Unique-constraint violations are caller mistakes (duplicate email), not store faults.
fn map_write_error(action: &str, e: libsql::Error) -> AppError {
    let message = e.to_string();
    if message.contains("UNIQUE constraint failed: users.email")
        || message.contains("UNIQUE constraint failed: customers.email")
    {
        AppError::InvalidInput("Email already exists".to_string())
    } else {
        AppError::Database(format!("Failed to {}: {}", action, message))
    }
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl User {
    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            id: row.get(0).map_err(|e| AppError::Database(e.to_string()))?,
            name: row.get(1).map_err(|e| AppError::Database(e.to_string()))?,
            email: row.get(2).map_err(|e| AppError::Database(e.to_string()))?,
            password_hash: row.get(3).map_err(|e| AppError::Database(e.to_string()))?,
            role: row.get(4).map_err(|e| AppError::Database(e.to_string()))?,
            created_at: row.get(5).map_err(|e| AppError::Database(e.to_string()))?,
            updated_at: row.get(6).map_err(|e| AppError::Database(e.to_string()))?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub id: String,
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

impl Profile {
    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            id: row.get(0).map_err(|e| AppError::Database(e.to_string()))?,
            user_id: row.get(1).map_err(|e| AppError::Database(e.to_string()))?,
            first_name: row.get(2).map_err(|e| AppError::Database(e.to_string()))?,
            last_name: row.get(3).map_err(|e| AppError::Database(e.to_string()))?,
            phone: row.get(4).map_err(|e| AppError::Database(e.to_string()))?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub category: String,
    pub image: String,
    pub description: String,
    pub price: f64,
    pub created_at: i64,
}

impl Product {
    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            id: row.get(0).map_err(|e| AppError::Database(e.to_string()))?,
            name: row.get(1).map_err(|e| AppError::Database(e.to_string()))?,
            category: row.get(2).map_err(|e| AppError::Database(e.to_string()))?,
            image: row.get(3).map_err(|e| AppError::Database(e.to_string()))?,
            description: row.get(4).map_err(|e| AppError::Database(e.to_string()))?,
            price: row.get(5).map_err(|e| AppError::Database(e.to_string()))?,
            created_at: row.get(6).map_err(|e| AppError::Database(e.to_string()))?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: String,
    pub affiliate_id: String,
    pub created_at: i64,
}

impl Customer {
    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            id: row.get(0).map_err(|e| AppError::Database(e.to_string()))?,
            name: row.get(1).map_err(|e| AppError::Database(e.to_string()))?,
            email: row.get(2).map_err(|e| AppError::Database(e.to_string()))?,
            password_hash: row.get(3).map_err(|e| AppError::Database(e.to_string()))?,
            phone: row.get(4).map_err(|e| AppError::Database(e.to_string()))?,
            affiliate_id: row.get(5).map_err(|e| AppError::Database(e.to_string()))?,
            created_at: row.get(6).map_err(|e| AppError::Database(e.to_string()))?,
        })
    }
}
