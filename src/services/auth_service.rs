//! Domain service for admin authentication and account management.

use serde::Serialize;
use thiserror::Error;

use crate::db::Admin;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown username and wrong password are reported identically.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Admin not found")]
    AdminNotFound,

    #[error("Username '{0}' is already taken")]
    UsernameTaken(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Admin info DTO for responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminInfo {
    pub id: i32,
    pub username: String,
    pub is_superuser: bool,
    pub created_at: String,
}

impl From<Admin> for AdminInfo {
    fn from(admin: Admin) -> Self {
        Self {
            id: admin.id,
            username: admin.username,
            is_superuser: admin.is_superuser,
            created_at: admin.created_at,
        }
    }
}

/// Accounts created by [`AuthService::seed_defaults`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedOutcome {
    pub admin_created: bool,
    pub superuser_created: bool,
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Verifies credentials and returns the admin.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] if login fails, without
    /// saying whether the username exists.
    async fn authenticate(&self, username: &str, password: &str)
    -> Result<AdminInfo, AuthError>;

    /// Creates an admin account.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Validation`] for a short password or empty
    /// username, and [`AuthError::UsernameTaken`] for a duplicate.
    async fn create_admin(
        &self,
        username: &str,
        password: &str,
        is_superuser: bool,
    ) -> Result<AdminInfo, AuthError>;

    /// Gets a specific admin by ID (session lookups).
    async fn get_admin(&self, id: i32) -> Result<AdminInfo, AuthError>;

    /// Creates the configured default admin and superuser if missing.
    async fn seed_defaults(&self) -> Result<SeedOutcome, AuthError>;
}
