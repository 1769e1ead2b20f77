//! Domain service for one-time verification codes.
//!
//! Codes are scoped to an (email, purpose) pair, live for a configured
//! window and can be consumed once.

use serde::Serialize;
use thiserror::Error;

use crate::domain::OtpPurpose;

#[derive(Debug, Error)]
pub enum OtpError {
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Covers a wrong code, an expired code and an already used code alike.
    #[error("Invalid or expired code")]
    InvalidCode,

    #[error("Failed to deliver verification code: {0}")]
    Delivery(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for OtpError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for OtpError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// A freshly issued code. `code` is never serialized.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedCode {
    pub id: i32,
    pub email: String,
    pub purpose: OtpPurpose,
    #[serde(skip)]
    pub code: String,
    pub expires_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verification {
    pub verification_id: i32,
    pub email: String,
    pub purpose: OtpPurpose,
}

#[async_trait::async_trait]
pub trait OtpService: Send + Sync {
    /// Persists a new code for (email, purpose) and mails it.
    ///
    /// # Errors
    ///
    /// Returns [`OtpError::Validation`] for a malformed email or an unknown
    /// purpose, before anything is stored. Returns [`OtpError::Delivery`]
    /// when the mailer fails; the stored code stays valid in that case.
    async fn issue_code(&self, email: &str, purpose: &str) -> Result<IssuedCode, OtpError>;

    /// Marks a matching, unexpired and unused code as used.
    ///
    /// # Errors
    ///
    /// Returns [`OtpError::InvalidCode`] when no such code exists or another
    /// request consumed it first.
    async fn consume_code(
        &self,
        email: &str,
        code: &str,
        purpose: &str,
    ) -> Result<Verification, OtpError>;

    /// Deletes all expired codes, used or not, and returns how many went.
    async fn sweep_expired(&self) -> Result<u64, OtpError>;
}
