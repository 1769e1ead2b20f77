//! Domain service for alumni registration and profile management.
//!
//! Owns the payment proof rules: an attachment is checked before anything
//! is written, replaces the stored one as a whole, and raises `paid`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::AlumniRow;
use crate::domain::{AttachmentError, PaymentProof};

#[derive(Debug, Error)]
pub enum AlumniError {
    #[error("Alumni {0} not found")]
    NotFound(i32),

    /// The row exists but carries no payment proof bytes.
    #[error("Alumni {0} has no payment proof")]
    NoContent(i32),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for AlumniError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AlumniError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<AttachmentError> for AlumniError {
    fn from(err: AttachmentError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Profile fields accepted on create and update.
///
/// Field names are snake_case; the camelCase names sent by the
/// registration form are accepted as aliases.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AlumniProfile {
    #[serde(alias = "firstName")]
    pub first_name: String,
    #[serde(alias = "lastName")]
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub year: Option<i32>,
    pub course: String,
    pub company: String,
    pub position: String,
    pub country: String,
    pub city: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(alias = "isVerified")]
    pub is_verified: bool,
    pub paid: bool,
    /// When set, an update leaves the stored year and coordinates alone
    /// wherever this profile has none. Form submissions set it; JSON
    /// bodies replace the whole profile.
    #[serde(skip)]
    pub keep_missing_numbers: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct AlumniDto {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub year: Option<i32>,
    pub course: String,
    pub company: String,
    pub position: String,
    pub country: String,
    pub city: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub is_verified: bool,
    pub paid: bool,
    pub payment_proof: Option<String>,
    pub payment_proof_type: Option<String>,
    pub payment_proof_size: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<AlumniRow> for AlumniDto {
    fn from(row: AlumniRow) -> Self {
        Self {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            phone: row.phone,
            year: row.year,
            course: row.course,
            company: row.company,
            position: row.position,
            country: row.country,
            city: row.city,
            latitude: row.latitude,
            longitude: row.longitude,
            is_verified: row.is_verified,
            paid: row.paid,
            payment_proof: row.payment_proof,
            payment_proof_type: row.payment_proof_type,
            payment_proof_size: row.payment_proof_size,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AlumniPage {
    pub alumni: Vec<AlumniDto>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
}

/// A stored payment proof ready to be streamed back.
#[derive(Debug, Clone)]
pub struct StoredAttachment {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
    pub size: usize,
}

#[async_trait::async_trait]
pub trait AlumniService: Send + Sync {
    /// Registers a new alumni, optionally with a payment proof.
    ///
    /// # Errors
    ///
    /// Returns [`AlumniError::Validation`] for missing fields or a rejected
    /// attachment and [`AlumniError::Conflict`] when the email is taken.
    async fn create(
        &self,
        profile: AlumniProfile,
        attachment: Option<PaymentProof>,
    ) -> Result<AlumniDto, AlumniError>;

    /// Overwrites the profile. Without an attachment the stored proof is kept.
    async fn update(
        &self,
        id: i32,
        profile: AlumniProfile,
        attachment: Option<PaymentProof>,
    ) -> Result<AlumniDto, AlumniError>;

    async fn attach_proof(&self, id: i32, attachment: PaymentProof)
    -> Result<AlumniDto, AlumniError>;

    /// # Errors
    ///
    /// Returns [`AlumniError::NotFound`] for an unknown ID and
    /// [`AlumniError::NoContent`] when nothing was uploaded.
    async fn fetch_attachment(&self, id: i32) -> Result<StoredAttachment, AlumniError>;

    async fn get(&self, id: i32) -> Result<AlumniDto, AlumniError>;

    async fn list(&self, page: u64, page_size: u64) -> Result<AlumniPage, AlumniError>;

    async fn locations(&self) -> Result<Vec<AlumniDto>, AlumniError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<AlumniDto>, AlumniError>;

    async fn email_exists(&self, email: &str) -> Result<bool, AlumniError>;

    async fn delete(&self, id: i32) -> Result<(), AlumniError>;
}
