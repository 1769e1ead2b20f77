//! Domain service for sponsorship applications and their confirmation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entities::sponsorships;

#[derive(Debug, Error)]
pub enum SponsorshipError {
    #[error("Sponsorship {0} not found")]
    NotFound(i32),

    #[error("No sponsorship found for {0}")]
    EmailNotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for SponsorshipError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for SponsorshipError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SponsorshipInput {
    pub email: String,
    pub level: String,
    pub requirement: String,
    #[serde(alias = "firstName")]
    pub first_name: String,
    #[serde(alias = "lastName")]
    pub last_name: String,
    pub company: String,
    pub address: String,
    #[serde(alias = "contactNumber")]
    pub contact_number: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SponsorshipDto {
    pub id: i32,
    pub email: String,
    pub level: String,
    pub requirement: String,
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub address: String,
    pub contact_number: String,
    pub confirmed: bool,
    pub feedback: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<sponsorships::Model> for SponsorshipDto {
    fn from(model: sponsorships::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            level: model.level,
            requirement: model.requirement,
            first_name: model.first_name,
            last_name: model.last_name,
            company: model.company,
            address: model.address,
            contact_number: model.contact_number,
            confirmed: model.confirmed,
            feedback: model.feedback,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SponsorshipStats {
    pub total: u64,
    pub confirmed: u64,
    pub pending: u64,
}

#[async_trait::async_trait]
pub trait SponsorshipService: Send + Sync {
    async fn create(&self, input: SponsorshipInput) -> Result<SponsorshipDto, SponsorshipError>;

    /// Newest first.
    async fn list(&self) -> Result<Vec<SponsorshipDto>, SponsorshipError>;

    async fn get_by_email(&self, email: &str) -> Result<SponsorshipDto, SponsorshipError>;

    /// Replaces the applicant fields. Confirmation state is untouched.
    async fn update(
        &self,
        id: i32,
        input: SponsorshipInput,
    ) -> Result<SponsorshipDto, SponsorshipError>;

    /// Writes only `confirmed` and `feedback`.
    async fn confirm_or_reject(
        &self,
        id: i32,
        confirmed: bool,
        feedback: &str,
    ) -> Result<SponsorshipDto, SponsorshipError>;

    async fn stats(&self) -> Result<SponsorshipStats, SponsorshipError>;

    async fn delete(&self, id: i32) -> Result<(), SponsorshipError>;
}
