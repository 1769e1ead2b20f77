//! Domain service for award nominations and their tallies.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::NomineeTally;
use crate::entities::nominations;

#[derive(Debug, Error)]
pub enum NominationError {
    #[error("Nomination {0} not found")]
    NotFound(i32),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("You have already submitted a nomination for this category")]
    DuplicateNomination,

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for NominationError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for NominationError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NominationInput {
    #[serde(alias = "firstName")]
    pub first_name: String,
    #[serde(alias = "lastName")]
    pub last_name: String,
    #[serde(alias = "nominatedEmail")]
    pub nominated_email: Option<String>,
    #[serde(alias = "nominatorEmail")]
    pub nominator_email: String,
    pub year: Option<i32>,
    pub category: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NominationDto {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub nominated_email: Option<String>,
    pub nominator_email: String,
    pub year: i32,
    pub category: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<nominations::Model> for NominationDto {
    fn from(model: nominations::Model) -> Self {
        Self {
            id: model.id,
            first_name: model.first_name,
            last_name: model.last_name,
            nominated_email: model.nominated_email,
            nominator_email: model.nominator_email,
            year: model.year,
            category: model.category,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NomineeGroup {
    pub first_name: String,
    pub last_name: String,
    pub year: i32,
    pub category: String,
    pub count: i64,
}

impl From<NomineeTally> for NomineeGroup {
    fn from(tally: NomineeTally) -> Self {
        Self {
            first_name: tally.first_name,
            last_name: tally.last_name,
            year: tally.year,
            category: tally.category,
            count: tally.count,
        }
    }
}

#[async_trait::async_trait]
pub trait NominationService: Send + Sync {
    /// # Errors
    ///
    /// Returns [`NominationError::DuplicateNomination`] when the nominator
    /// already has a nomination in this category.
    async fn submit(&self, input: NominationInput) -> Result<NominationDto, NominationError>;

    /// Empty or absent category lists everything.
    async fn list_by_category(
        &self,
        category: Option<&str>,
    ) -> Result<Vec<NominationDto>, NominationError>;

    /// Tallies per nominee, highest count first. Ties have no defined order.
    async fn grouped_by_category(
        &self,
        category: Option<&str>,
    ) -> Result<Vec<NomineeGroup>, NominationError>;

    async fn count(&self) -> Result<u64, NominationError>;

    async fn delete(&self, id: i32) -> Result<(), NominationError>;
}
