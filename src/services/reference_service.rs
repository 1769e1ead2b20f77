//! Course and country reference lists.
//!
//! Both tables are filled once when empty and are read-only afterwards.

use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::clients::countries::CountrySource;
use crate::db::Store;
use crate::entities::{countries, courses};

pub const DEFAULT_COURSES: [(&str, &str); 6] = [
    ("BSCS", "Bachelor of Science in Computer Science"),
    ("BSIT", "Bachelor of Science in Information Technology"),
    ("BSIM", "Bachelor of Science in Information Management"),
    ("BSIS", "Bachelor of Science in Information Systems"),
    (
        "BSEMC",
        "Bachelor of Science in Entertainment and Multimedia Computing",
    ),
    ("BSCCS", "Commerce major in Computer Science"),
];

#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("External API error: {service} - {message}")]
    ExternalApi { service: String, message: String },

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for ReferenceError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for ReferenceError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseDto {
    pub code: String,
    pub name: String,
}

impl From<courses::Model> for CourseDto {
    fn from(model: courses::Model) -> Self {
        Self {
            code: model.code,
            name: model.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryDto {
    pub name: String,
    pub code: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl From<countries::Model> for CountryDto {
    fn from(model: countries::Model) -> Self {
        Self {
            name: model.name,
            code: model.code,
            latitude: model.latitude,
            longitude: model.longitude,
        }
    }
}

pub struct ReferenceService {
    store: Store,
    country_source: Option<Arc<dyn CountrySource>>,
}

impl ReferenceService {
    #[must_use]
    pub fn new(store: Store, country_source: Option<Arc<dyn CountrySource>>) -> Self {
        Self {
            store,
            country_source,
        }
    }

    pub async fn courses(&self) -> Result<Vec<CourseDto>, ReferenceError> {
        let rows = self.store.reference_repo().list_courses().await?;
        Ok(rows.into_iter().map(CourseDto::from).collect())
    }

    pub async fn countries(&self) -> Result<Vec<CountryDto>, ReferenceError> {
        let rows = self.store.reference_repo().list_countries().await?;
        Ok(rows.into_iter().map(CountryDto::from).collect())
    }

    /// Inserts [`DEFAULT_COURSES`] when the table is empty.
    pub async fn seed_courses(&self) -> Result<u64, ReferenceError> {
        let repo = self.store.reference_repo();
        if repo.course_count().await? > 0 {
            return Ok(0);
        }

        let inserted = repo.insert_courses(&DEFAULT_COURSES).await?;
        info!(event = "courses_seeded", inserted, "Seeded course list");
        Ok(inserted)
    }

    /// Fetches countries from the configured source when the table is empty.
    pub async fn seed_countries(&self) -> Result<u64, ReferenceError> {
        let Some(source) = &self.country_source else {
            return Ok(0);
        };

        let repo = self.store.reference_repo();
        if repo.country_count().await? > 0 {
            return Ok(0);
        }

        let countries = source.fetch_countries().await.map_err(|e| {
            warn!(event = "countries_fetch_failed", error = %e, "Country source unavailable");
            ReferenceError::ExternalApi {
                service: "Countries".to_string(),
                message: e.to_string(),
            }
        })?;

        let inserted = repo.insert_countries(&countries).await?;
        info!(event = "countries_seeded", inserted, "Seeded country list");
        Ok(inserted)
    }
}
