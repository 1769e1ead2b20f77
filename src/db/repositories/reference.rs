use anyhow::{Context, Result};
use sea_orm::sea_query::OnConflict;
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder, Set};

use crate::clients::countries::CountryInfo;
use crate::domain::now_timestamp;
use crate::entities::{countries, courses, prelude::*};

pub struct ReferenceRepository {
    conn: DatabaseConnection,
}

impl ReferenceRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list_courses(&self) -> Result<Vec<courses::Model>> {
        Courses::find()
            .order_by_asc(courses::Column::Name)
            .all(&self.conn)
            .await
            .context("Failed to query courses")
    }

    pub async fn course_count(&self) -> Result<u64> {
        Courses::find()
            .count(&self.conn)
            .await
            .context("Failed to count courses")
    }

    /// Inserts `(code, name)` pairs, skipping codes that already exist.
    pub async fn insert_courses(&self, entries: &[(&str, &str)]) -> Result<u64> {
        if entries.is_empty() {
            return Ok(0);
        }

        let now = now_timestamp();
        let active_models = entries.iter().map(|(code, name)| courses::ActiveModel {
            code: Set((*code).to_string()),
            name: Set((*name).to_string()),
            created_at: Set(now.clone()),
            ..Default::default()
        });

        let inserted = Courses::insert_many(active_models)
            .on_conflict(
                OnConflict::column(courses::Column::Code)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await
            .context("Failed to insert courses")?;

        Ok(inserted)
    }

    pub async fn list_countries(&self) -> Result<Vec<countries::Model>> {
        Countries::find()
            .order_by_asc(countries::Column::Name)
            .all(&self.conn)
            .await
            .context("Failed to query countries")
    }

    pub async fn country_count(&self) -> Result<u64> {
        Countries::find()
            .count(&self.conn)
            .await
            .context("Failed to count countries")
    }

    /// Inserts countries, skipping names that already exist.
    pub async fn insert_countries(&self, entries: &[CountryInfo]) -> Result<u64> {
        if entries.is_empty() {
            return Ok(0);
        }

        let active_models = entries.iter().map(|country| countries::ActiveModel {
            name: Set(country.name.clone()),
            code: Set(country.code.clone()),
            latitude: Set(country.latitude),
            longitude: Set(country.longitude),
            ..Default::default()
        });

        let inserted = Countries::insert_many(active_models)
            .on_conflict(
                OnConflict::column(countries::Column::Name)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await
            .context("Failed to insert countries")?;

        Ok(inserted)
    }
}
