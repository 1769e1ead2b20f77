use anyhow::{Context, Result};
use sea_orm::ActiveValue::Unchanged;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use tracing::info;

use crate::domain::now_timestamp;
use crate::entities::{prelude::*, sponsorships};

#[derive(Debug, Clone, Default)]
pub struct SponsorshipFields {
    pub email: String,
    pub level: String,
    pub requirement: String,
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub address: String,
    pub contact_number: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SponsorshipCounts {
    pub total: u64,
    pub confirmed: u64,
}

pub struct SponsorshipRepository {
    conn: DatabaseConnection,
}

impl SponsorshipRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn insert(&self, fields: SponsorshipFields) -> Result<sponsorships::Model> {
        let now = now_timestamp();
        let active = sponsorships::ActiveModel {
            email: Set(fields.email),
            level: Set(fields.level),
            requirement: Set(fields.requirement),
            first_name: Set(fields.first_name),
            last_name: Set(fields.last_name),
            company: Set(fields.company),
            address: Set(fields.address),
            contact_number: Set(fields.contact_number),
            confirmed: Set(false),
            feedback: Set(String::new()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert sponsorship")?;

        info!(sponsorship_id = model.id, level = %model.level, "Recorded sponsorship application");
        Ok(model)
    }

    /// Newest first.
    pub async fn list(&self) -> Result<Vec<sponsorships::Model>> {
        Sponsorships::find()
            .order_by_desc(sponsorships::Column::CreatedAt)
            .order_by_desc(sponsorships::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to query sponsorships")
    }

    pub async fn get(&self, id: i32) -> Result<Option<sponsorships::Model>> {
        Sponsorships::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query sponsorship by ID")
    }

    /// Most recent application for `email`.
    pub async fn get_by_email(&self, email: &str) -> Result<Option<sponsorships::Model>> {
        Sponsorships::find()
            .filter(sponsorships::Column::Email.eq(email))
            .order_by_desc(sponsorships::Column::Id)
            .one(&self.conn)
            .await
            .context("Failed to query sponsorship by email")
    }

    /// Rewrites the applicant fields; `confirmed` and `feedback` are kept.
    pub async fn update(
        &self,
        id: i32,
        fields: SponsorshipFields,
    ) -> Result<Option<sponsorships::Model>> {
        let active = sponsorships::ActiveModel {
            id: Unchanged(id),
            email: Set(fields.email),
            level: Set(fields.level),
            requirement: Set(fields.requirement),
            first_name: Set(fields.first_name),
            last_name: Set(fields.last_name),
            company: Set(fields.company),
            address: Set(fields.address),
            contact_number: Set(fields.contact_number),
            updated_at: Set(now_timestamp()),
            ..Default::default()
        };

        self.save(active).await
    }

    /// Writes only `confirmed`, `feedback` and the update timestamp.
    pub async fn set_confirmation(
        &self,
        id: i32,
        confirmed: bool,
        feedback: &str,
    ) -> Result<Option<sponsorships::Model>> {
        let active = sponsorships::ActiveModel {
            id: Unchanged(id),
            confirmed: Set(confirmed),
            feedback: Set(feedback.to_string()),
            updated_at: Set(now_timestamp()),
            ..Default::default()
        };

        self.save(active).await
    }

    async fn save(&self, active: sponsorships::ActiveModel) -> Result<Option<sponsorships::Model>> {
        match active.update(&self.conn).await {
            Ok(model) => Ok(Some(model)),
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(e) => Err(anyhow::Error::new(e).context("Failed to update sponsorship")),
        }
    }

    pub async fn counts(&self) -> Result<SponsorshipCounts> {
        let total = Sponsorships::find()
            .count(&self.conn)
            .await
            .context("Failed to count sponsorships")?;
        let confirmed = Sponsorships::find()
            .filter(sponsorships::Column::Confirmed.eq(true))
            .count(&self.conn)
            .await
            .context("Failed to count confirmed sponsorships")?;

        Ok(SponsorshipCounts { total, confirmed })
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = Sponsorships::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete sponsorship")?;

        let removed = result.rows_affected > 0;
        if removed {
            info!(sponsorship_id = id, "Deleted sponsorship");
        }
        Ok(removed)
    }
}
