use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use sea_orm::sea_query::Order;
use tracing::info;

use crate::domain::now_timestamp;
use crate::entities::{nominations, prelude::*};

/// Tally row for one nominee within a category.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct NomineeTally {
    pub first_name: String,
    pub last_name: String,
    pub year: i32,
    pub category: String,
    pub count: i64,
}

#[derive(Debug, Clone, Default)]
pub struct NominationFields {
    pub first_name: String,
    pub last_name: String,
    pub nominated_email: Option<String>,
    pub nominator_email: String,
    pub year: i32,
    pub category: String,
}

pub struct NominationRepository {
    conn: DatabaseConnection,
}

impl NominationRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn insert(&self, fields: NominationFields) -> Result<nominations::Model> {
        let now = now_timestamp();
        let active = nominations::ActiveModel {
            first_name: Set(fields.first_name),
            last_name: Set(fields.last_name),
            nominated_email: Set(fields.nominated_email),
            nominator_email: Set(fields.nominator_email),
            year: Set(fields.year),
            category: Set(fields.category),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert nomination")?;

        info!(nomination_id = model.id, category = %model.category, "Recorded nomination");
        Ok(model)
    }

    /// All nominations, or only those in `category` when given.
    pub async fn list(&self, category: Option<&str>) -> Result<Vec<nominations::Model>> {
        let mut query = Nominations::find().order_by_asc(nominations::Column::Id);

        if let Some(category) = category {
            query = query.filter(nominations::Column::Category.eq(category));
        }

        query
            .all(&self.conn)
            .await
            .context("Failed to query nominations")
    }

    /// Nominee tallies, highest count first.
    pub async fn grouped(&self, category: Option<&str>) -> Result<Vec<NomineeTally>> {
        let mut query = Nominations::find()
            .select_only()
            .column(nominations::Column::FirstName)
            .column(nominations::Column::LastName)
            .column(nominations::Column::Year)
            .column(nominations::Column::Category)
            .column_as(nominations::Column::Id.count(), "count");

        if let Some(category) = category {
            query = query.filter(nominations::Column::Category.eq(category));
        }

        query
            .group_by(nominations::Column::FirstName)
            .group_by(nominations::Column::LastName)
            .group_by(nominations::Column::Year)
            .group_by(nominations::Column::Category)
            .order_by(nominations::Column::Id.count(), Order::Desc)
            .into_model::<NomineeTally>()
            .all(&self.conn)
            .await
            .context("Failed to tally nominations")
    }

    pub async fn count(&self) -> Result<u64> {
        Nominations::find()
            .count(&self.conn)
            .await
            .context("Failed to count nominations")
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = Nominations::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete nomination")?;

        let removed = result.rows_affected > 0;
        if removed {
            info!(nomination_id = id, "Deleted nomination");
        }
        Ok(removed)
    }
}
