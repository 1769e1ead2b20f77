use anyhow::{Context, Result};
use sea_orm::ActiveValue::{NotSet, Unchanged};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, FromQueryResult,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use tracing::info;

use crate::domain::{PaymentProof, now_timestamp};
use crate::entities::{alumni, prelude::*};

/// An alumni row without the attachment bytes.
#[derive(Debug, Clone, FromQueryResult)]
pub struct AlumniRow {
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

impl From<alumni::Model> for AlumniRow {
    fn from(model: alumni::Model) -> Self {
        Self {
            id: model.id,
            first_name: model.first_name,
            last_name: model.last_name,
            email: model.email,
            phone: model.phone,
            year: model.year,
            course: model.course,
            company: model.company,
            position: model.position,
            country: model.country,
            city: model.city,
            latitude: model.latitude,
            longitude: model.longitude,
            is_verified: model.is_verified,
            paid: model.paid,
            payment_proof: model.payment_proof,
            payment_proof_type: model.payment_proof_type,
            payment_proof_size: model.payment_proof_size,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

const ROW_COLUMNS: [alumni::Column; 20] = [
    alumni::Column::Id,
    alumni::Column::FirstName,
    alumni::Column::LastName,
    alumni::Column::Email,
    alumni::Column::Phone,
    alumni::Column::Year,
    alumni::Column::Course,
    alumni::Column::Company,
    alumni::Column::Position,
    alumni::Column::Country,
    alumni::Column::City,
    alumni::Column::Latitude,
    alumni::Column::Longitude,
    alumni::Column::IsVerified,
    alumni::Column::Paid,
    alumni::Column::PaymentProof,
    alumni::Column::PaymentProofType,
    alumni::Column::PaymentProofSize,
    alumni::Column::CreatedAt,
    alumni::Column::UpdatedAt,
];

/// Stored attachment columns of one alumni row.
#[derive(Debug, Clone, FromQueryResult)]
pub struct StoredProofRow {
    pub payment_proof: Option<String>,
    pub payment_proof_data: Option<Vec<u8>>,
    pub payment_proof_type: Option<String>,
    pub payment_proof_size: Option<i64>,
}

/// Profile fields as written by create and update, already normalised.
#[derive(Debug, Clone, Default)]
pub struct AlumniFields {
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
    /// Update leaves `year`, `latitude` and `longitude` untouched when `None`.
    pub keep_missing_numbers: bool,
}

pub struct AlumniRepository {
    conn: DatabaseConnection,
}

impl AlumniRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn insert(
        &self,
        fields: AlumniFields,
        proof: Option<PaymentProof>,
    ) -> Result<AlumniRow> {
        let now = now_timestamp();
        let mut active = alumni::ActiveModel {
            first_name: Set(fields.first_name),
            last_name: Set(fields.last_name),
            email: Set(fields.email),
            phone: Set(fields.phone),
            year: Set(fields.year),
            course: Set(fields.course),
            company: Set(fields.company),
            position: Set(fields.position),
            country: Set(fields.country),
            city: Set(fields.city),
            latitude: Set(fields.latitude),
            longitude: Set(fields.longitude),
            is_verified: Set(fields.is_verified),
            paid: Set(fields.paid),
            payment_proof: Set(None),
            payment_proof_data: Set(None),
            payment_proof_type: Set(None),
            payment_proof_size: Set(None),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(proof) = proof {
            set_proof(&mut active, proof);
        }

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert alumni")?;

        info!(alumni_id = model.id, "Registered alumni");
        Ok(AlumniRow::from(model))
    }

    /// Overwrites the profile fields of an existing row.
    ///
    /// Attachment columns are only written when `proof` is given, and the
    /// `paid` and `is_verified` flags are only ever raised here. With
    /// `keep_missing_numbers`, absent year and coordinates keep their
    /// stored values.
    pub async fn update(
        &self,
        id: i32,
        fields: AlumniFields,
        proof: Option<PaymentProof>,
    ) -> Result<Option<AlumniRow>> {
        if !self.exists(id).await? {
            return Ok(None);
        }

        let mut active = alumni::ActiveModel {
            id: Unchanged(id),
            first_name: Set(fields.first_name),
            last_name: Set(fields.last_name),
            email: Set(fields.email),
            phone: Set(fields.phone),
            year: Set(fields.year),
            course: Set(fields.course),
            company: Set(fields.company),
            position: Set(fields.position),
            country: Set(fields.country),
            city: Set(fields.city),
            latitude: Set(fields.latitude),
            longitude: Set(fields.longitude),
            updated_at: Set(now_timestamp()),
            ..Default::default()
        };

        if fields.keep_missing_numbers {
            if fields.year.is_none() {
                active.year = NotSet;
            }
            if fields.latitude.is_none() {
                active.latitude = NotSet;
            }
            if fields.longitude.is_none() {
                active.longitude = NotSet;
            }
        }
        if fields.is_verified {
            active.is_verified = Set(true);
        }
        if fields.paid {
            active.paid = Set(true);
        }
        if let Some(proof) = proof {
            set_proof(&mut active, proof);
        }

        self.save(active).await
    }

    /// Replaces the stored attachment and marks the row as paid.
    pub async fn attach_proof(&self, id: i32, proof: PaymentProof) -> Result<Option<AlumniRow>> {
        if !self.exists(id).await? {
            return Ok(None);
        }

        let mut active = alumni::ActiveModel {
            id: Unchanged(id),
            updated_at: Set(now_timestamp()),
            ..Default::default()
        };
        set_proof(&mut active, proof);

        self.save(active).await
    }

    async fn save(&self, active: alumni::ActiveModel) -> Result<Option<AlumniRow>> {
        match active.update(&self.conn).await {
            Ok(model) => Ok(Some(AlumniRow::from(model))),
            // Deleted between the existence check and the write
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(e) => Err(anyhow::Error::new(e).context("Failed to update alumni")),
        }
    }

    pub async fn exists(&self, id: i32) -> Result<bool> {
        let count = Alumni::find_by_id(id)
            .count(&self.conn)
            .await
            .context("Failed to query alumni by ID")?;
        Ok(count > 0)
    }

    pub async fn get(&self, id: i32) -> Result<Option<AlumniRow>> {
        Alumni::find_by_id(id)
            .select_only()
            .columns(ROW_COLUMNS)
            .into_model::<AlumniRow>()
            .one(&self.conn)
            .await
            .context("Failed to query alumni by ID")
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<AlumniRow>> {
        Alumni::find()
            .select_only()
            .columns(ROW_COLUMNS)
            .filter(alumni::Column::Email.eq(email))
            .into_model::<AlumniRow>()
            .one(&self.conn)
            .await
            .context("Failed to query alumni by email")
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        let count = Alumni::find()
            .filter(alumni::Column::Email.eq(email))
            .count(&self.conn)
            .await
            .context("Failed to count alumni by email")?;
        Ok(count > 0)
    }

    /// Returns `None` when the row does not exist.
    pub async fn get_payment_proof(&self, id: i32) -> Result<Option<StoredProofRow>> {
        Alumni::find_by_id(id)
            .select_only()
            .columns([
                alumni::Column::PaymentProof,
                alumni::Column::PaymentProofData,
                alumni::Column::PaymentProofType,
                alumni::Column::PaymentProofSize,
            ])
            .into_model::<StoredProofRow>()
            .one(&self.conn)
            .await
            .context("Failed to query payment proof")
    }

    /// One-based page of rows ordered by ID, plus the total row count.
    pub async fn list_page(&self, page: u64, page_size: u64) -> Result<(Vec<AlumniRow>, u64)> {
        let paginator = Alumni::find()
            .select_only()
            .columns(ROW_COLUMNS)
            .order_by_asc(alumni::Column::Id)
            .into_model::<AlumniRow>()
            .paginate(&self.conn, page_size);

        let total = paginator
            .num_items()
            .await
            .context("Failed to count alumni")?;
        let items = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .context("Failed to fetch alumni page")?;

        Ok((items, total))
    }

    /// Rows with both coordinates present and non-zero.
    pub async fn list_with_location(&self) -> Result<Vec<AlumniRow>> {
        Alumni::find()
            .select_only()
            .columns(ROW_COLUMNS)
            .filter(alumni::Column::Latitude.is_not_null())
            .filter(alumni::Column::Longitude.is_not_null())
            .filter(alumni::Column::Latitude.ne(0.0))
            .filter(alumni::Column::Longitude.ne(0.0))
            .order_by_asc(alumni::Column::Id)
            .into_model::<AlumniRow>()
            .all(&self.conn)
            .await
            .context("Failed to query alumni locations")
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = Alumni::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete alumni")?;

        let removed = result.rows_affected > 0;
        if removed {
            info!(alumni_id = id, "Deleted alumni");
        }
        Ok(removed)
    }
}

fn set_proof(active: &mut alumni::ActiveModel, proof: PaymentProof) {
    let size = i64::try_from(proof.data.len()).unwrap_or(i64::MAX);
    active.payment_proof = Set(Some(proof.filename));
    active.payment_proof_type = Set(Some(proof.content_type));
    active.payment_proof_data = Set(Some(proof.data));
    active.payment_proof_size = Set(Some(size));
    active.paid = Set(true);
}
