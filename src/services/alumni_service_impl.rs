//! `SeaORM` implementation of the `AlumniService` trait.

use async_trait::async_trait;

use crate::constants::PAYMENT_PROOF_CONTENT_TYPE;
use crate::db::{AlumniFields, Store, is_unique_violation};
use crate::domain::{PaymentProof, is_valid_email, normalize_email, normalize_name};
use crate::services::alumni_service::{
    AlumniDto, AlumniError, AlumniPage, AlumniProfile, AlumniService, StoredAttachment,
};

const DUPLICATE_EMAIL: &str = "An alumni with this email already exists";

pub struct SeaOrmAlumniService {
    store: Store,
}

impl SeaOrmAlumniService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

/// Normalises and checks the profile before it reaches storage.
fn prepare_fields(profile: AlumniProfile) -> Result<AlumniFields, AlumniError> {
    let fields = AlumniFields {
        first_name: normalize_name(&profile.first_name),
        last_name: normalize_name(&profile.last_name),
        email: normalize_email(&profile.email),
        phone: profile.phone.trim().to_string(),
        year: profile.year,
        course: profile.course.trim().to_string(),
        company: profile.company.trim().to_string(),
        position: profile.position.trim().to_string(),
        country: profile.country.trim().to_string(),
        city: profile.city.trim().to_string(),
        latitude: profile.latitude,
        longitude: profile.longitude,
        is_verified: profile.is_verified,
        paid: profile.paid,
        keep_missing_numbers: profile.keep_missing_numbers,
    };

    if fields.first_name.is_empty() {
        return Err(AlumniError::Validation("First name is required".to_string()));
    }
    if fields.last_name.is_empty() {
        return Err(AlumniError::Validation("Last name is required".to_string()));
    }
    if fields.email.is_empty() {
        return Err(AlumniError::Validation("Email is required".to_string()));
    }
    if !is_valid_email(&fields.email) {
        return Err(AlumniError::Validation("Invalid email address".to_string()));
    }

    Ok(fields)
}

fn map_write_error(err: anyhow::Error) -> AlumniError {
    if is_unique_violation(&err) {
        AlumniError::Conflict(DUPLICATE_EMAIL.to_string())
    } else {
        AlumniError::from(err)
    }
}

#[async_trait]
impl AlumniService for SeaOrmAlumniService {
    async fn create(
        &self,
        profile: AlumniProfile,
        attachment: Option<PaymentProof>,
    ) -> Result<AlumniDto, AlumniError> {
        let fields = prepare_fields(profile)?;
        if let Some(proof) = &attachment {
            proof.validate()?;
        }

        let row = self
            .store
            .alumni_repo()
            .insert(fields, attachment)
            .await
            .map_err(map_write_error)?;

        Ok(AlumniDto::from(row))
    }

    async fn update(
        &self,
        id: i32,
        profile: AlumniProfile,
        attachment: Option<PaymentProof>,
    ) -> Result<AlumniDto, AlumniError> {
        let fields = prepare_fields(profile)?;
        if let Some(proof) = &attachment {
            proof.validate()?;
        }

        self.store
            .alumni_repo()
            .update(id, fields, attachment)
            .await
            .map_err(map_write_error)?
            .map(AlumniDto::from)
            .ok_or(AlumniError::NotFound(id))
    }

    async fn attach_proof(
        &self,
        id: i32,
        attachment: PaymentProof,
    ) -> Result<AlumniDto, AlumniError> {
        attachment.validate()?;

        self.store
            .alumni_repo()
            .attach_proof(id, attachment)
            .await?
            .map(AlumniDto::from)
            .ok_or(AlumniError::NotFound(id))
    }

    async fn fetch_attachment(&self, id: i32) -> Result<StoredAttachment, AlumniError> {
        let row = self
            .store
            .alumni_repo()
            .get_payment_proof(id)
            .await?
            .ok_or(AlumniError::NotFound(id))?;

        let data = match row.payment_proof_data {
            Some(data) if !data.is_empty() => data,
            _ => return Err(AlumniError::NoContent(id)),
        };

        Ok(StoredAttachment {
            filename: row
                .payment_proof
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| format!("payment-proof-{id}.pdf")),
            content_type: row
                .payment_proof_type
                .unwrap_or_else(|| PAYMENT_PROOF_CONTENT_TYPE.to_string()),
            size: data.len(),
            data,
        })
    }

    async fn get(&self, id: i32) -> Result<AlumniDto, AlumniError> {
        self.store
            .alumni_repo()
            .get(id)
            .await?
            .map(AlumniDto::from)
            .ok_or(AlumniError::NotFound(id))
    }

    async fn list(&self, page: u64, page_size: u64) -> Result<AlumniPage, AlumniError> {
        let page = page.max(1);
        let page_size = page_size.max(1);
        let (rows, total) = self.store.alumni_repo().list_page(page, page_size).await?;

        Ok(AlumniPage {
            alumni: rows.into_iter().map(AlumniDto::from).collect(),
            total,
            page,
            page_size,
        })
    }

    async fn locations(&self) -> Result<Vec<AlumniDto>, AlumniError> {
        let rows = self.store.alumni_repo().list_with_location().await?;
        Ok(rows.into_iter().map(AlumniDto::from).collect())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<AlumniDto>, AlumniError> {
        let email = normalize_email(email);
        if email.is_empty() {
            return Ok(None);
        }
        let row = self.store.alumni_repo().get_by_email(&email).await?;
        Ok(row.map(AlumniDto::from))
    }

    async fn email_exists(&self, email: &str) -> Result<bool, AlumniError> {
        let email = normalize_email(email);
        if email.is_empty() {
            return Err(AlumniError::Validation("Email is required".to_string()));
        }
        Ok(self.store.alumni_repo().email_exists(&email).await?)
    }

    async fn delete(&self, id: i32) -> Result<(), AlumniError> {
        if self.store.alumni_repo().delete(id).await? {
            Ok(())
        } else {
            Err(AlumniError::NotFound(id))
        }
    }
}
