//! `SeaORM` implementation of the `SponsorshipService` trait.

use async_trait::async_trait;

use crate::db::{SponsorshipFields, Store};
use crate::domain::{is_valid_email, normalize_email};
use crate::services::sponsorship_service::{
    SponsorshipDto, SponsorshipError, SponsorshipInput, SponsorshipService, SponsorshipStats,
};

pub struct SeaOrmSponsorshipService {
    store: Store,
}

impl SeaOrmSponsorshipService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

fn prepare_fields(input: SponsorshipInput) -> Result<SponsorshipFields, SponsorshipError> {
    let fields = SponsorshipFields {
        email: normalize_email(&input.email),
        level: input.level.trim().to_string(),
        requirement: input.requirement.trim().to_string(),
        first_name: input.first_name.trim().to_string(),
        last_name: input.last_name.trim().to_string(),
        company: input.company.trim().to_string(),
        address: input.address.trim().to_string(),
        contact_number: input.contact_number.trim().to_string(),
    };

    let required = [
        ("email", &fields.email),
        ("level", &fields.level),
        ("first_name", &fields.first_name),
        ("last_name", &fields.last_name),
        ("company", &fields.company),
        ("address", &fields.address),
        ("contact_number", &fields.contact_number),
    ];
    if let Some((name, _)) = required.iter().find(|(_, value)| value.is_empty()) {
        return Err(SponsorshipError::Validation(format!("{name} is required")));
    }
    if !is_valid_email(&fields.email) {
        return Err(SponsorshipError::Validation(
            "Invalid email address".to_string(),
        ));
    }

    Ok(fields)
}

#[async_trait]
impl SponsorshipService for SeaOrmSponsorshipService {
    async fn create(&self, input: SponsorshipInput) -> Result<SponsorshipDto, SponsorshipError> {
        let fields = prepare_fields(input)?;
        let model = self.store.sponsorship_repo().insert(fields).await?;
        Ok(SponsorshipDto::from(model))
    }

    async fn list(&self) -> Result<Vec<SponsorshipDto>, SponsorshipError> {
        let rows = self.store.sponsorship_repo().list().await?;
        Ok(rows.into_iter().map(SponsorshipDto::from).collect())
    }

    async fn get_by_email(&self, email: &str) -> Result<SponsorshipDto, SponsorshipError> {
        let email = normalize_email(email);
        self.store
            .sponsorship_repo()
            .get_by_email(&email)
            .await?
            .map(SponsorshipDto::from)
            .ok_or(SponsorshipError::EmailNotFound(email))
    }

    async fn update(
        &self,
        id: i32,
        input: SponsorshipInput,
    ) -> Result<SponsorshipDto, SponsorshipError> {
        let fields = prepare_fields(input)?;
        self.store
            .sponsorship_repo()
            .update(id, fields)
            .await?
            .map(SponsorshipDto::from)
            .ok_or(SponsorshipError::NotFound(id))
    }

    async fn confirm_or_reject(
        &self,
        id: i32,
        confirmed: bool,
        feedback: &str,
    ) -> Result<SponsorshipDto, SponsorshipError> {
        let model = self
            .store
            .sponsorship_repo()
            .set_confirmation(id, confirmed, feedback.trim())
            .await?
            .ok_or(SponsorshipError::NotFound(id))?;

        tracing::info!(
            event = "sponsorship_reviewed",
            sponsorship_id = id,
            confirmed,
            "Sponsorship review recorded"
        );
        Ok(SponsorshipDto::from(model))
    }

    async fn stats(&self) -> Result<SponsorshipStats, SponsorshipError> {
        let counts = self.store.sponsorship_repo().counts().await?;
        Ok(SponsorshipStats {
            total: counts.total,
            confirmed: counts.confirmed,
            pending: counts.total.saturating_sub(counts.confirmed),
        })
    }

    async fn delete(&self, id: i32) -> Result<(), SponsorshipError> {
        if self.store.sponsorship_repo().delete(id).await? {
            Ok(())
        } else {
            Err(SponsorshipError::NotFound(id))
        }
    }
}
