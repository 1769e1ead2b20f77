//! `SeaORM` implementation of the `NominationService` trait.

use async_trait::async_trait;

use crate::db::{NominationFields, Store, is_unique_violation};
use crate::domain::{is_valid_email, normalize_email, normalize_name};
use crate::services::nomination_service::{
    NominationDto, NominationError, NominationInput, NominationService, NomineeGroup,
};

pub struct SeaOrmNominationService {
    store: Store,
}

impl SeaOrmNominationService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

fn category_filter(category: Option<&str>) -> Option<&str> {
    category.map(str::trim).filter(|c| !c.is_empty())
}

fn prepare_fields(input: NominationInput) -> Result<NominationFields, NominationError> {
    let fields = NominationFields {
        first_name: normalize_name(&input.first_name),
        last_name: normalize_name(&input.last_name),
        nominated_email: input
            .nominated_email
            .map(|e| normalize_email(&e))
            .filter(|e| !e.is_empty()),
        nominator_email: normalize_email(&input.nominator_email),
        year: input.year.unwrap_or_default(),
        category: input.category.trim().to_string(),
    };

    if fields.first_name.is_empty() || fields.last_name.is_empty() {
        return Err(NominationError::Validation(
            "Nominee first and last name are required".to_string(),
        ));
    }
    if fields.nominator_email.is_empty() {
        return Err(NominationError::Validation(
            "Nominator email is required".to_string(),
        ));
    }
    if !is_valid_email(&fields.nominator_email) {
        return Err(NominationError::Validation(
            "Invalid nominator email address".to_string(),
        ));
    }
    if fields.category.is_empty() {
        return Err(NominationError::Validation("Category is required".to_string()));
    }
    if fields.year <= 0 {
        return Err(NominationError::Validation(
            "Graduation year is required".to_string(),
        ));
    }

    Ok(fields)
}

#[async_trait]
impl NominationService for SeaOrmNominationService {
    async fn submit(&self, input: NominationInput) -> Result<NominationDto, NominationError> {
        let fields = prepare_fields(input)?;

        let model = self
            .store
            .nomination_repo()
            .insert(fields)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    NominationError::DuplicateNomination
                } else {
                    NominationError::from(e)
                }
            })?;

        Ok(NominationDto::from(model))
    }

    async fn list_by_category(
        &self,
        category: Option<&str>,
    ) -> Result<Vec<NominationDto>, NominationError> {
        let rows = self
            .store
            .nomination_repo()
            .list(category_filter(category))
            .await?;
        Ok(rows.into_iter().map(NominationDto::from).collect())
    }

    async fn grouped_by_category(
        &self,
        category: Option<&str>,
    ) -> Result<Vec<NomineeGroup>, NominationError> {
        let rows = self
            .store
            .nomination_repo()
            .grouped(category_filter(category))
            .await?;
        Ok(rows.into_iter().map(NomineeGroup::from).collect())
    }

    async fn count(&self) -> Result<u64, NominationError> {
        Ok(self.store.nomination_repo().count().await?)
    }

    async fn delete(&self, id: i32) -> Result<(), NominationError> {
        if self.store.nomination_repo().delete(id).await? {
            Ok(())
        } else {
            Err(NominationError::NotFound(id))
        }
    }
}
