//! `SeaORM` implementation of the `AuthService` trait.

use async_trait::async_trait;
use tracing::info;

use crate::config::{AdminSeedConfig, SecurityConfig};
use crate::db::{Store, is_unique_violation};
use crate::services::auth_service::{AdminInfo, AuthError, AuthService, SeedOutcome};

pub struct SeaOrmAuthService {
    store: Store,
    security: SecurityConfig,
    seed: AdminSeedConfig,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, security: SecurityConfig, seed: AdminSeedConfig) -> Self {
        Self {
            store,
            security,
            seed,
        }
    }

    async fn ensure_account(
        &self,
        username: &str,
        password: &str,
        is_superuser: bool,
    ) -> Result<bool, AuthError> {
        if self.store.admin_repo().exists(username).await? {
            return Ok(false);
        }

        match self.create_admin(username, password, is_superuser).await {
            Ok(_) => Ok(true),
            // Another process seeded it between the check and the insert
            Err(AuthError::UsernameTaken(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AdminInfo, AuthError> {
        let admin = self
            .store
            .admin_repo()
            .verify_password(username.trim(), password, &self.security)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;
        Ok(AdminInfo::from(admin))
    }

    async fn create_admin(
        &self,
        username: &str,
        password: &str,
        is_superuser: bool,
    ) -> Result<AdminInfo, AuthError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AuthError::Validation("Username is required".to_string()));
        }

        let min_length = self.security.min_password_length;
        if password.chars().count() < min_length {
            return Err(AuthError::Validation(format!(
                "Password must be at least {min_length} characters"
            )));
        }

        let admin = self
            .store
            .admin_repo()
            .create(username, password, is_superuser, &self.security)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AuthError::UsernameTaken(username.to_string())
                } else {
                    AuthError::from(e)
                }
            })?;

        Ok(AdminInfo::from(admin))
    }

    async fn get_admin(&self, id: i32) -> Result<AdminInfo, AuthError> {
        self.store
            .admin_repo()
            .get_by_id(id)
            .await?
            .map(AdminInfo::from)
            .ok_or(AuthError::AdminNotFound)
    }

    async fn seed_defaults(&self) -> Result<SeedOutcome, AuthError> {
        let admin_created = self
            .ensure_account(&self.seed.default_username, &self.seed.default_password, false)
            .await?;
        let superuser_created = self
            .ensure_account(
                &self.seed.superuser_username,
                &self.seed.superuser_password,
                true,
            )
            .await?;

        if admin_created || superuser_created {
            info!(
                event = "admin_seeded",
                admin_created, superuser_created, "Seeded default admin accounts"
            );
        }

        Ok(SeedOutcome {
            admin_created,
            superuser_created,
        })
    }
}
