use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};
use std::sync::OnceLock;
use tokio::task;
use tracing::info;

use crate::config::SecurityConfig;
use crate::domain::now_timestamp;
use crate::entities::{admins, prelude::*};

/// PHC hash checked in place of a missing account.
static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();

/// Admin data returned from the repository (without the password hash)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admin {
    pub id: i32,
    pub username: String,
    pub is_superuser: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<admins::Model> for Admin {
    fn from(model: admins::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            is_superuser: model.is_superuser,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

pub struct AdminRepository {
    conn: DatabaseConnection,
}

impl AdminRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Hashes `password` on the blocking pool and inserts the account.
    pub async fn create(
        &self,
        username: &str,
        password: &str,
        is_superuser: bool,
        config: &SecurityConfig,
    ) -> Result<Admin> {
        let password = password.to_string();
        let config = config.clone();
        let password_hash = task::spawn_blocking(move || hash_password(&password, &config))
            .await
            .context("Password hashing task panicked")??;

        let now = now_timestamp();
        let active = admins::ActiveModel {
            username: Set(username.to_string()),
            password_hash: Set(password_hash),
            is_superuser: Set(is_superuser),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert admin")?;

        info!(admin_id = model.id, username = %model.username, is_superuser, "Created admin account");
        Ok(Admin::from(model))
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<Admin>> {
        let admin = Admins::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query admin by ID")?;

        Ok(admin.map(Admin::from))
    }

    pub async fn exists(&self, username: &str) -> Result<bool> {
        let count = Admins::find()
            .filter(admins::Column::Username.eq(username))
            .count(&self.conn)
            .await
            .context("Failed to count admins by username")?;
        Ok(count > 0)
    }

    /// Returns the admin when `password` matches the stored hash.
    ///
    /// Unknown usernames are verified against a dummy hash built with the
    /// same cost params, so they take as long as a wrong password.
    /// Note: This uses `spawn_blocking` because Argon2 verification is CPU-intensive
    /// and would block the async runtime if run directly.
    pub async fn verify_password(
        &self,
        username: &str,
        password: &str,
        config: &SecurityConfig,
    ) -> Result<Option<Admin>> {
        let admin = Admins::find()
            .filter(admins::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query admin for password verification")?;

        let stored_hash = admin.as_ref().map(|a| a.password_hash.clone());
        let password = password.to_string();
        let config = config.clone();

        let is_valid = task::spawn_blocking(move || {
            let Some(password_hash) = stored_hash else {
                if let Some(dummy) = dummy_hash(&config) {
                    let _ = verify_against(&password, dummy);
                }
                return Ok(false);
            };
            verify_against(&password, &password_hash)
        })
        .await
        .context("Password verification task panicked")??;

        Ok(admin.filter(|_| is_valid).map(Admin::from))
    }
}

fn verify_against(password: &str, password_hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

fn dummy_hash(config: &SecurityConfig) -> Option<&'static str> {
    DUMMY_HASH
        .get_or_init(|| hash_password("unknown-admin-placeholder", config).ok())
        .as_deref()
}

/// Hash a password using Argon2id with the configured cost params.
pub fn hash_password(password: &str, config: &SecurityConfig) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let params = Params::new(
        config.argon2_memory_cost_kib,
        config.argon2_time_cost,
        config.argon2_parallelism,
        None, // output length (use default)
    )
    .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_phc_string_and_salted() {
        let config = SecurityConfig::default();
        let first = hash_password("correct horse", &config).unwrap();
        let second = hash_password("correct horse", &config).unwrap();

        assert!(first.starts_with("$argon2id$"));
        assert_ne!(first, second);
        assert!(!first.contains("correct horse"));
    }

    #[test]
    fn hash_verifies_with_default_verifier() {
        let config = SecurityConfig::default();
        let hash = hash_password("s3cret-pass", &config).unwrap();
        let parsed = PasswordHash::new(&hash).unwrap();

        assert!(
            Argon2::default()
                .verify_password(b"s3cret-pass", &parsed)
                .is_ok()
        );
        assert!(Argon2::default().verify_password(b"wrong", &parsed).is_err());
    }
}
