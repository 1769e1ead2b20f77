//! `SeaORM` implementation of the `OtpService` trait.

use async_trait::async_trait;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::clients::mail::Mailer;
use crate::constants::otp::{CODE_DIGITS, CODE_SPACE};
use crate::db::Store;
use crate::domain::{OtpPurpose, format_timestamp, is_valid_email, normalize_email, now_timestamp};
use crate::services::otp_service::{IssuedCode, OtpError, OtpService, Verification};

pub struct SeaOrmOtpService {
    store: Store,
    mailer: Arc<dyn Mailer>,
    validity: Duration,
}

impl SeaOrmOtpService {
    #[must_use]
    pub fn new(store: Store, mailer: Arc<dyn Mailer>, validity: Duration) -> Self {
        Self {
            store,
            mailer,
            validity,
        }
    }
}

fn parse_purpose(purpose: &str) -> Result<OtpPurpose, OtpError> {
    purpose
        .parse::<OtpPurpose>()
        .map_err(|e| OtpError::Validation(e.to_string()))
}

fn generate_code() -> String {
    let value = rand::rng().random_range(0..CODE_SPACE);
    format!("{value:0width$}", width = CODE_DIGITS)
}

#[async_trait]
impl OtpService for SeaOrmOtpService {
    async fn issue_code(&self, email: &str, purpose: &str) -> Result<IssuedCode, OtpError> {
        let purpose = parse_purpose(purpose)?;
        let email = normalize_email(email);
        if email.is_empty() {
            return Err(OtpError::Validation("Email is required".to_string()));
        }
        if !is_valid_email(&email) {
            return Err(OtpError::Validation("Invalid email address".to_string()));
        }

        let validity = chrono::Duration::from_std(self.validity)
            .map_err(|e| OtpError::Validation(format!("Invalid validity window: {e}")))?;
        let expires_at = format_timestamp(chrono::Utc::now() + validity);
        let code = generate_code();

        let row = self
            .store
            .otp_repo()
            .insert(&email, &code, purpose, &expires_at)
            .await?;

        metrics::counter!("otp_issued_total", "purpose" => purpose.as_str()).increment(1);

        if let Err(e) = self
            .mailer
            .send_verification_code(&email, &code, purpose, self.validity)
            .await
        {
            warn!(
                event = "otp_delivery_failed",
                otp_id = row.id,
                purpose = %purpose,
                error = %e,
                "Verification code stored but not delivered"
            );
            return Err(OtpError::Delivery(e.to_string()));
        }

        info!(event = "otp_issued", otp_id = row.id, purpose = %purpose, "Verification code sent");

        Ok(IssuedCode {
            id: row.id,
            email,
            purpose,
            code,
            expires_at: row.expires_at,
        })
    }

    async fn consume_code(
        &self,
        email: &str,
        code: &str,
        purpose: &str,
    ) -> Result<Verification, OtpError> {
        let purpose = parse_purpose(purpose)?;
        let email = normalize_email(email);
        let code = code.trim();
        if email.is_empty() || code.is_empty() {
            return Err(OtpError::Validation(
                "Email and code are required".to_string(),
            ));
        }

        let repo = self.store.otp_repo();
        let Some(row) = repo
            .find_active(&email, code, purpose, &now_timestamp())
            .await?
        else {
            return Err(OtpError::InvalidCode);
        };

        if !repo.mark_used(row.id).await? {
            return Err(OtpError::InvalidCode);
        }

        metrics::counter!("otp_verified_total", "purpose" => purpose.as_str()).increment(1);
        info!(event = "otp_verified", otp_id = row.id, purpose = %purpose, "Verification code consumed");

        Ok(Verification {
            verification_id: row.id,
            email,
            purpose,
        })
    }

    async fn sweep_expired(&self) -> Result<u64, OtpError> {
        let removed = self.store.sweep_expired_otps().await?;

        metrics::counter!("otp_swept_total").increment(removed);
        if removed > 0 {
            info!(event = "otp_swept", removed, "Deleted expired verification codes");
        }

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_four_zero_padded_digits() {
        for _ in 0..200 {
            let code = generate_code();
            assert_eq!(code.len(), 4);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn unknown_purpose_is_a_validation_error() {
        assert!(matches!(parse_purpose("login"), Err(OtpError::Validation(_))));
        assert_eq!(parse_purpose("sponsorship").ok(), Some(OtpPurpose::Sponsorship));
    }
}
