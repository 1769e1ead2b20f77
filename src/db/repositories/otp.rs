use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::domain::{OtpPurpose, now_timestamp};
use crate::entities::{otp_codes, prelude::*};

pub struct OtpRepository {
    conn: DatabaseConnection,
}

impl OtpRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn insert(
        &self,
        email: &str,
        code: &str,
        purpose: OtpPurpose,
        expires_at: &str,
    ) -> Result<otp_codes::Model> {
        let active = otp_codes::ActiveModel {
            email: Set(email.to_string()),
            code: Set(code.to_string()),
            purpose: Set(purpose.as_str().to_string()),
            expires_at: Set(expires_at.to_string()),
            used: Set(false),
            created_at: Set(now_timestamp()),
            ..Default::default()
        };

        active
            .insert(&self.conn)
            .await
            .context("Failed to insert verification code")
    }

    /// Newest unconsumed row matching all three fields that expires after `now`.
    pub async fn find_active(
        &self,
        email: &str,
        code: &str,
        purpose: OtpPurpose,
        now: &str,
    ) -> Result<Option<otp_codes::Model>> {
        OtpCodes::find()
            .filter(otp_codes::Column::Email.eq(email))
            .filter(otp_codes::Column::Code.eq(code))
            .filter(otp_codes::Column::Purpose.eq(purpose.as_str()))
            .filter(otp_codes::Column::Used.eq(false))
            .filter(otp_codes::Column::ExpiresAt.gt(now))
            .order_by_desc(otp_codes::Column::Id)
            .one(&self.conn)
            .await
            .context("Failed to query verification code")
    }

    /// Flips `used` for an unconsumed row. Returns false when another
    /// request consumed it first.
    pub async fn mark_used(&self, id: i32) -> Result<bool> {
        let result = OtpCodes::update_many()
            .col_expr(
                otp_codes::Column::Used,
                sea_orm::sea_query::Expr::value(true),
            )
            .filter(otp_codes::Column::Id.eq(id))
            .filter(otp_codes::Column::Used.eq(false))
            .exec(&self.conn)
            .await
            .context("Failed to mark verification code as used")?;

        Ok(result.rows_affected == 1)
    }

    /// Deletes every row that expired before `now`, consumed or not.
    pub async fn delete_expired(&self, now: &str) -> Result<u64> {
        let result = OtpCodes::delete_many()
            .filter(otp_codes::Column::ExpiresAt.lt(now))
            .exec(&self.conn)
            .await
            .context("Failed to delete expired verification codes")?;

        Ok(result.rows_affected)
    }

    pub async fn get(&self, id: i32) -> Result<Option<otp_codes::Model>> {
        OtpCodes::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query verification code by ID")
    }

    pub async fn count_for_email(&self, email: &str) -> Result<u64> {
        OtpCodes::find()
            .filter(otp_codes::Column::Email.eq(email))
            .count(&self.conn)
            .await
            .context("Failed to count verification codes")
    }
}
