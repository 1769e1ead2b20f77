use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState};
use crate::domain::OtpPurpose;
use crate::services::{AlumniDto, OtpError};

impl From<OtpError> for ApiError {
    fn from(err: OtpError) -> Self {
        match err {
            OtpError::Validation(msg) => Self::validation(msg),
            OtpError::InvalidCode => Self::validation("Invalid or expired code"),
            OtpError::Delivery(msg) => Self::mail_error(msg),
            OtpError::Database(msg) => Self::DatabaseError(msg),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SendCodeRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub purpose: String,
}

#[derive(Debug, Serialize)]
pub struct SendCodeResponse {
    pub message: String,
    pub expires_at: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyCodeRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default, alias = "otp")]
    pub code: String,
    #[serde(default)]
    pub purpose: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyCodeResponse {
    pub verified: bool,
    pub verification_id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alumni_exists: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alumni: Option<AlumniDto>,
}

/// POST /otp/send
pub async fn send_code(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SendCodeRequest>,
) -> Result<Json<ApiResponse<SendCodeResponse>>, ApiError> {
    let issued = state
        .otp_service()
        .issue_code(&payload.email, &payload.purpose)
        .await?;

    Ok(Json(ApiResponse::success(SendCodeResponse {
        message: format!("Verification code sent to {}", issued.email),
        expires_at: issued.expires_at,
    })))
}

/// POST /otp/verify
///
/// For registration codes the response also says whether the address
/// already has a profile, so the form can switch to editing it.
pub async fn verify_code(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<VerifyCodeRequest>,
) -> Result<Json<ApiResponse<VerifyCodeResponse>>, ApiError> {
    let verification = state
        .otp_service()
        .consume_code(&payload.email, &payload.code, &payload.purpose)
        .await?;

    let mut response = VerifyCodeResponse {
        verified: true,
        verification_id: verification.verification_id,
        alumni_exists: None,
        alumni: None,
    };

    if verification.purpose == OtpPurpose::Registration {
        let alumni = state
            .alumni_service()
            .find_by_email(&verification.email)
            .await?;
        response.alumni_exists = Some(alumni.is_some());
        response.alumni = alumni;
    }

    Ok(Json(ApiResponse::success(response)))
}
