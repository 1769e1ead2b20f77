use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::validation::{validate_email_param, validate_id};
use super::{ApiError, ApiResponse, AppState, MessageResponse};
use crate::services::{SponsorshipDto, SponsorshipError, SponsorshipInput, SponsorshipStats};

impl From<SponsorshipError> for ApiError {
    fn from(err: SponsorshipError) -> Self {
        match err {
            SponsorshipError::NotFound(id) => Self::not_found("Sponsorship", id),
            err @ SponsorshipError::EmailNotFound(_) => Self::NotFound(err.to_string()),
            SponsorshipError::Validation(msg) => Self::validation(msg),
            SponsorshipError::Database(msg) => Self::DatabaseError(msg),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ConfirmRequest {
    pub confirmed: bool,
    #[serde(default)]
    pub feedback: String,
}

/// POST /sponsorships
pub async fn create_sponsorship(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SponsorshipInput>,
) -> Result<(StatusCode, Json<ApiResponse<SponsorshipDto>>), ApiError> {
    let created = state.sponsorship_service().create(payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(created))))
}

/// GET /sponsorships
pub async fn list_sponsorships(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<SponsorshipDto>>>, ApiError> {
    let rows = state.sponsorship_service().list().await?;
    Ok(Json(ApiResponse::success(rows)))
}

/// GET /sponsorships/email/{email}
pub async fn get_sponsorship_by_email(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<Json<ApiResponse<SponsorshipDto>>, ApiError> {
    let email = validate_email_param(&email)?;
    let row = state.sponsorship_service().get_by_email(email).await?;
    Ok(Json(ApiResponse::success(row)))
}

/// GET /sponsorships/stats
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<SponsorshipStats>>, ApiError> {
    let stats = state.sponsorship_service().stats().await?;
    Ok(Json(ApiResponse::success(stats)))
}

/// PUT /sponsorships/{id}
pub async fn update_sponsorship(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<SponsorshipInput>,
) -> Result<Json<ApiResponse<SponsorshipDto>>, ApiError> {
    let id = validate_id("sponsorship", id)?;
    let updated = state.sponsorship_service().update(id, payload).await?;
    Ok(Json(ApiResponse::success(updated)))
}

/// PUT /sponsorships/{id}/confirm
pub async fn confirm_sponsorship(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<ConfirmRequest>,
) -> Result<Json<ApiResponse<SponsorshipDto>>, ApiError> {
    let id = validate_id("sponsorship", id)?;
    let updated = state
        .sponsorship_service()
        .confirm_or_reject(id, payload.confirmed, &payload.feedback)
        .await?;

    Ok(Json(ApiResponse::success(updated)))
}

/// DELETE /sponsorships/{id}
pub async fn delete_sponsorship(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let id = validate_id("sponsorship", id)?;
    state.sponsorship_service().delete(id).await?;
    Ok(Json(ApiResponse::success(MessageResponse::new(
        "Sponsorship deleted successfully",
    ))))
}
