use axum::{Extension, Json, extract::State};
use serde::Serialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState};
use crate::constants::limits::DASHBOARD_ALUMNI_LIMIT;
use crate::services::{AdminInfo, AlumniDto, NominationDto, SponsorshipStats};

#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub total_alumni: u64,
    pub total_nominations: u64,
    pub sponsorships: SponsorshipStats,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub admin: AdminInfo,
    pub alumni: Vec<AlumniDto>,
    pub nominations: Vec<NominationDto>,
    pub stats: DashboardStats,
}

/// GET /admin/dashboard
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    Extension(admin): Extension<AdminInfo>,
) -> Result<Json<ApiResponse<DashboardResponse>>, ApiError> {
    let alumni = state
        .alumni_service()
        .list(1, DASHBOARD_ALUMNI_LIMIT)
        .await?;
    let nominations = state.nomination_service().list_by_category(None).await?;
    let total_nominations = state.nomination_service().count().await?;
    let sponsorships = state.sponsorship_service().stats().await?;

    Ok(Json(ApiResponse::success(DashboardResponse {
        admin,
        stats: DashboardStats {
            total_alumni: alumni.total,
            total_nominations,
            sponsorships,
        },
        alumni: alumni.alumni,
        nominations,
    })))
}
