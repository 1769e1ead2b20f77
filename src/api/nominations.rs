use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::validation::validate_id;
use super::{ApiError, ApiResponse, AppState, MessageResponse};
use crate::services::{NominationDto, NominationError, NominationInput, NomineeGroup};

impl From<NominationError> for ApiError {
    fn from(err: NominationError) -> Self {
        match err {
            NominationError::NotFound(id) => Self::not_found("Nomination", id),
            NominationError::Validation(msg) => Self::validation(msg),
            err @ NominationError::DuplicateNomination => Self::Conflict(err.to_string()),
            NominationError::Database(msg) => Self::DatabaseError(msg),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CategoryQuery {
    pub category: Option<String>,
}

/// POST /nominations
pub async fn submit_nomination(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NominationInput>,
) -> Result<(StatusCode, Json<ApiResponse<NominationDto>>), ApiError> {
    let nomination = state.nomination_service().submit(payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(nomination))))
}

/// GET /nominations?category=
pub async fn list_nominations(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CategoryQuery>,
) -> Result<Json<ApiResponse<Vec<NominationDto>>>, ApiError> {
    let rows = state
        .nomination_service()
        .list_by_category(query.category.as_deref())
        .await?;
    Ok(Json(ApiResponse::success(rows)))
}

/// GET /nominations/grouped?category=
pub async fn grouped_nominations(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CategoryQuery>,
) -> Result<Json<ApiResponse<Vec<NomineeGroup>>>, ApiError> {
    let groups = state
        .nomination_service()
        .grouped_by_category(query.category.as_deref())
        .await?;
    Ok(Json(ApiResponse::success(groups)))
}

/// DELETE /nominations/{id}
pub async fn delete_nomination(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let id = validate_id("nomination", id)?;
    state.nomination_service().delete(id).await?;
    Ok(Json(ApiResponse::success(MessageResponse::new(
        "Nomination deleted successfully",
    ))))
}
