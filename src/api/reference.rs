use axum::{Json, extract::State};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState};
use crate::services::{CountryDto, CourseDto, ReferenceError};

impl From<ReferenceError> for ApiError {
    fn from(err: ReferenceError) -> Self {
        match err {
            ReferenceError::ExternalApi { service, message } => {
                Self::ExternalApiError { service, message }
            }
            ReferenceError::Database(msg) => Self::DatabaseError(msg),
        }
    }
}

/// GET /countries
pub async fn list_countries(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<CountryDto>>>, ApiError> {
    let countries = state.reference_service().countries().await?;
    Ok(Json(ApiResponse::success(countries)))
}

/// GET /courses
pub async fn list_courses(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<CourseDto>>>, ApiError> {
    let courses = state.reference_service().courses().await?;
    Ok(Json(ApiResponse::success(courses)))
}
