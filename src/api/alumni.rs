use axum::{
    Json,
    body::Body,
    extract::{Multipart, Path, Query, Request, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::multipart::{read_payment_proof, read_profile};
use super::validation::{validate_email_param, validate_id, validate_page, validate_page_size};
use super::{ApiError, ApiResponse, AppState, MessageResponse};
use crate::constants::limits::DEFAULT_PAGE_SIZE;
use crate::services::{AlumniDto, AlumniError, AlumniPage, StoredAttachment};

impl From<AlumniError> for ApiError {
    fn from(err: AlumniError) -> Self {
        match err {
            AlumniError::NotFound(id) => Self::not_found("Alumni", id),
            AlumniError::NoContent(_) => Self::NoContent,
            AlumniError::Validation(msg) => Self::validation(msg),
            AlumniError::Conflict(msg) => Self::Conflict(msg),
            AlumniError::Database(msg) => Self::DatabaseError(msg),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_page_size", alias = "pageSize")]
    pub page_size: u64,
}

const fn default_page() -> u64 {
    1
}

const fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct EmailExistsResponse {
    pub exists: bool,
}

/// GET /alumni
pub async fn list_alumni(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<AlumniPage>>, ApiError> {
    let page = validate_page(query.page)?;
    let page_size = validate_page_size(query.page_size)?;

    let result = state.alumni_service().list(page, page_size).await?;
    Ok(Json(ApiResponse::success(result)))
}

/// GET /alumni/locations
pub async fn list_locations(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<AlumniDto>>>, ApiError> {
    let rows = state.alumni_service().locations().await?;
    Ok(Json(ApiResponse::success(rows)))
}

/// GET /alumni/check-email?email=
pub async fn check_email(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<ApiResponse<EmailExistsResponse>>, ApiError> {
    let email = validate_email_param(&query.email)?;
    let exists = state.alumni_service().email_exists(email).await?;
    Ok(Json(ApiResponse::success(EmailExistsResponse { exists })))
}

/// POST /alumni
///
/// Accepts JSON or `multipart/form-data` with an optional `payment_proof`.
pub async fn create_alumni(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<(StatusCode, Json<ApiResponse<AlumniDto>>), ApiError> {
    let (profile, proof) = read_profile(request).await?;
    let created = state.alumni_service().create(profile, proof).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(created))))
}

/// PUT /alumni/{id}
pub async fn update_alumni(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    request: Request,
) -> Result<Json<ApiResponse<AlumniDto>>, ApiError> {
    let id = validate_id("alumni", id)?;
    let (profile, proof) = read_profile(request).await?;
    let updated = state.alumni_service().update(id, profile, proof).await?;
    Ok(Json(ApiResponse::success(updated)))
}

/// POST /alumni/{id}/payment-proof
pub async fn upload_payment_proof(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<AlumniDto>>, ApiError> {
    let id = validate_id("alumni", id)?;
    let proof = read_payment_proof(multipart).await?;
    let updated = state.alumni_service().attach_proof(id, proof).await?;
    Ok(Json(ApiResponse::success(updated)))
}

/// GET /alumni/{id}/payment-proof
///
/// Streams the stored document back with its declared type and name.
pub async fn get_payment_proof(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Response, ApiError> {
    let id = validate_id("alumni", id)?;
    let attachment = state.alumni_service().fetch_attachment(id).await?;
    attachment_response(attachment)
}

/// DELETE /alumni/{id}
pub async fn delete_alumni(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let id = validate_id("alumni", id)?;
    state.alumni_service().delete(id).await?;
    tracing::info!(event = "alumni_deleted", alumni_id = id, "Alumni deleted");
    Ok(Json(ApiResponse::success(MessageResponse::new(
        "Alumni deleted successfully",
    ))))
}

fn attachment_response(attachment: StoredAttachment) -> Result<Response, ApiError> {
    let disposition = content_disposition(&attachment.filename);

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, attachment.content_type)
        .header(header::CONTENT_DISPOSITION, disposition)
        .header(header::CONTENT_LENGTH, attachment.size)
        .body(Body::from(attachment.data))
        .map_err(|e| ApiError::internal(format!("Failed to build response: {e}")))
        .map(IntoResponse::into_response)
}

/// Plain ASCII fallback plus the RFC 5987 encoded original name.
fn content_disposition(filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let fallback = if fallback.trim().is_empty() {
        "payment-proof.pdf".to_string()
    } else {
        fallback
    };

    format!(
        "inline; filename=\"{}\"; filename*=UTF-8''{}",
        fallback,
        urlencoding::encode(filename)
    )
}
