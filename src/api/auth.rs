use axum::{
    Extension, Json,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::{ApiError, ApiResponse, AppState, MessageResponse};
use crate::constants::session::ADMIN_ID_KEY;
use crate::services::{AdminInfo, AuthError};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct CreateAdminRequest {
    pub username: String,
    pub password: String,
    #[serde(default, alias = "isSuperuser")]
    pub is_superuser: bool,
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => Self::unauthorized("Invalid credentials"),
            AuthError::AdminNotFound => Self::unauthorized("Not authenticated"),
            AuthError::UsernameTaken(username) => {
                Self::Conflict(format!("Username '{username}' is already taken"))
            }
            AuthError::Validation(msg) => Self::validation(msg),
            AuthError::Database(msg) => Self::DatabaseError(msg),
            AuthError::Internal(msg) => Self::internal(msg),
        }
    }
}

// ============================================================================
// Middleware
// ============================================================================

/// Resolves the session's admin and hands it to the handler as an extension.
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let admin_id = get_session_admin_id(&session).await?;

    let admin = match state.auth_service().get_admin(admin_id).await {
        Ok(admin) => admin,
        Err(AuthError::AdminNotFound) => {
            // Account removed while the session was alive
            let _ = session.flush().await;
            return Err(ApiError::unauthorized("Not authenticated"));
        }
        Err(e) => return Err(e.into()),
    };

    tracing::Span::current().record("admin", admin.username.as_str());
    request.extensions_mut().insert(admin);
    Ok(next.run(request).await)
}

/// Must run inside [`require_admin`].
pub async fn require_superuser(
    Extension(admin): Extension<AdminInfo>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !admin.is_superuser {
        tracing::warn!(
            event = "superuser_required",
            admin = %admin.username,
            path = %request.uri().path(),
            "Rejected destructive request from non-superuser"
        );
        return Err(ApiError::forbidden("Superuser privileges required"));
    }
    Ok(next.run(request).await)
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /admin/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AdminInfo>>, ApiError> {
    if payload.username.trim().is_empty() {
        return Err(ApiError::validation("Username is required"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }

    let admin = state
        .auth_service()
        .authenticate(payload.username.trim(), &payload.password)
        .await?;

    // Fresh id on privilege change
    session
        .cycle_id()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))?;
    session
        .insert(ADMIN_ID_KEY, admin.id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))?;

    tracing::info!(event = "admin_login", admin = %admin.username, "Admin logged in");

    Ok(Json(ApiResponse::success(admin)))
}

/// POST /admin/logout
pub async fn logout(session: Session) -> Json<ApiResponse<MessageResponse>> {
    let _ = session.flush().await;
    Json(ApiResponse::success(MessageResponse::new("Logged out")))
}

/// GET /admin/me
pub async fn me(Extension(admin): Extension<AdminInfo>) -> Json<ApiResponse<AdminInfo>> {
    Json(ApiResponse::success(admin))
}

/// POST /admin/create
///
/// Only a superuser may create another superuser.
pub async fn create_admin(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<AdminInfo>,
    Json(payload): Json<CreateAdminRequest>,
) -> Result<Json<ApiResponse<AdminInfo>>, ApiError> {
    if payload.is_superuser && !current.is_superuser {
        return Err(ApiError::forbidden(
            "Only a superuser can create superuser accounts",
        ));
    }

    let created = state
        .auth_service()
        .create_admin(&payload.username, &payload.password, payload.is_superuser)
        .await?;

    tracing::info!(
        event = "admin_created",
        admin = %created.username,
        by = %current.username,
        is_superuser = created.is_superuser,
        "Admin account created"
    );

    Ok(Json(ApiResponse::success(created)))
}

// ============================================================================
// Helpers
// ============================================================================

async fn get_session_admin_id(session: &Session) -> Result<i32, ApiError> {
    session
        .get::<i32>(ADMIN_ID_KEY)
        .await
        .map_err(|e| ApiError::internal(format!("Session error: {e}")))?
        .ok_or_else(|| ApiError::unauthorized("Not authenticated"))
}
