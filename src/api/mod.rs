use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{delete, get, post, put},
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::Config;
use crate::services::{
    AlumniService, AuthService, NominationService, OtpService, ReferenceService,
    SponsorshipService,
};
use crate::state::SharedState;

mod admin;
mod alumni;
pub mod auth;
mod error;
mod multipart;
mod nominations;
mod observability;
mod otp;
mod reference;
mod sponsorships;
mod system;
mod types;
mod validation;

pub use error::ApiError;
pub use types::*;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Arc<RwLock<Config>> {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn otp_service(&self) -> &Arc<dyn OtpService> {
        &self.shared.otp_service
    }

    #[must_use]
    pub fn alumni_service(&self) -> &Arc<dyn AlumniService> {
        &self.shared.alumni_service
    }

    #[must_use]
    pub fn nomination_service(&self) -> &Arc<dyn NominationService> {
        &self.shared.nomination_service
    }

    #[must_use]
    pub fn sponsorship_service(&self) -> &Arc<dyn SponsorshipService> {
        &self.shared.sponsorship_service
    }

    #[must_use]
    pub fn auth_service(&self) -> &Arc<dyn AuthService> {
        &self.shared.auth_service
    }

    #[must_use]
    pub fn reference_service(&self) -> &Arc<ReferenceService> {
        &self.shared.reference_service
    }
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

pub async fn router(state: Arc<AppState>) -> Router {
    let server = state.config().read().await.server.clone();

    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(server.secure_cookies)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            server.session_timeout_minutes,
        )));

    let api_router = Router::new()
        .merge(create_public_router())
        .merge(create_admin_router(state.clone()))
        .merge(create_superuser_router(state.clone()))
        .layer(session_layer)
        .layer(DefaultBodyLimit::max(server.max_body_bytes))
        .with_state(state);

    let cors_layer = if server.cors_allowed_origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Credentialed requests need explicit origins, methods and headers
        let origins: Vec<HeaderValue> = server
            .cors_allowed_origins
            .iter()
            .filter_map(|s| s.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(tower_http::cors::AllowMethods::mirror_request())
            .allow_headers(tower_http::cors::AllowHeaders::mirror_request())
            .allow_credentials(true)
    };

    Router::new()
        .nest("/api", api_router)
        .layer(middleware::from_fn(observability::security_headers_middleware))
        .layer(cors_layer)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::logging_middleware))
}

fn create_public_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(system::health))
        .route("/metrics", get(observability::get_metrics))
        .route("/otp/send", post(otp::send_code))
        .route("/otp/verify", post(otp::verify_code))
        .route("/alumni", get(alumni::list_alumni))
        .route("/alumni", post(alumni::create_alumni))
        .route("/alumni/locations", get(alumni::list_locations))
        .route("/alumni/check-email", get(alumni::check_email))
        .route("/alumni/{id}", put(alumni::update_alumni))
        .route(
            "/alumni/{id}/payment-proof",
            get(alumni::get_payment_proof),
        )
        .route(
            "/alumni/{id}/payment-proof",
            post(alumni::upload_payment_proof),
        )
        .route("/nominations", get(nominations::list_nominations))
        .route("/nominations", post(nominations::submit_nomination))
        .route("/nominations/grouped", get(nominations::grouped_nominations))
        .route("/sponsorships", get(sponsorships::list_sponsorships))
        .route("/sponsorships", post(sponsorships::create_sponsorship))
        .route(
            "/sponsorships/email/{email}",
            get(sponsorships::get_sponsorship_by_email),
        )
        .route("/sponsorships/stats", get(sponsorships::get_stats))
        .route("/sponsorships/{id}", put(sponsorships::update_sponsorship))
        .route("/countries", get(reference::list_countries))
        .route("/courses", get(reference::list_courses))
        .route("/admin/login", post(auth::login))
        .route("/admin/logout", post(auth::logout))
}

fn create_admin_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/admin/me", get(auth::me))
        .route("/admin/dashboard", get(admin::dashboard))
        .route("/admin/create", post(auth::create_admin))
        .route(
            "/sponsorships/{id}/confirm",
            put(sponsorships::confirm_sponsorship),
        )
        .route_layer(middleware::from_fn_with_state(state, auth::require_admin))
}

fn create_superuser_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/alumni/{id}", delete(alumni::delete_alumni))
        .route("/nominations/{id}", delete(nominations::delete_nomination))
        .route("/sponsorships/{id}", delete(sponsorships::delete_sponsorship))
        .route_layer(middleware::from_fn(auth::require_superuser))
        .route_layer(middleware::from_fn_with_state(state, auth::require_admin))
}
