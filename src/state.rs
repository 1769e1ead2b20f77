use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::clients::countries::{CountrySource, RestCountriesClient};
use crate::clients::mail::{HttpMailer, LogMailer, Mailer};
use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AlumniService, AuthService, NominationService, OtpService, ReferenceService,
    SeaOrmAlumniService, SeaOrmAuthService, SeaOrmNominationService, SeaOrmOtpService,
    SeaOrmSponsorshipService, SponsorshipService,
};

/// Builds the mailer the config asks for.
fn build_mailer(config: &Config) -> anyhow::Result<Arc<dyn Mailer>> {
    if config.mail.enabled {
        Ok(Arc::new(HttpMailer::new(&config.mail)?))
    } else {
        info!("Mail delivery disabled; verification codes will be logged");
        Ok(Arc::new(LogMailer))
    }
}

fn build_country_source(config: &Config) -> anyhow::Result<Option<Arc<dyn CountrySource>>> {
    if config.countries.seed_on_startup {
        Ok(Some(Arc::new(RestCountriesClient::new(&config.countries)?)))
    } else {
        Ok(None)
    }
}

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub otp_service: Arc<dyn OtpService>,

    pub alumni_service: Arc<dyn AlumniService>,

    pub nomination_service: Arc<dyn NominationService>,

    pub sponsorship_service: Arc<dyn SponsorshipService>,

    pub auth_service: Arc<dyn AuthService>,

    pub reference_service: Arc<ReferenceService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let mailer = build_mailer(&config)?;
        let country_source = build_country_source(&config)?;
        Self::with_collaborators(config, mailer, country_source).await
    }

    /// Wires every service against the configured database, using the
    /// given outbound collaborators.
    pub async fn with_collaborators(
        config: Config,
        mailer: Arc<dyn Mailer>,
        country_source: Option<Arc<dyn CountrySource>>,
    ) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let otp_service = Arc::new(SeaOrmOtpService::new(
            store.clone(),
            mailer,
            Duration::from_secs(u64::from(config.otp.validity_seconds)),
        )) as Arc<dyn OtpService>;

        let alumni_service =
            Arc::new(SeaOrmAlumniService::new(store.clone())) as Arc<dyn AlumniService>;

        let nomination_service =
            Arc::new(SeaOrmNominationService::new(store.clone())) as Arc<dyn NominationService>;

        let sponsorship_service = Arc::new(SeaOrmSponsorshipService::new(store.clone()))
            as Arc<dyn SponsorshipService>;

        let auth_service = Arc::new(SeaOrmAuthService::new(
            store.clone(),
            config.security.clone(),
            config.admin.clone(),
        )) as Arc<dyn AuthService>;

        let reference_service = Arc::new(ReferenceService::new(store.clone(), country_source));

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            store,
            otp_service,
            alumni_service,
            nomination_service,
            sponsorship_service,
            auth_service,
            reference_service,
        })
    }

    pub async fn config(&self) -> Config {
        self.config.read().await.clone()
    }

    /// Creates the default admin accounts and fills empty reference tables.
    ///
    /// An unreachable country source only logs a warning; the list stays
    /// empty until the next start.
    pub async fn seed(&self) -> anyhow::Result<()> {
        self.auth_service.seed_defaults().await?;

        self.reference_service.seed_courses().await?;

        if let Err(e) = self.reference_service.seed_countries().await {
            warn!(event = "country_seed_skipped", error = %e, "Country list not seeded");
        }

        Ok(())
    }
}
