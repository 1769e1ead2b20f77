use anyhow::Result;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, SqlErr, Statement,
};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

pub use repositories::admin::Admin;
pub use repositories::alumni::{AlumniFields, AlumniRow, StoredProofRow};
pub use repositories::nomination::{NominationFields, NomineeTally};
pub use repositories::sponsorship::{SponsorshipCounts, SponsorshipFields};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let in_memory = db_url.contains(":memory:");
        if !in_memory {
            let path_str = db_url.trim_start_matches("sqlite://").trim_start_matches("sqlite:");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        // Every pooled connection to an in-memory database is a separate database
        let (max_connections, min_connections) = if in_memory {
            (1, 1)
        } else {
            (max_connections, min_connections)
        };

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    #[must_use]
    pub fn alumni_repo(&self) -> repositories::alumni::AlumniRepository {
        repositories::alumni::AlumniRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn otp_repo(&self) -> repositories::otp::OtpRepository {
        repositories::otp::OtpRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn nomination_repo(&self) -> repositories::nomination::NominationRepository {
        repositories::nomination::NominationRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn sponsorship_repo(&self) -> repositories::sponsorship::SponsorshipRepository {
        repositories::sponsorship::SponsorshipRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn admin_repo(&self) -> repositories::admin::AdminRepository {
        repositories::admin::AdminRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn reference_repo(&self) -> repositories::reference::ReferenceRepository {
        repositories::reference::ReferenceRepository::new(self.conn.clone())
    }

    /// Deletes verification codes that expired before now.
    pub async fn sweep_expired_otps(&self) -> Result<u64> {
        self.otp_repo()
            .delete_expired(&crate::domain::now_timestamp())
            .await
    }
}

/// True when `err` was caused by a unique or primary key constraint.
#[must_use]
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause.downcast_ref::<DbErr>().is_some_and(|db_err| {
            matches!(db_err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
        })
    })
}
