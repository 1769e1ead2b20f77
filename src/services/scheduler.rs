use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};

use crate::config::OtpConfig;
use crate::services::OtpService;

/// Owns the periodic maintenance jobs.
pub struct Scheduler {
    otp_service: Arc<dyn OtpService>,
    config: OtpConfig,
}

impl Scheduler {
    pub fn new(otp_service: Arc<dyn OtpService>, config: OtpConfig) -> Self {
        Self {
            otp_service,
            config,
        }
    }

    /// Starts the jobs and hands back the running scheduler so the caller
    /// can shut it down. Returns `None` when nothing is enabled.
    pub async fn start(&self) -> Result<Option<JobScheduler>> {
        if !self.config.sweep_enabled {
            info!("Expired code sweep is disabled in config");
            return Ok(None);
        }

        let sched = JobScheduler::new().await?;

        let every_minutes = self.config.sweep_interval_minutes.max(1);
        let every = Duration::from_secs(u64::from(every_minutes) * 60);

        let otp_service = Arc::clone(&self.otp_service);
        let sweep_job = Job::new_repeated_async(every, move |_uuid, _lock| {
            let otp_service = Arc::clone(&otp_service);
            Box::pin(async move {
                let start = std::time::Instant::now();
                info!(event = "job_started", job_name = "sweep_otps", "Starting expired code sweep");

                match otp_service.sweep_expired().await {
                    Ok(removed) => info!(
                        event = "job_finished",
                        job_name = "sweep_otps",
                        removed,
                        duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
                        "Expired code sweep finished"
                    ),
                    Err(e) => {
                        error!(event = "job_failed", job_name = "sweep_otps", error = %e, "Expired code sweep failed");
                    }
                }
            })
        })?;

        sched.add(sweep_job).await?;
        sched.start().await?;

        info!("Expired code sweep scheduled every {} minutes", every_minutes);

        Ok(Some(sched))
    }
}
