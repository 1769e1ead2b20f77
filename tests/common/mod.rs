//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use alumni_connect::clients::countries::{CountryInfo, CountrySource};
use alumni_connect::clients::mail::Mailer;
use alumni_connect::config::Config;
use alumni_connect::domain::OtpPurpose;
use alumni_connect::state::SharedState;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentCode {
    pub to: String,
    pub code: String,
    pub purpose: OtpPurpose,
}

/// Keeps every code it is asked to deliver.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<SentCode>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<SentCode> {
        self.sent.lock().unwrap().clone()
    }

    pub fn last_code_for(&self, to: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|s| s.to == to)
            .map(|s| s.code.clone())
    }
}

#[async_trait::async_trait]
impl Mailer for RecordingMailer {
    async fn send_verification_code(
        &self,
        to: &str,
        code: &str,
        purpose: OtpPurpose,
        _valid_for: Duration,
    ) -> anyhow::Result<()> {
        self.sent.lock().unwrap().push(SentCode {
            to: to.to_string(),
            code: code.to_string(),
            purpose,
        });
        Ok(())
    }
}

/// Always fails, like an unreachable mail provider.
pub struct FailingMailer;

#[async_trait::async_trait]
impl Mailer for FailingMailer {
    async fn send_verification_code(
        &self,
        _to: &str,
        _code: &str,
        _purpose: OtpPurpose,
        _valid_for: Duration,
    ) -> anyhow::Result<()> {
        anyhow::bail!("provider returned 503")
    }
}

pub struct StaticCountrySource;

#[async_trait::async_trait]
impl CountrySource for StaticCountrySource {
    async fn fetch_countries(&self) -> anyhow::Result<Vec<CountryInfo>> {
        Ok(vec![
            CountryInfo {
                name: "Philippines".to_string(),
                code: "PH".to_string(),
                latitude: Some(13.0),
                longitude: Some(122.0),
            },
            CountryInfo {
                name: "Japan".to_string(),
                code: "JP".to_string(),
                latitude: Some(36.0),
                longitude: Some(138.0),
            },
        ])
    }
}

/// Default config pointed at a fresh database file.
pub fn test_config() -> Config {
    let db_path =
        std::env::temp_dir().join(format!("alumni-connect-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());
    config.server.secure_cookies = false;
    config.countries.seed_on_startup = false;
    config.observability.metrics_enabled = false;
    config
}

pub async fn shared_state_with(config: Config, mailer: Arc<dyn Mailer>) -> SharedState {
    SharedState::with_collaborators(config, mailer, Some(Arc::new(StaticCountrySource)))
        .await
        .expect("failed to build shared state")
}

pub async fn shared_state(mailer: Arc<dyn Mailer>) -> SharedState {
    shared_state_with(test_config(), mailer).await
}

/// Smallest byte string that passes for a PDF upload.
pub fn pdf_bytes(len: usize) -> Vec<u8> {
    let mut data = b"%PDF-1.4\n".to_vec();
    data.resize(len.max(data.len()), b'0');
    data
}
