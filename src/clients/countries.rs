use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::config::CountriesConfig;

#[derive(Debug, Clone, PartialEq)]
pub struct CountryInfo {
    pub name: String,
    /// ISO 3166-1 alpha-2
    pub code: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[async_trait]
pub trait CountrySource: Send + Sync {
    async fn fetch_countries(&self) -> Result<Vec<CountryInfo>>;
}

#[derive(Debug, Deserialize)]
struct RestCountryName {
    common: String,
}

#[derive(Debug, Deserialize)]
struct RestCountry {
    name: RestCountryName,
    #[serde(default)]
    cca2: String,
    #[serde(default)]
    latlng: Vec<f64>,
}

impl From<RestCountry> for CountryInfo {
    fn from(country: RestCountry) -> Self {
        let (latitude, longitude) = match country.latlng.as_slice() {
            [lat, lng, ..] => (Some(*lat), Some(*lng)),
            _ => (None, None),
        };
        Self {
            name: country.name.common.trim().to_string(),
            code: country.cca2,
            latitude,
            longitude,
        }
    }
}

/// Client for the restcountries.com v3.1 API.
#[derive(Clone)]
pub struct RestCountriesClient {
    client: Client,
    source_url: Url,
}

impl RestCountriesClient {
    pub fn new(config: &CountriesConfig) -> Result<Self> {
        let source_url = Url::parse(&config.source_url)
            .with_context(|| format!("Invalid country source URL: {}", config.source_url))?;

        let client = Client::builder()
            .user_agent("AlumniConnect/1.0")
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .context("Failed to build country source HTTP client")?;

        Ok(Self { client, source_url })
    }
}

#[async_trait]
impl CountrySource for RestCountriesClient {
    async fn fetch_countries(&self) -> Result<Vec<CountryInfo>> {
        debug!(url = %self.source_url, "Fetching country list");

        let countries: Vec<RestCountry> = self
            .client
            .get(self.source_url.clone())
            .send()
            .await
            .context("Country source request failed")?
            .error_for_status()
            .context("Country source returned an error status")?
            .json()
            .await
            .context("Failed to decode country list")?;

        let mut countries: Vec<CountryInfo> = countries
            .into_iter()
            .map(CountryInfo::from)
            .filter(|c| !c.name.is_empty())
            .collect();
        countries.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(countries)
    }
}
