use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub otp: OtpConfig,

    pub mail: MailConfig,

    pub countries: CountriesConfig,

    pub admin: AdminSeedConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,

    #[serde(default)]
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Argon2 memory cost in KiB (default: 8192 = 8MB)
    pub argon2_memory_cost_kib: u32,

    /// Argon2 time cost (iterations)
    pub argon2_time_cost: u32,

    /// Argon2 parallelism (default: 1)
    pub argon2_parallelism: u32,

    /// Minimum length accepted for new admin passwords.
    pub min_password_length: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            argon2_memory_cost_kib: 8192,
            argon2_time_cost: 3,
            argon2_parallelism: 1,
            min_password_length: 8,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,

    pub loki_enabled: bool,

    pub loki_url: String,

    pub loki_labels: std::collections::HashMap<String, String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        let mut labels = std::collections::HashMap::new();
        labels.insert("app".to_string(), "alumni-connect".to_string());

        Self {
            metrics_enabled: true,
            loki_enabled: false,
            loki_url: "http://localhost:3100".to_string(),
            loki_labels: labels,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub enabled: bool,

    pub port: u16,

    pub cors_allowed_origins: Vec<String>,

    /// Whether to set the Secure flag on admin session cookies.
    /// Set to false for local development without HTTPS.
    pub secure_cookies: bool,

    /// Admin session inactivity timeout.
    pub session_timeout_minutes: i64,

    /// Request body limit. Must leave room above the 5 MiB payment proof
    /// cap for multipart framing and the other form fields.
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: 8080,
            cors_allowed_origins: vec!["*".to_string()],
            secure_cookies: true,
            session_timeout_minutes: 60,
            max_body_bytes: 8 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,

    pub log_level: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,

    /// Maximum database connections (default: 5)
    pub max_db_connections: u32,

    /// Minimum database connections (default: 1)
    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/alumni-connect.db".to_string(),
            log_level: "info".to_string(),
            worker_threads: 2,
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OtpConfig {
    /// How long an issued code stays consumable.
    pub validity_seconds: u32,

    /// Run the expired-code sweep from the background scheduler.
    pub sweep_enabled: bool,

    pub sweep_interval_minutes: u32,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            validity_seconds: 120,
            sweep_enabled: true,
            sweep_interval_minutes: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    /// When disabled, codes are written to the log instead of being mailed.
    pub enabled: bool,

    /// Transactional email endpoint (Brevo-compatible JSON API).
    pub api_url: String,

    #[serde(skip_serializing)]
    pub api_key: String,

    pub sender_email: String,

    pub sender_name: Option<String>,

    pub request_timeout_seconds: u64,

    /// Shown in message subjects and headers.
    pub organization_name: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_url: "https://api.brevo.com/v3/smtp/email".to_string(),
            api_key: String::new(),
            sender_email: String::new(),
            sender_name: Some("Alumni Connect".to_string()),
            request_timeout_seconds: 15,
            organization_name: "Alumni Connect".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CountriesConfig {
    pub seed_on_startup: bool,

    pub source_url: String,

    pub request_timeout_seconds: u64,
}

impl Default for CountriesConfig {
    fn default() -> Self {
        Self {
            seed_on_startup: true,
            source_url: "https://restcountries.com/v3.1/all?fields=name,cca2,latlng".to_string(),
            request_timeout_seconds: 20,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminSeedConfig {
    pub default_username: String,

    #[serde(skip_serializing)]
    pub default_password: String,

    pub superuser_username: String,

    #[serde(skip_serializing)]
    pub superuser_password: String,
}

impl Default for AdminSeedConfig {
    fn default() -> Self {
        Self {
            default_username: "admin".to_string(),
            default_password: "change-me-admin".to_string(),
            superuser_username: "superadmin".to_string(),
            superuser_password: "change-me-superuser".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            server: ServerConfig::default(),
            otp: OtpConfig::default(),
            mail: MailConfig::default(),
            countries: CountriesConfig::default(),
            admin: AdminSeedConfig::default(),
            observability: ObservabilityConfig::default(),
            security: SecurityConfig::default(),
        }
    }
}

const ENV_DATABASE_PATH: &str = "ALUMNI_CONNECT_DATABASE_PATH";
const ENV_MAIL_API_KEY: &str = "ALUMNI_CONNECT_MAIL_API_KEY";
const ENV_ADMIN_PASSWORD: &str = "ALUMNI_CONNECT_ADMIN_PASSWORD";
const ENV_SUPERUSER_PASSWORD: &str = "ALUMNI_CONNECT_SUPERUSER_PASSWORD";

impl Config {
    pub fn load() -> Result<Self> {
        let paths = Self::config_paths();

        let mut config = None;
        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                config = Some(Self::load_from_path(path)?);
                break;
            }
        }

        let mut config = config.unwrap_or_else(|| {
            info!("No config file found, using defaults");
            Self::default()
        });
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Secrets are kept out of the TOML file when they come from the environment.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var(ENV_DATABASE_PATH) {
            self.general.database_path = path;
        }
        if let Ok(key) = std::env::var(ENV_MAIL_API_KEY) {
            self.mail.api_key = key;
        }
        if let Ok(password) = std::env::var(ENV_ADMIN_PASSWORD) {
            self.admin.default_password = password;
        }
        if let Ok(password) = std::env::var(ENV_SUPERUSER_PASSWORD) {
            self.admin.superuser_password = password;
        }
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        paths.push(PathBuf::from("config.toml"));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("alumni-connect").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".alumni-connect").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.mail.enabled {
            if self.mail.api_url.is_empty() {
                anyhow::bail!("Mail API URL cannot be empty when mail is enabled");
            }
            if self.mail.api_key.is_empty() {
                anyhow::bail!(
                    "Mail API key must be set (config or {ENV_MAIL_API_KEY}) when mail is enabled"
                );
            }
            if self.mail.sender_email.is_empty() {
                anyhow::bail!("Mail sender address cannot be empty when mail is enabled");
            }
        }

        if self.otp.validity_seconds == 0 {
            anyhow::bail!("OTP validity must be greater than zero seconds");
        }

        if self.otp.sweep_enabled && self.otp.sweep_interval_minutes == 0 {
            anyhow::bail!("OTP sweep interval must be > 0 when the sweep is enabled");
        }

        if self.server.max_body_bytes <= crate::constants::MAX_PAYMENT_PROOF_BYTES {
            anyhow::bail!(
                "server.max_body_bytes must exceed the {} byte payment proof limit",
                crate::constants::MAX_PAYMENT_PROOF_BYTES
            );
        }

        Ok(())
    }
}
