//! Outbound delivery of verification codes.
//!
//! [`HttpMailer`] posts to a Brevo-compatible transactional email API.
//! [`LogMailer`] is used when mail is disabled and only writes to the log.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::MailConfig;
use crate::domain::OtpPurpose;

#[async_trait]
pub trait Mailer: Send + Sync {
    /// Delivers `code` to `to`. No retries; any failure is returned as-is.
    async fn send_verification_code(
        &self,
        to: &str,
        code: &str,
        purpose: OtpPurpose,
        valid_for: Duration,
    ) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// Builds the message for one verification code.
#[must_use]
pub fn render_verification_email(
    organization: &str,
    code: &str,
    purpose: OtpPurpose,
    valid_for: Duration,
) -> RenderedEmail {
    let (title, heading, intro) = match purpose {
        OtpPurpose::Registration => (
            "Registration Verification Code",
            "Alumni Registration",
            "Thank you for registering. To complete your registration, use the verification code below.",
        ),
        OtpPurpose::Nomination => (
            "Nomination Verification Code",
            "Outstanding Alumni Nomination",
            "You are nominating an alumnus for recognition. To proceed with your nomination, use the verification code below.",
        ),
        OtpPurpose::Sponsorship => (
            "Sponsorship Application Verification Code",
            "Sponsorship Application",
            "Thank you for your interest in sponsoring our event. To continue your application, use the verification code below.",
        ),
    };

    let validity = describe_validity(valid_for);
    let subject = format!("{organization} - {title}");
    let html = format!(
        r#"<!DOCTYPE html>
<html>
<body style="font-family: sans-serif; line-height: 1.6; color: #333;">
  <h1>{organization}</h1>
  <h2>{heading}</h2>
  <p>{intro}</p>
  <p>Your verification code:</p>
  <p style="font-size: 32px; font-weight: bold; letter-spacing: 8px;">{code}</p>
  <p>This code expires in {validity}. If you did not request it, you can ignore this email.</p>
  <p>{organization} Team</p>
</body>
</html>"#
    );
    let text = html_to_text(&html);

    RenderedEmail {
        subject,
        html,
        text,
    }
}

fn describe_validity(valid_for: Duration) -> String {
    let seconds = valid_for.as_secs();
    if seconds >= 60 && seconds % 60 == 0 {
        let minutes = seconds / 60;
        if minutes == 1 {
            "1 minute".to_string()
        } else {
            format!("{minutes} minutes")
        }
    } else {
        format!("{seconds} seconds")
    }
}

fn html_to_text(html: &str) -> String {
    html2text::from_read(html.as_bytes(), 80).unwrap_or_else(|_| html.to_string())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmailAddress {
    email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendEmailBody {
    sender: EmailAddress,
    to: Vec<EmailAddress>,
    subject: String,
    html_content: String,
    text_content: String,
}

#[derive(Clone)]
pub struct HttpMailer {
    client: Client,
    api_url: String,
    api_key: String,
    sender_email: String,
    sender_name: Option<String>,
    organization: String,
}

impl HttpMailer {
    pub fn new(config: &MailConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent("AlumniConnect/1.0")
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .context("Failed to build mail HTTP client")?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            sender_email: config.sender_email.clone(),
            sender_name: config.sender_name.clone(),
            organization: config.organization_name.clone(),
        })
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send_verification_code(
        &self,
        to: &str,
        code: &str,
        purpose: OtpPurpose,
        valid_for: Duration,
    ) -> Result<()> {
        let email = render_verification_email(&self.organization, code, purpose, valid_for);

        let body = SendEmailBody {
            sender: EmailAddress {
                email: self.sender_email.clone(),
                name: self.sender_name.clone(),
            },
            to: vec![EmailAddress {
                email: to.to_string(),
                name: None,
            }],
            subject: email.subject,
            html_content: email.html,
            text_content: email.text,
        };

        debug!(purpose = %purpose, "Sending verification email");

        let response = self
            .client
            .post(&self.api_url)
            .header("api-key", &self.api_key)
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .await
            .context("Mail API request failed")?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        anyhow::bail!("Mail API rejected message (status={status}): {body}")
    }
}

/// Writes codes to the log instead of sending them.
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_verification_code(
        &self,
        to: &str,
        code: &str,
        purpose: OtpPurpose,
        valid_for: Duration,
    ) -> Result<()> {
        info!(
            event = "otp_mail_skipped",
            recipient = %to,
            purpose = %purpose,
            code = %code,
            valid_for_secs = valid_for.as_secs(),
            "Mail delivery disabled; verification code logged"
        );
        Ok(())
    }
}
