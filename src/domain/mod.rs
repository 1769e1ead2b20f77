//! Domain primitives shared by the services and the request layer.
//!
//! Verification purposes, payment proof attachments and the small
//! normalisation rules that every write path applies.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::constants::{MAX_PAYMENT_PROOF_BYTES, PAYMENT_PROOF_CONTENT_TYPE};

/// Workflow a verification code is scoped to.
///
/// A code issued for one purpose never verifies for another, even when the
/// numeric code collides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OtpPurpose {
    Registration,
    Nomination,
    Sponsorship,
}

impl OtpPurpose {
    pub const ALL: [Self; 3] = [Self::Registration, Self::Nomination, Self::Sponsorship];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Registration => "registration",
            Self::Nomination => "nomination",
            Self::Sponsorship => "sponsorship",
        }
    }
}

impl fmt::Display for OtpPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPurpose(pub String);

impl fmt::Display for UnknownPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unknown verification purpose '{}'. Expected one of: registration, nomination, sponsorship",
            self.0
        )
    }
}

impl std::error::Error for UnknownPurpose {}

impl FromStr for OtpPurpose {
    type Err = UnknownPurpose;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "registration" => Ok(Self::Registration),
            "nomination" => Ok(Self::Nomination),
            "sponsorship" => Ok(Self::Sponsorship),
            _ => Err(UnknownPurpose(s.to_string())),
        }
    }
}

/// Rejection reasons for an uploaded payment proof.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttachmentError {
    #[error("File size exceeds 5MB limit")]
    TooLarge,

    #[error("Only PDF files are allowed")]
    NotPdf,

    #[error("Payment proof file is empty")]
    Empty,
}

/// A payment proof document as received from the client.
#[derive(Clone, PartialEq, Eq)]
pub struct PaymentProof {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl fmt::Debug for PaymentProof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentProof")
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .field("size", &self.data.len())
            .finish()
    }
}

impl PaymentProof {
    #[must_use]
    pub fn new(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        data: Vec<u8>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            data,
        }
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Size cap first, then the declared type, which must match exactly.
    pub fn validate(&self) -> Result<(), AttachmentError> {
        if self.data.len() > MAX_PAYMENT_PROOF_BYTES {
            return Err(AttachmentError::TooLarge);
        }
        if self.content_type != PAYMENT_PROOF_CONTENT_TYPE {
            return Err(AttachmentError::NotPdf);
        }
        if self.data.is_empty() {
            return Err(AttachmentError::Empty);
        }
        Ok(())
    }
}

/// Person names are stored trimmed and uppercased.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.trim().to_uppercase()
}

/// Emails are compared exactly as stored, so only surrounding whitespace is dropped.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_string()
}

/// Loose shape check: one `@`, no whitespace, a dot in the domain.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid regex pattern defined in code")
    });
    email.len() <= 254 && re.is_match(email)
}

/// Timestamps are stored as fixed-width UTC RFC 3339 strings so that
/// lexical order in SQL matches chronological order.
#[must_use]
pub fn format_timestamp(at: chrono::DateTime<chrono::Utc>) -> String {
    at.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

#[must_use]
pub fn now_timestamp() -> String {
    format_timestamp(chrono::Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn purpose_parses_known_values() {
        assert_eq!(
            "registration".parse::<OtpPurpose>(),
            Ok(OtpPurpose::Registration)
        );
        assert_eq!(" Nomination ".parse::<OtpPurpose>(), Ok(OtpPurpose::Nomination));
        assert_eq!("SPONSORSHIP".parse::<OtpPurpose>(), Ok(OtpPurpose::Sponsorship));
    }

    #[test]
    fn purpose_rejects_unknown_values() {
        let err = "login".parse::<OtpPurpose>().unwrap_err();
        assert_eq!(err, UnknownPurpose("login".to_string()));
        assert!("".parse::<OtpPurpose>().is_err());
    }

    #[test]
    fn purpose_round_trips_through_display() {
        for purpose in OtpPurpose::ALL {
            assert_eq!(purpose.to_string().parse::<OtpPurpose>(), Ok(purpose));
        }
    }

    #[test]
    fn payment_proof_accepts_small_pdf() {
        let proof = PaymentProof::new("receipt.pdf", "application/pdf", vec![1; 1024]);
        assert_eq!(proof.validate(), Ok(()));
        assert_eq!(proof.size(), 1024);
    }

    #[test]
    fn payment_proof_accepts_exactly_the_cap() {
        let proof = PaymentProof::new(
            "receipt.pdf",
            "application/pdf",
            vec![0; MAX_PAYMENT_PROOF_BYTES],
        );
        assert_eq!(proof.validate(), Ok(()));
    }

    #[test]
    fn payment_proof_rejects_oversized_and_wrong_type() {
        let big = PaymentProof::new(
            "receipt.pdf",
            "application/pdf",
            vec![0; MAX_PAYMENT_PROOF_BYTES + 1],
        );
        assert_eq!(big.validate(), Err(AttachmentError::TooLarge));

        let png = PaymentProof::new("receipt.png", "image/png", vec![0; 10]);
        assert_eq!(png.validate(), Err(AttachmentError::NotPdf));

        let with_params = PaymentProof::new("r.pdf", "application/pdf; charset=binary", vec![1]);
        assert_eq!(with_params.validate(), Err(AttachmentError::NotPdf));
    }

    #[test]
    fn name_normalization_is_idempotent() {
        let once = normalize_name("  maria Clara ");
        assert_eq!(once, "MARIA CLARA");
        assert_eq!(normalize_name(&once), once);
    }

    #[test]
    fn email_shape_check() {
        assert!(is_valid_email("juan@example.com"));
        assert!(is_valid_email("a.b+tag@mail.school.edu.ph"));
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("two@@example.com"));
        assert!(!is_valid_email("space in@example.com"));
        assert!(!is_valid_email("user@localhost"));
    }

    #[test]
    fn timestamps_sort_lexically() {
        use chrono::TimeZone;
        let earlier = chrono::Utc.with_ymd_and_hms(2025, 1, 1, 9, 59, 59).unwrap();
        let later = earlier + chrono::Duration::milliseconds(1);
        assert!(format_timestamp(earlier) < format_timestamp(later));
        assert_eq!(format_timestamp(earlier), "2025-01-01T09:59:59.000Z");
    }
}
