//! Decoding of alumni profile submissions.
//!
//! The registration form posts either JSON or `multipart/form-data` with an
//! optional `payment_proof` file part. Both shapes end up as an
//! [`AlumniProfile`] plus an optional [`PaymentProof`].

use axum::{
    Json,
    extract::{FromRequest, Multipart, Request, multipart::Field},
    http::header::CONTENT_TYPE,
};

use super::ApiError;
use crate::constants::{MAX_PAYMENT_PROOF_BYTES, PAYMENT_PROOF_FIELD};
use crate::domain::{AttachmentError, PaymentProof};
use crate::services::AlumniProfile;

fn is_multipart(request: &Request) -> bool {
    request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.trim_start().starts_with("multipart/form-data"))
}

/// Reads a profile from either a JSON or a multipart body.
pub async fn read_profile(
    request: Request,
) -> Result<(AlumniProfile, Option<PaymentProof>), ApiError> {
    if is_multipart(&request) {
        let multipart = Multipart::from_request(request, &())
            .await
            .map_err(|e| ApiError::validation(e.body_text()))?;
        read_multipart_profile(multipart).await
    } else {
        let Json(profile) = Json::<AlumniProfile>::from_request(request, &())
            .await
            .map_err(|e| ApiError::validation(e.body_text()))?;
        Ok((profile, None))
    }
}

/// Reads only the payment proof part; other fields are ignored.
pub async fn read_payment_proof(mut multipart: Multipart) -> Result<PaymentProof, ApiError> {
    while let Some(field) = next_field(&mut multipart).await? {
        if field.name() == Some(PAYMENT_PROOF_FIELD)
            && let Some(proof) = read_file_field(field).await?
        {
            return Ok(proof);
        }
    }
    Err(ApiError::validation("No payment proof file was uploaded"))
}

async fn read_multipart_profile(
    mut multipart: Multipart,
) -> Result<(AlumniProfile, Option<PaymentProof>), ApiError> {
    let mut profile = AlumniProfile {
        keep_missing_numbers: true,
        ..AlumniProfile::default()
    };
    let mut proof = None;

    while let Some(field) = next_field(&mut multipart).await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == PAYMENT_PROOF_FIELD || name == "paymentProof" {
            proof = read_file_field(field).await?;
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| ApiError::validation(e.body_text()))?;
        apply_form_field(&mut profile, &name, value)?;
    }

    Ok((profile, proof))
}

async fn next_field(multipart: &mut Multipart) -> Result<Option<Field<'_>>, ApiError> {
    multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(e.body_text()))
}

/// Accumulates the part chunk by chunk and stops as soon as the cap is
/// passed. A part with no filename and no bytes is an unselected file input.
async fn read_file_field(mut field: Field<'_>) -> Result<Option<PaymentProof>, ApiError> {
    let filename = field.file_name().unwrap_or_default().to_string();
    let content_type = field.content_type().unwrap_or_default().to_string();

    let mut data = Vec::new();
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| ApiError::validation(e.body_text()))?
    {
        if data.len() + chunk.len() > MAX_PAYMENT_PROOF_BYTES {
            return Err(ApiError::validation(AttachmentError::TooLarge.to_string()));
        }
        data.extend_from_slice(&chunk);
    }

    if filename.is_empty() && data.is_empty() {
        return Ok(None);
    }

    Ok(Some(PaymentProof::new(filename, content_type, data)))
}

fn apply_form_field(
    profile: &mut AlumniProfile,
    name: &str,
    value: String,
) -> Result<(), ApiError> {
    match name {
        "first_name" | "firstName" => profile.first_name = value,
        "last_name" | "lastName" => profile.last_name = value,
        "email" => profile.email = value,
        "phone" => profile.phone = value,
        "year" => profile.year = parse_optional(name, &value)?,
        "course" => profile.course = value,
        "company" => profile.company = value,
        "position" => profile.position = value,
        "country" => profile.country = value,
        "city" => profile.city = value,
        "latitude" => profile.latitude = parse_optional(name, &value)?,
        "longitude" => profile.longitude = parse_optional(name, &value)?,
        "is_verified" | "isVerified" => profile.is_verified = parse_flag(&value),
        "paid" => profile.paid = parse_flag(&value),
        _ => {}
    }
    Ok(())
}

fn parse_optional<T: std::str::FromStr>(name: &str, value: &str) -> Result<Option<T>, ApiError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|_| ApiError::validation(format!("Invalid value for {name}: {value}")))
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "on" | "yes"
    )
}
