//! Workflow tests for the domain services against a real SQLite file.

mod common;

use alumni_connect::constants::MAX_PAYMENT_PROOF_BYTES;
use alumni_connect::domain::{OtpPurpose, PaymentProof, format_timestamp};
use alumni_connect::services::{
    AlumniError, AlumniProfile, AuthError, NominationError, NominationInput, OtpError,
    OtpService, SeaOrmOtpService, SponsorshipInput,
};
use common::{FailingMailer, RecordingMailer, pdf_bytes, shared_state};
use std::sync::Arc;
use std::time::{Duration, Instant};

fn profile(email: &str) -> AlumniProfile {
    AlumniProfile {
        first_name: "  juan ".to_string(),
        last_name: "dela cruz".to_string(),
        email: email.to_string(),
        year: Some(2018),
        course: "BSCS".to_string(),
        ..AlumniProfile::default()
    }
}

fn nomination(first: &str, nominator: &str, year: i32, category: &str) -> NominationInput {
    NominationInput {
        first_name: first.to_string(),
        last_name: "santos".to_string(),
        nominated_email: None,
        nominator_email: nominator.to_string(),
        year: Some(year),
        category: category.to_string(),
    }
}

fn sponsorship(email: &str) -> SponsorshipInput {
    SponsorshipInput {
        email: email.to_string(),
        level: "Gold".to_string(),
        requirement: "Booth space".to_string(),
        first_name: "Ana".to_string(),
        last_name: "Reyes".to_string(),
        company: "Acme Corp".to_string(),
        address: "Makati City".to_string(),
        contact_number: "09171234567".to_string(),
    }
}

// ============================================================================
// Verification codes
// ============================================================================

#[tokio::test]
async fn issued_code_verifies_exactly_once() {
    let mailer = Arc::new(RecordingMailer::default());
    let state = shared_state(mailer.clone()).await;
    let otp = &state.otp_service;

    let issued = otp
        .issue_code("juan@example.com", "registration")
        .await
        .unwrap();
    let code = mailer.last_code_for("juan@example.com").unwrap();
    assert_eq!(code.len(), 4);
    assert_eq!(issued.code, code);

    let verification = otp
        .consume_code("juan@example.com", &code, "registration")
        .await
        .unwrap();
    assert_eq!(verification.verification_id, issued.id);
    assert_eq!(verification.purpose, OtpPurpose::Registration);

    let again = otp
        .consume_code("juan@example.com", &code, "registration")
        .await;
    assert!(matches!(again, Err(OtpError::InvalidCode)));
}

#[tokio::test]
async fn code_does_not_cross_purposes() {
    let mailer = Arc::new(RecordingMailer::default());
    let state = shared_state(mailer.clone()).await;
    let otp = &state.otp_service;

    otp.issue_code("ana@example.com", "nomination").await.unwrap();
    let code = mailer.last_code_for("ana@example.com").unwrap();

    let wrong_purpose = otp
        .consume_code("ana@example.com", &code, "sponsorship")
        .await;
    assert!(matches!(wrong_purpose, Err(OtpError::InvalidCode)));

    // Still consumable for the purpose it was issued for
    otp.consume_code("ana@example.com", &code, "nomination")
        .await
        .unwrap();
}

#[tokio::test]
async fn expired_code_is_rejected() {
    let state = shared_state(Arc::new(RecordingMailer::default())).await;
    let otp = SeaOrmOtpService::new(
        state.store.clone(),
        Arc::new(RecordingMailer::default()),
        Duration::ZERO,
    );

    let issued = otp
        .issue_code("late@example.com", "registration")
        .await
        .unwrap();

    let result = otp
        .consume_code("late@example.com", &issued.code, "registration")
        .await;
    assert!(matches!(result, Err(OtpError::InvalidCode)));
}

#[tokio::test]
async fn unknown_purpose_is_rejected_before_persistence() {
    let mailer = Arc::new(RecordingMailer::default());
    let state = shared_state(mailer.clone()).await;

    let result = state
        .otp_service
        .issue_code("juan@example.com", "password-reset")
        .await;
    assert!(matches!(result, Err(OtpError::Validation(_))));

    let stored = state
        .store
        .otp_repo()
        .count_for_email("juan@example.com")
        .await
        .unwrap();
    assert_eq!(stored, 0);
    assert!(mailer.sent().is_empty());
}

#[tokio::test]
async fn failed_delivery_keeps_the_stored_code() {
    let state = shared_state(Arc::new(FailingMailer)).await;

    let result = state
        .otp_service
        .issue_code("juan@example.com", "registration")
        .await;
    assert!(matches!(result, Err(OtpError::Delivery(_))));

    let stored = state
        .store
        .otp_repo()
        .count_for_email("juan@example.com")
        .await
        .unwrap();
    assert_eq!(stored, 1);
}

#[tokio::test]
async fn sweep_removes_only_expired_codes() {
    let state = shared_state(Arc::new(RecordingMailer::default())).await;
    let repo = state.store.otp_repo();

    let past = format_timestamp(chrono::Utc::now() - chrono::Duration::minutes(5));
    let future = format_timestamp(chrono::Utc::now() + chrono::Duration::minutes(5));

    let expired_unused = repo
        .insert("a@example.com", "1111", OtpPurpose::Registration, &past)
        .await
        .unwrap();
    let expired_used = repo
        .insert("a@example.com", "2222", OtpPurpose::Registration, &past)
        .await
        .unwrap();
    assert!(repo.mark_used(expired_used.id).await.unwrap());
    let live = repo
        .insert("a@example.com", "3333", OtpPurpose::Registration, &future)
        .await
        .unwrap();

    let removed = state.otp_service.sweep_expired().await.unwrap();
    assert_eq!(removed, 2);

    assert!(repo.get(expired_unused.id).await.unwrap().is_none());
    assert!(repo.get(expired_used.id).await.unwrap().is_none());
    assert!(repo.get(live.id).await.unwrap().is_some());
}

// ============================================================================
// Alumni
// ============================================================================

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let state = shared_state(Arc::new(RecordingMailer::default())).await;
    let alumni = &state.alumni_service;

    let created = alumni
        .create(profile("juan@example.com"), None)
        .await
        .unwrap();
    assert_eq!(created.first_name, "JUAN");
    assert_eq!(created.last_name, "DELA CRUZ");
    assert!(!created.paid);

    let second = alumni.create(profile("juan@example.com"), None).await;
    assert!(matches!(second, Err(AlumniError::Conflict(_))));
}

#[tokio::test]
async fn uppercased_names_survive_a_round_trip() {
    let state = shared_state(Arc::new(RecordingMailer::default())).await;
    let alumni = &state.alumni_service;

    let created = alumni
        .create(profile("maria@example.com"), None)
        .await
        .unwrap();

    let mut again = profile("maria@example.com");
    again.first_name.clone_from(&created.first_name);
    again.last_name.clone_from(&created.last_name);
    let updated = alumni.update(created.id, again, None).await.unwrap();

    assert_eq!(updated.first_name, created.first_name);
    assert_eq!(updated.last_name, created.last_name);
}

#[tokio::test]
async fn changing_email_to_a_taken_one_is_a_conflict() {
    let state = shared_state(Arc::new(RecordingMailer::default())).await;
    let alumni = &state.alumni_service;

    alumni
        .create(profile("first@example.com"), None)
        .await
        .unwrap();
    let second = alumni
        .create(profile("second@example.com"), None)
        .await
        .unwrap();

    let result = alumni
        .update(second.id, profile("first@example.com"), None)
        .await;
    assert!(matches!(result, Err(AlumniError::Conflict(_))));
}

#[tokio::test]
async fn rejected_attachment_leaves_stored_proof_alone() {
    let state = shared_state(Arc::new(RecordingMailer::default())).await;
    let alumni = &state.alumni_service;

    let original = pdf_bytes(2048);
    let created = alumni
        .create(
            profile("paid@example.com"),
            Some(PaymentProof::new(
                "receipt.pdf",
                "application/pdf",
                original.clone(),
            )),
        )
        .await
        .unwrap();
    assert!(created.paid);
    assert_eq!(created.payment_proof.as_deref(), Some("receipt.pdf"));
    assert_eq!(created.payment_proof_size, Some(2048));

    let oversized = PaymentProof::new(
        "big.pdf",
        "application/pdf",
        vec![0; 6 * 1024 * 1024],
    );
    let result = alumni
        .update(created.id, profile("paid@example.com"), Some(oversized))
        .await;
    assert!(matches!(result, Err(AlumniError::Validation(_))));

    let not_pdf = PaymentProof::new("receipt.png", "image/png", vec![1; 64]);
    let result = alumni.attach_proof(created.id, not_pdf).await;
    assert!(matches!(result, Err(AlumniError::Validation(_))));

    let stored = alumni.fetch_attachment(created.id).await.unwrap();
    assert_eq!(stored.filename, "receipt.pdf");
    assert_eq!(stored.data, original);

    // No attachment in the update keeps the stored one
    let updated = alumni
        .update(created.id, profile("paid@example.com"), None)
        .await
        .unwrap();
    assert!(updated.paid);
    assert_eq!(updated.payment_proof.as_deref(), Some("receipt.pdf"));
    let stored = alumni.fetch_attachment(created.id).await.unwrap();
    assert_eq!(stored.size, 2048);
}

#[tokio::test]
async fn attachment_at_the_cap_is_accepted() {
    let state = shared_state(Arc::new(RecordingMailer::default())).await;
    let alumni = &state.alumni_service;

    let created = alumni
        .create(profile("cap@example.com"), None)
        .await
        .unwrap();
    let proof = PaymentProof::new(
        "receipt.pdf",
        "application/pdf",
        pdf_bytes(MAX_PAYMENT_PROOF_BYTES),
    );

    let updated = alumni.attach_proof(created.id, proof).await.unwrap();
    assert!(updated.paid);
    assert_eq!(
        updated.payment_proof_size,
        Some(i64::try_from(MAX_PAYMENT_PROOF_BYTES).unwrap())
    );
}

#[tokio::test]
async fn missing_attachment_and_missing_row_are_distinguished() {
    let state = shared_state(Arc::new(RecordingMailer::default())).await;
    let alumni = &state.alumni_service;

    let created = alumni
        .create(profile("unpaid@example.com"), None)
        .await
        .unwrap();

    assert!(matches!(
        alumni.fetch_attachment(created.id).await,
        Err(AlumniError::NoContent(_))
    ));
    assert!(matches!(
        alumni.fetch_attachment(created.id + 100).await,
        Err(AlumniError::NotFound(_))
    ));
    assert!(matches!(
        alumni.update(created.id + 100, profile("x@example.com"), None).await,
        Err(AlumniError::NotFound(_))
    ));
}

#[tokio::test]
async fn locations_skip_rows_without_coordinates() {
    let state = shared_state(Arc::new(RecordingMailer::default())).await;
    let alumni = &state.alumni_service;

    let mut placed = profile("placed@example.com");
    placed.latitude = Some(14.6);
    placed.longitude = Some(121.0);
    alumni.create(placed, None).await.unwrap();

    let mut zero = profile("zero@example.com");
    zero.latitude = Some(0.0);
    zero.longitude = Some(0.0);
    alumni.create(zero, None).await.unwrap();

    alumni
        .create(profile("nowhere@example.com"), None)
        .await
        .unwrap();

    let located = alumni.locations().await.unwrap();
    assert_eq!(located.len(), 1);
    assert_eq!(located[0].email, "placed@example.com");

    let page = alumni.list(1, 2).await.unwrap();
    assert_eq!(page.total, 3);
    assert_eq!(page.alumni.len(), 2);
}

// ============================================================================
// Nominations
// ============================================================================

#[tokio::test]
async fn one_nomination_per_nominator_and_category() {
    let state = shared_state(Arc::new(RecordingMailer::default())).await;
    let nominations = &state.nomination_service;

    nominations
        .submit(nomination("pedro", "voter@example.com", 2010, "Leadership"))
        .await
        .unwrap();

    let duplicate = nominations
        .submit(nomination("jose", "voter@example.com", 2012, "Leadership"))
        .await;
    assert!(matches!(
        duplicate,
        Err(NominationError::DuplicateNomination)
    ));

    nominations
        .submit(nomination("jose", "voter@example.com", 2012, "Innovation"))
        .await
        .unwrap();
}

#[tokio::test]
async fn grouped_tally_ranks_by_count() {
    let state = shared_state(Arc::new(RecordingMailer::default())).await;
    let nominations = &state.nomination_service;

    for voter in ["a@example.com", "b@example.com", "c@example.com"] {
        nominations
            .submit(nomination("alpha", voter, 1, "X"))
            .await
            .unwrap();
    }
    nominations
        .submit(nomination("bravo", "d@example.com", 2, "X"))
        .await
        .unwrap();
    nominations
        .submit(nomination("charlie", "e@example.com", 3, "Y"))
        .await
        .unwrap();

    let groups = nominations.grouped_by_category(Some("X")).await.unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].first_name, "ALPHA");
    assert_eq!(groups[0].year, 1);
    assert_eq!(groups[0].count, 3);
    assert_eq!(groups[1].first_name, "BRAVO");
    assert_eq!(groups[1].count, 1);

    let all = nominations.list_by_category(None).await.unwrap();
    assert_eq!(all.len(), 5);
    let only_y = nominations.list_by_category(Some("Y")).await.unwrap();
    assert_eq!(only_y.len(), 1);
    assert_eq!(nominations.count().await.unwrap(), 5);
}

// ============================================================================
// Sponsorships
// ============================================================================

#[tokio::test]
async fn confirmation_touches_only_review_fields() {
    let state = shared_state(Arc::new(RecordingMailer::default())).await;
    let sponsorships = &state.sponsorship_service;

    let first = sponsorships
        .create(sponsorship("ana@example.com"))
        .await
        .unwrap();
    sponsorships
        .create(sponsorship("ben@example.com"))
        .await
        .unwrap();
    sponsorships
        .create(sponsorship("cruz@example.com"))
        .await
        .unwrap();

    let confirmed = sponsorships
        .confirm_or_reject(first.id, true, "See you there")
        .await
        .unwrap();
    assert!(confirmed.confirmed);
    assert_eq!(confirmed.feedback, "See you there");
    assert_eq!(confirmed.company, first.company);
    assert_eq!(confirmed.level, first.level);
    assert_eq!(confirmed.email, first.email);

    let stats = sponsorships.stats().await.unwrap();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.confirmed, 1);
    assert_eq!(stats.pending, stats.total - stats.confirmed);

    let missing = sponsorships.confirm_or_reject(first.id + 100, true, "").await;
    assert!(missing.is_err());

    let by_email = sponsorships.get_by_email("ana@example.com").await.unwrap();
    assert_eq!(by_email.id, first.id);
}

// ============================================================================
// Admin accounts
// ============================================================================

#[tokio::test]
async fn bad_username_and_bad_password_look_the_same() {
    let state = shared_state(Arc::new(RecordingMailer::default())).await;
    let auth = &state.auth_service;

    auth.create_admin("registrar", "correct horse", false)
        .await
        .unwrap();

    let wrong_password = auth
        .authenticate("registrar", "wrong horse")
        .await
        .unwrap_err();
    let unknown_user = auth
        .authenticate("nobody", "correct horse")
        .await
        .unwrap_err();

    assert!(matches!(wrong_password, AuthError::InvalidCredentials));
    assert!(matches!(unknown_user, AuthError::InvalidCredentials));
    assert_eq!(wrong_password.to_string(), unknown_user.to_string());

    let admin = auth
        .authenticate("registrar", "correct horse")
        .await
        .unwrap();
    assert_eq!(admin.username, "registrar");
    assert!(!admin.is_superuser);
}

#[tokio::test]
async fn unknown_username_costs_as_much_as_wrong_password() {
    let state = shared_state(Arc::new(RecordingMailer::default())).await;
    let auth = &state.auth_service;

    auth.create_admin("registrar", "correct horse", false)
        .await
        .unwrap();
    // First miss builds the placeholder hash
    let _ = auth.authenticate("nobody", "correct horse").await;

    let mut unknown = Duration::MAX;
    let mut wrong = Duration::MAX;
    for _ in 0..3 {
        let start = Instant::now();
        let _ = auth.authenticate("nobody", "correct horse").await;
        unknown = unknown.min(start.elapsed());

        let start = Instant::now();
        let _ = auth.authenticate("registrar", "wrong horse").await;
        wrong = wrong.min(start.elapsed());
    }

    assert!(
        unknown * 10 >= wrong && wrong * 10 >= unknown,
        "unknown user took {unknown:?}, wrong password took {wrong:?}"
    );
}

#[tokio::test]
async fn admin_creation_checks_password_and_username() {
    let state = shared_state(Arc::new(RecordingMailer::default())).await;
    let auth = &state.auth_service;

    assert!(matches!(
        auth.create_admin("short", "1234567", false).await,
        Err(AuthError::Validation(_))
    ));

    auth.create_admin("dean", "long enough", true).await.unwrap();
    assert!(matches!(
        auth.create_admin("dean", "another one", false).await,
        Err(AuthError::UsernameTaken(_))
    ));
}

#[tokio::test]
async fn seeding_is_idempotent() {
    let state = shared_state(Arc::new(RecordingMailer::default())).await;

    let first = state.auth_service.seed_defaults().await.unwrap();
    assert!(first.admin_created);
    assert!(first.superuser_created);

    let second = state.auth_service.seed_defaults().await.unwrap();
    assert!(!second.admin_created);
    assert!(!second.superuser_created);

    state.seed().await.unwrap();
    state.seed().await.unwrap();

    let courses = state.reference_service.courses().await.unwrap();
    assert_eq!(courses.len(), 6);
    let countries = state.reference_service.countries().await.unwrap();
    assert_eq!(countries.len(), 2);
}
