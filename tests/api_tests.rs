//! End-to-end tests through the HTTP router.

mod common;

use alumni_connect::api::{self, AppState};
use alumni_connect::clients::mail::Mailer;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use common::{FailingMailer, RecordingMailer, pdf_bytes, shared_state};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

const BOUNDARY: &str = "alumni-test-boundary";

async fn spawn_app(mailer: Arc<dyn Mailer>) -> (Arc<AppState>, Router) {
    let shared = Arc::new(shared_state(mailer).await);
    shared.seed().await.expect("failed to seed");
    let state = api::create_app_state(shared, None);
    let router = api::router(state.clone()).await;
    (state, router)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, headers, body.to_vec())
}

async fn send_json(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, _, body) = send(app, request).await;
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((filename, content_type, data)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"payment_proof\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn multipart_request(method: &str, uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn login(app: &Router, username: &str, password: &str) -> String {
    let (status, headers, _) = send(
        app,
        json_request(
            "POST",
            "/api/admin/login",
            &json!({ "username": username, "password": password }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    headers
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .expect("login should set a session cookie")
        .to_string()
}

fn with_cookie(mut request: Request<Body>, cookie: &str) -> Request<Body> {
    request
        .headers_mut()
        .insert(header::COOKIE, cookie.parse().unwrap());
    request
}

#[tokio::test]
async fn health_reports_database() {
    let (_, app) = spawn_app(Arc::new(RecordingMailer::default())).await;

    let (status, body) = send_json(&app, get("/api/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
}

#[tokio::test]
async fn registration_verification_reports_existing_profile() {
    let mailer = Arc::new(RecordingMailer::default());
    let (_, app) = spawn_app(mailer.clone()).await;
    let email = "juan@example.com";

    let (status, body) = send_json(
        &app,
        json_request(
            "POST",
            "/api/otp/send",
            &json!({ "email": email, "purpose": "registration" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["expires_at"].is_string());
    assert!(body["data"].get("code").is_none());

    let code = mailer.last_code_for(email).unwrap();
    let (status, body) = send_json(
        &app,
        json_request(
            "POST",
            "/api/otp/verify",
            &json!({ "email": email, "code": code, "purpose": "registration" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["verified"], true);
    assert_eq!(body["data"]["alumni_exists"], false);

    let (status, _) = send_json(
        &app,
        json_request(
            "POST",
            "/api/alumni",
            &json!({ "firstName": "juan", "lastName": "luna", "email": email }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    send_json(
        &app,
        json_request(
            "POST",
            "/api/otp/send",
            &json!({ "email": email, "purpose": "registration" }),
        ),
    )
    .await;
    let code = mailer.last_code_for(email).unwrap();
    let (_, body) = send_json(
        &app,
        json_request(
            "POST",
            "/api/otp/verify",
            &json!({ "email": email, "code": code, "purpose": "registration" }),
        ),
    )
    .await;
    assert_eq!(body["data"]["alumni_exists"], true);
    assert_eq!(body["data"]["alumni"]["first_name"], "JUAN");

    // Used codes do not verify twice
    let (status, body) = send_json(
        &app,
        json_request(
            "POST",
            "/api/otp/verify",
            &json!({ "email": email, "code": code, "purpose": "registration" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn unknown_purpose_is_a_bad_request() {
    let mailer = Arc::new(RecordingMailer::default());
    let (_, app) = spawn_app(mailer.clone()).await;

    let (status, body) = send_json(
        &app,
        json_request(
            "POST",
            "/api/otp/send",
            &json!({ "email": "juan@example.com", "purpose": "login" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("login"));
    assert!(mailer.sent().is_empty());
}

#[tokio::test]
async fn mail_failure_is_a_bad_gateway() {
    let (_, app) = spawn_app(Arc::new(FailingMailer)).await;

    let (status, body) = send_json(
        &app,
        json_request(
            "POST",
            "/api/otp/send",
            &json!({ "email": "juan@example.com", "purpose": "sponsorship" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn multipart_registration_stores_payment_proof() {
    let (_, app) = spawn_app(Arc::new(RecordingMailer::default())).await;
    let pdf = pdf_bytes(4096);

    let body = multipart_body(
        &[
            ("firstName", "maria"),
            ("lastName", "clara"),
            ("email", "maria@example.com"),
            ("year", "2015"),
            ("course", "BSIT"),
        ],
        Some(("receipt.pdf", "application/pdf", &pdf)),
    );
    let (status, created) =
        send_json(&app, multipart_request("POST", "/api/alumni", body)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["data"]["paid"], true);
    assert_eq!(created["data"]["payment_proof_size"], 4096);
    let id = created["data"]["id"].as_i64().unwrap();

    let (status, headers, bytes) =
        send(&app, get(&format!("/api/alumni/{id}/payment-proof"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "application/pdf");
    assert_eq!(headers[header::CONTENT_LENGTH], "4096");
    assert!(
        headers[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .contains("receipt.pdf")
    );
    assert_eq!(bytes, pdf);

    let (status, body) = send_json(
        &app,
        get("/api/alumni/check-email?email=maria@example.com"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["exists"], true);
}

#[tokio::test]
async fn form_update_without_coordinates_keeps_stored_ones() {
    let (_, app) = spawn_app(Arc::new(RecordingMailer::default())).await;

    let body = multipart_body(
        &[
            ("firstName", "andres"),
            ("lastName", "bonifacio"),
            ("email", "andres@example.com"),
            ("year", "2010"),
            ("latitude", "10.5"),
            ("longitude", "122.9"),
        ],
        None,
    );
    let (status, created) =
        send_json(&app, multipart_request("POST", "/api/alumni", body)).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["data"]["id"].as_i64().unwrap();

    let body = multipart_body(
        &[
            ("firstName", "andres"),
            ("lastName", "bonifacio"),
            ("email", "andres@example.com"),
            ("city", "Iloilo"),
            ("latitude", ""),
        ],
        None,
    );
    let (status, updated) = send_json(
        &app,
        multipart_request("PUT", &format!("/api/alumni/{id}"), body),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["data"]["city"], "Iloilo");
    assert_eq!(updated["data"]["year"], 2010);
    assert_eq!(updated["data"]["latitude"], 10.5);
    assert_eq!(updated["data"]["longitude"], 122.9);

    let (_, locations) = send_json(&app, get("/api/alumni/locations")).await;
    assert_eq!(locations["data"].as_array().unwrap().len(), 1);

    // JSON bodies replace the whole profile
    let (status, replaced) = send_json(
        &app,
        json_request(
            "PUT",
            &format!("/api/alumni/{id}"),
            &json!({
                "firstName": "andres",
                "lastName": "bonifacio",
                "email": "andres@example.com",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(replaced["data"]["year"], Value::Null);
    assert_eq!(replaced["data"]["latitude"], Value::Null);
}

#[tokio::test]
async fn non_pdf_upload_is_rejected_and_missing_proof_is_no_content() {
    let (_, app) = spawn_app(Arc::new(RecordingMailer::default())).await;

    let (status, created) = send_json(
        &app,
        json_request(
            "POST",
            "/api/alumni",
            &json!({ "first_name": "jose", "last_name": "rizal", "email": "jose@example.com" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["data"]["id"].as_i64().unwrap();

    let (status, headers, bytes) =
        send(&app, get(&format!("/api/alumni/{id}/payment-proof"))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(bytes.is_empty());
    assert!(headers.get(header::CONTENT_TYPE).is_none());

    let body = multipart_body(&[], Some(("receipt.png", "image/png", b"not a pdf")));
    let (status, body) = send_json(
        &app,
        multipart_request("POST", &format!("/api/alumni/{id}/payment-proof"), body),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Only PDF files are allowed");

    let (status, _) = send_json(&app, get("/api/alumni/9999/payment-proof")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn oversized_upload_is_rejected() {
    let (_, app) = spawn_app(Arc::new(RecordingMailer::default())).await;
    let big = vec![b'0'; 6 * 1024 * 1024];

    let body = multipart_body(
        &[
            ("firstName", "big"),
            ("lastName", "file"),
            ("email", "big@example.com"),
        ],
        Some(("receipt.pdf", "application/pdf", &big)),
    );
    let (status, body) = send_json(&app, multipart_request("POST", "/api/alumni", body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (_, body) = send_json(&app, get("/api/alumni/check-email?email=big@example.com")).await;
    assert_eq!(body["data"]["exists"], false);
}

#[tokio::test]
async fn duplicate_nomination_is_a_conflict() {
    let (_, app) = spawn_app(Arc::new(RecordingMailer::default())).await;
    let nomination = json!({
        "firstName": "andres",
        "lastName": "bonifacio",
        "nominatorEmail": "voter@example.com",
        "year": 2001,
        "category": "Service",
    });

    let (status, _) = send_json(&app, json_request("POST", "/api/nominations", &nomination)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) =
        send_json(&app, json_request("POST", "/api/nominations", &nomination)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body["error"],
        "You have already submitted a nomination for this category"
    );

    let (status, body) = send_json(&app, get("/api/nominations/grouped?category=Service")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["first_name"], "ANDRES");
    assert_eq!(body["data"][0]["count"], 1);
}

#[tokio::test]
async fn deletes_require_a_superuser_session() {
    let (state, app) = spawn_app(Arc::new(RecordingMailer::default())).await;
    let seed = state.config().read().await.admin.clone();

    let (_, created) = send_json(
        &app,
        json_request(
            "POST",
            "/api/alumni",
            &json!({ "firstName": "gone", "lastName": "soon", "email": "gone@example.com" }),
        ),
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();
    let uri = format!("/api/alumni/{id}");

    let delete = |cookie: Option<&str>| {
        let request = Request::builder()
            .method("DELETE")
            .uri(&uri)
            .body(Body::empty())
            .unwrap();
        match cookie {
            Some(cookie) => with_cookie(request, cookie),
            None => request,
        }
    };

    let (status, _) = send_json(&app, delete(None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let admin_cookie = login(&app, &seed.default_username, &seed.default_password).await;
    let (status, _) = send_json(&app, delete(Some(&admin_cookie))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send_json(&app, with_cookie(get("/api/admin/me"), &admin_cookie)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], seed.default_username.as_str());

    let super_cookie = login(&app, &seed.superuser_username, &seed.superuser_password).await;
    let (status, _) = send_json(&app, delete(Some(&super_cookie))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send_json(&app, delete(Some(&super_cookie))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send_json(
        &app,
        with_cookie(
            Request::builder()
                .method("POST")
                .uri("/api/admin/logout")
                .body(Body::empty())
                .unwrap(),
            &super_cookie,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send_json(&app, with_cookie(get("/api/admin/me"), &super_cookie)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn failed_login_does_not_say_why() {
    let (state, app) = spawn_app(Arc::new(RecordingMailer::default())).await;
    let seed = state.config().read().await.admin.clone();

    let (status, wrong_password) = send_json(
        &app,
        json_request(
            "POST",
            "/api/admin/login",
            &json!({ "username": seed.default_username, "password": "not-the-password" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, unknown_user) = send_json(
        &app,
        json_request(
            "POST",
            "/api/admin/login",
            &json!({ "username": "ghost", "password": "not-the-password" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password["error"], "Invalid credentials");
    assert_eq!(wrong_password, unknown_user);
}

#[tokio::test]
async fn admin_confirms_sponsorship_and_dashboard_counts_it() {
    let (state, app) = spawn_app(Arc::new(RecordingMailer::default())).await;
    let seed = state.config().read().await.admin.clone();

    let (status, created) = send_json(
        &app,
        json_request(
            "POST",
            "/api/sponsorships",
            &json!({
                "email": "sponsor@example.com",
                "level": "Silver",
                "firstName": "Lea",
                "lastName": "Salonga",
                "company": "Stage Inc",
                "address": "Quezon City",
                "contactNumber": "09181234567",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["data"]["id"].as_i64().unwrap();
    let confirm_uri = format!("/api/sponsorships/{id}/confirm");
    let confirmation = json!({ "confirmed": true, "feedback": "Approved" });

    let (status, _) = send_json(&app, json_request("PUT", &confirm_uri, &confirmation)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let cookie = login(&app, &seed.default_username, &seed.default_password).await;
    let (status, body) = send_json(
        &app,
        with_cookie(json_request("PUT", &confirm_uri, &confirmation), &cookie),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["confirmed"], true);
    assert_eq!(body["data"]["company"], "Stage Inc");

    let (_, stats) = send_json(&app, get("/api/sponsorships/stats")).await;
    assert_eq!(stats["data"]["total"], 1);
    assert_eq!(stats["data"]["confirmed"], 1);
    assert_eq!(stats["data"]["pending"], 0);

    let (status, dashboard) =
        send_json(&app, with_cookie(get("/api/admin/dashboard"), &cookie)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dashboard["data"]["stats"]["sponsorships"]["confirmed"], 1);
    assert_eq!(dashboard["data"]["stats"]["total_nominations"], 0);

    let (status, courses) = send_json(&app, get("/api/courses")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(courses["data"].as_array().unwrap().len(), 6);
}
