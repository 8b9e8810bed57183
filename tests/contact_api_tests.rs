mod test_utils;

use portfolio_contact_backend::{errors::EmailError, settings::AppEnvironment};
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use test_utils::*;

#[actix_rt::test]
async fn valid_submission_returns_200_and_sends_once() {
    let sends = Arc::new(AtomicUsize::new(0));
    let app = TestApp::spawn(accepting_mailer(sends.clone())).await;

    let response = app.post_contact(&valid_body()).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Message sent successfully! I will get back to you soon.");
    assert_eq!(sends.load(Ordering::SeqCst), 1);
}

#[actix_rt::test]
async fn invalid_submission_reports_every_field_error() {
    let sends = Arc::new(AtomicUsize::new(0));
    let app = TestApp::spawn(accepting_mailer(sends.clone())).await;

    let response = app
        .post_contact(&json!({
            "name": "A",
            "email": "ada@example.com",
            "message": "too short"
        }))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);

    let errors = body["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0]["field"], "name");
    assert_eq!(errors[1]["field"], "message");
    assert_eq!(sends.load(Ordering::SeqCst), 0);
}

#[actix_rt::test]
async fn sixth_request_within_window_is_rate_limited() {
    let sends = Arc::new(AtomicUsize::new(0));
    let app = TestApp::spawn(accepting_mailer(sends.clone())).await;

    for _ in 0..5 {
        let response = app.post_contact(&valid_body()).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app.post_contact(&valid_body()).await;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Too many requests. Please try again later.");
    assert_eq!(sends.load(Ordering::SeqCst), 5);
}

#[actix_rt::test]
async fn rate_limit_applies_before_validation() {
    let app = TestApp::spawn(accepting_mailer(Arc::new(AtomicUsize::new(0)))).await;
    let invalid = json!({ "name": "A" });

    for _ in 0..5 {
        let response = app.post_contact(&invalid).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    let response = app.post_contact(&invalid).await;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[actix_rt::test]
async fn forwarded_clients_get_separate_quotas_when_trusted() {
    let config = portfolio_contact_backend::settings::AppConfig {
        trust_forwarded_for: true,
        rate_limit_max_requests: 1,
        ..test_config()
    };
    let app = TestApp::spawn_with_config(accepting_mailer(Arc::new(AtomicUsize::new(0))), config).await;

    let post_as = |ip: &'static str| {
        app.client
            .post(format!("{}/api/contact", app.address))
            .header("x-forwarded-for", ip)
            .json(&valid_body())
            .send()
    };

    assert_eq!(post_as("203.0.113.1").await.unwrap().status(), StatusCode::OK);
    assert_eq!(post_as("203.0.113.1").await.unwrap().status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(post_as("203.0.113.2").await.unwrap().status(), StatusCode::OK);
}

#[actix_rt::test]
async fn missing_credential_returns_500_without_sending() {
    let sends = Arc::new(AtomicUsize::new(0));
    let counter = sends.clone();
    let mut mailer = MockMailer::new();
    mailer.expect_is_configured().return_const(false);
    mailer.expect_send().returning(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        Err(EmailError::MissingApiKey)
    });
    let app = TestApp::spawn(mailer).await;

    let response = app.post_contact(&valid_body()).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Email service is not configured");
    assert_eq!(sends.load(Ordering::SeqCst), 0);
}

fn failing_mailer() -> MockMailer {
    let mut mailer = MockMailer::new();
    mailer.expect_is_configured().return_const(true);
    mailer.expect_send().returning(|_| {
        Err(EmailError::Provider {
            status: 403,
            message: "The API key is invalid".to_string(),
        })
    });
    mailer
}

#[actix_rt::test]
async fn delivery_failure_hides_detail_outside_development() {
    let app = TestApp::spawn_with_config(failing_mailer(), config_for(AppEnvironment::Production)).await;

    let response = app.post_contact(&valid_body()).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Failed to send message. Please try again later.");
    assert!(body.get("error").is_none());
}

#[actix_rt::test]
async fn delivery_failure_includes_detail_in_development() {
    let app = TestApp::spawn_with_config(failing_mailer(), config_for(AppEnvironment::Development)).await;

    let response = app.post_contact(&valid_body()).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("The API key is invalid"));
}

#[actix_rt::test]
async fn health_is_ok_even_when_rate_limited_and_unconfigured() {
    let mut mailer = MockMailer::new();
    mailer.expect_is_configured().return_const(false);
    let app = TestApp::spawn(mailer).await;

    for _ in 0..6 {
        app.post_contact(&valid_body()).await;
    }

    let response = app.get("/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "OK");
    assert!(body["timestamp"].is_string());
}

#[actix_rt::test]
async fn index_lists_available_endpoints() {
    let app = TestApp::spawn(MockMailer::new()).await;

    let response = app.get("/").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Contact Form Backend API");
    assert_eq!(body["endpoints"]["health"], "/health");
    assert_eq!(body["endpoints"]["contact"], "POST /api/contact");
}

#[actix_rt::test]
async fn unknown_routes_return_json_404() {
    let app = TestApp::spawn(MockMailer::new()).await;

    for path in ["/does-not-exist", "/api/unknown", "/api/contact"] {
        let response = app.get(path).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND, "GET {path}");
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Endpoint not found");
    }
}

#[actix_rt::test]
async fn malformed_json_is_rejected_with_400() {
    let app = TestApp::spawn(MockMailer::new()).await;

    let response = app.client
        .post(format!("{}/api/contact", app.address))
        .header("content-type", "application/json")
        .body("{\"name\": ")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
}

#[actix_rt::test]
async fn urlencoded_submission_is_accepted() {
    let sends = Arc::new(AtomicUsize::new(0));
    let app = TestApp::spawn(accepting_mailer(sends.clone())).await;

    let response = app.client
        .post(format!("{}/api/contact", app.address))
        .header("content-type", "application/x-www-form-urlencoded")
        .body("name=Ada+Lovelace&email=ada%40example.com&subject=Hi&message=Let%27s+build+something+together")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(sends.load(Ordering::SeqCst), 1);
}

#[actix_rt::test]
async fn trailing_slash_is_normalized() {
    let sends = Arc::new(AtomicUsize::new(0));
    let app = TestApp::spawn(accepting_mailer(sends.clone())).await;

    let response = app.client
        .post(format!("{}/api/contact/", app.address))
        .json(&valid_body())
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(sends.load(Ordering::SeqCst), 1);
}

#[actix_rt::test]
async fn responses_carry_security_headers() {
    let app = TestApp::spawn(MockMailer::new()).await;

    let response = app.get("/health").await;

    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
    assert!(response.headers().contains_key("x-frame-options"));
}

#[actix_rt::test]
async fn preflight_from_allowed_origin_is_granted_with_credentials() {
    let app = TestApp::spawn(MockMailer::new()).await;

    let response = app.preflight("/api/contact", "http://localhost:5173", "POST").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["access-control-allow-origin"], "http://localhost:5173");
    assert_eq!(response.headers()["access-control-allow-credentials"], "true");
}

#[actix_rt::test]
async fn preflight_from_foreign_origin_is_rejected() {
    let app = TestApp::spawn(MockMailer::new()).await;

    let response = app.preflight("/api/contact", "https://evil.example", "POST").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(!response.headers().contains_key("access-control-allow-origin"));
}

#[actix_rt::test]
async fn preflight_for_methods_other_than_get_and_post_is_rejected() {
    let app = TestApp::spawn(MockMailer::new()).await;

    let response = app.preflight("/api/contact", "http://localhost:5173", "DELETE").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn simple_request_from_allowed_origin_echoes_the_origin() {
    let app = TestApp::spawn(MockMailer::new()).await;

    let response = app.client
        .get(format!("{}/health", app.address))
        .header("Origin", "https://utkarshjaiswal.vercel.app")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "https://utkarshjaiswal.vercel.app"
    );
}

#[actix_rt::test]
async fn non_string_fields_are_reported_as_field_errors() {
    let sends = Arc::new(AtomicUsize::new(0));
    let app = TestApp::spawn(accepting_mailer(sends.clone())).await;

    let response = app
        .post_contact(&json!({
            "name": null,
            "email": 12345,
            "message": "I would love to collaborate on a project."
        }))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["name", "email"]);
    assert_eq!(sends.load(Ordering::SeqCst), 0);
}
