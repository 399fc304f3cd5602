//! API integration tests
//!
//! These run against a live server started with the default (memory store,
//! no SMTP) configuration, so reset requests take the simulated path and
//! return the code inline.

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Helper to request a code on the simulated path
async fn request_code(client: &Client, email: &str) -> String {
    let response = client
        .post(format!("{}/recovery/request", BASE_URL))
        .json(&json!({ "email": email }))
        .send()
        .await
        .expect("Failed to send reset request");

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["simulated"], true);
    body["code"].as_str().expect("No code in response").to_string()
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_readiness_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/ready", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
#[ignore]
async fn test_request_reset_rejects_bad_email() {
    let client = Client::new();

    let response = client
        .post(format!("{}/recovery/request", BASE_URL))
        .json(&json!({ "email": "not-an-email" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_request_reset_simulated_returns_code() {
    let client = Client::new();

    let code = request_code(&client, "tester@example.com").await;
    assert_eq!(code.len(), 6);
    assert!(code.chars().all(|c| c.is_ascii_digit()));
}

#[tokio::test]
#[ignore]
async fn test_verify_correct_and_wrong_code() {
    let client = Client::new();
    let code = request_code(&client, "verify@example.com").await;

    let response = client
        .post(format!("{}/recovery/verify", BASE_URL))
        .json(&json!({ "email": "verify@example.com", "code": code }))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["valid"], true);

    let wrong = if code == "000000" { "000001" } else { "000000" };
    let response = client
        .post(format!("{}/recovery/verify", BASE_URL))
        .json(&json!({ "email": "verify@example.com", "code": wrong }))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["valid"], false);
}

#[tokio::test]
#[ignore]
async fn test_verify_rejects_malformed_code() {
    let client = Client::new();

    let response = client
        .post(format!("{}/recovery/verify", BASE_URL))
        .json(&json!({ "email": "verify@example.com", "code": "12ab56" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_reset_rejects_password_mismatch() {
    let client = Client::new();
    let code = request_code(&client, "mismatch@example.com").await;

    let response = client
        .post(format!("{}/recovery/reset", BASE_URL))
        .json(&json!({
            "email": "mismatch@example.com",
            "code": code,
            "new_password": "secret1",
            "confirm_password": "secret2"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_reset_rejects_wrong_code() {
    let client = Client::new();
    let code = request_code(&client, "wrongcode@example.com").await;
    let wrong = if code == "000000" { "000001" } else { "000000" };

    let response = client
        .post(format!("{}/recovery/reset", BASE_URL))
        .json(&json!({
            "email": "wrongcode@example.com",
            "code": wrong,
            "new_password": "secret1",
            "confirm_password": "secret1"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}
