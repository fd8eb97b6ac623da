//! API integration tests. They expect a running server with a fresh
//! database; run with: cargo test -- --ignored

use reqwest::Client;
use serde_json::{Value, json};

const BASE_URL: &str = "http://localhost:8080";

const TEST_EMAIL: &str = "integration.test@kppn.go.id";
const TEST_PASSWORD: &str = "rahasia-sekali";

async fn register_and_login(client: &Client) -> String {
    // Registration is idempotent for the test account: 201 on the first run,
    // 409 afterwards. Both are fine.
    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({
            "email": TEST_EMAIL,
            "password": TEST_PASSWORD,
            "full_name": "Integration Test"
        }))
        .send()
        .await
        .expect("Failed to send register request");
    assert!(
        response.status() == 201 || response.status() == 409,
        "unexpected register status: {}",
        response.status()
    );

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "email": TEST_EMAIL,
            "password": TEST_PASSWORD
        }))
        .send()
        .await
        .expect("Failed to send login request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["access_token"]
        .as_str()
        .expect("No access token in response")
        .to_string()
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "email": TEST_EMAIL,
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_protected_routes_require_token() {
    let client = Client::new();

    for path in ["/api/v1/profile", "/api/v1/attendance", "/api/v1/leave"] {
        let response = client
            .get(format!("{}{}", BASE_URL, path))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), 401, "{} should require auth", path);
    }
}

#[tokio::test]
#[ignore]
async fn test_profile_has_default_entitlements() {
    let client = Client::new();
    let token = register_and_login(&client).await;

    let response = client
        .get(format!("{}/api/v1/profile", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["email"], TEST_EMAIL);
    assert_eq!(body["position"], "Staf Pelaksana");
    assert!(body["annual_leave_balance"].is_i64());
}

#[tokio::test]
#[ignore]
async fn test_check_in_far_from_the_office_is_rejected() {
    let client = Client::new();
    let token = register_and_login(&client).await;

    // Jakarta is a long way from Lhokseumawe.
    let response = client
        .post(format!("{}/api/v1/attendance", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({
            "latitude": -6.175392,
            "longitude": 106.827153
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(
        body["message"]
            .as_str()
            .unwrap_or_default()
            .contains("outside"),
        "unexpected message: {}",
        body["message"]
    );
}

#[tokio::test]
#[ignore]
async fn test_check_in_with_sensor_error_is_rejected() {
    let client = Client::new();
    let token = register_and_login(&client).await;

    let response = client
        .post(format!("{}/api/v1/attendance", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({
            "sensor_error": "permission_denied"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_check_out_before_check_in_is_rejected() {
    let client = Client::new();
    let token = register_and_login(&client).await;

    let response = client
        .put(format!("{}/api/v1/attendance", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({
            "latitude": 5.178827,
            "longitude": 97.149306
        }))
        .send()
        .await
        .expect("Failed to send request");

    // Fresh day: no check-in yet, so the transition is invalid.
    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_logbook_requires_at_least_one_task() {
    let client = Client::new();
    let token = register_and_login(&client).await;

    let response = client
        .post(format!("{}/api/v1/logbook", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({
            "start_time": "08:00:00",
            "end_time": "17:00:00",
            "tasks": []
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_leave_request_with_reversed_dates_is_rejected() {
    let client = Client::new();
    let token = register_and_login(&client).await;

    let response = client
        .post(format!("{}/api/v1/leave", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({
            "leave_type": "annual",
            "start_date": "2024-02-10",
            "end_date": "2024-02-01",
            "reason": "salah input tanggal"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_sick_leave_does_not_touch_the_balance() {
    let client = Client::new();
    let token = register_and_login(&client).await;

    let before: Value = client
        .get(format!("{}/api/v1/profile", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    let response = client
        .post(format!("{}/api/v1/leave", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({
            "leave_type": "sick",
            "start_date": "2024-03-04",
            "end_date": "2024-03-06",
            "reason": "demam berdarah"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let after: Value = client
        .get(format!("{}/api/v1/profile", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    assert_eq!(
        before["annual_leave_balance"],
        after["annual_leave_balance"]
    );
}

#[tokio::test]
#[ignore]
async fn test_recap_reports_tallies() {
    let client = Client::new();
    let token = register_and_login(&client).await;

    let response = client
        .get(format!(
            "{}/api/v1/attendance/recap?start_date=2024-01-01&end_date=2024-12-31",
            BASE_URL
        ))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["data"].is_array());
    assert!(body["summary"]["total_days"].is_u64());
}
