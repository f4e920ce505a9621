//! End-to-end verification against a wiremock endpoint.

use serde_json::json;
use staycheck_agoda::{AgodaClient, RetryPolicy};
use staycheck_verify::{AttemptOutcome, AvailabilityStatus, AvailabilityVerifier, StayLength};
use wiremock::matchers::{body_partial_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> AgodaClient {
    AgodaClient::with_base_url("1844104", "test-key", base_url)
        .expect("client construction should not fail")
        .with_retry_policy(RetryPolicy::immediate(3))
}

async fn request_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .map_or(0, |requests| requests.len())
}

#[tokio::test]
async fn sold_out_two_night_windows_fall_back_to_one_night() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "criteria": { "hotelId": [3141] } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
        .up_to_n_times(3)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "criteria": { "hotelId": [3141] } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{ "hotelId": 3141, "hotelName": "Rice Terrace Lodge", "dailyRate": 2750.0 }]
        })))
        .mount(&server)
        .await;

    let mut verifier = AvailabilityVerifier::new(test_client(&server.uri()));
    let result = verifier.verify(3141, "INR", 2).await.expect("verification runs");

    assert_eq!(result.status, AvailabilityStatus::Available);
    assert_eq!(result.hotel_name.as_deref(), Some("Rice Terrace Lodge"));
    assert_eq!(result.daily_rate, Some(2750.0));
    assert_eq!(result.attempts.len(), 4);
    assert_eq!(
        result.successful_dates.map(|w| w.stay),
        Some(StayLength::OneNight)
    );
    assert_eq!(request_count(&server).await, 4);
}

#[tokio::test]
async fn persistent_outage_reports_unavailable_with_last_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let mut verifier = AvailabilityVerifier::new(test_client(&server.uri()));
    let result = verifier.verify(2718, "USD", 2).await.expect("verification runs");

    assert_eq!(result.status, AvailabilityStatus::Unavailable);
    assert_eq!(result.attempts.len(), 6);
    assert!(result
        .attempts
        .iter()
        .all(|a| matches!(a.outcome, AttemptOutcome::Error(_))));
    let message = result.error_message.expect("last error is kept");
    assert!(message.contains("Service Unavailable"), "{message}");
    // Six probes, three transport attempts each.
    assert_eq!(request_count(&server).await, 18);
}

#[tokio::test]
async fn unauthorized_probes_are_recorded_not_fatal() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let mut verifier = AvailabilityVerifier::new(test_client(&server.uri()));
    let result = verifier.verify(99, "USD", 1).await.expect("verification runs");

    assert_eq!(result.status, AvailabilityStatus::Unavailable);
    assert!(result
        .error_message
        .as_deref()
        .is_some_and(|m| m.contains("Quota exceeded")));
    assert_eq!(request_count(&server).await, 6);
}
