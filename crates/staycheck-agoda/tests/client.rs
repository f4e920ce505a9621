//! Integration tests for `AgodaClient` using wiremock HTTP mocks.

use chrono::NaiveDate;
use serde_json::json;
use staycheck_agoda::{
    AgodaClient, AgodaError, CitySearchCriteria, HotelSearch, HotelSearchCriteria, Occupancy,
    RetryPolicy, StayRequest,
};
use wiremock::matchers::{body_partial_json, header, header_exists, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> AgodaClient {
    AgodaClient::with_base_url("1844104", "test-key", base_url)
        .expect("client construction should not fail")
        .with_retry_policy(RetryPolicy::immediate(3))
}

fn stay() -> StayRequest {
    StayRequest::new(
        NaiveDate::from_ymd_opt(2030, 5, 3).unwrap(),
        NaiveDate::from_ymd_opt(2030, 5, 5).unwrap(),
        Occupancy::adults(2),
        "INR",
    )
}

async fn request_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .map_or(0, |requests| requests.len())
}

#[tokio::test]
async fn city_search_sends_credentials_and_parses_results() {
    let server = MockServer::start().await;

    let body = json!({
        "results": [
            {
                "hotelId": 501,
                "hotelName": "Harbour View",
                "starRating": 4.0,
                "reviewScore": 8.7,
                "reviewCount": 1200,
                "dailyRate": 4500.0,
                "crossedOutRate": 5200.0,
                "currency": "INR",
                "discountPercentage": 13.5,
                "freeWifi": true,
                "includeBreakfast": false,
                "landingURL": "https://www.agoda.com/partners/partnersearch.aspx?hid=501"
            },
            { "hotelId": 502, "hotelName": "Old Town Inn" }
        ]
    });

    Mock::given(method("POST"))
        .and(header("Authorization", "1844104:test-key"))
        .and(header_exists("Accept-Encoding"))
        .and(body_partial_json(json!({
            "criteria": { "cityId": 9395, "checkInDate": "2030-05-03" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client
        .search_by_city(&CitySearchCriteria::new(9395, stay()))
        .await
        .expect("should parse results");

    assert_eq!(result.hotels.len(), 2);
    assert_eq!(result.hotels[0].hotel_name.as_deref(), Some("Harbour View"));
    assert_eq!(result.hotels[0].crossed_out_rate, Some(5200.0));
    assert_eq!(result.hotels[1].daily_rate, None);
}

#[tokio::test]
async fn hotel_search_through_trait_hits_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "criteria": { "hotelId": [77] } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client
        .search_hotels(&HotelSearchCriteria::new(vec![77], stay()))
        .await
        .expect("empty result is not an error");
    assert!(result.is_empty());
}

#[tokio::test]
async fn three_503s_exhaust_retries() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .search_by_hotel_ids(&HotelSearchCriteria::new(vec![1], stay()))
        .await
        .unwrap_err();

    assert_eq!(request_count(&server).await, 3);
    match err {
        AgodaError::RetryExhausted { attempts, last } => {
            assert_eq!(attempts, 3);
            assert!(matches!(*last, AgodaError::Server { status: 503, .. }));
        }
        other => panic!("expected RetryExhausted, got {other:?}"),
    }
}

#[tokio::test]
async fn unauthorized_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .search_by_hotel_ids(&HotelSearchCriteria::new(vec![1], stay()))
        .await
        .unwrap_err();

    assert_eq!(request_count(&server).await, 1);
    assert!(matches!(err, AgodaError::Client { status: 401, .. }), "{err:?}");
    assert_eq!(err.status(), Some(401));
    assert!(err.to_string().contains("Invalid API key or Site ID"));
}

#[tokio::test]
async fn api_error_object_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": { "id": 2, "message": "Invalid hotel id" }
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .search_by_hotel_ids(&HotelSearchCriteria::new(vec![1], stay()))
        .await
        .unwrap_err();

    assert_eq!(request_count(&server).await, 1);
    assert!(matches!(err, AgodaError::Api { id: 2, .. }), "{err:?}");
}

#[tokio::test]
async fn malformed_json_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .search_by_hotel_ids(&HotelSearchCriteria::new(vec![1], stay()))
        .await
        .unwrap_err();

    assert_eq!(request_count(&server).await, 1);
    assert!(matches!(err, AgodaError::Decode { .. }), "{err:?}");
}

#[tokio::test]
async fn server_error_then_success_recovers() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "results": [{ "hotelId": 1, "hotelName": "Back Online" }] })),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client
        .search_by_hotel_ids(&HotelSearchCriteria::new(vec![1], stay()))
        .await
        .expect("second attempt should succeed");

    assert_eq!(request_count(&server).await, 2);
    assert_eq!(result.hotels[0].hotel_name.as_deref(), Some("Back Online"));
}

#[tokio::test]
async fn invalid_criteria_never_reach_the_network() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
        .expect(0)
        .mount(&server)
        .await;

    let mut bad = stay();
    bad.occupancy = Occupancy {
        adults: 2,
        children: 1,
        children_ages: Some(vec![4, 9]),
    };

    let client = test_client(&server.uri());
    let err = client
        .search_by_hotel_ids(&HotelSearchCriteria::new(vec![1], bad))
        .await
        .unwrap_err();

    assert!(err.is_precondition(), "{err:?}");
    assert_eq!(request_count(&server).await, 0);
}

#[tokio::test]
async fn connection_refused_exhausts_retries() {
    let client = test_client("http://127.0.0.1:1/");
    let err = client
        .search_by_hotel_ids(&HotelSearchCriteria::new(vec![1], stay()))
        .await
        .unwrap_err();

    assert!(
        matches!(err, AgodaError::RetryExhausted { attempts: 3, .. }),
        "{err:?}"
    );
}

#[tokio::test]
async fn connection_dropped_mid_request_is_retried() {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::io::AsyncReadExt;

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("listener address");
    let accepted = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&accepted);
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            counter.fetch_add(1, Ordering::SeqCst);
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            drop(socket);
        }
    });

    let client = test_client(&format!("http://{addr}/"));
    let err = client
        .search_by_hotel_ids(&HotelSearchCriteria::new(vec![1], stay()))
        .await
        .unwrap_err();

    assert!(
        matches!(err, AgodaError::RetryExhausted { attempts: 3, .. }),
        "{err:?}"
    );
    assert_eq!(accepted.load(Ordering::SeqCst), 3);
}
