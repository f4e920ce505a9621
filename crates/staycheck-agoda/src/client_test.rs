use super::*;

#[test]
fn blank_site_id_fails_fast() {
    let err = AgodaClient::new("  ", "key").unwrap_err();
    assert!(matches!(err, AgodaError::MissingCredentials(_)), "{err:?}");
}

#[test]
fn blank_api_key_fails_fast() {
    let err = AgodaClient::new("123", "").unwrap_err();
    assert!(matches!(err, AgodaError::MissingCredentials(_)), "{err:?}");
}

#[test]
fn invalid_base_url_is_rejected() {
    let err = AgodaClient::with_base_url("123", "key", "not a url").unwrap_err();
    assert!(matches!(err, AgodaError::Precondition(_)), "{err:?}");
}

#[test]
fn default_retry_policy_is_installed() {
    let client = AgodaClient::new("123", "key").unwrap();
    assert_eq!(client.retry_policy(), &RetryPolicy::default());
}

#[test]
fn parse_results_array() {
    let body = r#"{"results":[{"hotelId":42,"hotelName":"Sea Breeze","dailyRate":88.5,"currency":"USD","landingURL":"https://example.test/h/42"}]}"#;
    let parsed = parse_search_body(body).unwrap();
    assert_eq!(parsed.hotels.len(), 1);
    let hotel = parsed.first().unwrap();
    assert_eq!(hotel.hotel_id, 42);
    assert_eq!(hotel.hotel_name.as_deref(), Some("Sea Breeze"));
    assert_eq!(hotel.daily_rate, Some(88.5));
    assert_eq!(hotel.landing_url.as_deref(), Some("https://example.test/h/42"));
}

#[test]
fn missing_results_key_is_empty() {
    assert!(parse_search_body("{}").unwrap().is_empty());
}

#[test]
fn error_object_becomes_api_error() {
    let body = r#"{"error":{"id":911,"message":"No search result"}}"#;
    let err = parse_search_body(body).unwrap_err();
    assert!(matches!(err, AgodaError::Api { id: 911, ref message } if message == "No search result"));
    assert_eq!(err.code(), 911);
}

#[test]
fn error_object_without_message_uses_placeholder() {
    let err = parse_search_body(r#"{"error":{}}"#).unwrap_err();
    assert!(matches!(err, AgodaError::Api { id: 0, ref message } if message == "Unknown error"));
}

#[test]
fn malformed_json_is_decode_error() {
    let err = parse_search_body("<html>oops</html>").unwrap_err();
    assert!(matches!(err, AgodaError::Decode { .. }), "{err:?}");
}

#[test]
fn non_object_is_protocol_error() {
    let err = parse_search_body("[1,2,3]").unwrap_err();
    assert!(matches!(err, AgodaError::Protocol(_)), "{err:?}");
}

#[test]
fn malformed_results_is_protocol_error() {
    let err = parse_search_body(r#"{"results":"none"}"#).unwrap_err();
    assert!(matches!(err, AgodaError::Protocol(_)), "{err:?}");
}
