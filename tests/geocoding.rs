//! Integration tests for geocoding and position lookup.
//!
//! These tests use wiremock to simulate the search, reverse and IP
//! geolocation endpoints.

use std::{sync::Arc, time::Duration};

use chrono::{TimeZone, Utc};
use prayer_times::{
    config::{NetworkConfig, SearchConfig},
    error::{AppError, LocationError},
    geocoding::{FALLBACK_PLACE_NAME, GeocodingClient},
    geolocation::{LocationProvider, PositionOptions, PositionSource},
    model::Coordinates,
    traits::MockClock,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path, query_param},
};

fn network() -> NetworkConfig {
    NetworkConfig {
        request_timeout_secs: 10,
        connect_timeout_secs: 5,
    }
}

fn geocoder(server: &MockServer) -> GeocodingClient {
    GeocodingClient::new(
        server.uri(),
        "prayer-times-test/1.0",
        SearchConfig::default(),
        &network(),
    )
    .expect("Client creation should succeed")
}

fn coords(lat: f64, lon: f64) -> Coordinates {
    Coordinates::new(lat, lon).unwrap()
}

fn reverse_body(display_name: &str) -> String {
    format!(r#"{{"place_id": 7, "display_name": "{}"}}"#, display_name)
}

// ==================== Search Tests ====================

/// Only settlements above the importance floor survive.
#[tokio::test]
async fn test_search_filters_results() {
    let mock_server = MockServer::start().await;

    let body = r#"[
        {"lat": "48.8534951", "lon": "2.3483915", "display_name": "Paris, Ile-de-France, Metropolitan France, France", "type": "city", "importance": 0.88},
        {"lat": "48.85", "lon": "2.35", "display_name": "Seine, Ile-de-France, France", "type": "river", "importance": 0.6},
        {"lat": "33.66", "lon": "-95.55", "display_name": "Paris, Lamar County, Texas, United States", "type": "town", "importance": 0.05},
        {"lat": "36.30", "lon": "-88.32", "display_name": "Paris, Henry County, Tennessee, United States", "type": "town", "importance": 0.45}
    ]"#;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("format", "json"))
        .and(query_param("q", "Paris"))
        .and(query_param("limit", "10"))
        .and(query_param("addressdetails", "1"))
        .and(header("user-agent", "prayer-times-test/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&mock_server)
        .await;

    let results = geocoder(&mock_server).search_by_name("Paris").await.unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].name, "Paris, France");
    assert_eq!(results[0].details(), "Ile-de-France, Metropolitan France");
    assert_eq!(results[0].coordinates_label(), "48.8535, 2.3484");
    assert_eq!(results[1].name, "Paris, United States");
}

/// Empty text never reaches the network.
#[tokio::test]
async fn test_search_empty_text_is_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .expect(0)
        .mount(&mock_server)
        .await;

    assert!(geocoder(&mock_server).search_by_name("   ").await.is_err());
}

/// Test handling of HTTP 503 errors.
#[tokio::test]
async fn test_search_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let err = geocoder(&mock_server).search_by_name("Paris").await.unwrap_err();
    assert!(err.to_string().contains("503"));
}

// ==================== Reverse Lookup Tests ====================

#[tokio::test]
async fn test_reverse_resolve_shortens_name() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .and(query_param("zoom", "10"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(reverse_body("Mecca, Makkah Region, Saudi Arabia")),
        )
        .mount(&mock_server)
        .await;

    let name = geocoder(&mock_server)
        .reverse_resolve(coords(21.4225, 39.8262))
        .await
        .unwrap();
    assert_eq!(name, "Mecca, Saudi Arabia");
}

/// The detected-position path degrades to the fallback label.
#[tokio::test]
async fn test_describe_falls_back_on_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let name = geocoder(&mock_server).describe(coords(21.4, 39.8)).await;
    assert_eq!(name, FALLBACK_PLACE_NAME);
}

#[tokio::test]
async fn test_describe_falls_back_on_error_payload() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"{"error": "Unable to geocode"}"#),
        )
        .mount(&mock_server)
        .await;

    let name = geocoder(&mock_server).describe(coords(0.0, -30.0)).await;
    assert_eq!(name, "Location detected");
}

// ==================== Coordinate Validation Tests ====================

/// (45, 45) passes range checks and is resolved.
#[tokio::test]
async fn test_validate_place_accepts_land() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .and(query_param("lat", "45"))
        .and(query_param("lon", "45"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(reverse_body("Sagarejo Municipality, Kakheti, Georgia")),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let name = geocoder(&mock_server)
        .validate_place(coords(45.0, 45.0))
        .await
        .unwrap();
    assert_eq!(name, "Sagarejo Municipality, Georgia");
}

#[tokio::test]
async fn test_validate_place_rejects_open_water() {
    for water in ["North Atlantic Ocean", "Mediterranean Sea"] {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/reverse"))
            .respond_with(ResponseTemplate::new(200).set_body_string(reverse_body(water)))
            .mount(&mock_server)
            .await;

        let result = geocoder(&mock_server).validate_place(coords(35.0, 18.0)).await;
        assert_eq!(result, Err(AppError::InvalidPlace), "{} should be rejected", water);
    }
}

#[tokio::test]
async fn test_validate_place_rejects_error_payload() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"{"error": "Unable to geocode"}"#),
        )
        .mount(&mock_server)
        .await;

    let result = geocoder(&mock_server).validate_place(coords(0.0, 0.0)).await;
    assert_eq!(result, Err(AppError::InvalidPlace));
}

/// The explicit coordinate path surfaces network failures.
#[tokio::test]
async fn test_validate_place_surfaces_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&mock_server)
        .await;

    let result = geocoder(&mock_server).validate_place(coords(45.0, 45.0)).await;
    assert!(matches!(result, Err(AppError::Network(msg)) if msg.contains("502")));
}

// ==================== IP Geolocation Tests ====================

fn provider(server: &MockServer, timeout: Duration) -> LocationProvider {
    let source = PositionSource::ip(format!("{}/json", server.uri()), &network()).unwrap();
    let clock = Arc::new(MockClock::new(
        Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap(),
    ));
    LocationProvider::new(
        source,
        PositionOptions {
            timeout,
            ..PositionOptions::default()
        },
        clock,
    )
}

#[tokio::test]
async fn test_ip_position_success_and_cache() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"status": "success", "country": "Saudi Arabia", "lat": 21.4225, "lon": 39.8262}"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = provider(&mock_server, Duration::from_secs(10));
    let first = provider.current_position().await.unwrap();
    // Served from the cache: the mock clock has not moved
    let second = provider.current_position().await.unwrap();

    assert_eq!(first, coords(21.4225, 39.8262));
    assert_eq!(second, first);
}

#[tokio::test]
async fn test_ip_position_fail_status_is_unavailable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"status": "fail", "message": "reserved range"}"#,
        ))
        .mount(&mock_server)
        .await;

    let result = provider(&mock_server, Duration::from_secs(10))
        .current_position()
        .await;
    assert_eq!(result, Err(LocationError::Unavailable));
}

#[tokio::test]
async fn test_ip_position_server_error_is_unavailable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let result = provider(&mock_server, Duration::from_secs(10))
        .current_position()
        .await;
    assert_eq!(result, Err(LocationError::Unavailable));
}

#[tokio::test]
async fn test_ip_position_slow_response_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"status": "success", "lat": 1.0, "lon": 2.0}"#)
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let result = provider(&mock_server, Duration::from_millis(300))
        .current_position()
        .await;
    assert_eq!(result, Err(LocationError::Timeout));
}
