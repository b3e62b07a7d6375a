//! HTTP-level tests for the OpenWeather client against a mock server.

use skyglance_core::model::{Failure, UnitSystem};
use skyglance_core::error::FetchError;
use skyglance_core::weather::{WeatherProvider, openweather::OpenWeatherClient};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn london_payload() -> serde_json::Value {
    serde_json::json!({
        "name": "London",
        "dt": 1_700_000_000,
        "main": { "temp": 11.2, "feels_like": 9.8, "humidity": 81, "pressure": 1009 },
        "weather": [{ "main": "Clouds" }],
        "wind": { "speed": 5.4, "gust": 9.1 }
    })
}

#[tokio::test]
async fn successful_fetch_maps_the_payload() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "London"))
        .and(query_param("appid", "KEY"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(london_payload()))
        .mount(&server)
        .await;

    let client = OpenWeatherClient::with_base_url("KEY".to_string(), server.uri());
    let reading = client.fetch("London", UnitSystem::Metric).await.expect("fetch should succeed");

    assert_eq!(reading.place, "London");
    assert_eq!(reading.temperature, 11.2);
    assert_eq!(reading.condition.as_deref(), Some("Clouds"));
    assert_eq!(reading.wind_speed, Some(5.4));
    assert_eq!(reading.wind_gust, Some(9.1));
}

#[tokio::test]
async fn imperial_unit_reaches_the_query_string() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("units", "imperial"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "London",
            "main": { "temp": 52.0 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = OpenWeatherClient::with_base_url("KEY".to_string(), server.uri());
    let reading = client.fetch("London", UnitSystem::Imperial).await.expect("fetch should succeed");

    assert_eq!(reading.temperature, 52.0);
}

#[tokio::test]
async fn http_404_maps_to_unknown_place() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "cod": "404",
            "message": "city not found"
        })))
        .mount(&server)
        .await;

    let client = OpenWeatherClient::with_base_url("KEY".to_string(), server.uri());
    let err = client.fetch("Atlantis", UnitSystem::Metric).await.unwrap_err();

    match &err {
        FetchError::Provider { status, detail } => {
            assert_eq!(*status, 404);
            assert!(detail.contains("city not found"));
        }
        other => panic!("expected a provider error, got {other:?}"),
    }
    assert_eq!(Failure::from(&err), Failure::UnknownPlace);
}

#[tokio::test]
async fn http_500_keeps_the_status_code() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let client = OpenWeatherClient::with_base_url("KEY".to_string(), server.uri());
    let err = client.fetch("London", UnitSystem::Metric).await.unwrap_err();

    match Failure::from(&err) {
        Failure::Other(detail) => assert!(detail.contains("500")),
        other => panic!("expected Other, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_wind_block_is_not_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "Atacama",
            "main": { "temp": 24.0 },
            "weather": [{ "main": "Clear" }]
        })))
        .mount(&server)
        .await;

    let client = OpenWeatherClient::with_base_url("KEY".to_string(), server.uri());
    let reading = client.fetch("Atacama", UnitSystem::Metric).await.expect("fetch should succeed");

    assert_eq!(reading.wind_speed, None);
    assert_eq!(reading.wind_gust, None);
    assert_eq!(reading.humidity, None);
    assert_eq!(reading.pressure, None);
}

#[tokio::test]
async fn unreachable_server_maps_to_network_error() {
    // Nothing listens here; the connection itself fails.
    let client =
        OpenWeatherClient::with_base_url("KEY".to_string(), "http://127.0.0.1:9".to_string());
    let err = client.fetch("London", UnitSystem::Metric).await.unwrap_err();

    assert!(matches!(err, FetchError::Network(_)));
    assert_eq!(Failure::from(&err), Failure::NoConnection);
}

#[tokio::test]
async fn garbage_body_maps_to_data_shape_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
        .mount(&server)
        .await;

    let client = OpenWeatherClient::with_base_url("KEY".to_string(), server.uri());
    let err = client.fetch("London", UnitSystem::Metric).await.unwrap_err();

    assert!(matches!(err, FetchError::DataShape(_)));
}
