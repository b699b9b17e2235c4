//! Open-Meteo client against a wiremock server

use std::time::Duration;

use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use widget_board::api::{Endpoints, OpenMeteo, LOCATION_NOT_FOUND, LOOKUP_FAILED, WEATHER_FAILED};
use widget_board::error::BoardError;
use widget_board::state::{MapPoint, WidgetDescriptor};

fn client_for(server: &MockServer) -> OpenMeteo {
    let base = server.uri();
    OpenMeteo::new(Endpoints {
        geocoding_url: format!("{base}/v1/search"),
        forecast_url: format!("{base}/v1/forecast"),
        geolocation_url: format!("{base}/json/"),
        language: "en".into(),
        timeout: Duration::from_secs(5),
    })
    .unwrap()
}

#[tokio::test]
async fn test_geocode_takes_first_result() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("name", "London"))
        .and(query_param("count", "1"))
        .and(query_param("language", "en"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [
                { "name": "London", "latitude": 51.5, "longitude": -0.12, "country": "UK" },
                { "name": "London", "latitude": 42.98, "longitude": -81.23 }
            ]
        })))
        .mount(&server)
        .await;

    let descriptor = client_for(&server).geocode("London").await.unwrap();

    assert_eq!(descriptor, WidgetDescriptor::new(51.5, -0.12, "London"));
}

#[tokio::test]
async fn test_geocode_without_results_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "generationtime_ms": 0.5 })),
        )
        .mount(&server)
        .await;

    let err = client_for(&server).geocode("Qwzxv").await.unwrap_err();

    assert_eq!(err, BoardError::Lookup(LOCATION_NOT_FOUND.into()));
}

#[tokio::test]
async fn test_geocode_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client_for(&server).geocode("Paris").await.unwrap_err();

    assert_eq!(err, BoardError::Network(LOOKUP_FAILED.into()));
}

#[tokio::test]
async fn test_current_weather_parses_conditions() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("current_weather", "true"))
        .and(query_param("windspeed_unit", "ms"))
        .and(query_param("timezone", "auto"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "latitude": 51.5,
            "longitude": -0.12,
            "current_weather": {
                "temperature": 14.0,
                "windspeed": 3.2,
                "winddirection": 240,
                "weathercode": 61,
                "is_day": 1,
                "time": "2024-01-01T10:00"
            }
        })))
        .mount(&server)
        .await;

    let conditions = client_for(&server)
        .current_weather(51.5, -0.12)
        .await
        .unwrap();

    assert_eq!(conditions.temperature, 14.0);
    assert_eq!(conditions.wind_speed, 3.2);
    assert_eq!(conditions.weather_code, 61);
    assert_eq!(conditions.time, "2024-01-01T10:00");
}

#[tokio::test]
async fn test_current_weather_malformed_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client_for(&server).current_weather(0.0, 0.0).await.unwrap_err();

    assert_eq!(err, BoardError::Network(WEATHER_FAILED.into()));
}

#[tokio::test]
async fn test_locate_device() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "success",
            "city": "Yekaterinburg",
            "lat": 56.85,
            "lon": 60.61
        })))
        .mount(&server)
        .await;

    let point = client_for(&server).locate_device().await.unwrap();

    assert_eq!(point, MapPoint { lat: 56.85, lon: 60.61 });
}
