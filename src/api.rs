//! Open-Meteo API client (plus a one-shot IP geolocation lookup)

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::conditions::CurrentConditions;
use crate::error::BoardError;
use crate::state::{MapPoint, WidgetDescriptor};

pub const GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
pub const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";
pub const GEOLOCATION_URL: &str = "http://ip-api.com/json/";

pub const LOOKUP_FAILED: &str = "Could not look up the location";
pub const LOCATION_NOT_FOUND: &str = "Location not found";
pub const WEATHER_FAILED: &str = "Could not update weather data";

/// Endpoints and request options for [`OpenMeteo`]
#[derive(Clone, Debug)]
pub struct Endpoints {
    pub geocoding_url: String,
    pub forecast_url: String,
    pub geolocation_url: String,
    /// Language for geocoding result names
    pub language: String,
    pub timeout: Duration,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            geocoding_url: GEOCODING_URL.into(),
            forecast_url: FORECAST_URL.into(),
            geolocation_url: GEOLOCATION_URL.into(),
            language: "en".into(),
            timeout: Duration::from_secs(10),
        }
    }
}

// ============================================================================
// Geocoding API
// ============================================================================

/// Geocoding API response from Open-Meteo
#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    results: Option<Vec<GeocodingResult>>,
}

#[derive(Debug, Deserialize)]
struct GeocodingResult {
    name: String,
    latitude: f64,
    longitude: f64,
}

// ============================================================================
// Weather API
// ============================================================================

/// API response from Open-Meteo
#[derive(Debug, Deserialize)]
struct WeatherResponse {
    current_weather: CurrentWeather,
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    temperature: f64,
    windspeed: f64,
    weathercode: i32,
    time: String,
}

// ============================================================================
// Geolocation
// ============================================================================

#[derive(Debug, Deserialize)]
struct IpLocation {
    lat: f64,
    lon: f64,
}

/// Client shared by every effect task
#[derive(Clone, Debug)]
pub struct OpenMeteo {
    client: Client,
    endpoints: Endpoints,
}

impl OpenMeteo {
    pub fn new(endpoints: Endpoints) -> Result<Self, BoardError> {
        let client = Client::builder()
            .timeout(endpoints.timeout)
            .build()
            .map_err(|e| BoardError::Network(format!("HTTP client setup failed: {e}")))?;
        Ok(Self { client, endpoints })
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Resolve a city name to its first candidate
    pub async fn geocode(&self, city: &str) -> Result<WidgetDescriptor, BoardError> {
        let url = format!(
            "{}?name={}&count=1&language={}&format=json",
            self.endpoints.geocoding_url,
            urlencoding::encode(city),
            urlencoding::encode(&self.endpoints.language),
        );

        let response = self.client.get(&url).send().await.map_err(|e| {
            tracing::warn!(error = %e, city, "geocoding request failed");
            BoardError::Network(LOOKUP_FAILED.into())
        })?;
        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), city, "geocoding returned an error status");
            return Err(BoardError::Network(LOOKUP_FAILED.into()));
        }

        let data: GeocodingResponse = response.json().await.map_err(|e| {
            tracing::warn!(error = %e, city, "geocoding response did not parse");
            BoardError::Network(LOOKUP_FAILED.into())
        })?;

        data.results
            .and_then(|results| results.into_iter().next())
            .map(|r| WidgetDescriptor::new(r.latitude, r.longitude, r.name))
            .ok_or_else(|| BoardError::Lookup(LOCATION_NOT_FOUND.into()))
    }

    /// Current conditions with wind in m/s and the location's own timezone
    pub async fn current_weather(&self, lat: f64, lon: f64) -> Result<CurrentConditions, BoardError> {
        let url = format!(
            "{}?latitude={}&longitude={}&current_weather=true&windspeed_unit=ms&timezone=auto",
            self.endpoints.forecast_url, lat, lon
        );

        let response = self.client.get(&url).send().await.map_err(|e| {
            tracing::warn!(error = %e, lat, lon, "weather request failed");
            BoardError::Network(WEATHER_FAILED.into())
        })?;
        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), lat, lon, "weather returned an error status");
            return Err(BoardError::Network(WEATHER_FAILED.into()));
        }

        let data: WeatherResponse = response.json().await.map_err(|e| {
            tracing::warn!(error = %e, lat, lon, "weather response did not parse");
            BoardError::Network(WEATHER_FAILED.into())
        })?;

        let current = data.current_weather;
        Ok(CurrentConditions {
            temperature: current.temperature,
            wind_speed: current.windspeed,
            weather_code: current.weathercode,
            time: current.time,
        })
    }

    /// Approximate device position from the public IP address
    pub async fn locate_device(&self) -> Result<MapPoint, BoardError> {
        let response = self
            .client
            .get(&self.endpoints.geolocation_url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| BoardError::Network(format!("Geolocation failed: {e}")))?;
        let location: IpLocation = response
            .json()
            .await
            .map_err(|e| BoardError::Network(format!("Geolocation failed: {e}")))?;
        Ok(MapPoint {
            lat: location.lat,
            lon: location.lon,
        })
    }
}
