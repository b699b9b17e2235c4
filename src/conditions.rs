//! Current weather conditions and the WMO code categories shown on cards

use chrono::NaiveDateTime;
use ratatui::style::Color;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Current conditions as reported by the forecast provider
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CurrentConditions {
    pub temperature: f64,
    /// Meters per second
    pub wind_speed: f64,
    /// WMO weather code
    pub weather_code: i32,
    /// Local observation time, `YYYY-MM-DDTHH:MM`
    pub time: String,
}

impl CurrentConditions {
    pub fn category(&self) -> WeatherCategory {
        WeatherCategory::from_code(self.weather_code)
    }

    /// `"14°"`, `"-3.5°"`
    pub fn temperature_label(&self) -> String {
        format!("{}°", self.temperature)
    }

    pub fn wind_label(&self) -> String {
        self.wind_speed.to_string()
    }

    pub fn local_time(&self) -> String {
        local_time(&self.time)
    }
}

/// Weather categories, one glyph each
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum WeatherCategory {
    Clear,
    Cloudy,
    Fog,
    Drizzle,
    Rain,
    Snow,
    RainShower,
    SnowShower,
    Thunderstorm,
    Unknown,
}

impl WeatherCategory {
    /// Ranges are checked in order, first match wins
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => WeatherCategory::Clear,
            1..=3 => WeatherCategory::Cloudy,
            45..=48 => WeatherCategory::Fog,
            51..=55 => WeatherCategory::Drizzle,
            56..=67 => WeatherCategory::Rain,
            71..=77 => WeatherCategory::Snow,
            80..=82 => WeatherCategory::RainShower,
            85..=86 => WeatherCategory::SnowShower,
            c if c >= 95 => WeatherCategory::Thunderstorm,
            _ => WeatherCategory::Unknown,
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            WeatherCategory::Clear => "\u{2600}\u{fe0f}",
            WeatherCategory::Cloudy => "\u{2601}\u{fe0f}",
            WeatherCategory::Fog => "\u{1f32b}\u{fe0f}",
            WeatherCategory::Drizzle => "\u{1f326}\u{fe0f}",
            WeatherCategory::Rain => "\u{1f327}\u{fe0f}",
            WeatherCategory::Snow => "\u{2744}\u{fe0f}",
            WeatherCategory::RainShower => "\u{2614}",
            WeatherCategory::SnowShower => "\u{1f328}\u{fe0f}",
            WeatherCategory::Thunderstorm => "\u{26c8}\u{fe0f}",
            WeatherCategory::Unknown => "\u{1f321}\u{fe0f}",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WeatherCategory::Clear => "Clear",
            WeatherCategory::Cloudy => "Cloudy",
            WeatherCategory::Fog => "Fog",
            WeatherCategory::Drizzle => "Drizzle",
            WeatherCategory::Rain => "Rain",
            WeatherCategory::Snow => "Snow",
            WeatherCategory::RainShower => "Rain showers",
            WeatherCategory::SnowShower => "Snow showers",
            WeatherCategory::Thunderstorm => "Thunderstorm",
            WeatherCategory::Unknown => "Unknown",
        }
    }

    pub fn color(self) -> Color {
        match self {
            WeatherCategory::Clear => Color::Yellow,
            WeatherCategory::Cloudy | WeatherCategory::Fog => Color::Rgb(170, 170, 185),
            WeatherCategory::Drizzle | WeatherCategory::Rain | WeatherCategory::RainShower => {
                Color::Rgb(130, 170, 200)
            }
            WeatherCategory::Snow | WeatherCategory::SnowShower => Color::White,
            WeatherCategory::Thunderstorm => Color::Rgb(200, 160, 255),
            WeatherCategory::Unknown => Color::Gray,
        }
    }
}

/// Time of day from the provider's local timestamp.
///
/// The provider already applies the location's timezone, so the value is
/// shown as-is. Anything that does not parse is passed through untouched.
pub fn local_time(time: &str) -> String {
    ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(time, fmt).ok())
        .map(|t| t.format("%H:%M").to_string())
        .unwrap_or_else(|| time.to_string())
}
