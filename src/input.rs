//! Form validation and the location text the board derives from input

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::BoardError;

pub const EMPTY_INPUT_MESSAGE: &str = "Enter a city or coordinates, or pick a point on the map";

/// What the user asked for, derived from the form at the moment add is pressed
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub enum InputMode {
    City(String),
    Coordinates { lat: f64, lon: f64 },
}

/// Turn the three raw field values into an [`InputMode`].
///
/// A non-blank city always wins, even when coordinates are filled in too.
pub fn validate(city: &str, lat: &str, lon: &str) -> Result<InputMode, BoardError> {
    let city = city.trim();
    if !city.is_empty() {
        return Ok(InputMode::City(city.to_string()));
    }

    let (lat, lon) = (lat.trim(), lon.trim());
    if lat.is_empty() || lon.is_empty() {
        return Err(BoardError::Validation(EMPTY_INPUT_MESSAGE.into()));
    }

    Ok(InputMode::Coordinates {
        lat: parse_coordinate(lat, "Latitude", 90.0)?,
        lon: parse_coordinate(lon, "Longitude", 180.0)?,
    })
}

fn parse_coordinate(text: &str, field: &str, limit: f64) -> Result<f64, BoardError> {
    let value: f64 = text
        .parse()
        .ok()
        .filter(|v: &f64| v.is_finite())
        .ok_or_else(|| BoardError::Validation(format!("{field} must be a number")))?;
    if !(-limit..=limit).contains(&value) {
        return Err(BoardError::Validation(format!(
            "{field} must be between -{limit} and {limit}"
        )));
    }
    Ok(value)
}

/// Display name for a coordinate-only widget, e.g. `"55.76 | 37.62"`.
///
/// Uses std float formatting: the exact binary value is rounded, exact ties
/// go to even (`0.125` becomes `"0.12"`).
pub fn coordinate_name(lat: f64, lon: f64) -> String {
    format!("{lat:.2} | {lon:.2}")
}

/// Field text for a map pick: four decimals, trailing zeros dropped.
pub fn format_picked(value: f64) -> String {
    let text = format!("{value:.4}");
    let trimmed = text.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_empty_is_a_validation_error() {
        let err = validate("", "", "").unwrap_err();
        assert_eq!(err, BoardError::Validation(EMPTY_INPUT_MESSAGE.into()));
    }

    #[test]
    fn whitespace_city_with_one_coordinate_fails() {
        assert!(matches!(
            validate("   ", "55.75", ""),
            Err(BoardError::Validation(_))
        ));
    }

    #[test]
    fn city_wins_over_coordinates() {
        assert_eq!(
            validate("Paris", "1", "2").unwrap(),
            InputMode::City("Paris".into())
        );
        assert_eq!(
            validate("  Paris ", "", "").unwrap(),
            InputMode::City("Paris".into())
        );
    }

    #[test]
    fn coordinates_parse() {
        assert_eq!(
            validate("", "55.75", "37.62").unwrap(),
            InputMode::Coordinates {
                lat: 55.75,
                lon: 37.62
            }
        );
    }

    #[test]
    fn malformed_coordinates_are_rejected() {
        let err = validate("", "north", "37.62").unwrap_err();
        assert_eq!(err.to_string(), "Latitude must be a number");

        let err = validate("", "10", "181").unwrap_err();
        assert_eq!(err.to_string(), "Longitude must be between -180 and 180");

        assert!(validate("", "NaN", "1").is_err());
    }

    #[test]
    fn coordinate_name_rounds_to_two_places() {
        assert_eq!(coordinate_name(55.7558, 37.6173), "55.76 | 37.62");
        assert_eq!(coordinate_name(-33.8688, 151.2093), "-33.87 | 151.21");
        // exact binary tie rounds to even
        assert_eq!(coordinate_name(0.125, 0.375), "0.12 | 0.38");
    }

    #[test]
    fn picked_values_drop_trailing_zeros() {
        assert_eq!(format_picked(56.85), "56.85");
        assert_eq!(format_picked(60.612345), "60.6123");
        assert_eq!(format_picked(12.0), "12");
        assert_eq!(format_picked(-0.00001), "0");
        assert_eq!(format_picked(-12.34567), "-12.3457");
    }
}
