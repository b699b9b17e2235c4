//! Effects - side effects declared by the reducer

use crate::state::{CardId, WidgetDescriptor};

/// Side effects that can be triggered by actions
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Resolve a city name to its first geocoding candidate
    Geocode { query: String },
    /// Fetch current conditions for a card
    FetchWeather { card: CardId, lat: f64, lon: f64 },
    /// One-shot device position lookup
    LocateDevice,
    /// Overwrite the data file with the whole widget list
    SaveWidgets { widgets: Vec<WidgetDescriptor> },
}
