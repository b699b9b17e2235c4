//! Actions: user intents and async results

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::conditions::CurrentConditions;
use crate::error::BoardError;
use crate::state::{CardId, Focus, MapPoint, WidgetDescriptor};

/// Application actions with automatic category inference
#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    // ===== Board category =====
    /// Startup: replay persisted widgets, or locate the device when empty
    BoardInit,

    // ===== Input category =====
    /// City field edited (clears coordinates and the marker)
    InputCity(String),

    /// Latitude field edited
    InputLatitude(String),

    /// Longitude field edited
    InputLongitude(String),

    // ===== Focus category =====
    FocusNext,
    FocusPrev,
    FocusSet(Focus),

    // ===== Map category =====
    /// Point picked on the map (mouse click or crosshair)
    MapPick(MapPoint),

    /// Pick whatever sits under the crosshair
    MapPickCenter,

    /// Pan by tenths of the visible span: (longitude steps, latitude steps)
    MapPan(i16, i16),

    MapZoom(i8),

    // ===== Widget category =====
    /// Intent: add a widget from the form (triggers the async flow)
    WidgetAdd,

    // ===== Geocode category =====
    /// Result: city resolved to its first candidate
    GeocodeDidLoad(WidgetDescriptor),

    /// Result: lookup failed or found nothing
    GeocodeDidError(BoardError),

    // ===== Weather category =====
    /// Result: conditions loaded for a card
    WeatherDidLoad(CardId, CurrentConditions),

    /// Result: weather fetch failed for a card
    WeatherDidError(CardId, BoardError),

    // ===== Locate category =====
    /// Result: device position found
    LocateDidLoad(MapPoint),

    /// Result: device position unavailable
    LocateDidError(String),

    // ===== Card category =====
    /// Select a displayed card (index among visible cards)
    CardSelect(usize),

    /// Remove a card and its persisted entry
    CardRemove(CardId),

    // ===== Storage category =====
    /// Result: saving the widget list failed
    StorageDidError(BoardError),

    // ===== UI dismiss category =====
    /// Hide the error banner
    UiDismissError,

    // ===== Uncategorized (global) =====
    /// Force a re-render (for cursor movement, etc.)
    Render,

    /// Periodic tick for busy and banner animations
    Tick,

    /// Exit the application
    Quit,
}
