//! Application state - single source of truth

use ratatui::layout::Rect;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tui_dispatch::DataResource;

use crate::conditions::CurrentConditions;
use crate::error::BoardError;

/// A persisted widget: where to look and what to call it.
///
/// Stored as `{"latitude", "longitude", "name"}`; the short `lat`/`lon`
/// keys written by older boards are still accepted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WidgetDescriptor {
    #[serde(alias = "lat")]
    pub latitude: f64,
    #[serde(alias = "lon")]
    pub longitude: f64,
    pub name: String,
}

impl WidgetDescriptor {
    pub fn new(latitude: f64, longitude: f64, name: impl Into<String>) -> Self {
        Self {
            latitude,
            longitude,
            name: name.into(),
        }
    }
}

/// Runtime handle for a card so async results land on the right one.
/// Never persisted.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct CardId(pub u64);

/// A widget card: a descriptor plus the weather fetched for it
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WidgetCard {
    pub id: CardId,
    pub descriptor: WidgetDescriptor,
    pub weather: DataResource<CurrentConditions>,
}

/// Which control receives keyboard input
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Focus {
    #[default]
    City,
    Latitude,
    Longitude,
    AddButton,
    Map,
    Cards,
}

impl Focus {
    const ORDER: [Focus; 6] = [
        Focus::City,
        Focus::Latitude,
        Focus::Longitude,
        Focus::AddButton,
        Focus::Map,
        Focus::Cards,
    ];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        let len = Self::ORDER.len();
        Self::ORDER[(self.position() + len - 1) % len]
    }

    pub fn is_form(self) -> bool {
        matches!(
            self,
            Focus::City | Focus::Latitude | Focus::Longitude | Focus::AddButton
        )
    }
}

/// Progress of the add-widget flow. The add button is busy outside `Idle`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub enum AddPhase {
    #[default]
    Idle,
    Resolving,
    FetchingWeather { card: CardId },
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MapPoint {
    pub lat: f64,
    pub lon: f64,
}

pub const MAX_ZOOM: u8 = 8;
/// Zoom used after a city lookup recentres the map
pub const CITY_ZOOM: u8 = 5;

/// Equirectangular view over the world map
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MapView {
    pub center_lat: f64,
    pub center_lon: f64,
    pub zoom: u8,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            center_lat: 56.85,
            center_lon: 60.61,
            zoom: 3,
        }
    }
}

impl MapView {
    pub fn lon_span(&self) -> f64 {
        360.0 / f64::from(1u32 << self.zoom.min(MAX_ZOOM))
    }

    pub fn lat_span(&self) -> f64 {
        180.0 / f64::from(1u32 << self.zoom.min(MAX_ZOOM))
    }

    /// `[west, east]` for the canvas x axis
    pub fn x_bounds(&self) -> [f64; 2] {
        let half = self.lon_span() / 2.0;
        [self.center_lon - half, self.center_lon + half]
    }

    /// `[south, north]` for the canvas y axis
    pub fn y_bounds(&self) -> [f64; 2] {
        let half = self.lat_span() / 2.0;
        [self.center_lat - half, self.center_lat + half]
    }

    pub fn recenter(&mut self, lat: f64, lon: f64) {
        self.center_lat = lat.clamp(-90.0, 90.0);
        self.center_lon = wrap_longitude(lon);
    }

    /// Move by a tenth of the visible span per step
    pub fn pan(&mut self, lon_steps: i16, lat_steps: i16) {
        let lat = self.center_lat + f64::from(lat_steps) * self.lat_span() / 10.0;
        let lon = self.center_lon + f64::from(lon_steps) * self.lon_span() / 10.0;
        self.recenter(lat, lon);
    }

    pub fn zoom_by(&mut self, delta: i8) {
        let zoom = i16::from(self.zoom) + i16::from(delta);
        self.zoom = zoom.clamp(0, i16::from(MAX_ZOOM)) as u8;
    }

    /// Geographic point under a terminal cell of the map's inner area.
    ///
    /// Returns `None` when the cell lies outside `area`.
    pub fn point_at(&self, area: Rect, column: u16, row: u16) -> Option<MapPoint> {
        if area.width == 0 || area.height == 0 {
            return None;
        }
        if column < area.x
            || row < area.y
            || column >= area.x + area.width
            || row >= area.y + area.height
        {
            return None;
        }
        let fx = (f64::from(column - area.x) + 0.5) / f64::from(area.width);
        let fy = (f64::from(row - area.y) + 0.5) / f64::from(area.height);
        let [west, _] = self.x_bounds();
        let [_, north] = self.y_bounds();
        Some(MapPoint {
            lat: (north - fy * self.lat_span()).clamp(-90.0, 90.0),
            lon: wrap_longitude(west + fx * self.lon_span()),
        })
    }
}

fn wrap_longitude(lon: f64) -> f64 {
    if (-180.0..=180.0).contains(&lon) {
        lon
    } else {
        (lon + 180.0).rem_euclid(360.0) - 180.0
    }
}

/// Ticks the error banner shakes after a new error
pub const BANNER_SHAKE_TICKS: u32 = 12;
pub const ANIM_TICK_MS: u64 = 80;

pub const DEVICE_LOCATION_NAME: &str = "Your location";

/// Application state - everything the UI needs to render
#[derive(Clone, Debug, tui_dispatch::DebugState, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppState {
    // --- Persisted ---
    /// Widget list mirrored to the data file after every change
    #[debug(section = "Widgets", label = "Persisted", debug_fmt)]
    pub widgets: Vec<WidgetDescriptor>,

    // --- Cards ---
    /// Cards in list order; only loaded ones are displayed
    #[debug(section = "Widgets", label = "Cards", debug_fmt)]
    pub cards: Vec<WidgetCard>,

    #[debug(section = "Widgets", label = "Selected")]
    pub selected_card: usize,

    #[debug(skip)]
    pub next_card_id: u64,

    // --- Form ---
    #[debug(section = "Form", label = "City")]
    pub city: String,

    #[debug(section = "Form", label = "Latitude")]
    pub latitude: String,

    #[debug(section = "Form", label = "Longitude")]
    pub longitude: String,

    #[debug(section = "Form", label = "Focus", debug_fmt)]
    pub focus: Focus,

    #[debug(section = "Form", label = "Phase", debug_fmt)]
    pub phase: AddPhase,

    /// Visible banner error, cleared by a successful add or a dismiss
    #[debug(section = "Form", label = "Error", debug_fmt)]
    pub error: Option<BoardError>,

    // --- Map ---
    #[debug(section = "Map", label = "View", debug_fmt)]
    pub map: MapView,

    /// At most one marker, owned by the board
    #[debug(section = "Map", label = "Marker", debug_fmt)]
    pub marker: Option<MapPoint>,

    // --- Options ---
    #[debug(section = "Options", label = "Geolocate")]
    pub geolocate: bool,

    // --- Animation internals (skipped) ---
    #[debug(skip)]
    pub tick_count: u32,

    #[debug(skip)]
    pub shake_ticks_remaining: u32,
}

impl AppState {
    /// Create state around the persisted widget list
    pub fn new(widgets: Vec<WidgetDescriptor>) -> Self {
        Self {
            widgets,
            cards: Vec::new(),
            selected_card: 0,
            next_card_id: 0,
            city: String::new(),
            latitude: String::new(),
            longitude: String::new(),
            focus: Focus::default(),
            phase: AddPhase::Idle,
            error: None,
            map: MapView::default(),
            marker: None,
            geolocate: true,
            tick_count: 0,
            shake_ticks_remaining: 0,
        }
    }

    pub fn with_geolocate(mut self, geolocate: bool) -> Self {
        self.geolocate = geolocate;
        self
    }

    pub fn is_busy(&self) -> bool {
        self.phase != AddPhase::Idle
    }

    /// Cards whose weather has loaded, in list order
    pub fn visible_cards(&self) -> impl Iterator<Item = &WidgetCard> {
        self.cards.iter().filter(|card| card.weather.is_loaded())
    }

    pub fn visible_card_count(&self) -> usize {
        self.visible_cards().count()
    }

    pub fn selected_visible_card(&self) -> Option<&WidgetCard> {
        self.visible_cards().nth(self.selected_card)
    }

    pub fn pending_card_count(&self) -> usize {
        self.cards.iter().filter(|c| c.weather.is_loading()).count()
    }

    /// Show an error in the banner and start its shake
    pub fn raise_error(&mut self, error: BoardError) {
        self.error = Some(error);
        self.shake_ticks_remaining = BANNER_SHAKE_TICKS;
    }

    pub fn animating(&self) -> bool {
        self.is_busy() || self.shake_ticks_remaining > 0
    }

    /// Horizontal banner offset for the current shake frame
    pub fn banner_offset(&self) -> i16 {
        if self.shake_ticks_remaining == 0 {
            return 0;
        }
        if self.shake_ticks_remaining % 2 == 0 {
            1
        } else {
            -1
        }
    }

    pub fn clear_inputs(&mut self) {
        self.city.clear();
        self.latitude.clear();
        self.longitude.clear();
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
