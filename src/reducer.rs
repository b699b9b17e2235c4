//! Reducer - pure function: (state, action) -> DispatchResult

use tui_dispatch::{DataResource, DispatchResult};

use crate::action::Action;
use crate::effect::Effect;
use crate::input::{coordinate_name, format_picked, validate, InputMode};
use crate::state::{
    AddPhase, AppState, CardId, MapPoint, WidgetCard, WidgetDescriptor, CITY_ZOOM,
    DEVICE_LOCATION_NAME,
};

/// The reducer handles all state transitions
pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        // ===== Startup =====
        Action::BoardInit => {
            if state.widgets.is_empty() {
                return if state.geolocate {
                    DispatchResult::changed_with(Effect::LocateDevice)
                } else {
                    DispatchResult::unchanged()
                };
            }
            let effects = state
                .widgets
                .clone()
                .into_iter()
                .map(|descriptor| queue_card(state, descriptor).1)
                .collect();
            changed_with_all(effects)
        }

        // ===== Input reconciliation =====
        Action::InputCity(text) => {
            state.city = text;
            state.latitude.clear();
            state.longitude.clear();
            state.marker = None;
            DispatchResult::changed()
        }

        // Editing coordinates directly leaves the city and the marker alone
        Action::InputLatitude(text) => {
            state.latitude = text;
            DispatchResult::changed()
        }

        Action::InputLongitude(text) => {
            state.longitude = text;
            DispatchResult::changed()
        }

        // ===== Focus =====
        Action::FocusNext => {
            state.focus = state.focus.next();
            DispatchResult::changed()
        }

        Action::FocusPrev => {
            state.focus = state.focus.prev();
            DispatchResult::changed()
        }

        Action::FocusSet(focus) => {
            if state.focus == focus {
                DispatchResult::unchanged()
            } else {
                state.focus = focus;
                DispatchResult::changed()
            }
        }

        // ===== Map =====
        Action::MapPick(point) => {
            state.city.clear();
            state.latitude = format_picked(point.lat);
            state.longitude = format_picked(point.lon);
            state.marker = Some(point);
            DispatchResult::changed()
        }

        Action::MapPickCenter => {
            let point = MapPoint {
                lat: state.map.center_lat,
                lon: state.map.center_lon,
            };
            reducer(state, Action::MapPick(point))
        }

        Action::MapPan(lon_steps, lat_steps) => {
            state.map.pan(lon_steps, lat_steps);
            DispatchResult::changed()
        }

        Action::MapZoom(delta) => {
            let before = state.map.zoom;
            state.map.zoom_by(delta);
            if state.map.zoom == before {
                DispatchResult::unchanged()
            } else {
                DispatchResult::changed()
            }
        }

        // ===== Add flow =====
        Action::WidgetAdd => {
            // The button is disabled while a flow is in progress
            if state.is_busy() {
                return DispatchResult::unchanged();
            }
            match validate(&state.city, &state.latitude, &state.longitude) {
                Err(error) => {
                    state.raise_error(error);
                    DispatchResult::changed()
                }
                Ok(InputMode::City(query)) => {
                    state.phase = AddPhase::Resolving;
                    state.tick_count = 0;
                    DispatchResult::changed_with(Effect::Geocode { query })
                }
                Ok(InputMode::Coordinates { lat, lon }) => {
                    state.tick_count = 0;
                    let descriptor = WidgetDescriptor::new(lat, lon, coordinate_name(lat, lon));
                    changed_with_all(add_widget(state, descriptor, true))
                }
            }
        }

        Action::GeocodeDidLoad(descriptor) => {
            if state.phase != AddPhase::Resolving {
                return DispatchResult::unchanged();
            }
            state.map.recenter(descriptor.latitude, descriptor.longitude);
            state.map.zoom = CITY_ZOOM;
            state.marker = Some(MapPoint {
                lat: descriptor.latitude,
                lon: descriptor.longitude,
            });
            changed_with_all(add_widget(state, descriptor, true))
        }

        Action::GeocodeDidError(error) => {
            if state.phase == AddPhase::Resolving {
                state.phase = AddPhase::Idle;
            }
            state.raise_error(error);
            DispatchResult::changed()
        }

        Action::WeatherDidLoad(id, conditions) => {
            let Some(card) = state.cards.iter_mut().find(|card| card.id == id) else {
                return DispatchResult::unchanged();
            };
            card.weather = DataResource::Loaded(conditions);
            if state.phase == (AddPhase::FetchingWeather { card: id }) {
                state.phase = AddPhase::Idle;
                state.clear_inputs();
                state.error = None;
                state.shake_ticks_remaining = 0;
            }
            DispatchResult::changed()
        }

        // The descriptor stays persisted; only the pending card goes away
        Action::WeatherDidError(id, error) => {
            state.cards.retain(|card| card.id != id);
            if state.phase == (AddPhase::FetchingWeather { card: id }) {
                state.phase = AddPhase::Idle;
            }
            clamp_selection(state);
            state.raise_error(error);
            DispatchResult::changed()
        }

        // ===== Geolocation =====
        Action::LocateDidLoad(point) => {
            let descriptor = WidgetDescriptor::new(point.lat, point.lon, DEVICE_LOCATION_NAME);
            changed_with_all(add_widget(state, descriptor, false))
        }

        // Seeding is best effort: the board just stays empty
        Action::LocateDidError(message) => {
            tracing::warn!(error = %message, "device location unavailable");
            DispatchResult::unchanged()
        }

        // ===== Cards =====
        Action::CardSelect(index) => {
            if index < state.visible_card_count() && index != state.selected_card {
                state.selected_card = index;
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::CardRemove(id) => {
            let Some(position) = state.cards.iter().position(|card| card.id == id) else {
                return DispatchResult::unchanged();
            };
            let card = state.cards.remove(position);
            clamp_selection(state);

            // Widgets are identified by name: the first match goes
            match state
                .widgets
                .iter()
                .position(|widget| widget.name == card.descriptor.name)
            {
                Some(index) => {
                    state.widgets.remove(index);
                    DispatchResult::changed_with(save_widgets(state))
                }
                None => DispatchResult::changed(),
            }
        }

        // ===== Storage =====
        Action::StorageDidError(error) => {
            state.raise_error(error);
            DispatchResult::changed()
        }

        // ===== UI =====
        Action::UiDismissError => {
            if state.error.take().is_some() {
                state.shake_ticks_remaining = 0;
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Render => DispatchResult::changed(),

        // ===== Global actions =====
        Action::Tick => {
            if state.animating() {
                state.tick_count = state.tick_count.wrapping_add(1);
                state.shake_ticks_remaining = state.shake_ticks_remaining.saturating_sub(1);
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

/// Append a new widget, save the list, then queue its weather fetch.
///
/// The save happens before the fetch, so a widget whose fetch fails stays
/// persisted without ever being displayed.
fn add_widget(state: &mut AppState, descriptor: WidgetDescriptor, from_form: bool) -> Vec<Effect> {
    state.widgets.push(descriptor.clone());
    let save = save_widgets(state);
    let (card, fetch) = queue_card(state, descriptor);
    if from_form {
        state.phase = AddPhase::FetchingWeather { card };
    }
    vec![save, fetch]
}

/// Add a pending card for the descriptor and return its fetch effect
fn queue_card(state: &mut AppState, descriptor: WidgetDescriptor) -> (CardId, Effect) {
    let id = CardId(state.next_card_id);
    state.next_card_id += 1;
    let effect = Effect::FetchWeather {
        card: id,
        lat: descriptor.latitude,
        lon: descriptor.longitude,
    };
    state.cards.push(WidgetCard {
        id,
        descriptor,
        weather: DataResource::Loading,
    });
    (id, effect)
}

fn save_widgets(state: &AppState) -> Effect {
    Effect::SaveWidgets {
        widgets: state.widgets.clone(),
    }
}

fn clamp_selection(state: &mut AppState) {
    let count = state.visible_card_count();
    if state.selected_card >= count {
        state.selected_card = count.saturating_sub(1);
    }
}

fn changed_with_all(effects: Vec<Effect>) -> DispatchResult<Effect> {
    let mut result = DispatchResult::changed();
    result.effects.extend(effects);
    result
}
