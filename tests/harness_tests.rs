//! End-to-end flows through the reducer with EffectStoreTestHarness
//!
//! Network and storage are simulated by completing the actions their
//! effects would produce.

use tui_dispatch::testing::*;
use tui_dispatch::NumericComponentId;
use widget_board::{
    action::Action,
    api::LOCATION_NOT_FOUND,
    components::{BoardDisplay, BoardDisplayProps, Component},
    conditions::CurrentConditions,
    effect::Effect,
    error::BoardError,
    reducer::reducer,
    state::{AddPhase, AppState, CardId, Focus, MapPoint, WidgetDescriptor},
};

fn london() -> WidgetDescriptor {
    WidgetDescriptor::new(51.5, -0.12, "London")
}

fn drizzle_morning() -> CurrentConditions {
    CurrentConditions {
        temperature: 14.0,
        wind_speed: 3.2,
        weather_code: 61,
        time: "2024-01-01T10:00".into(),
    }
}

fn card_names(state: &AppState) -> Vec<String> {
    state
        .visible_cards()
        .map(|card| card.descriptor.name.clone())
        .collect()
}

// ============================================================================
// Add flow
// ============================================================================

#[test]
fn test_add_city_end_to_end() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    harness.dispatch_collect(Action::InputCity("London".into()));
    harness.dispatch_collect(Action::WidgetAdd);
    harness.assert_state(|s| s.phase == AddPhase::Resolving);

    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(|e| matches!(e, Effect::Geocode { query } if query == "London"));

    // Geocoding resolves: the descriptor is saved, then its weather fetched
    harness.complete_action(Action::GeocodeDidLoad(london()));
    harness.process_emitted();

    let effects = harness.drain_effects();
    effects.effects_count(2);
    effects.effects_first_matches(
        |e| matches!(e, Effect::SaveWidgets { widgets } if widgets == &vec![london()]),
    );
    assert!(matches!(
        effects[1],
        Effect::FetchWeather { card: CardId(0), lat, lon } if lat == 51.5 && lon == -0.12
    ));
    harness.assert_state(|s| s.visible_card_count() == 0);
    harness.assert_state(|s| s.marker == Some(MapPoint { lat: 51.5, lon: -0.12 }));

    harness.complete_action(Action::WeatherDidLoad(CardId(0), drizzle_morning()));
    harness.process_emitted();

    harness.assert_state(|s| s.phase == AddPhase::Idle);
    harness.assert_state(|s| s.city.is_empty() && s.error.is_none());
    harness.assert_state(|s| card_names(s) == vec!["London".to_string()]);
    harness.assert_state(|s| s.widgets == vec![london()]);

    let mut board = BoardDisplay::new();
    let output = harness.render_plain(120, 40, |frame, area, state| {
        board.render(
            frame,
            area,
            BoardDisplayProps {
                state,
                is_focused: true,
            },
        );
    });
    assert!(output.contains("LONDON"), "card title missing:\n{output}");
    assert!(output.contains("Rain"), "condition label missing:\n{output}");
    assert!(output.contains("14°"), "temperature missing:\n{output}");
    assert!(output.contains("3.2"), "wind speed missing:\n{output}");
}

#[test]
fn test_unknown_city_leaves_list_unchanged() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    harness.dispatch_collect(Action::InputCity("Qwzxv".into()));
    harness.dispatch_collect(Action::WidgetAdd);
    harness.drain_effects();

    harness.complete_action(Action::GeocodeDidError(BoardError::Lookup(
        LOCATION_NOT_FOUND.into(),
    )));
    harness.process_emitted();

    harness.drain_effects().effects_empty();
    harness.assert_state(|s| s.widgets.is_empty() && s.cards.is_empty());
    harness.assert_state(|s| s.phase == AddPhase::Idle);
    harness.assert_state(|s| {
        s.error
            .as_ref()
            .is_some_and(|e| e.to_string() == LOCATION_NOT_FOUND)
    });
    // The typed city stays so it can be corrected
    harness.assert_state(|s| s.city == "Qwzxv");
}

#[test]
fn test_coordinates_add_skips_geocoding() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    harness.dispatch_all([
        Action::InputLatitude("48.8566".into()),
        Action::InputLongitude("2.3522".into()),
        Action::WidgetAdd,
    ]);

    let effects = harness.drain_effects();
    effects.effects_none_match(|e| matches!(e, Effect::Geocode { .. }));
    effects.effects_first_matches(|e| {
        matches!(e, Effect::SaveWidgets { widgets } if widgets[0].name == "48.86 | 2.35")
    });
}

#[test]
fn test_failed_fetch_keeps_descriptor_but_shows_no_card() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    harness.dispatch_all([
        Action::InputLatitude("10".into()),
        Action::InputLongitude("20".into()),
        Action::WidgetAdd,
    ]);
    harness.drain_effects();

    harness.complete_action(Action::WeatherDidError(
        CardId(0),
        BoardError::Network("Could not update weather data".into()),
    ));
    harness.process_emitted();

    harness.assert_state(|s| s.widgets.len() == 1);
    harness.assert_state(|s| s.cards.is_empty());
    harness.assert_state(|s| s.error.is_some() && !s.is_busy());
}

#[test]
fn test_map_click_then_add() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    harness.dispatch_collect(Action::InputCity("Oslo".into()));
    harness.dispatch_collect(Action::MapPick(MapPoint {
        lat: 59.9139,
        lon: 10.7522,
    }));
    harness.assert_state(|s| s.city.is_empty());
    harness.assert_state(|s| s.latitude == "59.9139" && s.longitude == "10.7522");

    harness.dispatch_collect(Action::WidgetAdd);
    let effects = harness.drain_effects();
    effects.effects_count(2);
    effects.effects_first_matches(|e| {
        matches!(e, Effect::SaveWidgets { widgets } if widgets[0].name == "59.91 | 10.75")
    });
}

#[test]
fn test_failed_save_shows_storage_banner() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    harness.dispatch_all([
        Action::InputLatitude("10".into()),
        Action::InputLongitude("20".into()),
        Action::WidgetAdd,
    ]);
    harness
        .drain_effects()
        .effects_first_matches(|e| matches!(e, Effect::SaveWidgets { .. }));

    harness.complete_action(Action::StorageDidError(BoardError::Storage(
        "permission denied".into(),
    )));
    harness.process_emitted();

    harness.assert_state(|s| matches!(s.error, Some(BoardError::Storage(_))));
    harness.assert_state(|s| s.widgets.len() == 1);

    let mut board = BoardDisplay::new();
    let output = harness.render_plain(120, 40, |frame, area, state| {
        board.render(
            frame,
            area,
            BoardDisplayProps {
                state,
                is_focused: true,
            },
        );
    });
    assert!(output.contains("Storage error"), "banner title missing:\n{output}");
    assert!(output.contains("permission denied"), "banner text missing:\n{output}");
}

// ============================================================================
// Startup and removal
// ============================================================================

#[test]
fn test_startup_replay_then_remove() {
    let widgets = vec![
        WidgetDescriptor::new(1.0, 1.0, "Paris"),
        WidgetDescriptor::new(2.0, 2.0, "Rome"),
        WidgetDescriptor::new(3.0, 3.0, "Paris"),
    ];
    let mut harness = EffectStoreTestHarness::new(AppState::new(widgets), reducer);

    harness.dispatch_collect(Action::BoardInit);
    let effects = harness.drain_effects();
    effects.effects_count(3);
    effects.effects_all_match(|e| matches!(e, Effect::FetchWeather { .. }));

    // Completions arrive out of order
    for id in [2, 0, 1] {
        harness.complete_action(Action::WeatherDidLoad(CardId(id), drizzle_morning()));
    }
    harness.process_emitted();
    harness.assert_state(|s| card_names(s) == ["Paris", "Rome", "Paris"]);

    // Removing the second "Paris" card drops the first persisted "Paris"
    harness.dispatch_collect(Action::CardRemove(CardId(2)));
    harness.assert_state(|s| {
        s.widgets
            == vec![
                WidgetDescriptor::new(2.0, 2.0, "Rome"),
                WidgetDescriptor::new(3.0, 3.0, "Paris"),
            ]
    });
    harness
        .drain_effects()
        .effects_first_matches(|e| matches!(e, Effect::SaveWidgets { widgets } if widgets.len() == 2));
}

#[test]
fn test_empty_board_seeds_device_location() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    harness.dispatch_collect(Action::BoardInit);
    harness
        .drain_effects()
        .effects_first_matches(|e| matches!(e, Effect::LocateDevice));

    harness.complete_action(Action::LocateDidLoad(MapPoint {
        lat: 56.85,
        lon: 60.61,
    }));
    harness.process_emitted();

    harness.assert_state(|s| s.widgets.len() == 1 && s.widgets[0].name == "Your location");
    // Seeding is not a user add: the form stays usable
    harness.assert_state(|s| !s.is_busy());
}

// ============================================================================
// Keyboard through the board component
// ============================================================================

#[test]
fn test_keyboard_add_flow() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    let mut board = BoardDisplay::new();

    // Focus walks city -> latitude -> longitude -> button
    let actions = harness.send_keys::<NumericComponentId, _, _>("tab tab tab", |state, event| {
        board
            .handle_event(
                &event.kind,
                BoardDisplayProps {
                    state,
                    is_focused: true,
                },
            )
            .into_iter()
            .collect::<Vec<_>>()
    });
    actions.assert_count(3);
    for action in actions {
        harness.dispatch_collect(action);
    }
    harness.assert_state(|s| s.focus == Focus::AddButton);

    let actions = harness.send_keys::<NumericComponentId, _, _>("enter", |state, event| {
        board
            .handle_event(
                &event.kind,
                BoardDisplayProps {
                    state,
                    is_focused: true,
                },
            )
            .into_iter()
            .collect::<Vec<_>>()
    });
    actions.assert_first(Action::WidgetAdd);

    // Empty form: validation error, nothing persisted
    harness.dispatch_collect(Action::WidgetAdd);
    harness.drain_effects().effects_empty();
    harness.assert_state(|s| matches!(s.error, Some(BoardError::Validation(_))));
}
