use crossterm::event::KeyCode;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Map, MapResolution},
        Block,
    },
    Frame,
};
use tui_dispatch::EventKind;

use super::{common_key_action, Component};
use crate::action::Action;
use crate::state::{MapPoint, MapView};

const MARKER_GLYPH: &str = "\u{25cf}";
const CROSSHAIR_GLYPH: &str = "+";

/// World map the user clicks to fill in coordinates
#[derive(Default)]
pub struct MapPicker;

pub struct MapPickerProps<'a> {
    pub view: &'a MapView,
    pub marker: Option<&'a MapPoint>,
    pub is_focused: bool,
}

pub fn map_block(is_focused: bool, view: &MapView) -> Block<'static> {
    let color = if is_focused {
        Color::Rgb(16, 185, 129)
    } else {
        Color::Rgb(63, 63, 70)
    };
    Block::bordered()
        .border_style(Style::default().fg(color))
        .title(" Map ")
        .title_bottom(
            Line::from(Span::styled(
                format!(" {:.2}, {:.2}  z{} ", view.center_lat, view.center_lon, view.zoom),
                Style::default().fg(Color::DarkGray),
            ))
            .right_aligned(),
        )
}

/// The point in the view's canvas frame, or `None` when it is off screen.
///
/// Near the antimeridian the view's bounds run past +/-180, so the
/// longitude is shifted by a full turn when that brings it into view.
fn in_view(view: &MapView, point: &MapPoint) -> Option<MapPoint> {
    let [west, east] = view.x_bounds();
    let [south, north] = view.y_bounds();
    if !(south..=north).contains(&point.lat) {
        return None;
    }
    [point.lon, point.lon + 360.0, point.lon - 360.0]
        .into_iter()
        .find(|lon| (west..=east).contains(lon))
        .map(|lon| MapPoint { lat: point.lat, lon })
}

impl Component<Action> for MapPicker {
    type Props<'a> = MapPickerProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return None;
        }
        let EventKind::Key(key) = event else {
            return None;
        };
        if let Some(action) = common_key_action(key) {
            return Some(action);
        }

        match key.code {
            KeyCode::Left | KeyCode::Char('h') => Some(Action::MapPan(-1, 0)),
            KeyCode::Right | KeyCode::Char('l') => Some(Action::MapPan(1, 0)),
            KeyCode::Up | KeyCode::Char('k') => Some(Action::MapPan(0, 1)),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::MapPan(0, -1)),
            KeyCode::Char('+') | KeyCode::Char('=') => Some(Action::MapZoom(1)),
            KeyCode::Char('-') => Some(Action::MapZoom(-1)),
            KeyCode::Enter | KeyCode::Char(' ') => Some(Action::MapPickCenter),
            KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let view = *props.view;
        let marker = props.marker.and_then(|m| in_view(&view, m));
        let show_crosshair = props.is_focused;

        let canvas = Canvas::default()
            .block(map_block(props.is_focused, &view))
            .marker(Marker::Braille)
            .x_bounds(view.x_bounds())
            .y_bounds(view.y_bounds())
            .paint(move |ctx| {
                ctx.draw(&Map {
                    color: Color::Rgb(82, 82, 91),
                    resolution: MapResolution::High,
                });
                if show_crosshair {
                    ctx.print(
                        view.center_lon,
                        view.center_lat,
                        Span::styled(CROSSHAIR_GLYPH, Style::default().fg(Color::Cyan)),
                    );
                }
                if let Some(point) = marker {
                    ctx.print(
                        point.lon,
                        point.lat,
                        Span::styled(
                            MARKER_GLYPH,
                            Style::default()
                                .fg(Color::Rgb(239, 68, 68))
                                .add_modifier(Modifier::BOLD),
                        ),
                    );
                }
            });
        frame.render_widget(canvas, area);
    }
}
