use artbox::{
    fonts, integrations::ratatui::ArtBox, Alignment as ArtAlignment, Color as ArtColor, ColorStop,
    Fill, LinearGradient, Renderer,
};
use crossterm::event::{KeyCode, MouseButton, MouseEventKind};
use ratatui::{
    layout::{Constraint, Layout, Position, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    StatusBar, StatusBarHint, StatusBarProps, StatusBarSection, StatusBarStyle,
};

use super::error_banner::BANNER_HEIGHT;
use super::input_form::FORM_HEIGHT;
use super::{
    card_window, close_button_area, CardGrid, CardGridProps, Component, ErrorBanner,
    ErrorBannerProps, InputForm, InputFormProps, MapPicker, MapPickerProps,
};
use crate::action::Action;
use crate::state::{AppState, Focus};

pub const HEADER_HEIGHT: u16 = 5;
const TITLE: &str = "weather";
/// Header animation cycle, in ticks
const GRADIENT_CYCLE_TICKS: u32 = 24;

/// Screen regions of the board, shared by rendering and mouse hit-testing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoardLayout {
    pub header: Rect,
    pub form: Rect,
    pub banner: Option<Rect>,
    pub map: Rect,
    /// Drawable map area inside the border
    pub map_inner: Rect,
    pub cards: Rect,
    /// Area the cards are tiled in
    pub cards_inner: Rect,
    pub status: Rect,
}

pub fn board_layout(area: Rect, has_error: bool) -> BoardLayout {
    let [header, body, status] = Layout::vertical([
        Constraint::Length(HEADER_HEIGHT),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);
    let [left, cards] =
        Layout::horizontal([Constraint::Percentage(42), Constraint::Min(0)]).areas(body);

    let (form, banner, map) = if has_error {
        let [form, banner, map] = Layout::vertical([
            Constraint::Length(FORM_HEIGHT),
            Constraint::Length(BANNER_HEIGHT),
            Constraint::Min(0),
        ])
        .areas(left);
        (form, Some(banner), map)
    } else {
        let [form, map] =
            Layout::vertical([Constraint::Length(FORM_HEIGHT), Constraint::Min(0)]).areas(left);
        (form, None, map)
    };

    BoardLayout {
        header,
        form,
        banner,
        map,
        map_inner: Block::bordered().inner(map),
        cards,
        cards_inner: Block::bordered().inner(cards),
        status,
    }
}

/// Translate a left click at (`column`, `row`) into board actions
pub fn mouse_actions(area: Rect, state: &AppState, column: u16, row: u16) -> Vec<Action> {
    let layout = board_layout(area, state.error.is_some());
    let position = Position::new(column, row);

    if layout.map_inner.contains(position) {
        return match state.map.point_at(layout.map_inner, column, row) {
            Some(point) => vec![Action::FocusSet(Focus::Map), Action::MapPick(point)],
            None => Vec::new(),
        };
    }

    if layout.cards_inner.contains(position) {
        let window = card_window(
            layout.cards_inner,
            state.visible_card_count(),
            state.selected_card,
        );
        let shown = state.visible_cards().enumerate().skip(window.first);
        for ((i, card), card_area) in shown.zip(window.areas) {
            if close_button_area(card_area).contains(position) {
                return vec![Action::CardRemove(card.id)];
            }
            if card_area.contains(position) {
                return vec![Action::FocusSet(Focus::Cards), Action::CardSelect(i)];
            }
        }
        return vec![Action::FocusSet(Focus::Cards)];
    }

    if let Some(banner) = layout.banner {
        if banner.contains(position) {
            return vec![Action::UiDismissError];
        }
    }

    if layout.form.contains(position) {
        let rows = InputForm::rows(Block::bordered().inner(layout.form));
        let targets = [Focus::City, Focus::Latitude, Focus::Longitude];
        for (rect, focus) in rows.iter().zip(targets) {
            if rect.contains(position) {
                return vec![Action::FocusSet(focus)];
            }
        }
        if rows.get(3).is_some_and(|button| button.contains(position)) {
            return vec![Action::FocusSet(Focus::AddButton), Action::WidgetAdd];
        }
    }

    Vec::new()
}

pub struct BoardDisplayProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

/// The whole board: header, form, banner, map, cards and status bar
#[derive(Default)]
pub struct BoardDisplay {
    form: InputForm,
    map: MapPicker,
    cards: CardGrid,
    /// Area of the last render, used to hit-test clicks
    last_area: Rect,
}

impl BoardDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    fn form_props<'a>(state: &'a AppState, focus: Focus) -> InputFormProps<'a> {
        InputFormProps {
            city: &state.city,
            latitude: &state.latitude,
            longitude: &state.longitude,
            focus,
            is_busy: state.is_busy(),
            tick_count: state.tick_count,
        }
    }
}

impl Component<Action> for BoardDisplay {
    type Props<'a> = BoardDisplayProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        let state = props.state;
        match event {
            EventKind::Mouse(mouse) => {
                if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
                    return Vec::new();
                }
                mouse_actions(self.last_area, state, mouse.column, mouse.row)
            }
            EventKind::Key(key) => {
                if !props.is_focused {
                    return Vec::new();
                }
                if key.code == KeyCode::Esc && state.error.is_some() {
                    return vec![Action::UiDismissError];
                }
                match state.focus {
                    focus if focus.is_form() => self
                        .form
                        .handle_event(event, Self::form_props(state, focus))
                        .into_iter()
                        .collect(),
                    Focus::Map => self
                        .map
                        .handle_event(
                            event,
                            MapPickerProps {
                                view: &state.map,
                                marker: state.marker.as_ref(),
                                is_focused: true,
                            },
                        )
                        .into_iter()
                        .collect(),
                    _ => self
                        .cards
                        .handle_event(
                            event,
                            CardGridProps {
                                state,
                                is_focused: true,
                            },
                        )
                        .into_iter()
                        .collect(),
                }
            }
            _ => Vec::new(),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        self.last_area = area;
        let state = props.state;
        let layout = board_layout(area, state.error.is_some());

        render_header(frame, layout.header, state);

        self.form
            .render(frame, layout.form, Self::form_props(state, state.focus));

        if let (Some(banner), Some(error)) = (layout.banner, state.error.as_ref()) {
            ErrorBanner.render(
                frame,
                banner,
                ErrorBannerProps {
                    error,
                    offset: state.banner_offset(),
                },
            );
        }

        self.map.render(
            frame,
            layout.map,
            MapPickerProps {
                view: &state.map,
                marker: state.marker.as_ref(),
                is_focused: state.focus == Focus::Map,
            },
        );

        self.cards.render(
            frame,
            layout.cards,
            CardGridProps {
                state,
                is_focused: state.focus == Focus::Cards,
            },
        );

        let hints = status_hints(state.focus);
        let mut status_bar = StatusBar::new();
        <StatusBar as Component<Action>>::render(
            &mut status_bar,
            frame,
            layout.status,
            StatusBarProps {
                left: StatusBarSection::empty(),
                center: StatusBarSection::hints(&hints),
                right: StatusBarSection::empty(),
                style: StatusBarStyle::default(),
                is_focused: false,
            },
        );
    }
}

fn status_hints(focus: Focus) -> Vec<StatusBarHint<'static>> {
    let hint = |key: &'static str, label: &'static str| StatusBarHint::new(key, label);
    match focus {
        Focus::Map => vec![
            hint("arrows", "pan"),
            hint("+/-", "zoom"),
            hint("enter", "pick"),
            hint("click", "pick"),
            hint("q", "quit"),
        ],
        Focus::Cards => vec![
            hint("arrows", "select"),
            hint("x", "remove"),
            hint("tab", "next"),
            hint("q", "quit"),
        ],
        _ => vec![
            hint("tab", "next"),
            hint("enter", "add"),
            hint("esc", "dismiss"),
            hint("ctrl+c", "quit"),
        ],
    }
}

fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
    let [art_area, info_area] =
        Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(area);

    let phase = if state.is_busy() {
        (state.tick_count % GRADIENT_CYCLE_TICKS) as f32 / GRADIENT_CYCLE_TICKS as f32
    } else {
        0.0
    };
    let renderer = Renderer::new(fonts::stack(&["miniwi"]))
        .with_plain_fallback()
        .with_alignment(ArtAlignment::Center)
        .with_fill(header_fill(phase));
    frame.render_widget(ArtBox::new(&renderer, TITLE), art_area);

    let count = state.visible_card_count();
    let noun = if count == 1 { "widget" } else { "widgets" };
    let info = Line::from(Span::styled(
        format!("{count} {noun}"),
        Style::default().fg(Color::DarkGray),
    ))
    .centered();
    frame.render_widget(Paragraph::new(info), info_area);
}

/// Teal-to-sky gradient, rotated by `phase` in [0, 1)
fn header_fill(phase: f32) -> Fill {
    let start = ArtColor::rgb(16, 185, 129);
    let end = ArtColor::rgb(56, 189, 248);
    let stops = (0..=4)
        .map(|i| {
            let pos = i as f32 / 4.0;
            let t = ((pos + phase) * 2.0).rem_euclid(2.0);
            let t = if t > 1.0 { 2.0 - t } else { t };
            ColorStop::new(pos, start.interpolate(end, t))
        })
        .collect();
    Fill::Linear(LinearGradient::new(5.0, stops))
}
