use crossterm::event::KeyCode;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};
use tui_dispatch::EventKind;

use super::widget_card::CLOSE_LABEL;
use super::{common_key_action, Component, WidgetCardView, WidgetCardViewProps};
use crate::action::Action;
use crate::state::AppState;

pub const CARD_WIDTH: u16 = 30;
pub const CARD_HEIGHT: u16 = 6;

#[derive(Default)]
pub struct CardGrid;

pub struct CardGridProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

/// Outer frame of the grid; cards are laid out inside its inner area
pub fn grid_block(is_focused: bool) -> Block<'static> {
    let color = if is_focused {
        Color::Rgb(16, 185, 129)
    } else {
        Color::Rgb(63, 63, 70)
    };
    Block::bordered()
        .border_style(Style::default().fg(color))
        .title(" Widgets ")
}

/// The slice of cards that fits on screen
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CardWindow {
    /// Index (among visible cards) of the first card shown
    pub first: usize,
    /// Rectangles for cards `first..first + areas.len()`, in reading order
    pub areas: Vec<Rect>,
}

impl CardWindow {
    /// Cards scrolled off above and below the window
    pub fn hidden(&self, count: usize) -> (usize, usize) {
        let before = self.first.min(count);
        (before, count.saturating_sub(before + self.areas.len()))
    }
}

/// Lay out `count` cards in `area`, scrolling by whole rows so the
/// `selected` card is always shown.
pub fn card_window(area: Rect, count: usize, selected: usize) -> CardWindow {
    if area.width < CARD_WIDTH || area.height < CARD_HEIGHT || count == 0 {
        return CardWindow::default();
    }
    let columns = usize::from(area.width / CARD_WIDTH);
    let rows = usize::from(area.height / CARD_HEIGHT);
    let selected_row = selected.min(count - 1) / columns;
    let first = (selected_row + 1).saturating_sub(rows) * columns;
    let areas = (0..(count - first).min(columns * rows))
        .map(|i| {
            let col = (i % columns) as u16;
            let row = (i / columns) as u16;
            Rect::new(
                area.x + col * CARD_WIDTH,
                area.y + row * CARD_HEIGHT,
                CARD_WIDTH,
                CARD_HEIGHT,
            )
        })
        .collect();
    CardWindow { first, areas }
}

fn overflow_label(before: usize, after: usize) -> Option<String> {
    match (before, after) {
        (0, 0) => None,
        (0, n) => Some(format!(" +{n} more \u{2193} ")),
        (n, 0) => Some(format!(" +{n} more \u{2191} ")),
        (b, a) => Some(format!(" +{b} \u{2191}  +{a} more \u{2193} ")),
    }
}

/// Where `[x]` sits on a card's top border
pub fn close_button_area(card: Rect) -> Rect {
    let width = CLOSE_LABEL.len() as u16;
    Rect::new(card.x + card.width.saturating_sub(width + 1), card.y, width, 1)
}

impl Component<Action> for CardGrid {
    type Props<'a> = CardGridProps<'a>;

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

        let selected = props.state.selected_card;
        let count = props.state.visible_card_count();
        match key.code {
            KeyCode::Left | KeyCode::Up if selected > 0 => Some(Action::CardSelect(selected - 1)),
            KeyCode::Right | KeyCode::Down if selected + 1 < count => {
                Some(Action::CardSelect(selected + 1))
            }
            KeyCode::Char('x') | KeyCode::Delete | KeyCode::Backspace => props
                .state
                .selected_visible_card()
                .map(|card| Action::CardRemove(card.id)),
            KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let state = props.state;
        let count = state.visible_card_count();
        let mut block = grid_block(props.is_focused);
        let inner = block.inner(area);
        let window = card_window(inner, count, state.selected_card);

        let (before, after) = window.hidden(count);
        if let Some(label) = overflow_label(before, after) {
            block = block.title_bottom(
                Line::from(Span::styled(label, Style::default().fg(Color::Yellow))).right_aligned(),
            );
        }
        frame.render_widget(block, area);

        if count == 0 {
            let message = if state.pending_card_count() > 0 {
                "Loading widgets..."
            } else {
                "No widgets yet. Add a city or pick a point on the map."
            };
            let hint = Line::from(Span::styled(message, Style::default().fg(Color::DarkGray)))
                .centered();
            frame.render_widget(Paragraph::new(hint), inner);
            return;
        }

        let mut view = WidgetCardView;
        let shown = state.visible_cards().enumerate().skip(window.first);
        for ((i, card), card_area) in shown.zip(window.areas) {
            let Some(conditions) = card.weather.data() else {
                continue;
            };
            view.render(
                frame,
                card_area,
                WidgetCardViewProps {
                    name: &card.descriptor.name,
                    conditions,
                    is_selected: props.is_focused && i == state.selected_card,
                },
            );
        }
    }
}
