use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};

use super::Component;
use crate::action::Action;
use crate::error::BoardError;

pub const ERROR_ICON: &str = "\u{26a0}\u{fe0f}";
pub const BANNER_HEIGHT: u16 = 3;

pub struct ErrorBanner;

pub struct ErrorBannerProps<'a> {
    pub error: &'a BoardError,
    /// Horizontal shake offset in cells
    pub offset: i16,
}

impl Component<Action> for ErrorBanner {
    type Props<'a> = ErrorBannerProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let area = shifted(area, props.offset);
        let red = Color::Rgb(239, 68, 68);
        let block = Block::bordered()
            .border_style(Style::default().fg(red))
            .title(Span::styled(
                format!(" {} ", props.error.kind()),
                Style::default().fg(red).add_modifier(Modifier::BOLD),
            ))
            .title_bottom(
                Line::from(Span::styled(
                    " esc dismiss ",
                    Style::default().fg(Color::DarkGray),
                ))
                .right_aligned(),
            );
        let message = Line::from(vec![
            Span::raw(ERROR_ICON),
            Span::raw(" "),
            Span::styled(
                props.error.to_string(),
                Style::default().fg(Color::Rgb(252, 165, 165)),
            ),
        ]);
        frame.render_widget(Paragraph::new(message).block(block), area);
    }
}

/// Nudge the banner sideways without leaving its area
fn shifted(area: Rect, offset: i16) -> Rect {
    if offset == 0 || area.width < 2 {
        return area;
    }
    let shrunk = Rect {
        width: area.width - 1,
        ..area
    };
    if offset > 0 {
        Rect {
            x: area.x + 1,
            ..shrunk
        }
    } else {
        shrunk
    }
}
