use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph},
    Frame,
};

use super::Component;
use crate::action::Action;
use crate::conditions::CurrentConditions;

pub const CLOSE_LABEL: &str = "[x]";

/// A single weather card. Purely visual: removal is routed by `CardGrid`.
pub struct WidgetCardView;

pub struct WidgetCardViewProps<'a> {
    pub name: &'a str,
    pub conditions: &'a CurrentConditions,
    pub is_selected: bool,
}

impl Component<Action> for WidgetCardView {
    type Props<'a> = WidgetCardViewProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let border = if props.is_selected {
            Style::default().fg(Color::Rgb(16, 185, 129))
        } else {
            Style::default().fg(Color::Rgb(63, 63, 70))
        };
        let block = Block::bordered()
            .border_type(BorderType::Plain)
            .border_style(border)
            .title_top(
                Line::from(Span::styled(
                    props.name.to_uppercase(),
                    Style::default()
                        .fg(Color::Rgb(228, 228, 231))
                        .add_modifier(Modifier::BOLD),
                ))
                .left_aligned(),
            )
            .title_top(
                Line::from(Span::styled(
                    CLOSE_LABEL,
                    Style::default().fg(Color::Rgb(113, 113, 122)),
                ))
                .right_aligned(),
            );

        let conditions = props.conditions;
        let category = conditions.category();
        let muted = Style::default().fg(Color::Rgb(113, 113, 122));
        let lines = vec![
            Line::from(vec![
                Span::styled("\u{1f552} ", muted),
                Span::styled(conditions.local_time(), muted),
            ]),
            Line::from(vec![
                Span::raw(category.glyph()),
                Span::raw(" "),
                Span::styled(category.label(), Style::default().fg(category.color())),
            ]),
            Line::from(vec![
                Span::styled("Temp ", muted),
                Span::styled(
                    conditions.temperature_label(),
                    Style::default()
                        .fg(Color::Rgb(244, 244, 245))
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("Wind ", muted),
                Span::styled(conditions.wind_label(), Style::default().fg(Color::Gray)),
                Span::styled(" m/s", muted),
            ]),
        ];

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}
