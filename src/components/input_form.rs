use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{BaseStyle, Padding, TextInput, TextInputProps, TextInputStyle};

use super::{common_key_action, Component};
use crate::action::Action;
use crate::state::Focus;

/// Bordered form: three field rows plus the button row
pub const FORM_HEIGHT: u16 = 6;
const LABEL_WIDTH: u16 = 11;

const ACCENT: Color = Color::Rgb(16, 185, 129);
const FIELD_BG: Color = Color::Rgb(39, 39, 42);

/// City, latitude and longitude inputs with the add button
pub struct InputForm {
    city: TextInput,
    latitude: TextInput,
    longitude: TextInput,
}

pub struct InputFormProps<'a> {
    pub city: &'a str,
    pub latitude: &'a str,
    pub longitude: &'a str,
    /// Board focus; the form only reacts when it is one of its controls
    pub focus: Focus,
    pub is_busy: bool,
    pub tick_count: u32,
}

impl Default for InputForm {
    fn default() -> Self {
        Self {
            city: TextInput::new(),
            latitude: TextInput::new(),
            longitude: TextInput::new(),
        }
    }
}

struct Field {
    focus: Focus,
    label: &'static str,
    placeholder: &'static str,
    on_change: fn(String) -> Action,
}

static FIELDS: [Field; 3] = [
    Field {
        focus: Focus::City,
        label: "City",
        placeholder: "London",
        on_change: Action::InputCity,
    },
    Field {
        focus: Focus::Latitude,
        label: "Latitude",
        placeholder: "55.75",
        on_change: Action::InputLatitude,
    },
    Field {
        focus: Focus::Longitude,
        label: "Longitude",
        placeholder: "37.62",
        on_change: Action::InputLongitude,
    },
];

/// Build the text input props for a field
macro_rules! input_props {
    ($field:expr, $value:expr, $focused:expr) => {
        TextInputProps {
            value: $value,
            placeholder: $field.placeholder,
            is_focused: $focused,
            style: TextInputStyle {
                base: BaseStyle {
                    border: None,
                    padding: Padding::xy(1, 0),
                    bg: Some(FIELD_BG),
                    fg: None,
                },
                placeholder_style: None,
                cursor_style: None,
            },
            on_change: $field.on_change,
            on_submit: |_| Action::WidgetAdd,
            on_cursor_move: Some(|_| Action::Render),
        }
    };
}

impl InputForm {
    pub fn new() -> Self {
        Self::default()
    }

    fn input_mut(&mut self, focus: Focus) -> Option<&mut TextInput> {
        match focus {
            Focus::City => Some(&mut self.city),
            Focus::Latitude => Some(&mut self.latitude),
            Focus::Longitude => Some(&mut self.longitude),
            _ => None,
        }
    }

    /// Rows for the three fields and the button, inside the form border
    pub fn rows(inner: Rect) -> std::rc::Rc<[Rect]> {
        Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner)
    }
}

impl Component<Action> for InputForm {
    type Props<'a> = InputFormProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.focus.is_form() {
            return Vec::new();
        }
        let EventKind::Key(key) = event else {
            return Vec::new();
        };
        if let Some(action) = common_key_action(key) {
            return vec![action];
        }

        match key.code {
            KeyCode::Enter => return vec![Action::WidgetAdd],
            KeyCode::Esc => return vec![Action::UiDismissError],
            KeyCode::Down => return vec![Action::FocusNext],
            KeyCode::Up if props.focus != Focus::City => return vec![Action::FocusPrev],
            KeyCode::Char(' ') if props.focus == Focus::AddButton => {
                return vec![Action::WidgetAdd]
            }
            _ => {}
        }

        let focus = props.focus;
        let Some(field) = FIELDS.iter().find(|f| f.focus == focus) else {
            return Vec::new();
        };
        let value = match focus {
            Focus::City => props.city,
            Focus::Latitude => props.latitude,
            _ => props.longitude,
        };
        let Some(input) = self.input_mut(focus) else {
            return Vec::new();
        };
        input
            .handle_event(event, input_props!(field, value, true))
            .into_iter()
            .collect()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let border = if props.focus.is_form() {
            ACCENT
        } else {
            Color::Rgb(63, 63, 70)
        };
        let block = Block::bordered()
            .border_style(Style::default().fg(border))
            .title(" Add widget ");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Self::rows(inner);
        let values = [props.city, props.latitude, props.longitude];
        for (i, (field, value)) in FIELDS.iter().zip(values).enumerate() {
            let [label_area, input_area] =
                Layout::horizontal([Constraint::Length(LABEL_WIDTH), Constraint::Min(1)])
                    .areas(rows[i]);
            let is_focused = props.focus == field.focus;
            let label_style = if is_focused {
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Rgb(113, 113, 122))
            };
            frame.render_widget(Paragraph::new(Span::styled(field.label, label_style)), label_area);

            let Some(input) = self.input_mut(field.focus) else {
                continue;
            };
            input.render(frame, input_area, input_props!(field, value, is_focused));
        }

        frame.render_widget(
            Paragraph::new(button_line(&props)).centered(),
            rows[3],
        );
    }
}

fn button_line(props: &InputFormProps<'_>) -> Line<'static> {
    if props.is_busy {
        // Pulse between two shades while the flow runs
        let shade = if (props.tick_count / 4) % 2 == 0 {
            Color::Rgb(161, 161, 170)
        } else {
            Color::Rgb(82, 82, 91)
        };
        return Line::from(Span::styled(
            "[ Working... ]",
            Style::default().fg(shade),
        ));
    }
    let style = if props.focus == Focus::AddButton {
        Style::default()
            .fg(Color::Black)
            .bg(ACCENT)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(ACCENT)
    };
    Line::from(Span::styled("[ + Add widget ]", style))
}
