pub mod board_display;
pub mod card_grid;
pub mod error_banner;
pub mod input_form;
pub mod map_picker;
pub mod widget_card;

// Re-export core Component trait
pub use tui_dispatch::Component;

pub use board_display::{board_layout, mouse_actions, BoardDisplay, BoardDisplayProps, BoardLayout};
pub use card_grid::{card_window, close_button_area, CardGrid, CardGridProps, CardWindow};
pub use error_banner::{ErrorBanner, ErrorBannerProps, ERROR_ICON};
pub use input_form::{InputForm, InputFormProps};
pub use map_picker::{MapPicker, MapPickerProps};
pub use widget_card::{WidgetCardView, WidgetCardViewProps};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::action::Action;

/// Keys every focusable component answers the same way
pub(crate) fn common_key_action(key: &KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }
    match key.code {
        KeyCode::Tab => Some(Action::FocusNext),
        KeyCode::BackTab => Some(Action::FocusPrev),
        _ => None,
    }
}
