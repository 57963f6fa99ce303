pub mod components;
pub mod widgets;

mod error_dialog;
mod help;
mod status_bar;
mod theme_selector;
mod toast;

use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::Frame;
use ratatui::layout::{Position, Rect};

pub use color_eyre::Result;

use crate::Theme;

pub use components::{
    ColumnDef, ConfirmDialog, ConfirmEvent, List, ListEvent, ListRow, SearchBox, SearchBoxEvent,
    SuggestionRow, Table, TableEvent, TableRow, TextInput, TextInputEvent,
};
pub use widgets::Spinner;

pub use error_dialog::{ErrorDialog, ErrorDialogEvent};
pub use help::{HelpEvent, HelpOverlay, Keybinding, KeybindingSection};
pub use status_bar::StatusBar;
pub use theme_selector::{ThemeEvent, ThemeSelector};
pub use toast::{Toast, ToastManager, ToastType};

/// Result of handling an input event.
///
/// - `Ignored` - The handler didn't recognize or handle this input
/// - `Consumed` - The input was handled but produced no message, the input will not be propagated further
/// - `Event(E)` - The input was handled and produced a message, the input will not be propagated further
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventResult<E> {
    /// Input was not handled, parent should process it.
    Ignored,
    /// Input was consumed but produced no event.
    Consumed,
    /// Input was consumed and produced an event.
    Event(E),
}

impl<E> EventResult<E> {
    /// Returns true if the input was consumed (either with or without an event).
    pub const fn is_consumed(&self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

impl<E> From<E> for EventResult<E> {
    fn from(event: E) -> Self {
        Self::Event(event)
    }
}

/// Extension trait for processing `Result<EventResult<T>>` from component handlers.
pub trait EventResultExt<T> {
    /// Process the result into a tuple of (`was_consumed`, `optional_message`).
    fn process(self) -> (bool, Option<T>);
}

impl<T> EventResultExt<T> for Result<EventResult<T>> {
    fn process(self) -> (bool, Option<T>) {
        match self {
            Ok(EventResult::Event(msg)) => (true, Some(msg)),
            Ok(EventResult::Consumed) => (true, None),
            Ok(EventResult::Ignored) | Err(_) => (false, None),
        }
    }
}

/// Interactive UI building block.
///
/// Components are reusable widgets that handle input events and emit
/// generic outputs. They know nothing about business logic.
pub trait Component {
    /// The output type produced by this component.
    type Output;

    /// Handle a key event.
    ///
    /// Returns `Ok(EventResult::...)` where:
    /// - `Ignored` - key was not handled, parent should process it
    /// - `Consumed` - key was handled but produced no output
    /// - `Event(output)` - key was handled and produced an output
    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        _ = key;
        Ok(EventResult::Ignored)
    }

    /// Handle a mouse event. Components hit-test against the area they last rendered into.
    fn handle_mouse(&mut self, mouse: MouseEvent) -> Result<EventResult<Self::Output>> {
        _ = mouse;
        Ok(EventResult::Ignored)
    }

    /// Called on each tick for animations and time-based updates.
    fn handle_tick(&mut self) {}

    /// Render the component to the frame.
    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme);
}

/// Full-page view that orchestrates components.
///
/// Screens connect UI interactions to the domain by translating component
/// events into app messages.
pub trait Screen {
    /// The message type produced by this screen.
    type Output;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>>;

    fn handle_mouse(&mut self, mouse: MouseEvent) -> Result<EventResult<Self::Output>> {
        _ = mouse;
        Ok(EventResult::Ignored)
    }

    /// Handle bracketed-paste text, delivered to whichever field has focus.
    fn handle_paste(&mut self, text: &str) -> EventResult<Self::Output> {
        _ = text;
        EventResult::Ignored
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme);

    fn handle_tick(&mut self) {}

    /// Breadcrumb segments for navigation context.
    fn breadcrumbs(&self) -> Vec<String> {
        vec![]
    }

    /// Returns the keybindings for this screen.
    fn keybindings(&self) -> Vec<Keybinding> {
        vec![]
    }

    /// Whether a text field currently owns the keyboard, so single-letter
    /// global shortcuts must not fire.
    fn captures_text(&self) -> bool {
        false
    }
}

/// Whether a terminal cell lies within `area`.
pub fn hit(area: Rect, column: u16, row: u16) -> bool {
    area.contains(Position { x: column, y: row })
}

/// Truncate a string to fit within `max_width` characters, adding "..." if truncated.
pub fn truncate_str(s: &str, max_width: usize) -> String {
    if s.chars().count() <= max_width {
        s.to_string()
    } else if max_width > 3 {
        let kept: String = s.chars().take(max_width - 3).collect();
        format!("{kept}...")
    } else {
        s.chars().take(max_width).collect()
    }
}
