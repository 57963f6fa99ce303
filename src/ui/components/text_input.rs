use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use crate::Theme;
use crate::ui::{Component, EventResult, Result, hit};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextInputEvent {
    /// The value was edited.
    Changed(String),
    Submitted(String),
    Cancelled,
    /// The field was clicked.
    Clicked,
}

/// Single-line bordered text field.
///
/// The cursor is a char index into `value`.
pub struct TextInput {
    label: String,
    value: String,
    cursor: usize,
    placeholder: Option<String>,
    focused: bool,
    max_chars: Option<usize>,
    area: Rect,
}

impl TextInput {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: String::new(),
            cursor: 0,
            placeholder: None,
            focused: false,
            max_chars: None,
            area: Rect::default(),
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.set_value(value);
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Refuse input beyond `max` characters.
    pub const fn with_max_chars(mut self, max: usize) -> Self {
        self.max_chars = Some(max);
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.len();
    }

    pub const fn is_focused(&self) -> bool {
        self.focused
    }

    pub const fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    /// Area the field was last rendered into.
    pub const fn area(&self) -> Rect {
        self.area
    }

    fn len(&self) -> usize {
        self.value.chars().count()
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map_or(self.value.len(), |(i, _)| i)
    }

    fn insert_char(&mut self, c: char) -> bool {
        if self.max_chars.is_some_and(|max| self.len() >= max) {
            return false;
        }
        let at = self.byte_index(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
        true
    }

    /// Insert pasted text at the cursor. Line breaks become spaces, other
    /// control characters are dropped.
    pub fn paste(&mut self, text: &str) -> EventResult<TextInputEvent> {
        let mut edited = false;
        let flattened = text.lines().collect::<Vec<_>>().join(" ");
        for c in flattened.chars().filter(|c| !c.is_control()) {
            if !self.insert_char(c) {
                break;
            }
            edited = true;
        }
        self.changed(edited)
    }

    fn delete_char_before_cursor(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let at = self.byte_index(self.cursor);
        self.value.remove(at);
        true
    }

    fn delete_char_at_cursor(&mut self) -> bool {
        if self.cursor >= self.len() {
            return false;
        }
        let at = self.byte_index(self.cursor);
        self.value.remove(at);
        true
    }

    fn delete_word_before_cursor(&mut self) -> bool {
        let chars: Vec<char> = self.value.chars().collect();
        let mut pos = self.cursor;
        while pos > 0 && chars[pos - 1] == ' ' {
            pos -= 1;
        }
        while pos > 0 && chars[pos - 1] != ' ' {
            pos -= 1;
        }
        if pos == self.cursor {
            return false;
        }
        let (start, end) = (self.byte_index(pos), self.byte_index(self.cursor));
        self.value.drain(start..end);
        self.cursor = pos;
        true
    }

    fn changed(&self, edited: bool) -> EventResult<TextInputEvent> {
        if edited {
            TextInputEvent::Changed(self.value.clone()).into()
        } else {
            EventResult::Consumed
        }
    }
}

impl Component for TextInput {
    type Output = TextInputEvent;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        Ok(match (key.code, key.modifiers) {
            (KeyCode::Enter, _) => TextInputEvent::Submitted(self.value.clone()).into(),
            (KeyCode::Esc, _) => TextInputEvent::Cancelled.into(),

            (KeyCode::Backspace, KeyModifiers::ALT) | (KeyCode::Char('w'), KeyModifiers::CONTROL) => {
                let edited = self.delete_word_before_cursor();
                self.changed(edited)
            }
            (KeyCode::Backspace, _) => {
                let edited = self.delete_char_before_cursor();
                self.changed(edited)
            }
            (KeyCode::Delete, _) => {
                let edited = self.delete_char_at_cursor();
                self.changed(edited)
            }

            (KeyCode::Left, _) => {
                self.cursor = self.cursor.saturating_sub(1);
                EventResult::Consumed
            }
            (KeyCode::Right, _) => {
                self.cursor = (self.cursor + 1).min(self.len());
                EventResult::Consumed
            }
            (KeyCode::Home, _) | (KeyCode::Char('a'), KeyModifiers::CONTROL) => {
                self.cursor = 0;
                EventResult::Consumed
            }
            (KeyCode::End, _) | (KeyCode::Char('e'), KeyModifiers::CONTROL) => {
                self.cursor = self.len();
                EventResult::Consumed
            }

            (KeyCode::Char('u'), KeyModifiers::CONTROL) => {
                let edited = !self.value.is_empty();
                self.value.clear();
                self.cursor = 0;
                self.changed(edited)
            }

            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                let edited = self.insert_char(c);
                self.changed(edited)
            }

            _ => EventResult::Ignored,
        })
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> Result<EventResult<Self::Output>> {
        if mouse.kind == MouseEventKind::Down(MouseButton::Left)
            && hit(self.area, mouse.column, mouse.row)
        {
            return Ok(TextInputEvent::Clicked.into());
        }
        Ok(EventResult::Ignored)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        self.area = area;

        let input_style = Style::default().fg(theme.text());
        let cursor_style = Style::default()
            .fg(theme.base())
            .bg(theme.text())
            .add_modifier(Modifier::BOLD);
        let placeholder_style = Style::default().fg(theme.overlay0());

        let line = if self.value.is_empty() {
            let mut spans = Vec::new();
            if self.focused {
                spans.push(Span::styled(" ", cursor_style));
            }
            if let Some(placeholder) = &self.placeholder {
                spans.push(Span::styled(placeholder.clone(), placeholder_style));
            }
            Line::from(spans)
        } else if self.focused {
            let before: String = self.value.chars().take(self.cursor).collect();
            let at = self.value.chars().nth(self.cursor).unwrap_or(' ');
            let after: String = self.value.chars().skip(self.cursor + 1).collect();
            Line::from(vec![
                Span::styled(before, input_style),
                Span::styled(at.to_string(), cursor_style),
                Span::styled(after, input_style),
            ])
        } else {
            Line::from(Span::styled(self.value.clone(), input_style))
        };

        let border_color = if self.focused {
            theme.border_focused()
        } else {
            theme.border()
        };
        let block = Block::default()
            .title(format!(" {} ", self.label))
            .title_style(
                Style::default()
                    .fg(if self.focused { theme.mauve() } else { theme.subtext0() })
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color));

        frame.render_widget(Paragraph::new(line).block(block), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(input: &mut TextInput, s: &str) {
        for c in s.chars() {
            input.handle_key(key(KeyCode::Char(c))).unwrap();
        }
    }

    #[test]
    fn test_typing_emits_changed() {
        let mut input = TextInput::new("Title");
        let result = input.handle_key(key(KeyCode::Char('k'))).unwrap();
        assert_eq!(result, TextInputEvent::Changed("k".to_string()).into());
    }

    #[test]
    fn test_cursor_editing_with_multibyte_chars() {
        let mut input = TextInput::new("Title");
        type_str(&mut input, "café");
        input.handle_key(key(KeyCode::Left)).unwrap();
        input.handle_key(key(KeyCode::Backspace)).unwrap();
        assert_eq!(input.value(), "caé");
        input.handle_key(key(KeyCode::Home)).unwrap();
        input.handle_key(key(KeyCode::Delete)).unwrap();
        assert_eq!(input.value(), "aé");
    }

    #[test]
    fn test_paste_inserts_at_cursor() {
        let mut input = TextInput::new("Location").with_max_chars(14);
        type_str(&mut input, "Hall");
        input.handle_key(key(KeyCode::Home)).unwrap();
        let result = input.paste("Dining\r\n");
        assert_eq!(result, TextInputEvent::Changed("DiningHall".to_string()).into());

        input.set_value("");
        input.paste("Main\nLibrary");
        assert_eq!(input.value(), "Main Library");
        input.paste("\tWest Wing");
        assert_eq!(input.value(), "Main LibraryWe");
    }

    #[test]
    fn test_noop_edits_do_not_emit_changed() {
        let mut input = TextInput::new("Title");
        assert_eq!(
            input.handle_key(key(KeyCode::Backspace)).unwrap(),
            EventResult::Consumed
        );
    }

    #[test]
    fn test_max_chars() {
        let mut input = TextInput::new("Name").with_max_chars(3);
        type_str(&mut input, "abcd");
        assert_eq!(input.value(), "abc");
    }

    #[test]
    fn test_delete_word() {
        let mut input = TextInput::new("Query").with_value("red water bottle");
        input
            .handle_key(KeyEvent::new(KeyCode::Char('w'), KeyModifiers::CONTROL))
            .unwrap();
        assert_eq!(input.value(), "red water ");
    }

    #[test]
    fn test_enter_and_escape() {
        let mut input = TextInput::new("Query").with_value("keys");
        assert_eq!(
            input.handle_key(key(KeyCode::Enter)).unwrap(),
            TextInputEvent::Submitted("keys".to_string()).into()
        );
        assert_eq!(
            input.handle_key(key(KeyCode::Esc)).unwrap(),
            TextInputEvent::Cancelled.into()
        );
    }
}
