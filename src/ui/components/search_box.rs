//! Type-ahead search field with a suggestion dropdown.
//!
//! [`SearchBox`] translates keys and mouse gestures into [`Input`]s for an
//! [`Autocomplete`] controller and draws its state. The dropdown is drawn by a
//! separate call so screens can paint it on top of everything else.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};

use crate::Theme;
use crate::autocomplete::{Autocomplete, Input, Outcome, Selectable};
use crate::config::{KeyResolver, SearchAction};
use crate::model::Item;
use crate::ui::{Component, EventResult, Result, TextInput, TextInputEvent, hit};

/// How a suggestion is drawn in the dropdown.
pub trait SuggestionRow {
    fn suggestion_line(&self, query: &str, theme: &Theme) -> Line<'static>;
}

impl SuggestionRow for String {
    fn suggestion_line(&self, query: &str, theme: &Theme) -> Line<'static> {
        let plain = Style::default().fg(theme.text());
        let matched = Style::default()
            .fg(theme.peach())
            .add_modifier(Modifier::BOLD);

        match match_span(self, query) {
            Some((start, end)) => Line::from(vec![
                Span::styled(self[..start].to_string(), plain),
                Span::styled(self[start..end].to_string(), matched),
                Span::styled(self[end..].to_string(), plain),
            ]),
            None => Line::from(Span::styled(self.clone(), plain)),
        }
    }
}

impl SuggestionRow for Item {
    fn suggestion_line(&self, _query: &str, theme: &Theme) -> Line<'static> {
        let mut spans = vec![Span::styled(
            self.title.clone(),
            Style::default()
                .fg(theme.text())
                .add_modifier(Modifier::BOLD),
        )];
        let meta: Vec<&str> = [self.category.as_str(), self.location.as_str()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect();
        if !meta.is_empty() {
            spans.push(Span::styled(
                format!("  {}", meta.join(" · ")),
                Style::default().fg(theme.subtext0()),
            ));
        }
        spans.push(Span::styled(
            format!("  {}", self.date_label()),
            Style::default().fg(theme.overlay1()),
        ));
        Line::from(spans)
    }
}

/// Byte range of the first case-insensitive occurrence of the trimmed query.
fn match_span(text: &str, query: &str) -> Option<(usize, usize)> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    // Only map back when lowercasing keeps byte offsets aligned.
    let folded = text.to_lowercase();
    if folded.len() != text.len() {
        return None;
    }
    let start = folded.find(&needle)?;
    let end = start + needle.len();
    (text.is_char_boundary(start) && text.is_char_boundary(end)).then_some((start, end))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchBoxEvent<S> {
    /// A suggestion was committed.
    Committed(S),
    /// Enter without a highlighted suggestion.
    Search(String),
    /// The query text changed.
    Changed(String),
}

impl<S> From<Outcome<S>> for SearchBoxEvent<S> {
    fn from(outcome: Outcome<S>) -> Self {
        match outcome {
            Outcome::Committed(selection) => Self::Committed(selection),
            Outcome::Search(query) => Self::Search(query),
        }
    }
}

pub struct SearchBox<C: Selectable + SuggestionRow> {
    controller: Autocomplete<C>,
    input: TextInput,
    resolver: Arc<KeyResolver>,
    empty_hint: Option<&'static str>,
    dropdown: Rect,
}

impl<C: Selectable + SuggestionRow> SearchBox<C> {
    pub fn new(label: &str, placeholder: &str, resolver: Arc<KeyResolver>) -> Self {
        Self {
            controller: Autocomplete::default(),
            input: TextInput::new(label).with_placeholder(placeholder),
            resolver,
            empty_hint: None,
            dropdown: Rect::default(),
        }
    }

    /// Text shown under the field when an eligible query matches nothing.
    pub const fn with_empty_hint(mut self, hint: &'static str) -> Self {
        self.empty_hint = Some(hint);
        self
    }

    pub fn query(&self) -> &str {
        self.controller.query()
    }

    pub const fn is_focused(&self) -> bool {
        self.controller.is_focused()
    }

    pub fn set_candidates(&mut self, candidates: Vec<C>) {
        self.controller.set_candidates(candidates);
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.controller.set_query(query);
        self.sync_input();
    }

    pub fn focus(&mut self) {
        self.controller.handle(Input::FocusIn);
    }

    pub const fn blur(&mut self) {
        self.controller.blur();
    }

    /// Insert pasted text at the cursor as if it had been typed.
    pub fn paste(&mut self, text: &str) -> EventResult<SearchBoxEvent<C::Selection>> {
        if !self.controller.is_focused() {
            return EventResult::Ignored;
        }
        match self.input.paste(text) {
            EventResult::Event(TextInputEvent::Changed(query)) => {
                self.apply(Input::QueryChanged(query))
            }
            _ => EventResult::Consumed,
        }
    }

    fn sync_input(&mut self) {
        if self.input.value() != self.controller.query() {
            self.input.set_value(self.controller.query());
        }
    }

    fn apply(&mut self, input: Input) -> EventResult<SearchBoxEvent<C::Selection>> {
        let before = self.controller.query().to_string();
        let outcome = self.controller.handle(input);
        self.sync_input();
        match outcome {
            Some(outcome) => SearchBoxEvent::from(outcome).into(),
            None if self.controller.query() != before => {
                SearchBoxEvent::Changed(self.controller.query().to_string()).into()
            }
            None => EventResult::Consumed,
        }
    }

    fn dropdown_row(&self, column: u16, row: u16) -> Option<usize> {
        if !self.controller.is_open() || !hit(self.dropdown, column, row) {
            return None;
        }
        let index = usize::from(row.checked_sub(self.dropdown.y + 1)?);
        (index < self.controller.results().len()).then_some(index)
    }

    /// Draw the suggestion dropdown (or the empty hint) below the field.
    pub fn render_dropdown(&mut self, frame: &mut Frame, theme: &Theme) {
        self.dropdown = Rect::default();
        let anchor = self.input.area();
        let screen = frame.area();
        let top = anchor.bottom();
        if top >= screen.bottom() {
            return;
        }

        let lines: Vec<Line> = if self.controller.is_open() {
            let query = self.controller.query();
            self.controller
                .results()
                .iter()
                .enumerate()
                .map(|(i, candidate)| {
                    let line = candidate.suggestion_line(query, theme);
                    if self.controller.highlighted() == Some(i) {
                        line.style(Style::default().bg(theme.selection_bg()))
                    } else {
                        line
                    }
                })
                .collect()
        } else if let Some(hint) = self.empty_hint
            && self.controller.is_focused()
            && self.controller.is_eligible()
            && self.controller.results().is_empty()
        {
            vec![Line::from(Span::styled(
                hint,
                Style::default().fg(theme.overlay1()),
            ))]
        } else {
            return;
        };

        let wanted = u16::try_from(lines.len() + 2).unwrap_or(u16::MAX);
        let height = wanted.min(screen.bottom() - top);
        let area = Rect::new(anchor.x, top, anchor.width, height);

        frame.render_widget(Clear, area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.border_focused()))
            .style(Style::default().bg(theme.mantle()));
        frame.render_widget(Paragraph::new(lines).block(block), area);
        self.dropdown = area;
    }
}

impl<C: Selectable + SuggestionRow> Component for SearchBox<C> {
    type Output = SearchBoxEvent<C::Selection>;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        if !self.controller.is_focused() {
            return Ok(EventResult::Ignored);
        }
        if self.resolver.matches_search(&key, SearchAction::Clear) {
            return Ok(self.apply(Input::Clear));
        }

        let input = match key.code {
            KeyCode::Down => Input::ArrowDown,
            KeyCode::Up => Input::ArrowUp,
            KeyCode::Enter => Input::Enter,
            KeyCode::Esc => Input::Escape,
            KeyCode::Tab => Input::Tab,
            _ => {
                return Ok(match self.input.handle_key(key)? {
                    EventResult::Event(TextInputEvent::Changed(query)) => {
                        self.apply(Input::QueryChanged(query))
                    }
                    EventResult::Ignored => EventResult::Ignored,
                    _ => EventResult::Consumed,
                });
            }
        };
        Ok(self.apply(input))
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> Result<EventResult<Self::Output>> {
        let (column, row) = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Moved => {
                if let Some(index) = self.dropdown_row(column, row) {
                    return Ok(self.apply(Input::Hover(index)));
                }
            }
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(index) = self.dropdown_row(column, row) {
                    return Ok(self.apply(Input::Click(index)));
                }
                // Borders and the empty hint belong to the widget too.
                if hit(self.dropdown, column, row) {
                    return Ok(EventResult::Consumed);
                }
                if hit(self.input.area(), column, row) {
                    self.focus();
                    return Ok(EventResult::Consumed);
                }
                if self.controller.is_focused() || self.controller.is_open() {
                    self.controller.handle(Input::ClickOutside);
                    // The pointer moved focus elsewhere.
                    self.controller.blur();
                }
            }
            _ => {}
        }
        Ok(EventResult::Ignored)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        self.input.set_focused(self.controller.is_focused());
        self.input.render(frame, area, theme);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autocomplete::Navigation;
    use crate::model::fixtures::{found, lost};
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn term_box(terms: &[&str]) -> SearchBox<String> {
        let mut search = SearchBox::new("Search", "Type to search", Arc::new(KeyResolver::default()));
        search.set_candidates(terms.iter().map(ToString::to_string).collect());
        search.focus();
        search
    }

    fn type_str<C: Selectable + SuggestionRow>(search: &mut SearchBox<C>, s: &str) {
        for c in s.chars() {
            search.handle_key(key(KeyCode::Char(c))).unwrap();
        }
    }

    #[test]
    fn test_typing_reports_changes() {
        let mut search = term_box(&["Keys"]);
        let result = search.handle_key(key(KeyCode::Char('k'))).unwrap();
        assert_eq!(result, SearchBoxEvent::Changed("k".to_string()).into());
        assert_eq!(search.query(), "k");
    }

    #[test]
    fn test_arrow_enter_commits_and_refills_field() {
        let mut search = term_box(&["Laptop", "Lanyard"]);
        type_str(&mut search, "la");
        search.handle_key(key(KeyCode::Down)).unwrap();
        let result = search.handle_key(key(KeyCode::Enter)).unwrap();

        assert_eq!(result, SearchBoxEvent::Committed("Lanyard".to_string()).into());
        assert_eq!(search.input.value(), "Lanyard");
        assert!(search.is_focused());
    }

    #[test]
    fn test_enter_without_highlight_searches() {
        let mut search = term_box(&["Cable"]);
        type_str(&mut search, "ab");
        let result = search.handle_key(key(KeyCode::Enter)).unwrap();
        assert_eq!(result, SearchBoxEvent::Search("ab".to_string()).into());
    }

    #[test]
    fn test_letters_bound_to_navigation_are_typed() {
        let mut search = term_box(&["Jacket"]);
        type_str(&mut search, "jk");
        assert_eq!(search.query(), "jk");
    }

    #[test]
    fn test_clear_binding() {
        let mut search = term_box(&["Keys"]);
        type_str(&mut search, "key");
        let result = search
            .handle_key(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL))
            .unwrap();
        assert_eq!(result, SearchBoxEvent::Changed(String::new()).into());
        assert!(search.is_focused());
    }

    #[test]
    fn test_unfocused_ignores_keys() {
        let mut search = term_box(&["Keys"]);
        search.handle_key(key(KeyCode::Esc)).unwrap();
        assert!(!search.is_focused());
        assert_eq!(
            search.handle_key(key(KeyCode::Char('k'))).unwrap(),
            EventResult::Ignored
        );
    }

    #[test]
    fn test_mouse_hover_and_click_in_dropdown() {
        let mut search = term_box(&["Keys", "Keyboard"]);
        type_str(&mut search, "key");
        search.dropdown = Rect::new(0, 3, 30, 4);

        search
            .handle_mouse(mouse(MouseEventKind::Moved, 5, 5))
            .unwrap();
        assert_eq!(search.controller.highlighted(), Some(1));

        let result = search
            .handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 5, 4))
            .unwrap();
        assert_eq!(result, SearchBoxEvent::Committed("Keyboard".to_string()).into());
    }

    #[test]
    fn test_click_outside_closes_and_releases_keyboard() {
        let mut search = term_box(&["Keys"]);
        type_str(&mut search, "key");
        search.dropdown = Rect::new(0, 3, 30, 3);

        let result = search
            .handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 50, 20))
            .unwrap();
        assert_eq!(result, EventResult::Ignored);
        assert!(!search.controller.is_open());
        assert!(!search.is_focused());
    }

    #[test]
    fn test_click_on_dropdown_border_keeps_panel_open() {
        let mut search = term_box(&["Keys", "Keyboard"]);
        type_str(&mut search, "key");
        search.dropdown = Rect::new(0, 3, 30, 4);

        let result = search
            .handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 5, 3))
            .unwrap();
        assert_eq!(result, EventResult::Consumed);
        assert!(search.controller.is_open());
        assert!(search.is_focused());
        assert_eq!(search.controller.highlighted(), None);
    }

    #[test]
    fn test_click_on_empty_hint_keeps_focus() {
        let mut search = term_box(&["Keys"]);
        type_str(&mut search, "zz");
        assert!(!search.controller.is_open());
        search.dropdown = Rect::new(0, 3, 30, 3);

        let result = search
            .handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 4, 4))
            .unwrap();
        assert_eq!(result, EventResult::Consumed);
        assert!(search.is_focused());
    }

    #[test]
    fn test_paste_updates_query() {
        let mut search = term_box(&["Keyboard", "Keys"]);
        type_str(&mut search, "k");
        let result = search.paste("ey\n");
        assert_eq!(result, SearchBoxEvent::Changed("key".to_string()).into());
        assert!(search.controller.is_open());
        assert_eq!(search.input.value(), "key");
    }

    #[test]
    fn test_paste_ignored_when_unfocused() {
        let mut search = term_box(&["Keys"]);
        search.blur();
        assert_eq!(search.paste("keys"), EventResult::Ignored);
        assert_eq!(search.query(), "");
    }

    #[test]
    fn test_record_box_commits_navigation() {
        let mut search: SearchBox<Item> =
            SearchBox::new("Search", "Lost something?", Arc::new(KeyResolver::default()))
                .with_empty_hint("No matching lost items");
        search.set_candidates(vec![
            lost("w1", "Black Wallet", "2024-03-01"),
            found("w2", "Brown Wallet", "2024-03-02"),
        ]);
        search.focus();
        type_str(&mut search, "wa");
        search.handle_key(key(KeyCode::Down)).unwrap();
        let result = search.handle_key(key(KeyCode::Enter)).unwrap();

        assert_eq!(
            result,
            SearchBoxEvent::Committed(Navigation {
                search: "Black Wallet".to_string(),
                highlight: "w1".to_string(),
            })
            .into()
        );
    }

    #[test]
    fn test_match_span() {
        assert_eq!(match_span("Main Library", "lib"), Some((5, 8)));
        assert_eq!(match_span("Main Library", " "), None);
        assert_eq!(match_span("Main Library", "gym"), None);
    }
}
