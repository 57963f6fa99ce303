use std::sync::Arc;

use crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::prelude::{Modifier, Style};
use ratatui::widgets::{List as RatatuiList, ListItem, ListState};

use crate::Theme;
use crate::config::{KeyResolver, NavAction};
use crate::ui::{Component, EventResult, Result, hit};

const PAGE: usize = 5;

pub enum ListEvent<T> {
    Changed(T),
    Activated(T),
}

pub trait ListRow {
    fn render_row(&self, theme: &Theme) -> ListItem<'static>;
}

impl ListRow for String {
    fn render_row(&self, theme: &Theme) -> ListItem<'static> {
        ListItem::new(self.clone()).style(Style::default().fg(theme.text()))
    }
}

pub struct List<T: ListRow + Clone> {
    items: Vec<T>,
    state: ListState,
    resolver: Arc<KeyResolver>,
    area: Rect,
}

impl<T: ListRow + Clone> List<T> {
    pub fn new(items: Vec<T>, resolver: Arc<KeyResolver>) -> Self {
        let mut state = ListState::default();
        if !items.is_empty() {
            state.select(Some(0));
        }
        Self {
            items,
            state,
            resolver,
            area: Rect::default(),
        }
    }

    pub fn selected(&self) -> Option<&T> {
        self.state.selected().and_then(|i| self.items.get(i))
    }

    pub fn select(&mut self, index: usize) {
        if index < self.items.len() {
            self.state.select(Some(index));
        }
    }

    fn get_change_event(&self, before: Option<usize>) -> EventResult<ListEvent<T>> {
        if let Some(selected) = self.state.selected()
            && Some(selected) != before
            && let Some(item) = self.items.get(selected)
        {
            return ListEvent::Changed(item.clone()).into();
        }
        EventResult::Consumed
    }

    fn select_next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let last = self.items.len() - 1;
        let next = self.state.selected().map_or(0, |i| (i + 1).min(last));
        self.state.select(Some(next));
    }

    fn select_previous(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let previous = self.state.selected().map_or(0, |i| i.saturating_sub(1));
        self.state.select(Some(previous));
    }

    /// Row index under a terminal cell, accounting for scroll offset.
    fn row_at(&self, column: u16, row: u16) -> Option<usize> {
        if !hit(self.area, column, row) {
            return None;
        }
        let index = self.state.offset() + usize::from(row - self.area.y);
        (index < self.items.len()).then_some(index)
    }
}

impl<T: ListRow + Clone> Component for List<T> {
    type Output = ListEvent<T>;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        if self.items.is_empty() {
            return Ok(EventResult::Ignored);
        }
        let before = self.state.selected();
        let last = self.items.len() - 1;

        if self.resolver.matches_nav(&key, NavAction::Down) {
            self.select_next();
            return Ok(self.get_change_event(before));
        }
        if self.resolver.matches_nav(&key, NavAction::Up) {
            self.select_previous();
            return Ok(self.get_change_event(before));
        }
        if self.resolver.matches_nav(&key, NavAction::Home) {
            self.state.select(Some(0));
            return Ok(self.get_change_event(before));
        }
        if self.resolver.matches_nav(&key, NavAction::End) {
            self.state.select(Some(last));
            return Ok(self.get_change_event(before));
        }
        if self.resolver.matches_nav(&key, NavAction::PageDown) {
            let new_index = self.state.selected().map_or(0, |i| (i + PAGE).min(last));
            self.state.select(Some(new_index));
            return Ok(self.get_change_event(before));
        }
        if self.resolver.matches_nav(&key, NavAction::PageUp) {
            let new_index = self.state.selected().map_or(0, |i| i.saturating_sub(PAGE));
            self.state.select(Some(new_index));
            return Ok(self.get_change_event(before));
        }
        if self.resolver.matches_nav(&key, NavAction::Select) {
            if let Some(item) = self.selected() {
                return Ok(ListEvent::Activated(item.clone()).into());
            }
            return Ok(EventResult::Ignored);
        }

        Ok(EventResult::Ignored)
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> Result<EventResult<Self::Output>> {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(index) = self.row_at(mouse.column, mouse.row) {
                    self.state.select(Some(index));
                    return Ok(ListEvent::Activated(self.items[index].clone()).into());
                }
            }
            MouseEventKind::ScrollDown => {
                let before = self.state.selected();
                self.select_next();
                return Ok(self.get_change_event(before));
            }
            MouseEventKind::ScrollUp => {
                let before = self.state.selected();
                self.select_previous();
                return Ok(self.get_change_event(before));
            }
            _ => {}
        }
        Ok(EventResult::Ignored)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        self.area = area;
        let items: Vec<ListItem> = self.items.iter().map(|i| i.render_row(theme)).collect();

        let list = RatatuiList::new(items)
            .highlight_style(
                Style::default()
                    .bg(theme.selection_bg())
                    .fg(theme.lavender())
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");

        frame.render_stateful_widget(list, area, &mut self.state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn list() -> List<String> {
        List::new(
            vec!["Bags".to_string(), "Keys".to_string(), "Other".to_string()],
            Arc::new(KeyResolver::default()),
        )
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_navigation_and_activation() {
        let mut list = list();
        list.handle_key(key(KeyCode::Char('j'))).unwrap();
        assert_eq!(list.selected().map(String::as_str), Some("Keys"));

        list.handle_key(key(KeyCode::End)).unwrap();
        assert_eq!(list.selected().map(String::as_str), Some("Other"));

        let result = list.handle_key(key(KeyCode::Enter)).unwrap();
        assert!(matches!(result, EventResult::Event(ListEvent::Activated(ref s)) if s == "Other"));
    }

    #[test]
    fn test_empty_list_ignores_select() {
        let mut list: List<String> = List::new(Vec::new(), Arc::new(KeyResolver::default()));
        assert!(matches!(
            list.handle_key(key(KeyCode::Enter)).unwrap(),
            EventResult::Ignored
        ));
    }
}
