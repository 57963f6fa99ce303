use std::sync::Arc;

use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Clear, ListItem};

use crate::Theme;
use crate::config::{GlobalAction, KeyResolver};
use crate::theme::{ThemeInfo, available_themes};
use crate::ui::{Component, EventResult, List, ListEvent, ListRow, Result};

impl ListRow for ThemeInfo {
    fn render_row(&self, theme: &Theme) -> ListItem<'static> {
        ListItem::new(self.name.to_string()).style(Style::default().fg(theme.text()))
    }
}

pub enum ThemeEvent {
    Cancelled,
    /// Highlight moved; preview the theme.
    Previewed(ThemeInfo),
    Selected(ThemeInfo),
}

/// Modal list of the built-in themes.
pub struct ThemeSelector {
    list: List<ThemeInfo>,
    resolver: Arc<KeyResolver>,
}

impl ThemeSelector {
    pub fn new(current: &str, resolver: Arc<KeyResolver>) -> Self {
        let themes = available_themes();
        let index = themes.iter().position(|t| t.name == current).unwrap_or(0);
        let mut list = List::new(themes, resolver.clone());
        list.select(index);
        Self { list, resolver }
    }

    fn translate(result: EventResult<ListEvent<ThemeInfo>>) -> EventResult<ThemeEvent> {
        match result {
            EventResult::Event(ListEvent::Activated(info)) => ThemeEvent::Selected(info).into(),
            EventResult::Event(ListEvent::Changed(info)) => ThemeEvent::Previewed(info).into(),
            EventResult::Consumed => EventResult::Consumed,
            EventResult::Ignored => EventResult::Ignored,
        }
    }
}

impl Component for ThemeSelector {
    type Output = ThemeEvent;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        if self.resolver.matches_global(&key, GlobalAction::Back)
            || self.resolver.matches_global(&key, GlobalAction::Theme)
        {
            return Ok(ThemeEvent::Cancelled.into());
        }
        let result = Self::translate(self.list.handle_key(key)?);
        // Modal: keys the list ignores stop here.
        Ok(if result.is_consumed() { result } else { EventResult::Consumed })
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> Result<EventResult<Self::Output>> {
        Ok(Self::translate(self.list.handle_mouse(mouse)?))
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let popup_area = area.centered(Constraint::Percentage(40), Constraint::Percentage(50));
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(" Select Theme (Enter to confirm, Esc to cancel) ")
            .title_style(
                Style::default()
                    .fg(theme.mauve())
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.lavender()))
            .style(Style::default().bg(theme.base()));

        let inner = block.inner(popup_area);
        frame.render_widget(block, popup_area);
        self.list.render(frame, inner, theme);
    }
}
