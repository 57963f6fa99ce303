//! Landing screen: record-mode search over lost items, listing stats and the
//! latest reports.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, MouseEvent};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use tracing::debug;

use crate::Theme;
use crate::app::{AppMessage, Destination};
use crate::autocomplete::Navigation;
use crate::browse::{Stats, recent};
use crate::config::{KeyResolver, NavAction, SearchAction};
use crate::model::Item;
use crate::ui::{
    Component, EventResult, Keybinding, Result, Screen, SearchBox, SearchBoxEvent, Spinner,
    Table, TableEvent,
};

const RECENT_ITEMS: usize = 6;

pub struct HomeScreen {
    search: SearchBox<Item>,
    recent: Table<Item>,
    stats: Option<Stats>,
    spinner: Spinner,
    resolver: Arc<KeyResolver>,
}

impl HomeScreen {
    /// `items` is `None` until the first load completes.
    pub fn new(items: Option<&[Item]>, resolver: Arc<KeyResolver>) -> Self {
        let mut search = SearchBox::new(
            "Search lost items",
            "Type at least 2 characters, e.g. \"wallet\"",
            resolver.clone(),
        )
        .with_empty_hint("No matching lost items");
        search.focus();

        let mut recent_table = Table::new(Vec::new(), resolver.clone());
        recent_table.set_title("Recently reported");

        let mut screen = Self {
            search,
            recent: recent_table,
            stats: None,
            spinner: Spinner::with_label("Loading items…"),
            resolver,
        };
        if let Some(items) = items {
            screen.set_items(items);
        }
        screen
    }

    pub fn set_items(&mut self, items: &[Item]) {
        self.search.set_candidates(items.to_vec());
        self.recent
            .set_items(recent(items, RECENT_ITEMS).into_iter().cloned().collect());
        self.stats = Some(Stats::from_items(items));
    }

    fn on_search(result: EventResult<SearchBoxEvent<Navigation>>) -> EventResult<AppMessage> {
        match result {
            EventResult::Event(SearchBoxEvent::Committed(navigation)) => {
                debug!(highlight = %navigation.highlight, "Opening committed item");
                AppMessage::Navigate(Destination::Browse {
                    search: Some(navigation.search),
                    highlight: Some(navigation.highlight),
                })
                .into()
            }
            EventResult::Event(SearchBoxEvent::Search(query)) => {
                let query = query.trim();
                AppMessage::Navigate(Destination::Browse {
                    search: (!query.is_empty()).then(|| query.to_string()),
                    highlight: None,
                })
                .into()
            }
            EventResult::Event(SearchBoxEvent::Changed(_)) | EventResult::Consumed => {
                EventResult::Consumed
            }
            EventResult::Ignored => EventResult::Ignored,
        }
    }

    fn render_stats(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let Some(stats) = self.stats else {
            self.spinner.render(frame, area, theme);
            return;
        };
        let label = Style::default().fg(theme.subtext0());
        let value = Style::default().add_modifier(Modifier::BOLD);
        let line = Line::from(vec![
            Span::styled("Total reports ", label),
            Span::styled(stats.total.to_string(), value.fg(theme.text())),
            Span::styled("    Lost ", label),
            Span::styled(stats.lost.to_string(), value.fg(theme.error())),
            Span::styled("    Found ", label),
            Span::styled(stats.found.to_string(), value.fg(theme.success())),
        ]);
        frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
    }
}

impl Screen for HomeScreen {
    type Output = AppMessage;

    fn handle_paste(&mut self, text: &str) -> EventResult<Self::Output> {
        Self::on_search(self.search.paste(text))
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        if self.search.is_focused() {
            // Tab hands focus to the recent list.
            if key.code == KeyCode::Tab && !self.recent.is_empty() {
                self.search.blur();
                return Ok(EventResult::Consumed);
            }
            return Ok(Self::on_search(self.search.handle_key(key)?));
        }

        if self.resolver.matches_search(&key, SearchAction::Focus) {
            self.search.focus();
            return Ok(EventResult::Consumed);
        }

        Ok(match self.recent.handle_key(key)? {
            EventResult::Event(TableEvent::Activated(item)) => {
                AppMessage::Navigate(Destination::Browse {
                    search: None,
                    highlight: Some(item.id().to_string()),
                })
                .into()
            }
            EventResult::Event(TableEvent::Changed(_)) | EventResult::Consumed => {
                EventResult::Consumed
            }
            EventResult::Ignored => EventResult::Ignored,
        })
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> Result<EventResult<Self::Output>> {
        let result = Self::on_search(self.search.handle_mouse(mouse)?);
        if result.is_consumed() {
            return Ok(result);
        }
        Ok(match self.recent.handle_mouse(mouse)? {
            EventResult::Ignored => EventResult::Ignored,
            _ => EventResult::Consumed,
        })
    }

    fn handle_tick(&mut self) {
        if self.stats.is_none() {
            self.spinner.handle_tick();
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let [hero, search, stats, list] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Fill(1),
        ])
        .areas(area.centered_horizontally(Constraint::Max(110)));

        let hero_lines = vec![
            Line::from(Span::styled(
                "Campus Lost & Found",
                Style::default()
                    .fg(theme.mauve())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Lost something? Search what others have reported, or report it yourself.",
                Style::default().fg(theme.subtext0()),
            )),
        ];
        frame.render_widget(
            Paragraph::new(hero_lines).alignment(Alignment::Center),
            hero,
        );

        self.search.render(frame, search, theme);
        self.render_stats(frame, stats, theme);
        if self.stats.is_some() {
            self.recent.render(frame, list, theme);
        }
        // Drawn last so the dropdown overlays the list.
        self.search.render_dropdown(frame, theme);
    }

    fn breadcrumbs(&self) -> Vec<String> {
        vec!["Home".to_string()]
    }

    fn keybindings(&self) -> Vec<Keybinding> {
        let r = &self.resolver;
        if self.search.is_focused() {
            return vec![
                Keybinding::hint("↑/↓", "Suggestions"),
                Keybinding::hint("Enter", "Open"),
                Keybinding::hint("Tab", "Recent items"),
                Keybinding::new(r.display_search(SearchAction::Clear), "Clear search"),
                Keybinding::hint("Esc", "Leave search"),
            ];
        }
        vec![
            Keybinding::hint(r.display_search(SearchAction::Focus), "Search"),
            Keybinding::hint(r.display_nav(NavAction::Select), "Open in browse"),
        ]
    }

    fn captures_text(&self) -> bool {
        self.search.is_focused()
    }
}
