//! Browse screen: term-mode search, filter bar, item table and details.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, MouseEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};
use tracing::debug;

use super::status_color;
use crate::Theme;
use crate::app::AppMessage;
use crate::browse::{BrowseFilter, cycle_option};
use crate::config::{BrowseAction, KeyResolver, SearchAction};
use crate::model::{CATEGORIES, Item, LOCATIONS};
use crate::session::Session;
use crate::suggest::extract_terms;
use crate::ui::{
    Component, EventResult, Keybinding, Result, Screen, SearchBox, SearchBoxEvent, Spinner,
    Table, TableEvent, ToastType,
};

pub struct BrowseScreen {
    search: SearchBox<String>,
    table: Table<Item>,
    filter: BrowseFilter,
    items: Vec<Item>,
    loaded: bool,
    /// Item requested by the navigation that opened this screen.
    highlight: Option<String>,
    user_id: Option<String>,
    spinner: Spinner,
    resolver: Arc<KeyResolver>,
}

impl BrowseScreen {
    pub fn new(
        items: Option<&[Item]>,
        search: Option<String>,
        highlight: Option<String>,
        session: &Session,
        resolver: Arc<KeyResolver>,
    ) -> Self {
        let mut search_box = SearchBox::new(
            "Search",
            "Title, description or location",
            resolver.clone(),
        );
        let mut filter = BrowseFilter::default();
        if let Some(query) = search {
            search_box.set_query(query.clone());
            filter.query = query;
        }

        let mut screen = Self {
            search: search_box,
            table: Table::new(Vec::new(), resolver.clone()),
            filter,
            items: Vec::new(),
            loaded: false,
            highlight,
            user_id: session.user_id().map(ToString::to_string),
            spinner: Spinner::with_label("Loading items…"),
            resolver,
        };
        if let Some(items) = items {
            screen.set_items(items);
        }
        screen
    }

    pub fn set_items(&mut self, items: &[Item]) {
        self.search.set_candidates(extract_terms(items));
        self.items = items.to_vec();
        self.loaded = true;
        self.refresh();
    }

    pub fn set_session(&mut self, session: &Session) {
        self.user_id = session.user_id().map(ToString::to_string);
    }

    #[cfg(test)]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    #[cfg(test)]
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Re-apply the filter and jump to the requested item the first time it shows up.
    fn refresh(&mut self) {
        let visible: Vec<Item> = self.filter.apply(&self.items).into_iter().cloned().collect();
        self.table.set_items(visible);
        self.table.set_title(format!(
            "{} · {} ({})",
            self.filter.status.label(),
            self.filter.sort.label(),
            self.table.len()
        ));

        if let Some(id) = &self.highlight
            && self.table.mark(id)
        {
            debug!(id, "Highlighted navigated item");
            self.highlight = None;
        }
    }

    fn set_query(&mut self, query: String) {
        if self.filter.query != query {
            self.filter.query = query;
            self.refresh();
        }
    }

    fn is_own(&self, item: &Item) -> bool {
        self.user_id.is_some() && item.user_id == self.user_id
    }

    fn on_search(&mut self, result: EventResult<SearchBoxEvent<String>>) -> EventResult<AppMessage> {
        match result {
            EventResult::Event(SearchBoxEvent::Changed(query) | SearchBoxEvent::Committed(query)) => {
                self.set_query(query);
                EventResult::Consumed
            }
            EventResult::Event(SearchBoxEvent::Search(query)) => {
                self.set_query(query);
                self.search.blur();
                EventResult::Consumed
            }
            EventResult::Consumed => EventResult::Consumed,
            EventResult::Ignored => EventResult::Ignored,
        }
    }

    /// Filter bar and per-item actions.
    fn handle_action(&mut self, key: &KeyEvent) -> Option<EventResult<AppMessage>> {
        let r = Arc::clone(&self.resolver);
        if r.matches_search(key, SearchAction::Focus) {
            self.search.focus();
        } else if r.matches_browse(key, BrowseAction::Status) {
            self.filter.status = self.filter.status.next();
            self.refresh();
        } else if r.matches_browse(key, BrowseAction::Sort) {
            self.filter.sort = self.filter.sort.next();
            self.refresh();
        } else if r.matches_browse(key, BrowseAction::Category) {
            self.filter.category = cycle_option(self.filter.category.as_deref(), CATEGORIES);
            self.refresh();
        } else if r.matches_browse(key, BrowseAction::Location) {
            self.filter.location = cycle_option(self.filter.location.as_deref(), LOCATIONS);
            self.refresh();
        } else if r.matches_browse(key, BrowseAction::Reset) {
            self.filter = BrowseFilter::default();
            self.search.set_query("");
            self.refresh();
        } else if r.matches_browse(key, BrowseAction::Reload) {
            return Some(AppMessage::ReloadItems.into());
        } else if r.matches_browse(key, BrowseAction::CopyContact) {
            let item = self.table.selected_item()?;
            return Some(AppMessage::CopyContact(item.contact_email.clone()).into());
        } else if r.matches_browse(key, BrowseAction::ToggleStatus) {
            let item = self.table.selected_item()?;
            return Some(self.own_item_action(item, |item| {
                item.status.map(|status| AppMessage::SetItemStatus {
                    id: item.id().to_string(),
                    status: status.toggle(),
                })
            }));
        } else if r.matches_browse(key, BrowseAction::Delete) {
            let item = self.table.selected_item()?;
            return Some(self.own_item_action(item, |item| {
                Some(AppMessage::ConfirmDelete {
                    id: item.id().to_string(),
                    title: item.title.clone(),
                })
            }));
        } else {
            return None;
        }
        Some(EventResult::Consumed)
    }

    fn own_item_action(
        &self,
        item: &Item,
        action: impl FnOnce(&Item) -> Option<AppMessage>,
    ) -> EventResult<AppMessage> {
        if !self.is_own(item) {
            return AppMessage::ShowToast {
                message: "You can only change your own reports".to_string(),
                toast_type: ToastType::Warning,
            }
            .into();
        }
        action(item).map_or(EventResult::Consumed, EventResult::Event)
    }

    fn render_filter_bar(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let r = &self.resolver;
        let key = Style::default().fg(theme.peach()).add_modifier(Modifier::BOLD);
        let label = Style::default().fg(theme.subtext0());
        let value = Style::default().fg(theme.text());
        let chip = |k: String, name: &'static str, v: String| {
            vec![
                Span::styled(format!("[{k}] "), key),
                Span::styled(format!("{name}: "), label),
                Span::styled(v, value),
                Span::raw("   "),
            ]
        };

        let mut spans = Vec::new();
        spans.extend(chip(
            r.display_browse(BrowseAction::Status),
            "Status",
            self.filter.status.label().to_string(),
        ));
        spans.extend(chip(
            r.display_browse(BrowseAction::Category),
            "Category",
            self.filter.category.clone().unwrap_or_else(|| "All".to_string()),
        ));
        spans.extend(chip(
            r.display_browse(BrowseAction::Location),
            "Location",
            self.filter.location.clone().unwrap_or_else(|| "All".to_string()),
        ));
        spans.extend(chip(
            r.display_browse(BrowseAction::Sort),
            "Sort",
            self.filter.sort.label().to_string(),
        ));
        if self.filter.is_active() {
            spans.push(Span::styled(
                format!("[{}] Clear filters", r.display_browse(BrowseAction::Reset)),
                Style::default().fg(theme.overlay1()),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_details(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let block = Block::default()
            .title(" Details ")
            .title_style(Style::default().fg(theme.mauve()).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.border()));

        let Some(item) = self.table.selected_item() else {
            let message = if self.filter.is_active() {
                "No items match your filters."
            } else {
                "No items have been reported yet."
            };
            frame.render_widget(
                Paragraph::new(Span::styled(message, Style::default().fg(theme.overlay1())))
                    .block(block),
                area,
            );
            return;
        };

        let label = Style::default().fg(theme.subtext0());
        let field = |name: &'static str, value: String| {
            Line::from(vec![
                Span::styled(format!("{name:>9} "), label),
                Span::styled(value, Style::default().fg(theme.text())),
            ])
        };

        let mut lines = vec![
            Line::from(Span::styled(
                item.title.clone(),
                Style::default().fg(theme.text()).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                item.status_label(),
                Style::default()
                    .fg(status_color(item.status, theme))
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            field("Category", item.category.clone()),
            field("Location", item.location.clone()),
            field("Date", item.date_label()),
            Line::from(""),
            Line::from(Span::styled(
                item.description.clone(),
                Style::default().fg(theme.subtext1()),
            )),
            Line::from(""),
            field("Contact", item.contact_name.clone()),
            field("Email", item.contact_email.clone()),
        ];
        if let Some(phone) = &item.contact_phone {
            lines.push(field("Phone", phone.clone()));
        }
        if self.is_own(item) {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "You posted this report",
                Style::default().fg(theme.sky()),
            )));
        }

        frame.render_widget(
            Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
            area,
        );
    }
}

impl Screen for BrowseScreen {
    type Output = AppMessage;

    fn handle_paste(&mut self, text: &str) -> EventResult<Self::Output> {
        let result = self.search.paste(text);
        self.on_search(result)
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        if self.search.is_focused() {
            // Tab hands focus to the table.
            if key.code == KeyCode::Tab {
                self.search.blur();
                return Ok(EventResult::Consumed);
            }
            let result = self.search.handle_key(key)?;
            return Ok(self.on_search(result));
        }

        if let Some(result) = self.handle_action(&key) {
            return Ok(result);
        }

        Ok(match self.table.handle_key(key)? {
            EventResult::Ignored => EventResult::Ignored,
            _ => EventResult::Consumed,
        })
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> Result<EventResult<Self::Output>> {
        let result = self.search.handle_mouse(mouse)?;
        let result = self.on_search(result);
        if result.is_consumed() {
            return Ok(result);
        }
        Ok(match self.table.handle_mouse(mouse)? {
            EventResult::Event(TableEvent::Activated(_) | TableEvent::Changed(_))
            | EventResult::Consumed => EventResult::Consumed,
            EventResult::Ignored => EventResult::Ignored,
        })
    }

    fn handle_tick(&mut self) {
        if !self.loaded {
            self.spinner.handle_tick();
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let [search, filters, body] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Fill(1),
        ])
        .areas(area);

        self.search.render(frame, search, theme);
        self.render_filter_bar(frame, filters, theme);

        if self.loaded {
            let [table, details] =
                Layout::horizontal([Constraint::Percentage(62), Constraint::Percentage(38)])
                    .areas(body);
            self.table.render(frame, table, theme);
            self.render_details(frame, details, theme);
        } else {
            self.spinner.render(frame, body, theme);
        }

        self.search.render_dropdown(frame, theme);
    }

    fn breadcrumbs(&self) -> Vec<String> {
        let mut crumbs = vec!["Browse".to_string()];
        let query = self.filter.query.trim();
        if !query.is_empty() {
            crumbs.push(format!("\"{query}\""));
        }
        crumbs
    }

    fn keybindings(&self) -> Vec<Keybinding> {
        let r = &self.resolver;
        if self.search.is_focused() {
            return vec![
                Keybinding::hint("↑/↓", "Suggestions"),
                Keybinding::hint("Enter", "Search"),
                Keybinding::hint("Tab", "Results"),
                Keybinding::new(r.display_search(SearchAction::Clear), "Clear search"),
                Keybinding::hint("Esc", "Leave search"),
            ];
        }
        vec![
            Keybinding::hint(r.display_search(SearchAction::Focus), "Search"),
            Keybinding::hint(r.display_browse(BrowseAction::CopyContact), "Copy email"),
            Keybinding::new(r.display_browse(BrowseAction::Status), "Cycle status filter"),
            Keybinding::new(r.display_browse(BrowseAction::Sort), "Cycle sort order"),
            Keybinding::new(r.display_browse(BrowseAction::Category), "Cycle category"),
            Keybinding::new(r.display_browse(BrowseAction::Location), "Cycle location"),
            Keybinding::new(r.display_browse(BrowseAction::Reset), "Clear filters"),
            Keybinding::new(r.display_browse(BrowseAction::Reload), "Reload"),
            Keybinding::new(
                r.display_browse(BrowseAction::ToggleStatus),
                "Mark own report lost/found",
            ),
            Keybinding::new(r.display_browse(BrowseAction::Delete), "Delete own report"),
        ]
    }

    fn captures_text(&self) -> bool {
        self.search.is_focused()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthConfig;
    use crate::model::{ItemStatus, fixtures};
    use crate::session::IdentityStrategy;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn items() -> Vec<Item> {
        let mut keys = fixtures::lost("1", "Car Keys", "2024-03-09");
        keys.category = "Keys".to_string();
        let mut wallet = fixtures::found("2", "Brown Wallet", "2024-03-12");
        wallet.contact_email = "finder@campus.edu".to_string();
        let mut laptop = fixtures::lost("3", "Laptop", "2024-03-10");
        laptop.description = "Silver laptop with stickers".to_string();
        vec![keys, wallet, laptop]
    }

    fn signed_out() -> Session {
        Session::new(IdentityStrategy::detect(&AuthConfig::default()))
    }

    fn screen(search: Option<&str>, highlight: Option<&str>) -> BrowseScreen {
        BrowseScreen::new(
            Some(&items()),
            search.map(ToString::to_string),
            highlight.map(ToString::to_string),
            &signed_out(),
            Arc::new(KeyResolver::default()),
        )
    }

    fn selected(screen: &BrowseScreen) -> Option<String> {
        screen.table.selected_item().map(|item| item.title.clone())
    }

    #[test]
    fn test_initial_search_filters_and_highlight_selects() {
        let screen = screen(Some("laptop"), Some("3"));
        assert_eq!(screen.table.len(), 1);
        assert_eq!(selected(&screen).as_deref(), Some("Laptop"));
        assert_eq!(screen.breadcrumbs(), vec!["Browse", "\"laptop\""]);

        let screen = self::screen(None, Some("1"));
        assert_eq!(screen.table.len(), 3);
        assert_eq!(selected(&screen).as_deref(), Some("Car Keys"));
    }

    #[test]
    fn test_status_and_sort_cycling() {
        let mut screen = screen(None, None);
        // Newest first by report date.
        assert_eq!(selected(&screen).as_deref(), Some("Brown Wallet"));

        screen.handle_key(key(KeyCode::Char('s'))).unwrap();
        assert_eq!(screen.filter.status, crate::browse::StatusFilter::Lost);
        assert_eq!(screen.table.len(), 2);

        screen.handle_key(key(KeyCode::Char('o'))).unwrap();
        screen.handle_key(key(KeyCode::Char('g'))).unwrap();
        assert_eq!(selected(&screen).as_deref(), Some("Car Keys"));
    }

    #[test]
    fn test_typing_in_search_filters_live() {
        let mut screen = screen(None, None);
        screen.handle_key(key(KeyCode::Char('/'))).unwrap();
        assert!(screen.captures_text());
        for c in "stick".chars() {
            screen.handle_key(key(KeyCode::Char(c))).unwrap();
        }
        assert_eq!(screen.table.len(), 1);
        assert_eq!(selected(&screen).as_deref(), Some("Laptop"));

        screen.handle_key(key(KeyCode::Esc)).unwrap();
        assert!(!screen.captures_text());
    }

    #[test]
    fn test_reset_clears_query_and_filters() {
        let mut screen = screen(Some("keys"), None);
        screen.handle_key(key(KeyCode::Char('c'))).unwrap();
        screen.handle_key(key(KeyCode::Char('x'))).unwrap();
        assert!(!screen.filter.is_active());
        assert_eq!(screen.table.len(), 3);
    }

    #[test]
    fn test_copy_contact_of_selected_item() {
        let mut screen = screen(Some("wallet"), None);
        let result = screen.handle_key(key(KeyCode::Char('y'))).unwrap();
        assert_eq!(
            result,
            AppMessage::CopyContact("finder@campus.edu".to_string()).into()
        );
    }

    #[test]
    fn test_changes_require_ownership() {
        let mut screen = screen(Some("keys"), None);
        let result = screen.handle_key(key(KeyCode::Char('m'))).unwrap();
        assert!(matches!(
            result,
            EventResult::Event(AppMessage::ShowToast { toast_type: ToastType::Warning, .. })
        ));

        let mut session = signed_out();
        session.sign_in();
        let mut owned = items();
        for item in &mut owned {
            item.user_id = session.user_id().map(ToString::to_string);
        }
        screen.set_session(&session);
        screen.set_items(&owned);

        let result = screen.handle_key(key(KeyCode::Char('m'))).unwrap();
        assert_eq!(
            result,
            AppMessage::SetItemStatus {
                id: "1".to_string(),
                status: ItemStatus::Found,
            }
            .into()
        );
        let result = screen.handle_key(key(KeyCode::Char('d'))).unwrap();
        assert!(matches!(
            result,
            EventResult::Event(AppMessage::ConfirmDelete { ref id, .. }) if id == "1"
        ));
    }
}
