//! "Report an item" form.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use tracing::debug;

use crate::Theme;
use crate::app::AppMessage;
use crate::config::{FormAction, GlobalAction, KeyResolver, NavAction};
use crate::draft::{DraftError, ItemDraft, MAX_DESCRIPTION, MAX_LOCATION, MAX_NAME, MAX_TITLE};
use crate::model::{CATEGORIES, ItemStatus, parse_report_date};
use crate::session::Session;
use crate::ui::{Component, EventResult, Keybinding, Result, Screen, TextInput, TextInputEvent, hit};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Status,
    Title,
    Category,
    Description,
    Location,
    Date,
    ContactName,
    ContactEmail,
    ContactPhone,
}

const FIELDS: [Field; 9] = [
    Field::Status,
    Field::Title,
    Field::Category,
    Field::Description,
    Field::Location,
    Field::Date,
    Field::ContactName,
    Field::ContactEmail,
    Field::ContactPhone,
];

/// Fields in the left column; the rest go right.
const LEFT_COLUMN: usize = 5;

pub struct PostScreen {
    status: ItemStatus,
    category: Option<usize>,
    title: TextInput,
    description: TextInput,
    location: TextInput,
    date: TextInput,
    contact_name: TextInput,
    contact_email: TextInput,
    contact_phone: TextInput,
    focus: usize,
    areas: [Rect; FIELDS.len()],
    error: Option<DraftError>,
    session: Session,
    resolver: Arc<KeyResolver>,
}

impl PostScreen {
    pub fn new(session: &Session, resolver: Arc<KeyResolver>) -> Self {
        let draft = ItemDraft::for_session(session);
        let mut screen = Self {
            status: draft.status,
            category: None,
            title: TextInput::new("Title")
                .with_placeholder("e.g. Blue backpack")
                .with_max_chars(MAX_TITLE),
            description: TextInput::new("Description")
                .with_placeholder("Colour, brand, distinguishing marks")
                .with_max_chars(MAX_DESCRIPTION),
            location: TextInput::new("Location")
                .with_placeholder("Where was it lost or found?")
                .with_max_chars(MAX_LOCATION),
            date: TextInput::new("Date")
                .with_placeholder("YYYY-MM-DD, empty for today"),
            contact_name: TextInput::new("Contact name")
                .with_value(draft.contact_name)
                .with_max_chars(MAX_NAME),
            contact_email: TextInput::new("Contact email").with_value(draft.contact_email),
            contact_phone: TextInput::new("Contact phone").with_placeholder("Optional"),
            focus: 0,
            areas: [Rect::default(); FIELDS.len()],
            error: None,
            session: session.clone(),
            resolver,
        };
        screen.set_focus(1);
        screen
    }

    /// Track sign-in changes; contact fields left empty are filled from the account.
    pub fn set_session(&mut self, session: &Session) {
        self.session = session.clone();
        if let Some(account) = session.account() {
            if self.contact_name.value().is_empty() {
                self.contact_name.set_value(account.name.clone());
            }
            if self.contact_email.value().is_empty() {
                self.contact_email.set_value(account.email.clone());
            }
        }
        if self.error == Some(DraftError::SignedOut) && session.is_signed_in() {
            self.error = None;
        }
    }

    const fn field(&self) -> Field {
        FIELDS[self.focus]
    }

    fn input(&self, field: Field) -> Option<&TextInput> {
        match field {
            Field::Status | Field::Category => None,
            Field::Title => Some(&self.title),
            Field::Description => Some(&self.description),
            Field::Location => Some(&self.location),
            Field::Date => Some(&self.date),
            Field::ContactName => Some(&self.contact_name),
            Field::ContactEmail => Some(&self.contact_email),
            Field::ContactPhone => Some(&self.contact_phone),
        }
    }

    fn input_mut(&mut self, field: Field) -> Option<&mut TextInput> {
        match field {
            Field::Status | Field::Category => None,
            Field::Title => Some(&mut self.title),
            Field::Description => Some(&mut self.description),
            Field::Location => Some(&mut self.location),
            Field::Date => Some(&mut self.date),
            Field::ContactName => Some(&mut self.contact_name),
            Field::ContactEmail => Some(&mut self.contact_email),
            Field::ContactPhone => Some(&mut self.contact_phone),
        }
    }

    fn set_focus(&mut self, index: usize) {
        let index = index.min(FIELDS.len() - 1);
        if let Some(input) = self.input_mut(FIELDS[self.focus]) {
            input.set_focused(false);
        }
        self.focus = index;
        if let Some(input) = self.input_mut(FIELDS[index]) {
            input.set_focused(true);
        }
    }

    fn cycle(&mut self, forward: bool) {
        match self.field() {
            Field::Status => self.status = self.status.toggle(),
            Field::Category => {
                let last = CATEGORIES.len() - 1;
                self.category = Some(match (self.category, forward) {
                    (None, true) => 0,
                    (None, false) => last,
                    (Some(i), true) => if i == last { 0 } else { i + 1 },
                    (Some(i), false) => if i == 0 { last } else { i - 1 },
                });
            }
            _ => {}
        }
    }

    fn draft(&self) -> std::result::Result<ItemDraft, DraftError> {
        let date = self.date.value().trim();
        let date_reported = if date.is_empty() {
            None
        } else {
            Some(parse_report_date(date).ok_or(DraftError::InvalidDate)?)
        };
        Ok(ItemDraft {
            status: self.status,
            title: self.title.value().to_string(),
            category: self
                .category
                .and_then(|i| CATEGORIES.get(i))
                .map(ToString::to_string)
                .unwrap_or_default(),
            description: self.description.value().to_string(),
            location: self.location.value().to_string(),
            date_reported,
            contact_name: self.contact_name.value().to_string(),
            contact_email: self.contact_email.value().to_string(),
            contact_phone: self.contact_phone.value().to_string(),
        })
    }

    fn submit(&mut self) -> EventResult<AppMessage> {
        match self.draft().and_then(|draft| draft.validate(&self.session)) {
            Ok(item) => {
                debug!(title = %item.title, "Submitting new report");
                self.error = None;
                AppMessage::CreateItem(item).into()
            }
            Err(e) => {
                debug!(error = %e, "Report rejected");
                self.error = Some(e);
                EventResult::Consumed
            }
        }
    }

    fn render_choice(&self, frame: &mut Frame, area: Rect, theme: &Theme, field: Field) {
        let focused = self.field() == field;
        let (label, value, color) = match field {
            Field::Status => (
                "I have",
                match self.status {
                    ItemStatus::Lost => "Lost an item",
                    ItemStatus::Found => "Found an item",
                },
                super::status_color(Some(self.status), theme),
            ),
            _ => (
                "Category",
                self.category
                    .and_then(|i| CATEGORIES.get(i).copied())
                    .unwrap_or("Select a category"),
                theme.text(),
            ),
        };
        let arrows = Style::default().fg(if focused { theme.peach() } else { theme.overlay0() });
        let line = Line::from(vec![
            Span::styled("◀ ", arrows),
            Span::styled(value, Style::default().fg(color).add_modifier(Modifier::BOLD)),
            Span::styled(" ▶", arrows),
        ]);
        let block = Block::default()
            .title(format!(" {label} "))
            .title_style(
                Style::default()
                    .fg(if focused { theme.mauve() } else { theme.subtext0() })
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(if focused {
                theme.border_focused()
            } else {
                theme.border()
            }));
        frame.render_widget(Paragraph::new(line).block(block), area);
    }
}

impl Screen for PostScreen {
    type Output = AppMessage;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        let r = Arc::clone(&self.resolver);
        if r.matches_form(&key, FormAction::Submit) {
            return Ok(self.submit());
        }
        if r.matches_nav(&key, NavAction::NextField) {
            self.set_focus(self.focus + 1);
            return Ok(EventResult::Consumed);
        }
        if r.matches_nav(&key, NavAction::PreviousField) {
            self.set_focus(self.focus.saturating_sub(1));
            return Ok(EventResult::Consumed);
        }

        let field = self.field();
        let Some(input) = self.input_mut(field) else {
            if r.matches_form(&key, FormAction::Cycle) {
                self.cycle(key.code != KeyCode::Left);
                return Ok(EventResult::Consumed);
            }
            if r.matches_nav(&key, NavAction::Select) {
                self.set_focus(self.focus + 1);
                return Ok(EventResult::Consumed);
            }
            return Ok(EventResult::Ignored);
        };

        Ok(match input.handle_key(key)? {
            EventResult::Event(TextInputEvent::Submitted(_)) => {
                self.set_focus(self.focus + 1);
                EventResult::Consumed
            }
            EventResult::Event(TextInputEvent::Cancelled) => AppMessage::GoBack.into(),
            EventResult::Event(TextInputEvent::Changed(_) | TextInputEvent::Clicked)
            | EventResult::Consumed => EventResult::Consumed,
            EventResult::Ignored => EventResult::Ignored,
        })
    }

    fn handle_paste(&mut self, text: &str) -> EventResult<Self::Output> {
        let field = self.field();
        match self.input_mut(field).map(|input| input.paste(text)) {
            Some(EventResult::Ignored) | None => EventResult::Ignored,
            Some(_) => EventResult::Consumed,
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> Result<EventResult<Self::Output>> {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return Ok(EventResult::Ignored);
        }
        let Some(index) = self
            .areas
            .iter()
            .position(|area| hit(*area, mouse.column, mouse.row))
        else {
            return Ok(EventResult::Ignored);
        };
        self.set_focus(index);
        if self.input(FIELDS[index]).is_none() {
            self.cycle(true);
        }
        Ok(EventResult::Consumed)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let [header, form, footer] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Fill(1),
            Constraint::Length(2),
        ])
        .areas(area.centered_horizontally(Constraint::Max(120)));

        let mut header_spans = vec![Span::styled(
            "Report an item",
            Style::default().fg(theme.mauve()).add_modifier(Modifier::BOLD),
        )];
        if !self.session.is_signed_in() {
            header_spans.push(Span::styled(
                format!(
                    "   Sign in with [{}] before posting",
                    self.resolver.display_global(GlobalAction::SignIn)
                ),
                Style::default().fg(theme.warning()),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(header_spans)), header);

        let [left, right] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .spacing(1)
                .areas(form);
        let rows = |column: Rect, count: usize| {
            Layout::vertical(vec![Constraint::Length(3); count]).split(column)
        };
        let left_rows = rows(left, LEFT_COLUMN);
        let right_rows = rows(right, FIELDS.len() - LEFT_COLUMN);

        for (index, field) in FIELDS.into_iter().enumerate() {
            let cell = if index < LEFT_COLUMN {
                left_rows[index]
            } else {
                right_rows[index - LEFT_COLUMN]
            };
            self.areas[index] = cell;
            match self.input_mut(field) {
                Some(input) => input.render(frame, cell, theme),
                None => self.render_choice(frame, cell, theme, field),
            }
        }

        let footer_line = self.error.as_ref().map_or_else(
            || {
                Line::from(Span::styled(
                    format!(
                        "{} to submit · {} to change a choice",
                        self.resolver.display_form(FormAction::Submit),
                        self.resolver.display_form(FormAction::Cycle)
                    ),
                    Style::default().fg(theme.overlay1()),
                ))
            },
            |error| {
                Line::from(Span::styled(
                    error.to_string(),
                    Style::default().fg(theme.error()).add_modifier(Modifier::BOLD),
                ))
            },
        );
        frame.render_widget(Paragraph::new(footer_line), footer);
    }

    fn breadcrumbs(&self) -> Vec<String> {
        vec!["Report item".to_string()]
    }

    fn keybindings(&self) -> Vec<Keybinding> {
        let r = &self.resolver;
        vec![
            Keybinding::hint(r.display_form(FormAction::Submit), "Submit"),
            Keybinding::hint(
                format!(
                    "{}/{}",
                    r.display_nav(NavAction::NextField),
                    r.display_nav(NavAction::PreviousField)
                ),
                "Next/previous field",
            ),
            Keybinding::hint(r.display_form(FormAction::Cycle), "Change choice"),
        ]
    }

    fn captures_text(&self) -> bool {
        self.input(self.field()).is_some()
    }
}
