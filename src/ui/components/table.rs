use std::sync::Arc;

use crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::prelude::{Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Row, Table as RatatuiTable, TableState};

use crate::Theme;
use crate::config::{KeyResolver, NavAction};
use crate::ui::{Component, EventResult, Result, hit};

const PAGE: usize = 10;

pub enum TableEvent<T> {
    Changed(T),
    Activated(T),
}

pub struct ColumnDef {
    pub header: &'static str,
    pub constraint: Constraint,
}

impl ColumnDef {
    pub const fn new(header: &'static str, constraint: Constraint) -> Self {
        Self { header, constraint }
    }
}

pub trait TableRow {
    fn columns() -> &'static [ColumnDef];
    fn render_cells(&self, theme: &Theme) -> Vec<Cell<'static>>;
    /// Stable identity used to keep the selection across reloads.
    fn row_key(&self) -> &str;
}

/// Selectable table. Filtering and ordering happen before rows are handed in.
pub struct Table<T: TableRow + Clone> {
    items: Vec<T>,
    state: TableState,
    title: Option<String>,
    marked: Option<String>,
    resolver: Arc<KeyResolver>,
    area: Rect,
}

impl<T: TableRow + Clone> Table<T> {
    pub fn new(items: Vec<T>, resolver: Arc<KeyResolver>) -> Self {
        let mut state = TableState::default();
        if !items.is_empty() {
            state.select(Some(0));
        }
        Self {
            items,
            state,
            title: None,
            marked: None,
            resolver,
            area: Rect::default(),
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    pub fn selected_item(&self) -> Option<&T> {
        self.state.selected().and_then(|i| self.items.get(i))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Replace the rows, keeping the selected row if it is still present.
    pub fn set_items(&mut self, items: Vec<T>) {
        let previous = self.selected_item().map(|item| item.row_key().to_string());
        self.items = items;

        let index = previous
            .and_then(|key| self.position(&key))
            .or_else(|| (!self.items.is_empty()).then_some(0));
        self.state.select(index);
    }

    /// Select the row with `key` and draw it with an accent. Returns whether it was found.
    pub fn mark(&mut self, key: &str) -> bool {
        self.marked = Some(key.to_string());
        match self.position(key) {
            Some(index) => {
                self.state.select(Some(index));
                true
            }
            None => false,
        }
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.items.iter().position(|item| item.row_key() == key)
    }

    fn move_to(&mut self, index: usize) {
        if !self.items.is_empty() {
            self.state.select(Some(index.min(self.items.len() - 1)));
        }
    }

    fn get_change_event(&self, before: Option<usize>) -> EventResult<TableEvent<T>> {
        if let Some(selected) = self.state.selected()
            && Some(selected) != before
            && let Some(item) = self.items.get(selected)
        {
            return TableEvent::Changed(item.clone()).into();
        }
        EventResult::Consumed
    }

    fn row_at(&self, column: u16, row: u16) -> Option<usize> {
        // Top border and header row sit above the first data row.
        let first = self.area.y + 2;
        if !hit(self.area, column, row) || row < first {
            return None;
        }
        let index = self.state.offset() + usize::from(row - first);
        (index < self.items.len()).then_some(index)
    }
}

impl<T: TableRow + Clone> Component for Table<T> {
    type Output = TableEvent<T>;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        if self.items.is_empty() {
            return Ok(EventResult::Ignored);
        }
        let before = self.state.selected();
        let current = before.unwrap_or(0);

        if self.resolver.matches_nav(&key, NavAction::Down) {
            self.move_to(current + 1);
        } else if self.resolver.matches_nav(&key, NavAction::Up) {
            self.move_to(current.saturating_sub(1));
        } else if self.resolver.matches_nav(&key, NavAction::Home) {
            self.move_to(0);
        } else if self.resolver.matches_nav(&key, NavAction::End) {
            self.move_to(self.items.len() - 1);
        } else if self.resolver.matches_nav(&key, NavAction::PageDown) {
            self.move_to(current + PAGE);
        } else if self.resolver.matches_nav(&key, NavAction::PageUp) {
            self.move_to(current.saturating_sub(PAGE));
        } else if self.resolver.matches_nav(&key, NavAction::Select) {
            return Ok(self
                .selected_item()
                .map_or(EventResult::Ignored, |item| {
                    TableEvent::Activated(item.clone()).into()
                }));
        } else {
            return Ok(EventResult::Ignored);
        }
        Ok(self.get_change_event(before))
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> Result<EventResult<Self::Output>> {
        let before = self.state.selected();
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let Some(index) = self.row_at(mouse.column, mouse.row) else {
                    return Ok(EventResult::Ignored);
                };
                self.state.select(Some(index));
            }
            MouseEventKind::ScrollDown if hit(self.area, mouse.column, mouse.row) => {
                self.move_to(before.map_or(0, |i| i + 1));
            }
            MouseEventKind::ScrollUp if hit(self.area, mouse.column, mouse.row) => {
                self.move_to(before.map_or(0, |i| i.saturating_sub(1)));
            }
            _ => return Ok(EventResult::Ignored),
        }
        Ok(self.get_change_event(before))
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        self.area = area;
        let columns = T::columns();

        let header_cells: Vec<Cell> = columns
            .iter()
            .map(|c| {
                Cell::from(c.header).style(
                    Style::default()
                        .fg(theme.header())
                        .add_modifier(Modifier::BOLD),
                )
            })
            .collect();
        let header = Row::new(header_cells)
            .height(1)
            .style(Style::default().bg(theme.surface0()));

        let rows: Vec<Row> = self
            .items
            .iter()
            .map(|item| {
                let style = if self.marked.as_deref() == Some(item.row_key()) {
                    Style::default().fg(theme.yellow()).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(theme.text())
                };
                Row::new(item.render_cells(theme)).style(style)
            })
            .collect();

        let widths: Vec<Constraint> = columns.iter().map(|c| c.constraint).collect();

        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.border()));
        if let Some(title) = &self.title {
            block = block.title(format!(" {title} ")).title_style(
                Style::default()
                    .fg(theme.mauve())
                    .add_modifier(Modifier::BOLD),
            );
        }

        let table = RatatuiTable::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(
                Style::default()
                    .bg(theme.selection_bg())
                    .fg(theme.lavender())
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");

        frame.render_stateful_widget(table, area, &mut self.state);
    }
}
