//! Full-page screens.
//!
//! Each screen owns its components and translates their events into
//! [`AppMessage`](crate::app::AppMessage)s for the App to act on.

mod browse;
mod home;
mod post;

use ratatui::layout::Constraint;
use ratatui::style::Style;
use ratatui::widgets::Cell;

pub use browse::BrowseScreen;
pub use home::HomeScreen;
pub use post::PostScreen;

use crate::Theme;
use crate::model::{Item, ItemStatus};
use crate::ui::{ColumnDef, TableRow};

/// Colour used for an item's status everywhere it is shown.
pub const fn status_color(status: Option<ItemStatus>, theme: &Theme) -> ratatui::style::Color {
    match status {
        Some(ItemStatus::Lost) => theme.error(),
        Some(ItemStatus::Found) => theme.success(),
        None => theme.overlay1(),
    }
}

impl TableRow for Item {
    fn columns() -> &'static [ColumnDef] {
        static COLUMNS: &[ColumnDef] = &[
            ColumnDef::new("Status", Constraint::Length(8)),
            ColumnDef::new("Title", Constraint::Min(20)),
            ColumnDef::new("Category", Constraint::Length(16)),
            ColumnDef::new("Location", Constraint::Length(24)),
            ColumnDef::new("Date", Constraint::Length(10)),
        ];
        COLUMNS
    }

    fn render_cells(&self, theme: &Theme) -> Vec<Cell<'static>> {
        vec![
            Cell::from(self.status_label())
                .style(Style::default().fg(status_color(self.status, theme))),
            Cell::from(self.title.clone()),
            Cell::from(self.category.clone()),
            Cell::from(self.location.clone()),
            Cell::from(self.date_label()),
        ]
    }

    fn row_key(&self) -> &str {
        self.id()
    }
}
