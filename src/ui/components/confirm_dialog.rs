use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap};

use crate::Theme;
use crate::config::{DialogAction, KeyResolver};
use crate::ui::{Component, EventResult, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmEvent {
    Confirmed,
    Cancelled,
}

/// Yes/no question drawn in red, used before destructive actions.
pub struct ConfirmDialog {
    title: String,
    message: String,
    confirm_text: String,
    resolver: Arc<KeyResolver>,
}

impl ConfirmDialog {
    pub fn new(
        title: impl Into<String>,
        message: impl Into<String>,
        resolver: Arc<KeyResolver>,
    ) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            confirm_text: "Yes".to_string(),
            resolver,
        }
    }

    pub fn with_confirm_text(mut self, text: impl Into<String>) -> Self {
        self.confirm_text = text.into();
        self
    }

    fn key_hint(&self, action: DialogAction) -> String {
        let kb = &self.resolver.keybindings.dialog;
        match action {
            DialogAction::Confirm => kb.confirm.display(),
            DialogAction::Cancel => kb.cancel.display(),
            DialogAction::Dismiss => kb.dismiss.display(),
        }
    }
}

impl Component for ConfirmDialog {
    type Output = ConfirmEvent;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        if self.resolver.matches_dialog(&key, DialogAction::Confirm) {
            return Ok(ConfirmEvent::Confirmed.into());
        }
        if self.resolver.matches_dialog(&key, DialogAction::Cancel) {
            return Ok(ConfirmEvent::Cancelled.into());
        }
        // Modal: swallow everything else.
        Ok(EventResult::Consumed)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let popup_area = area.centered(Constraint::Percentage(50), Constraint::Length(8));
        frame.render_widget(Clear, popup_area);

        let key_style = Style::default()
            .fg(theme.peach())
            .add_modifier(Modifier::BOLD);

        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                self.message.clone(),
                Style::default().fg(theme.text()),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled(format!("[{}]", self.key_hint(DialogAction::Confirm)), key_style),
                Span::raw(" "),
                Span::styled(
                    self.confirm_text.clone(),
                    Style::default().fg(theme.red()).add_modifier(Modifier::BOLD),
                ),
                Span::raw("    "),
                Span::styled(format!("[{}]", self.key_hint(DialogAction::Cancel)), key_style),
                Span::raw(" "),
                Span::styled("Cancel", Style::default().fg(theme.overlay1())),
            ]),
        ];

        let block = Block::default()
            .title(format!(" {} ", self.title))
            .title_style(Style::default().fg(theme.red()).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.red()))
            .style(Style::default().bg(theme.base()));

        let paragraph = Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn dialog() -> ConfirmDialog {
        ConfirmDialog::new("Delete", "Delete 'Keys'?", Arc::new(KeyResolver::default()))
    }

    #[test]
    fn test_confirm_and_cancel_keys() {
        let mut dialog = dialog();
        assert_eq!(
            dialog.handle_key(KeyEvent::new(KeyCode::Char('y'), KeyModifiers::NONE)).unwrap(),
            ConfirmEvent::Confirmed.into()
        );
        assert_eq!(
            dialog.handle_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)).unwrap(),
            ConfirmEvent::Cancelled.into()
        );
        assert_eq!(
            dialog.handle_key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE)).unwrap(),
            EventResult::Consumed
        );
    }
}
