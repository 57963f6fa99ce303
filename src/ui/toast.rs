use std::collections::VecDeque;
use std::time::{Duration, Instant};

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};

use super::{Component, truncate_str};
use crate::Theme;

const TOAST_LIFETIME: Duration = Duration::from_secs(3);
const MAX_VISIBLE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastType {
    Success,
    Info,
    Warning,
}

#[derive(Debug, Clone)]
pub struct Toast {
    message: String,
    toast_type: ToastType,
    created_at: Instant,
}

impl Toast {
    pub fn new(message: impl Into<String>, toast_type: ToastType) -> Self {
        Self {
            message: message.into(),
            toast_type,
            created_at: Instant::now(),
        }
    }

    fn is_expired(&self) -> bool {
        self.created_at.elapsed() >= TOAST_LIFETIME
    }
}

/// Short-lived notifications stacked in the bottom-right corner.
#[derive(Default)]
pub struct ToastManager {
    toasts: VecDeque<Toast>,
}

impl ToastManager {
    pub fn show(&mut self, toast: Toast) {
        self.toasts.push_back(toast);
        while self.toasts.len() > MAX_VISIBLE {
            self.toasts.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }
}

impl Component for ToastManager {
    type Output = ();

    fn handle_tick(&mut self) {
        self.toasts.retain(|t| !t.is_expired());
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        const HEIGHT: u16 = 3;
        let width = 50u16.min(area.width.saturating_sub(4));

        // Newest at the bottom, older ones stacked upward.
        for (i, toast) in self.toasts.iter().rev().enumerate() {
            let offset = u16::try_from(i).unwrap_or(u16::MAX).saturating_mul(HEIGHT + 1);
            let Some(y) = area
                .bottom()
                .checked_sub(HEIGHT + offset + 1)
                .filter(|&y| y >= area.y)
            else {
                break;
            };
            let x = area.x + area.width.saturating_sub(width + 2);
            let toast_area = Rect::new(x, y, width, HEIGHT);

            let (color, icon) = match toast.toast_type {
                ToastType::Success => (theme.success(), "✓"),
                ToastType::Info => (theme.sky(), "ℹ"),
                ToastType::Warning => (theme.warning(), "!"),
            };

            frame.render_widget(Clear, toast_area);
            let block = Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(color))
                .style(Style::default().bg(theme.surface0()));

            let text = truncate_str(
                &format!("{icon} {}", toast.message),
                usize::from(width.saturating_sub(2)),
            );
            let paragraph = Paragraph::new(text)
                .block(block)
                .style(Style::default().fg(theme.text()).add_modifier(Modifier::BOLD))
                .alignment(Alignment::Center);
            frame.render_widget(paragraph, toast_area);
        }
    }
}
