use std::sync::Arc;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use crate::Theme;
use crate::browse::Stats;
use crate::config::{GlobalAction, KeyResolver, NavAction};
use crate::ui::{Keybinding, truncate_str};

const LOGO: &[&str] = &[
    r"   .---.        ",
    r"  /  ?  \       ",
    r"  \     /       ",
    r"   '---'\\      ",
    r"         \\     ",
    r"   findit       ",
];

/// Footer with session info, key hints and the logo.
pub struct StatusBar {
    session: String,
    stats: Option<Stats>,
    resolver: Arc<KeyResolver>,
}

impl StatusBar {
    pub const fn new(resolver: Arc<KeyResolver>) -> Self {
        Self {
            session: String::new(),
            stats: None,
            resolver,
        }
    }

    pub fn set_session(&mut self, label: impl Into<String>) {
        self.session = label.into();
    }

    pub const fn set_stats(&mut self, stats: Stats) {
        self.stats = Some(stats);
    }

    pub fn render_with_keybindings(
        &self,
        frame: &mut Frame,
        area: Rect,
        theme: &Theme,
        breadcrumbs: &[String],
        local_keybindings: &[Keybinding],
    ) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.surface1()));
        let inner_area = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(36),
                Constraint::Min(20),
                Constraint::Length(17),
            ])
            .split(inner_area);

        self.render_status_info(frame, chunks[0], theme, breadcrumbs);
        self.render_keybindings(frame, chunks[1], theme, local_keybindings);
        Self::render_logo(frame, chunks[2], theme);
    }

    fn render_status_info(&self, frame: &mut Frame, area: Rect, theme: &Theme, breadcrumbs: &[String]) {
        let w = usize::from(area.width);
        let label_style = Style::default().fg(theme.overlay1());
        let value_style = Style::default().fg(theme.text());

        let location = if breadcrumbs.is_empty() {
            "FindIt".to_string()
        } else {
            breadcrumbs.join(" › ")
        };
        let mut lines = vec![
            Line::from(Span::styled(
                truncate_str(&location, w),
                Style::default()
                    .fg(theme.lavender())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            status_line("session", &self.session, w, label_style, value_style),
        ];

        if let Some(stats) = self.stats {
            lines.push(status_line(
                "items",
                &stats.total.to_string(),
                w,
                label_style,
                value_style,
            ));
            lines.push(status_line(
                "lost",
                &stats.lost.to_string(),
                w,
                label_style,
                Style::default().fg(theme.error()),
            ));
            lines.push(status_line(
                "found",
                &stats.found.to_string(),
                w,
                label_style,
                Style::default().fg(theme.success()),
            ));
        } else {
            lines.push(status_line("items", "loading…", w, label_style, value_style));
        }

        frame.render_widget(Paragraph::new(lines), area);
    }

    fn render_keybindings(
        &self,
        frame: &mut Frame,
        area: Rect,
        theme: &Theme,
        local_keybindings: &[Keybinding],
    ) {
        let global_keybindings = self.global_keybindings();
        let hints: Vec<&Keybinding> = local_keybindings
            .iter()
            .filter(|kb| kb.hint)
            .chain(global_keybindings.iter().filter(|kb| kb.hint))
            .collect();
        if hints.is_empty() || area.height == 0 {
            return;
        }

        // Align the separators into one straight column.
        let max_key_w = hints.iter().map(|kb| kb.key.chars().count()).max().unwrap_or(1);
        let max_desc_w = hints
            .iter()
            .map(|kb| kb.description.chars().count())
            .max()
            .unwrap_or(1);
        let col_width = u16::try_from(max_key_w + 3 + max_desc_w + 2).unwrap_or(u16::MAX);
        let num_cols = usize::from((area.width / col_width).max(1));
        let num_rows = usize::from(area.height);

        let mut columns: Vec<Vec<Line>> = vec![Vec::new(); num_cols];
        for (i, kb) in hints.iter().enumerate() {
            let col_idx = i / num_rows;
            if col_idx >= num_cols {
                break;
            }
            columns[col_idx].push(Line::from(vec![
                Span::styled(
                    format!("{:>width$}", kb.key, width = max_key_w),
                    Style::default().fg(theme.peach()),
                ),
                Span::styled(" │ ", Style::default().fg(theme.surface2())),
                Span::styled(kb.description.clone(), Style::default().fg(theme.subtext0())),
            ]));
        }

        let col_areas = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Length(col_width); num_cols])
            .split(area);
        for (lines, col_area) in columns.into_iter().zip(col_areas.iter()) {
            frame.render_widget(Paragraph::new(lines), *col_area);
        }
    }

    fn render_logo(frame: &mut Frame, area: Rect, theme: &Theme) {
        let logo_lines: Vec<Line> = LOGO
            .iter()
            .map(|line| {
                Line::from(Span::styled(
                    *line,
                    Style::default()
                        .fg(theme.mauve())
                        .add_modifier(Modifier::BOLD),
                ))
            })
            .collect();
        frame.render_widget(Paragraph::new(logo_lines), area);
    }

    /// App-wide keybindings, also listed in the help overlay.
    pub fn global_keybindings(&self) -> Vec<Keybinding> {
        let r = &self.resolver;
        vec![
            Keybinding::hint(r.display_global(GlobalAction::Help), "Help"),
            Keybinding::hint(r.display_global(GlobalAction::Browse), "Browse"),
            Keybinding::hint(r.display_global(GlobalAction::Post), "Report item"),
            Keybinding::new(r.display_global(GlobalAction::Home), "Home"),
            Keybinding::new(r.display_global(GlobalAction::SignIn), "Sign in/out"),
            Keybinding::new(r.display_global(GlobalAction::Back), "Back"),
            Keybinding::new(r.display_global(GlobalAction::Theme), "Theme"),
            Keybinding::hint(r.display_global(GlobalAction::Quit), "Quit"),
            Keybinding::new(
                format!(
                    "{}/{}",
                    r.display_nav(NavAction::Up),
                    r.display_nav(NavAction::Down)
                ),
                "Navigate",
            ),
        ]
    }
}

/// `label  value` with the label right-aligned.
fn status_line<'a>(
    label: &'a str,
    value: &str,
    max_width: usize,
    label_style: Style,
    value_style: Style,
) -> Line<'a> {
    const LABEL_W: usize = 8;
    let available = max_width.saturating_sub(LABEL_W + 1);
    Line::from(vec![
        Span::styled(format!("{label:>LABEL_W$}"), label_style),
        Span::raw(" "),
        Span::styled(truncate_str(value, available), value_style),
    ])
}
