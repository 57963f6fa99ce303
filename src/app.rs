//! Application shell.
//!
//! The [`App`] owns the terminal loop, the active screen and its history, the
//! modal overlays and the message channel. Screens and commands talk to it
//! exclusively through [`AppMessage`]s.

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::Theme;
use crate::browse::Stats;
use crate::commands::{
    Command, CopyContactCmd, CreateItemCmd, DeleteItemCmd, LoadItemsCmd, SetStatusCmd,
};
use crate::config::{self, GlobalAction, KeyResolver};
use crate::model::{Item, ItemStatus};
use crate::screen::{BrowseScreen, HomeScreen, PostScreen};
use crate::session::Session;
use crate::store::{self, ItemStore, JsonFileStore};
use crate::theme::theme_from_name;
use crate::tui::{Event, Tui};
use crate::ui::{
    Component, ConfirmDialog, ConfirmEvent, ErrorDialog, ErrorDialogEvent, EventResult,
    EventResultExt, HelpEvent, HelpOverlay, KeybindingSection, Result, Screen, StatusBar,
    ThemeEvent, ThemeSelector, Toast, ToastManager, ToastType,
};

const FRAME_RATE: f64 = 30.0;
const TICK_RATE: f64 = 8.0;
const STATUS_BAR_HEIGHT: u16 = 8;
/// Screens kept for Back; the oldest are dropped first.
const MAX_HISTORY: usize = 16;

/// Where a navigation request leads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Home,
    Browse {
        search: Option<String>,
        highlight: Option<String>,
    },
    Post,
}

/// Application-level messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppMessage {
    // === Lifecycle ===
    Tick,
    Render,
    Resize(u16, u16),
    Suspend,
    Resume,
    Quit,
    ClearScreen,

    // === Feedback ===
    DisplayError(String),
    ShowToast {
        message: String,
        toast_type: ToastType,
    },
    DisplayHelp,
    DisplayThemeSelector,

    // === Navigation ===
    Navigate(Destination),
    GoBack,

    // === Session ===
    ToggleSession,

    // === Items ===
    /// The full item list, from a load or the change feed.
    ItemsLoaded(Vec<Item>),
    ItemCreated,
    ReloadItems,
    CreateItem(Item),
    SetItemStatus {
        id: String,
        status: ItemStatus,
    },
    /// Ask for confirmation before deleting.
    ConfirmDelete {
        id: String,
        title: String,
    },
    DeleteItem(String),
    CopyContact(String),
}

impl AppMessage {
    const fn is_frequent(&self) -> bool {
        matches!(self, Self::Tick | Self::Render)
    }
}

enum Route {
    Home(HomeScreen),
    Browse(BrowseScreen),
    Post(PostScreen),
}

/// Forward a [`Screen`] call to whichever screen is active.
macro_rules! with_screen {
    ($route:expr, $screen:ident => $body:expr) => {
        match $route {
            Route::Home($screen) => $body,
            Route::Browse($screen) => $body,
            Route::Post($screen) => $body,
        }
    };
}

impl Route {
    const fn shows(&self, destination: &Destination) -> bool {
        matches!(
            (self, destination),
            (Self::Home(_), Destination::Home)
                | (Self::Browse(_), Destination::Browse { .. })
                | (Self::Post(_), Destination::Post)
        )
    }

    fn set_items(&mut self, items: &[Item]) {
        match self {
            Self::Home(screen) => screen.set_items(items),
            Self::Browse(screen) => screen.set_items(items),
            Self::Post(_) => {}
        }
    }

    fn set_session(&mut self, session: &Session) {
        match self {
            Self::Browse(screen) => screen.set_session(session),
            Self::Post(screen) => screen.set_session(session),
            Self::Home(_) => {}
        }
    }
}

enum Modal {
    Error(ErrorDialog),
    Help(HelpOverlay),
    /// Holds the theme to restore when the selector is cancelled.
    Theme(ThemeSelector, Theme),
    /// Holds the message sent when confirmed.
    Confirm(ConfirmDialog, AppMessage),
}

pub struct App {
    route: Route,
    history: Vec<Route>,
    modal: Option<Modal>,
    toasts: ToastManager,
    status_bar: StatusBar,
    theme: Theme,
    theme_name: String,
    resolver: Arc<KeyResolver>,
    store: Arc<JsonFileStore>,
    poll_interval: Duration,
    watch_token: CancellationToken,
    session: Session,
    items: Option<Vec<Item>>,
    should_quit: bool,
    should_suspend: bool,
    action_tx: UnboundedSender<AppMessage>,
    action_rx: UnboundedReceiver<AppMessage>,
}

impl App {
    pub fn new(
        config: &config::AppConfig,
        resolver: Arc<KeyResolver>,
        store: Arc<JsonFileStore>,
        session: Session,
        start: Destination,
    ) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let mut status_bar = StatusBar::new(resolver.clone());
        status_bar.set_session(session.label());

        let mut app = Self {
            route: Route::Home(HomeScreen::new(None, resolver.clone())),
            history: Vec::new(),
            modal: None,
            toasts: ToastManager::default(),
            status_bar,
            theme: theme_from_name(&config.theme.name),
            theme_name: config.theme.name.clone(),
            resolver,
            store,
            poll_interval: Duration::from_millis(config.data.poll_interval_ms.max(100)),
            watch_token: CancellationToken::new(),
            session,
            items: None,
            should_quit: false,
            should_suspend: false,
            action_tx,
            action_rx,
        };
        if start != Destination::Home {
            app.navigate(start);
        }
        app
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new(FRAME_RATE, TICK_RATE)?;
        tui.enter()?;

        self.spawn_command(Box::new(LoadItemsCmd::new(self.item_store())));
        tokio::spawn(store::watch(
            self.store.clone(),
            self.action_tx.clone(),
            self.poll_interval,
            self.watch_token.clone(),
        ));

        loop {
            self.handle_events(&mut tui).await?;
            self.handle_messages(&mut tui)?;
            if self.should_suspend {
                tui.suspend()?;
                self.action_tx.send(AppMessage::Resume)?;
                self.action_tx.send(AppMessage::ClearScreen)?;
                tui.enter()?;
            } else if self.should_quit {
                break;
            }
        }

        self.watch_token.cancel();
        tui.exit()?;
        info!("Shutting down");
        Ok(())
    }

    fn item_store(&self) -> Arc<dyn ItemStore> {
        self.store.clone()
    }

    fn spawn_command(&self, command: Box<dyn Command>) {
        let tx = self.action_tx.clone();
        let name = command.name();
        debug!(command = %name, "Spawning command");
        tokio::spawn(async move {
            if let Err(e) = command.execute(tx.clone()).await {
                error!(command = %name, error = %e, "Command failed");
                let _ = tx.send(AppMessage::DisplayError(format!("{name} failed: {e}")));
            }
        });
    }

    async fn handle_events(&mut self, tui: &mut Tui) -> Result<()> {
        let Some(event) = tui.next_event().await else {
            return Ok(());
        };

        match event {
            Event::Quit => self.action_tx.send(AppMessage::Quit)?,
            Event::Suspend => self.action_tx.send(AppMessage::Suspend)?,
            Event::Tick => self.action_tx.send(AppMessage::Tick)?,
            Event::Render => self.action_tx.send(AppMessage::Render)?,
            Event::Resize(width, height) => self.action_tx.send(AppMessage::Resize(width, height))?,
            Event::Key(key) => self.handle_key(key)?,
            Event::Mouse(mouse) => self.handle_mouse(mouse)?,
            Event::Paste(text) => self.handle_paste(&text)?,
            Event::Error(message) => warn!(%message, "Terminal event error"),
            _ => {}
        }
        Ok(())
    }

    fn emit(&self, result: Result<EventResult<AppMessage>>) -> Result<bool> {
        let (consumed, message) = result.process();
        if let Some(message) = message {
            self.action_tx.send(message)?;
        }
        Ok(consumed)
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if self.modal.is_some() {
            return self.handle_modal_key(key);
        }

        let captures_text = with_screen!(&self.route, screen => screen.captures_text());
        if !captures_text && self.handle_global_key(&key)? {
            return Ok(());
        }

        let result = with_screen!(&mut self.route, screen => screen.handle_key(key));
        let consumed = self.emit(result)?;

        // Esc left unhandled by a text field still means "back".
        if !consumed && captures_text && self.resolver.matches_global(&key, GlobalAction::Back) {
            self.action_tx.send(AppMessage::GoBack)?;
        }
        Ok(())
    }

    fn handle_global_key(&self, key: &KeyEvent) -> Result<bool> {
        let r = &self.resolver;
        let message = if r.matches_global(key, GlobalAction::Quit) {
            AppMessage::Quit
        } else if r.matches_global(key, GlobalAction::Help) {
            AppMessage::DisplayHelp
        } else if r.matches_global(key, GlobalAction::Theme) {
            AppMessage::DisplayThemeSelector
        } else if r.matches_global(key, GlobalAction::Back) {
            AppMessage::GoBack
        } else if r.matches_global(key, GlobalAction::Home) {
            AppMessage::Navigate(Destination::Home)
        } else if r.matches_global(key, GlobalAction::Browse) {
            AppMessage::Navigate(Destination::Browse {
                search: None,
                highlight: None,
            })
        } else if r.matches_global(key, GlobalAction::Post) {
            AppMessage::Navigate(Destination::Post)
        } else if r.matches_global(key, GlobalAction::SignIn) {
            AppMessage::ToggleSession
        } else {
            return Ok(false);
        };
        self.action_tx.send(message)?;
        Ok(true)
    }

    fn handle_modal_key(&mut self, key: KeyEvent) -> Result<()> {
        let Some(modal) = self.modal.as_mut() else {
            return Ok(());
        };
        match modal {
            Modal::Error(dialog) => {
                if let (_, Some(ErrorDialogEvent::Dismissed)) = dialog.handle_key(key).process() {
                    self.modal = None;
                }
            }
            Modal::Help(overlay) => {
                if let (_, Some(HelpEvent::Close)) = overlay.handle_key(key).process() {
                    self.modal = None;
                }
            }
            Modal::Theme(selector, _) => match selector.handle_key(key).process() {
                (_, Some(event)) => self.handle_theme_event(event),
                (_, None) => {}
            },
            Modal::Confirm(dialog, _) => match dialog.handle_key(key).process() {
                (_, Some(ConfirmEvent::Confirmed)) => {
                    if let Some(Modal::Confirm(_, message)) = self.modal.take() {
                        self.action_tx.send(message)?;
                    }
                }
                (_, Some(ConfirmEvent::Cancelled)) => self.modal = None,
                (_, None) => {}
            },
        }
        Ok(())
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> Result<()> {
        if let Some(Modal::Theme(selector, _)) = self.modal.as_mut() {
            if let (_, Some(event)) = selector.handle_mouse(mouse).process() {
                self.handle_theme_event(event);
            }
            return Ok(());
        }
        if self.modal.is_some() {
            return Ok(());
        }
        let result = with_screen!(&mut self.route, screen => screen.handle_mouse(mouse));
        self.emit(result)?;
        Ok(())
    }

    fn handle_paste(&mut self, text: &str) -> Result<()> {
        if self.modal.is_some() {
            return Ok(());
        }
        let result = with_screen!(&mut self.route, screen => screen.handle_paste(text));
        self.emit(Ok(result))?;
        Ok(())
    }

    fn handle_theme_event(&mut self, event: ThemeEvent) {
        match event {
            ThemeEvent::Previewed(info) => self.theme = info.theme,
            ThemeEvent::Selected(info) => {
                self.theme = info.theme;
                self.theme_name = info.name.to_string();
                self.modal = None;
                if let Err(e) = config::save_theme(info.name) {
                    warn!(error = %e, "Failed to save theme");
                }
            }
            ThemeEvent::Cancelled => {
                if let Some(Modal::Theme(_, previous)) = self.modal.take() {
                    self.theme = previous;
                }
            }
        }
    }

    fn handle_messages(&mut self, tui: &mut Tui) -> Result<()> {
        while let Ok(message) = self.action_rx.try_recv() {
            if !message.is_frequent() {
                debug!(?message, "Handling message");
            }
            self.update(message, tui)?;
        }
        Ok(())
    }

    fn update(&mut self, message: AppMessage, tui: &mut Tui) -> Result<()> {
        match message {
            AppMessage::Tick => {
                self.toasts.handle_tick();
                with_screen!(&mut self.route, screen => screen.handle_tick());
            }
            AppMessage::Render => self.render(tui)?,
            AppMessage::Resize(width, height) => {
                tui.resize(Rect::new(0, 0, width, height))?;
                self.render(tui)?;
            }
            AppMessage::Suspend => self.should_suspend = true,
            AppMessage::Resume => self.should_suspend = false,
            AppMessage::Quit => self.should_quit = true,
            AppMessage::ClearScreen => tui.clear()?,
            other => self.apply(other),
        }
        Ok(())
    }

    /// State changes that don't touch the terminal.
    fn apply(&mut self, message: AppMessage) {
        match message {
            AppMessage::DisplayError(message) => {
                self.modal = Some(Modal::Error(ErrorDialog::new(message, self.resolver.clone())));
            }
            AppMessage::ShowToast {
                message,
                toast_type,
            } => self.toasts.show(Toast::new(message, toast_type)),
            AppMessage::DisplayHelp => {
                let sections = vec![
                    KeybindingSection::new("Global", self.status_bar.global_keybindings()),
                    KeybindingSection::new(
                        "This screen",
                        with_screen!(&self.route, screen => screen.keybindings()),
                    ),
                ];
                self.modal = Some(Modal::Help(HelpOverlay::new(sections, self.resolver.clone())));
            }
            AppMessage::DisplayThemeSelector => {
                self.modal = Some(Modal::Theme(
                    ThemeSelector::new(&self.theme_name, self.resolver.clone()),
                    self.theme,
                ));
            }
            AppMessage::Navigate(destination) => self.navigate(destination),
            AppMessage::GoBack => self.go_back(),
            AppMessage::ToggleSession => self.toggle_session(),
            AppMessage::ItemsLoaded(items) => {
                info!(count = items.len(), "Items loaded");
                self.status_bar.set_stats(Stats::from_items(&items));
                self.route.set_items(&items);
                self.items = Some(items);
            }
            AppMessage::ItemCreated => {
                // The form is done; show the listing in its place.
                self.route = self.build_route(Destination::Browse {
                    search: None,
                    highlight: None,
                });
            }
            AppMessage::ReloadItems => {
                self.spawn_command(Box::new(LoadItemsCmd::new(self.item_store())));
            }
            AppMessage::CreateItem(item) => {
                self.spawn_command(Box::new(CreateItemCmd::new(self.item_store(), item)));
            }
            AppMessage::SetItemStatus { id, status } => {
                self.spawn_command(Box::new(SetStatusCmd::new(self.item_store(), id, status)));
            }
            AppMessage::ConfirmDelete { id, title } => {
                let dialog = ConfirmDialog::new(
                    "Delete report",
                    format!("Delete \"{title}\"? This cannot be undone."),
                    self.resolver.clone(),
                )
                .with_confirm_text("Delete");
                self.modal = Some(Modal::Confirm(dialog, AppMessage::DeleteItem(id)));
            }
            AppMessage::DeleteItem(id) => {
                self.spawn_command(Box::new(DeleteItemCmd::new(self.item_store(), id)));
            }
            AppMessage::CopyContact(email) => {
                if email.trim().is_empty() {
                    self.toasts
                        .show(Toast::new("This report has no contact email", ToastType::Warning));
                } else {
                    self.spawn_command(Box::new(CopyContactCmd::new(email)));
                }
            }
            AppMessage::Tick
            | AppMessage::Render
            | AppMessage::Resize(..)
            | AppMessage::Suspend
            | AppMessage::Resume
            | AppMessage::Quit
            | AppMessage::ClearScreen => {}
        }
    }

    fn build_route(&self, destination: Destination) -> Route {
        let items = self.items.as_deref();
        let resolver = self.resolver.clone();
        match destination {
            Destination::Home => Route::Home(HomeScreen::new(items, resolver)),
            Destination::Browse { search, highlight } => Route::Browse(BrowseScreen::new(
                items,
                search,
                highlight,
                &self.session,
                resolver,
            )),
            Destination::Post => Route::Post(PostScreen::new(&self.session, resolver)),
        }
    }

    fn navigate(&mut self, destination: Destination) {
        debug!(?destination, "Navigating");
        if destination == Destination::Home {
            self.history.clear();
            self.route = self.build_route(destination);
            return;
        }
        // Re-opening the current screen replaces it instead of stacking a copy.
        let same_screen = self.route.shows(&destination);
        let next = self.build_route(destination);
        let previous = std::mem::replace(&mut self.route, next);
        if same_screen {
            return;
        }
        self.history.push(previous);
        if self.history.len() > MAX_HISTORY {
            self.history.remove(0);
        }
    }

    fn go_back(&mut self) {
        let Some(mut previous) = self.history.pop() else {
            if !matches!(self.route, Route::Home(_)) {
                self.route = self.build_route(Destination::Home);
            }
            return;
        };
        // The restored screen may have missed reloads and sign-in changes.
        if let Some(items) = &self.items {
            previous.set_items(items);
        }
        previous.set_session(&self.session);
        self.route = previous;
    }

    fn toggle_session(&mut self) {
        if self.session.is_hosted() {
            self.toasts.show(Toast::new(
                "Your account is managed by the sign-in provider",
                ToastType::Info,
            ));
            return;
        }
        self.session.toggle();
        let label = self.session.label();
        let message = if self.session.is_signed_in() {
            format!("Signed in as {label}")
        } else {
            "Signed out".to_string()
        };
        self.toasts.show(Toast::new(message, ToastType::Info));
        self.status_bar.set_session(label);
        self.route.set_session(&self.session);
    }

    fn render(&mut self, tui: &mut Tui) -> Result<()> {
        tui.draw(|frame| self.draw(frame))?;
        Ok(())
    }

    fn draw(&mut self, frame: &mut Frame) {
        let theme = self.theme;
        let [main, footer] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(STATUS_BAR_HEIGHT),
        ])
        .areas(frame.area());

        frame.render_widget(
            ratatui::widgets::Block::default()
                .style(ratatui::style::Style::default().bg(theme.base())),
            frame.area(),
        );

        with_screen!(&mut self.route, screen => screen.render(frame, main, &theme));

        let breadcrumbs = with_screen!(&self.route, screen => screen.breadcrumbs());
        let keybindings = with_screen!(&self.route, screen => screen.keybindings());
        self.status_bar
            .render_with_keybindings(frame, footer, &theme, &breadcrumbs, &keybindings);

        self.toasts.render(frame, main, &theme);

        let area = frame.area();
        match &mut self.modal {
            Some(Modal::Error(dialog)) => dialog.render(frame, area, &theme),
            Some(Modal::Help(overlay)) => overlay.render(frame, area, &theme),
            Some(Modal::Theme(selector, _)) => selector.render(frame, area, &theme),
            Some(Modal::Confirm(dialog, _)) => dialog.render(frame, area, &theme),
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::{found, lost};
    use crate::session::{Account, IdentityStrategy};

    fn app_with(session: Session) -> App {
        App::new(
            &config::AppConfig::default(),
            Arc::new(KeyResolver::default()),
            Arc::new(JsonFileStore::new("items.json")),
            session,
            Destination::Home,
        )
    }

    fn local_app() -> App {
        app_with(Session::new(IdentityStrategy::Local))
    }

    fn browse() -> AppMessage {
        AppMessage::Navigate(Destination::Browse {
            search: None,
            highlight: None,
        })
    }

    #[test]
    fn test_back_without_history_falls_back_to_home() {
        let mut app = local_app();
        app.apply(browse());
        app.history.clear();

        app.apply(AppMessage::GoBack);
        assert!(matches!(app.route, Route::Home(_)));
        app.apply(AppMessage::GoBack);
        assert!(matches!(app.route, Route::Home(_)));
        assert!(app.history.is_empty());
    }

    #[test]
    fn test_navigating_home_clears_history() {
        let mut app = local_app();
        app.apply(browse());
        app.apply(AppMessage::Navigate(Destination::Post));
        assert_eq!(app.history.len(), 2);

        app.apply(AppMessage::Navigate(Destination::Home));
        assert!(matches!(app.route, Route::Home(_)));
        assert!(app.history.is_empty());
    }

    #[test]
    fn test_item_created_replaces_post_with_browse() {
        let mut app = local_app();
        app.apply(AppMessage::Navigate(Destination::Post));
        app.apply(AppMessage::ItemCreated);
        assert!(matches!(app.route, Route::Browse(_)));
        assert_eq!(app.history.len(), 1);

        app.apply(AppMessage::GoBack);
        assert!(matches!(app.route, Route::Home(_)));
    }

    #[test]
    fn test_back_restores_browse_with_fresh_items_and_session() {
        let mut app = local_app();
        app.apply(browse());
        app.apply(AppMessage::Navigate(Destination::Post));
        app.apply(AppMessage::ItemsLoaded(vec![
            lost("a", "Blue Backpack", "2024-03-01"),
            found("b", "Keys", "2024-03-02"),
        ]));
        app.apply(AppMessage::ToggleSession);
        assert!(app.session.is_signed_in());

        app.apply(AppMessage::GoBack);
        let Route::Browse(screen) = &app.route else {
            panic!("expected the browse screen");
        };
        assert_eq!(screen.item_count(), 2);
        assert_eq!(screen.user_id(), Some("local-demo-user"));
    }

    #[test]
    fn test_hosted_session_toggle_only_shows_toast() {
        let account = Account {
            id: "u1".to_string(),
            name: "Ada".to_string(),
            email: "ada@campus.edu".to_string(),
        };
        let mut app = app_with(Session::new(IdentityStrategy::Hosted(account)));
        app.apply(AppMessage::ToggleSession);

        assert!(app.session.is_signed_in());
        assert_eq!(app.session.user_id(), Some("u1"));
        assert_eq!(app.toasts.len(), 1);
    }

    #[test]
    fn test_reopening_current_screen_does_not_grow_history() {
        let mut app = local_app();
        for _ in 0..200 {
            app.apply(browse());
        }
        assert_eq!(app.history.len(), 1);
        assert!(matches!(app.route, Route::Browse(_)));

        app.apply(AppMessage::GoBack);
        assert!(matches!(app.route, Route::Home(_)));
    }

    #[test]
    fn test_history_is_bounded() {
        let mut app = local_app();
        for _ in 0..50 {
            app.apply(browse());
            app.apply(AppMessage::Navigate(Destination::Post));
        }
        assert_eq!(app.history.len(), MAX_HISTORY);
    }

    #[test]
    fn test_start_destination_keeps_home_to_go_back_to() {
        let app = App::new(
            &config::AppConfig::default(),
            Arc::new(KeyResolver::default()),
            Arc::new(JsonFileStore::new("items.json")),
            Session::new(IdentityStrategy::Local),
            Destination::Browse {
                search: Some("wallet".to_string()),
                highlight: None,
            },
        );
        assert!(matches!(app.route, Route::Browse(_)));
        assert!(matches!(app.history.as_slice(), [Route::Home(_)]));
    }

    #[test]
    fn test_paste_is_ignored_under_a_modal() {
        let mut app = local_app();
        app.apply(AppMessage::DisplayError("boom".to_string()));
        app.handle_paste("wallet").unwrap();
        assert!(app.action_rx.try_recv().is_err());
    }
}
