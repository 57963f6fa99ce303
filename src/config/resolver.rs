use std::sync::Arc;

use crossterm::event::KeyEvent;

use crate::config::actions::{
    BrowseAction, DialogAction, FormAction, GlobalAction, NavAction, SearchAction,
};
use crate::config::key::KeyBinding;
use crate::config::keybindings::KeybindingsConfig;

/// Maps key events to configured actions.
pub struct KeyResolver {
    pub keybindings: Arc<KeybindingsConfig>,
}

impl KeyResolver {
    pub const fn new(keybindings: Arc<KeybindingsConfig>) -> Self {
        Self { keybindings }
    }

    fn global(&self, action: GlobalAction) -> &KeyBinding {
        let kb = &self.keybindings.global;
        match action {
            GlobalAction::Quit => &kb.quit,
            GlobalAction::Help => &kb.help,
            GlobalAction::Theme => &kb.theme,
            GlobalAction::Back => &kb.back,
            GlobalAction::Home => &kb.home,
            GlobalAction::Browse => &kb.browse,
            GlobalAction::Post => &kb.post,
            GlobalAction::SignIn => &kb.sign_in,
        }
    }

    fn nav(&self, action: NavAction) -> &KeyBinding {
        let kb = &self.keybindings.navigation;
        match action {
            NavAction::Up => &kb.up,
            NavAction::Down => &kb.down,
            NavAction::PageUp => &kb.page_up,
            NavAction::PageDown => &kb.page_down,
            NavAction::Home => &kb.home,
            NavAction::End => &kb.end,
            NavAction::Select => &kb.select,
            NavAction::NextField => &kb.next_field,
            NavAction::PreviousField => &kb.previous_field,
        }
    }

    fn search(&self, action: SearchAction) -> &KeyBinding {
        let kb = &self.keybindings.search;
        match action {
            SearchAction::Focus => &kb.focus,
            SearchAction::Clear => &kb.clear,
        }
    }

    fn browse(&self, action: BrowseAction) -> &KeyBinding {
        let kb = &self.keybindings.browse;
        match action {
            BrowseAction::Status => &kb.status,
            BrowseAction::Sort => &kb.sort,
            BrowseAction::Category => &kb.category,
            BrowseAction::Location => &kb.location,
            BrowseAction::Reset => &kb.reset,
            BrowseAction::CopyContact => &kb.copy_contact,
            BrowseAction::Reload => &kb.reload,
            BrowseAction::ToggleStatus => &kb.toggle_status,
            BrowseAction::Delete => &kb.delete,
        }
    }

    fn form(&self, action: FormAction) -> &KeyBinding {
        let kb = &self.keybindings.form;
        match action {
            FormAction::Submit => &kb.submit,
            FormAction::Cycle => &kb.cycle,
        }
    }

    // Global actions
    pub fn matches_global(&self, event: &KeyEvent, action: GlobalAction) -> bool {
        self.global(action).matches(event)
    }

    pub fn display_global(&self, action: GlobalAction) -> String {
        self.global(action).display()
    }

    // Navigation actions
    pub fn matches_nav(&self, event: &KeyEvent, action: NavAction) -> bool {
        self.nav(action).matches(event)
    }

    pub fn display_nav(&self, action: NavAction) -> String {
        self.nav(action).display()
    }

    // Search box actions
    pub fn matches_search(&self, event: &KeyEvent, action: SearchAction) -> bool {
        self.search(action).matches(event)
    }

    pub fn display_search(&self, action: SearchAction) -> String {
        self.search(action).display()
    }

    // Browse screen actions
    pub fn matches_browse(&self, event: &KeyEvent, action: BrowseAction) -> bool {
        self.browse(action).matches(event)
    }

    pub fn display_browse(&self, action: BrowseAction) -> String {
        self.browse(action).display()
    }

    // Post form actions
    pub fn matches_form(&self, event: &KeyEvent, action: FormAction) -> bool {
        self.form(action).matches(event)
    }

    pub fn display_form(&self, action: FormAction) -> String {
        self.form(action).display()
    }

    // Dialog actions
    pub fn matches_dialog(&self, event: &KeyEvent, action: DialogAction) -> bool {
        let kb = &self.keybindings.dialog;
        match action {
            DialogAction::Dismiss => kb.dismiss.matches(event),
            DialogAction::Confirm => kb.confirm.matches(event),
            DialogAction::Cancel => kb.cancel.matches(event),
        }
    }
}

impl Default for KeyResolver {
    fn default() -> Self {
        Self::new(Arc::new(KeybindingsConfig::default()))
    }
}
