use crossterm::event::KeyCode;
use serde::{Deserialize, Serialize};

use crate::config::key::{Key, KeyBinding};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalKeybindings {
    pub quit: KeyBinding,
    pub help: KeyBinding,
    pub theme: KeyBinding,
    pub back: KeyBinding,
    pub home: KeyBinding,
    pub browse: KeyBinding,
    pub post: KeyBinding,
    pub sign_in: KeyBinding,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationKeybindings {
    pub up: KeyBinding,
    pub down: KeyBinding,
    pub page_up: KeyBinding,
    pub page_down: KeyBinding,
    pub home: KeyBinding,
    pub end: KeyBinding,
    pub select: KeyBinding,
    pub next_field: KeyBinding,
    pub previous_field: KeyBinding,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchKeybindings {
    pub focus: KeyBinding,
    pub clear: KeyBinding,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowseKeybindings {
    pub status: KeyBinding,
    pub sort: KeyBinding,
    pub category: KeyBinding,
    pub location: KeyBinding,
    pub reset: KeyBinding,
    pub copy_contact: KeyBinding,
    pub reload: KeyBinding,
    pub toggle_status: KeyBinding,
    pub delete: KeyBinding,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FormKeybindings {
    pub submit: KeyBinding,
    pub cycle: KeyBinding,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogKeybindings {
    pub dismiss: KeyBinding,
    pub confirm: KeyBinding,
    pub cancel: KeyBinding,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct KeybindingsConfig {
    pub global: GlobalKeybindings,
    pub navigation: NavigationKeybindings,
    pub search: SearchKeybindings,
    pub browse: BrowseKeybindings,
    pub form: FormKeybindings,
    pub dialog: DialogKeybindings,
}

impl Default for GlobalKeybindings {
    fn default() -> Self {
        Self {
            quit: Key::new(KeyCode::Char('q')).into(),
            help: Key::new(KeyCode::Char('?')).into(),
            theme: Key::new(KeyCode::Char('t')).into(),
            back: Key::new(KeyCode::Esc).into(),
            home: Key::new(KeyCode::Char('H')).into(),
            browse: Key::new(KeyCode::Char('b')).into(),
            post: Key::new(KeyCode::Char('p')).into(),
            sign_in: Key::new(KeyCode::Char('a')).into(),
        }
    }
}

impl Default for NavigationKeybindings {
    fn default() -> Self {
        Self {
            up: KeyBinding::multiple(vec![Key::new(KeyCode::Char('k')), Key::new(KeyCode::Up)]),
            down: KeyBinding::multiple(vec![Key::new(KeyCode::Char('j')), Key::new(KeyCode::Down)]),
            page_up: Key::new(KeyCode::PageUp).into(),
            page_down: Key::new(KeyCode::PageDown).into(),
            home: KeyBinding::multiple(vec![Key::new(KeyCode::Char('g')), Key::new(KeyCode::Home)]),
            end: KeyBinding::multiple(vec![Key::new(KeyCode::Char('G')), Key::new(KeyCode::End)]),
            select: Key::new(KeyCode::Enter).into(),
            next_field: KeyBinding::multiple(vec![Key::new(KeyCode::Tab), Key::new(KeyCode::Down)]),
            previous_field: KeyBinding::multiple(vec![
                Key::new(KeyCode::BackTab),
                Key::new(KeyCode::Up),
            ]),
        }
    }
}

impl Default for SearchKeybindings {
    fn default() -> Self {
        Self {
            focus: Key::new(KeyCode::Char('/')).into(),
            clear: Key::with_ctrl(KeyCode::Char('u')).into(),
        }
    }
}

impl Default for BrowseKeybindings {
    fn default() -> Self {
        Self {
            status: Key::new(KeyCode::Char('s')).into(),
            sort: Key::new(KeyCode::Char('o')).into(),
            category: Key::new(KeyCode::Char('c')).into(),
            location: Key::new(KeyCode::Char('l')).into(),
            reset: Key::new(KeyCode::Char('x')).into(),
            copy_contact: Key::new(KeyCode::Char('y')).into(),
            reload: Key::new(KeyCode::Char('r')).into(),
            toggle_status: Key::new(KeyCode::Char('m')).into(),
            delete: Key::new(KeyCode::Char('d')).into(),
        }
    }
}

impl Default for FormKeybindings {
    fn default() -> Self {
        Self {
            submit: Key::with_ctrl(KeyCode::Char('s')).into(),
            cycle: KeyBinding::multiple(vec![Key::new(KeyCode::Left), Key::new(KeyCode::Right)]),
        }
    }
}

impl Default for DialogKeybindings {
    fn default() -> Self {
        Self {
            dismiss: KeyBinding::multiple(vec![
                Key::new(KeyCode::Enter),
                Key::new(KeyCode::Esc),
                Key::new(KeyCode::Char('q')),
            ]),
            confirm: KeyBinding::multiple(vec![Key::new(KeyCode::Char('y')), Key::new(KeyCode::Enter)]),
            cancel: KeyBinding::multiple(vec![Key::new(KeyCode::Char('n')), Key::new(KeyCode::Esc)]),
        }
    }
}
