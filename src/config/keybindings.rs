use crossterm::event::KeyCode;
use serde::{Deserialize, Serialize};

use crate::config::key::{Key, KeyBinding};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalKeybindings {
    pub quit: KeyBinding,
    pub help: KeyBinding,
    pub close_all: KeyBinding,
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
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchKeybindings {
    pub toggle: KeyBinding,
    pub exit: KeyBinding,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterKeybindings {
    pub add: KeyBinding,
    pub edit: KeyBinding,
    pub details: KeyBinding,
    pub delete: KeyBinding,
    pub toggle_active: KeyBinding,
    pub info: KeyBinding,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModalKeybindings {
    pub dismiss: KeyBinding,
    pub scroll_up: KeyBinding,
    pub scroll_down: KeyBinding,
    pub page_up: KeyBinding,
    pub page_down: KeyBinding,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogKeybindings {
    pub confirm: KeyBinding,
    pub cancel: KeyBinding,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct KeybindingsConfig {
    pub global: GlobalKeybindings,
    pub navigation: NavigationKeybindings,
    pub search: SearchKeybindings,
    pub roster: RosterKeybindings,
    pub modal: ModalKeybindings,
    pub dialog: DialogKeybindings,
}

impl Default for GlobalKeybindings {
    fn default() -> Self {
        Self {
            quit: Key::char('q').into(),
            help: Key::char('?').into(),
            close_all: Key::ctrl('x').into(),
        }
    }
}

impl Default for NavigationKeybindings {
    fn default() -> Self {
        Self {
            up: vec![Key::char('k'), Key::new(KeyCode::Up)].into(),
            down: vec![Key::char('j'), Key::new(KeyCode::Down)].into(),
            page_up: Key::new(KeyCode::PageUp).into(),
            page_down: Key::new(KeyCode::PageDown).into(),
            home: vec![Key::char('g'), Key::new(KeyCode::Home)].into(),
            end: vec![Key::char('G'), Key::new(KeyCode::End)].into(),
            select: Key::new(KeyCode::Enter).into(),
        }
    }
}

impl Default for SearchKeybindings {
    fn default() -> Self {
        Self {
            toggle: Key::char('/').into(),
            exit: Key::new(KeyCode::Esc).into(),
        }
    }
}

impl Default for RosterKeybindings {
    fn default() -> Self {
        Self {
            add: Key::char('n').into(),
            edit: Key::char('e').into(),
            details: Key::char('o').into(),
            delete: vec![Key::char('d'), Key::new(KeyCode::Delete)].into(),
            toggle_active: Key::char('a').into(),
            info: Key::char('i').into(),
        }
    }
}

impl Default for ModalKeybindings {
    fn default() -> Self {
        Self {
            dismiss: Key::new(KeyCode::Esc).into(),
            scroll_up: vec![Key::char('k'), Key::new(KeyCode::Up)].into(),
            scroll_down: vec![Key::char('j'), Key::new(KeyCode::Down)].into(),
            page_up: Key::new(KeyCode::PageUp).into(),
            page_down: Key::new(KeyCode::PageDown).into(),
        }
    }
}

impl Default for DialogKeybindings {
    fn default() -> Self {
        Self {
            confirm: vec![Key::char('y'), Key::new(KeyCode::Enter)].into(),
            cancel: vec![Key::char('n'), Key::new(KeyCode::Esc)].into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config: KeybindingsConfig = toml::from_str("[roster]\ndelete = \"x\"\n").unwrap();
        assert_eq!(config.roster.delete, KeyBinding::Single(Key::char('x')));
        assert_eq!(config.roster.info, RosterKeybindings::default().info);
        assert_eq!(config.modal.dismiss, KeyBinding::Single(Key::new(KeyCode::Esc)));
    }
}
