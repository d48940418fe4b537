use std::sync::Arc;

use crossterm::event::KeyEvent;

use crate::config::actions::{
    DialogAction, GlobalAction, NavAction, OverlayAction, RosterAction, SearchAction,
};
use crate::config::key::KeyBinding;
use crate::config::keybindings::KeybindingsConfig;

/// Maps key events to actions using the configured keybindings.
pub struct KeyResolver {
    keybindings: Arc<KeybindingsConfig>,
}

impl KeyResolver {
    pub fn new(keybindings: Arc<KeybindingsConfig>) -> Self {
        Self { keybindings }
    }

    fn global(&self, action: GlobalAction) -> &KeyBinding {
        let kb = &self.keybindings.global;
        match action {
            GlobalAction::Quit => &kb.quit,
            GlobalAction::Help => &kb.help,
            GlobalAction::CloseAll => &kb.close_all,
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
        }
    }

    fn search(&self, action: SearchAction) -> &KeyBinding {
        let kb = &self.keybindings.search;
        match action {
            SearchAction::Toggle => &kb.toggle,
            SearchAction::Exit => &kb.exit,
        }
    }

    fn roster(&self, action: RosterAction) -> &KeyBinding {
        let kb = &self.keybindings.roster;
        match action {
            RosterAction::Add => &kb.add,
            RosterAction::Edit => &kb.edit,
            RosterAction::Details => &kb.details,
            RosterAction::Delete => &kb.delete,
            RosterAction::ToggleActive => &kb.toggle_active,
            RosterAction::Info => &kb.info,
        }
    }

    fn overlay(&self, action: OverlayAction) -> &KeyBinding {
        let kb = &self.keybindings.modal;
        match action {
            OverlayAction::Dismiss => &kb.dismiss,
            OverlayAction::ScrollUp => &kb.scroll_up,
            OverlayAction::ScrollDown => &kb.scroll_down,
            OverlayAction::PageUp => &kb.page_up,
            OverlayAction::PageDown => &kb.page_down,
        }
    }

    fn dialog(&self, action: DialogAction) -> &KeyBinding {
        let kb = &self.keybindings.dialog;
        match action {
            DialogAction::Confirm => &kb.confirm,
            DialogAction::Cancel => &kb.cancel,
        }
    }

    pub fn matches_global(&self, event: &KeyEvent, action: GlobalAction) -> bool {
        self.global(action).matches(event)
    }

    pub fn display_global(&self, action: GlobalAction) -> String {
        self.global(action).display()
    }

    pub fn matches_nav(&self, event: &KeyEvent, action: NavAction) -> bool {
        self.nav(action).matches(event)
    }

    pub fn display_nav(&self, action: NavAction) -> String {
        self.nav(action).display()
    }

    pub fn matches_search(&self, event: &KeyEvent, action: SearchAction) -> bool {
        self.search(action).matches(event)
    }

    pub fn display_search(&self, action: SearchAction) -> String {
        self.search(action).display()
    }

    pub fn matches_roster(&self, event: &KeyEvent, action: RosterAction) -> bool {
        self.roster(action).matches(event)
    }

    pub fn display_roster(&self, action: RosterAction) -> String {
        self.roster(action).display()
    }

    pub fn matches_overlay(&self, event: &KeyEvent, action: OverlayAction) -> bool {
        self.overlay(action).matches(event)
    }

    pub fn display_overlay(&self, action: OverlayAction) -> String {
        self.overlay(action).display()
    }

    pub fn matches_dialog(&self, event: &KeyEvent, action: DialogAction) -> bool {
        self.dialog(action).matches(event)
    }

    pub fn display_dialog(&self, action: DialogAction) -> String {
        self.dialog(action).display()
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers};

    use super::*;

    #[test]
    fn test_defaults_resolve() {
        let resolver = KeyResolver::new(Arc::new(KeybindingsConfig::default()));
        let esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        let close_all = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CONTROL);

        assert!(resolver.matches_overlay(&esc, OverlayAction::Dismiss));
        assert!(resolver.matches_dialog(&esc, DialogAction::Cancel));
        assert!(!resolver.matches_dialog(&esc, DialogAction::Confirm));
        assert!(resolver.matches_global(&close_all, GlobalAction::CloseAll));
        assert_eq!(resolver.display_dialog(DialogAction::Confirm), "y/Enter");
    }
}
