use std::sync::Arc;

use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error};

use crate::Theme;
use crate::command::Command;
use crate::config::{
    DialogAction, GlobalAction, KeyResolver, NavAction, OverlayAction, RosterAction, SearchAction,
};
use crate::modal::{ModalAction, ModalRenderer, ModalRequest, ModalSize, ModalStore, ScrollLock};
use crate::model::Student;
use crate::screen::{RosterScreen, Screen};
use crate::tui::{Event, Tui};
use crate::ui::{EventResultExt, TextContent};

const DEFAULT_FRAME_RATE: f64 = 30.0;
const DEFAULT_TICK_RATE: f64 = 4.0;

/// Top-level application: routes terminal events to the modal stack or the
/// screen underneath it, and applies commands between events.
pub struct App {
    screen: RosterScreen,
    modals: ModalStore,
    renderer: ModalRenderer,
    resolver: Arc<KeyResolver>,
    theme: Theme,
    frame_rate: f64,
    tick_rate: f64,
    should_quit: bool,
    should_suspend: bool,
    command_tx: UnboundedSender<Command>,
    command_rx: UnboundedReceiver<Command>,
}

impl App {
    pub fn new(students: Vec<Student>, resolver: Arc<KeyResolver>, theme: Theme) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let scroll_lock = ScrollLock::new();
        let screen = RosterScreen::new(
            students,
            resolver.clone(),
            command_tx.clone(),
            scroll_lock.clone(),
        );
        Self {
            screen,
            modals: ModalStore::with_scroll_lock(scroll_lock),
            renderer: ModalRenderer::new(),
            resolver,
            theme,
            frame_rate: DEFAULT_FRAME_RATE,
            tick_rate: DEFAULT_TICK_RATE,
            should_quit: false,
            should_suspend: false,
            command_tx,
            command_rx,
        }
    }

    #[must_use]
    pub fn with_rates(mut self, frame_rate: f64, tick_rate: f64) -> Self {
        self.frame_rate = frame_rate;
        self.tick_rate = tick_rate;
        self
    }

    pub async fn run(&mut self) -> color_eyre::Result<()> {
        let mut tui = Tui::new(self.frame_rate, self.tick_rate)?;
        tui.enter()?;

        loop {
            let Some(event) = tui.next_event().await else {
                break;
            };
            match event {
                Event::Render => self.render(&mut tui)?,
                Event::Resize(width, height) => {
                    tui.resize(Rect::new(0, 0, width, height))?;
                    self.render(&mut tui)?;
                }
                event => self.handle_event(event)?,
            }

            self.handle_commands();
            if self.should_suspend {
                tui.suspend()?;
                self.should_suspend = false;
                tui.enter()?;
                tui.clear()?;
            } else if self.should_quit {
                break;
            }
        }

        tui.exit()?;
        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> color_eyre::Result<()> {
        match event {
            Event::Quit => self.command_tx.send(Command::Quit)?,
            Event::Suspend => self.command_tx.send(Command::Suspend)?,
            Event::Error(message) => error!(%message, "Terminal input error"),
            Event::Tick => self.screen.on_tick(),
            Event::Key(key) => self.handle_key(key)?,
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Render | Event::Resize(..) => {}
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) -> color_eyre::Result<()> {
        if !self.modals.is_empty() {
            self.handle_modal_key(key);
            return Ok(());
        }

        let (consumed, _) = self
            .screen
            .handle_key(key, &mut self.modals.modals())
            .process();
        if consumed {
            return Ok(());
        }

        if self.resolver.matches_global(&key, GlobalAction::Quit) {
            self.command_tx.send(Command::Quit)?;
        } else if self.resolver.matches_global(&key, GlobalAction::Help) {
            self.command_tx.send(Command::DisplayHelp)?;
        }
        Ok(())
    }

    /// Keys go to the topmost modal only: its content first, then the
    /// stack-wide bindings. Nothing leaks to the screen underneath.
    fn handle_modal_key(&mut self, key: KeyEvent) {
        let Some(top) = self.modals.topmost_mut() else {
            return;
        };
        let id = top.id().clone();
        let (consumed, action) = top.content_mut().handle_key(key).process();
        match action {
            Some(ModalAction::Close) => {
                self.modals.close(Some(&id));
                return;
            }
            Some(ModalAction::CloseAll) => {
                self.modals.close_all();
                return;
            }
            None if consumed => return,
            None => {}
        }

        let page = i32::from(self.renderer.page_height(&self.modals));
        if self.resolver.matches_global(&key, GlobalAction::CloseAll) {
            self.modals.close_all();
        } else if self.resolver.matches_overlay(&key, OverlayAction::Dismiss) {
            self.modals.handle_escape();
        } else if self.resolver.matches_overlay(&key, OverlayAction::ScrollDown) {
            self.renderer.scroll(&mut self.modals, 1);
        } else if self.resolver.matches_overlay(&key, OverlayAction::ScrollUp) {
            self.renderer.scroll(&mut self.modals, -1);
        } else if self.resolver.matches_overlay(&key, OverlayAction::PageDown) {
            self.renderer.scroll(&mut self.modals, page);
        } else if self.resolver.matches_overlay(&key, OverlayAction::PageUp) {
            self.renderer.scroll(&mut self.modals, -page);
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.renderer.handle_mouse(mouse, &mut self.modals).is_consumed() {
            return;
        }
        self.screen.handle_mouse(mouse);
    }

    fn handle_commands(&mut self) {
        while let Ok(command) = self.command_rx.try_recv() {
            debug!(?command, "Handling command");
            match command {
                Command::Quit => self.should_quit = true,
                Command::Suspend => self.should_suspend = true,
                Command::DisplayHelp => self.open_help(),
                command => {
                    if let Err(error) = self.screen.apply(command, &mut self.modals.modals()) {
                        error!(%error, "Screen failed to apply command");
                    }
                }
            }
        }
    }

    fn open_help(&mut self) {
        let content = help_content(&self.resolver);
        self.modals.modals().open(
            ModalRequest::new(content)
                .title("Keybindings")
                .size(ModalSize::Large),
        );
    }

    fn render(&mut self, tui: &mut Tui) -> color_eyre::Result<()> {
        tui.draw(|frame| self.draw(frame))?;
        Ok(())
    }

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        self.screen.render(frame, area, &self.theme);
        self.renderer
            .render(area, frame.buffer_mut(), &mut self.modals, &self.theme);
    }
}

fn help_content(resolver: &KeyResolver) -> TextContent {
    let heading = Style::default().add_modifier(Modifier::BOLD);
    let entry = |key: String, description: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {key:<16}"), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(description),
        ])
    };

    TextContent::from_lines(vec![
        Line::styled("Roster", heading),
        entry(resolver.display_nav(NavAction::Up), "Previous student"),
        entry(resolver.display_nav(NavAction::Down), "Next student"),
        entry(resolver.display_nav(NavAction::PageUp), "Page up"),
        entry(resolver.display_nav(NavAction::PageDown), "Page down"),
        entry(resolver.display_nav(NavAction::Home), "First student"),
        entry(resolver.display_nav(NavAction::End), "Last student"),
        entry(resolver.display_nav(NavAction::Select), "Open details"),
        entry(resolver.display_roster(RosterAction::Details), "Open details"),
        entry(resolver.display_roster(RosterAction::Add), "Add student"),
        entry(resolver.display_roster(RosterAction::Edit), "Edit student"),
        entry(resolver.display_roster(RosterAction::Delete), "Delete student"),
        entry(resolver.display_roster(RosterAction::ToggleActive), "Activate or deactivate"),
        entry(resolver.display_roster(RosterAction::Info), "Roster summary"),
        entry(resolver.display_search(SearchAction::Toggle), "Search"),
        entry(resolver.display_search(SearchAction::Exit), "Clear search"),
        Line::default(),
        Line::styled("Modals", heading),
        entry(resolver.display_overlay(OverlayAction::Dismiss), "Close topmost modal"),
        entry(resolver.display_overlay(OverlayAction::ScrollUp), "Scroll up"),
        entry(resolver.display_overlay(OverlayAction::ScrollDown), "Scroll down"),
        entry(resolver.display_overlay(OverlayAction::PageUp), "Page up"),
        entry(resolver.display_overlay(OverlayAction::PageDown), "Page down"),
        entry(resolver.display_global(GlobalAction::CloseAll), "Close every modal"),
        Line::default(),
        Line::styled("Dialogs", heading),
        entry(resolver.display_dialog(DialogAction::Confirm), "Confirm"),
        entry(resolver.display_dialog(DialogAction::Cancel), "Cancel"),
        Line::default(),
        Line::styled("General", heading),
        entry(resolver.display_global(GlobalAction::Help), "Show this help"),
        entry(resolver.display_global(GlobalAction::Quit), "Quit"),
        entry("ctrl+c".to_string(), "Quit from anywhere"),
        entry("ctrl+z".to_string(), "Suspend"),
    ])
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers, MouseButton, MouseEventKind};
    use ratatui::buffer::Buffer;

    use super::*;
    use crate::config::keybindings::KeybindingsConfig;
    use crate::model::sample_roster;

    fn app() -> App {
        let resolver = Arc::new(KeyResolver::new(Arc::new(KeybindingsConfig::default())));
        App::new(sample_roster(), resolver, Theme::default())
    }

    fn press(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
        app.handle_event(Event::Key(KeyEvent::new(code, modifiers)))
            .unwrap();
        app.handle_commands();
    }

    fn draw(app: &mut App, width: u16, height: u16) {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        app.renderer
            .render(area, &mut buf, &mut app.modals, &app.theme);
    }

    fn open_help(app: &mut App) {
        press(app, KeyCode::Char('?'), KeyModifiers::NONE);
        assert_eq!(app.modals.len(), 1);
        assert_eq!(app.modals.topmost().unwrap().size(), ModalSize::Large);
    }

    #[test]
    fn test_quit_key_quits() {
        let mut app = app();
        press(&mut app, KeyCode::Char('q'), KeyModifiers::NONE);
        assert!(app.should_quit);
    }

    #[test]
    fn test_keys_do_not_leak_below_open_modal() {
        let mut app = app();
        open_help(&mut app);

        press(&mut app, KeyCode::Char('q'), KeyModifiers::NONE);
        press(&mut app, KeyCode::Char('d'), KeyModifiers::NONE);
        assert!(!app.should_quit);
        assert_eq!(app.modals.len(), 1);
    }

    #[test]
    fn test_escape_closes_help() {
        let mut app = app();
        open_help(&mut app);
        press(&mut app, KeyCode::Esc, KeyModifiers::NONE);
        assert!(app.modals.is_empty());
        assert!(!app.modals.is_scroll_locked());
    }

    #[test]
    fn test_scroll_keys_scroll_help_body() {
        let mut app = app();
        open_help(&mut app);
        draw(&mut app, 100, 20);

        press(&mut app, KeyCode::Char('j'), KeyModifiers::NONE);
        assert_eq!(app.modals.topmost().unwrap().scroll(), 1);
        press(&mut app, KeyCode::PageDown, KeyModifiers::NONE);
        assert!(app.modals.topmost().unwrap().scroll() > 1);
        press(&mut app, KeyCode::Char('k'), KeyModifiers::NONE);
        press(&mut app, KeyCode::PageUp, KeyModifiers::NONE);
        assert_eq!(app.modals.topmost().unwrap().scroll(), 0);
    }

    #[test]
    fn test_close_all_key_clears_stack() {
        let mut app = app();
        press(&mut app, KeyCode::Char('o'), KeyModifiers::NONE);
        app.modals
            .modals()
            .open(ModalRequest::new(TextContent::new("nested")));
        assert_eq!(app.modals.len(), 2);

        press(&mut app, KeyCode::Char('x'), KeyModifiers::CONTROL);
        assert!(app.modals.is_empty());
    }

    #[test]
    fn test_dialog_keys_go_to_topmost_content() {
        let mut app = app();
        let count = app.screen.students().len();

        press(&mut app, KeyCode::Char('d'), KeyModifiers::NONE);
        press(&mut app, KeyCode::Char('y'), KeyModifiers::NONE);

        assert_eq!(app.screen.students().len(), count - 1);
        // The chained success dialog ignores escape.
        assert_eq!(app.modals.len(), 1);
        press(&mut app, KeyCode::Esc, KeyModifiers::NONE);
        assert_eq!(app.modals.len(), 1);
        press(&mut app, KeyCode::Enter, KeyModifiers::NONE);
        assert!(app.modals.is_empty());
    }

    #[test]
    fn test_form_takes_typed_keys_and_submits() {
        let mut app = app();
        let count = app.screen.students().len();

        press(&mut app, KeyCode::Char('n'), KeyModifiers::NONE);
        for c in "Quinn".chars() {
            press(&mut app, KeyCode::Char(c), KeyModifiers::NONE);
        }
        press(&mut app, KeyCode::Tab, KeyModifiers::NONE);
        for c in "quinn@academy.test".chars() {
            press(&mut app, KeyCode::Char(c), KeyModifiers::NONE);
        }
        press(&mut app, KeyCode::Tab, KeyModifiers::NONE);
        for c in "Oboe".chars() {
            press(&mut app, KeyCode::Char(c), KeyModifiers::NONE);
        }
        assert!(!app.should_quit);
        assert_eq!(app.modals.len(), 1);

        press(&mut app, KeyCode::Enter, KeyModifiers::NONE);
        assert!(app.modals.is_empty());
        assert_eq!(app.screen.students().len(), count + 1);
    }

    #[test]
    fn test_backdrop_click_closes_help() {
        let mut app = app();
        open_help(&mut app);
        draw(&mut app, 100, 40);

        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        };
        app.handle_event(Event::Mouse(click)).unwrap();
        assert!(app.modals.is_empty());
    }

    #[test]
    fn test_suspend_event_sets_flag() {
        let mut app = app();
        app.handle_event(Event::Suspend).unwrap();
        app.handle_commands();
        assert!(app.should_suspend);
    }
}
