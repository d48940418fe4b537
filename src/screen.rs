//! Full-page views that sit underneath the modal stack.

pub mod roster;

use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::Frame;
use ratatui::layout::Rect;

use crate::Theme;
use crate::command::Command;
use crate::modal::ModalAccessor;
use crate::ui::{EventResult, Result};

pub use roster::RosterScreen;

/// Full-page view that orchestrates components.
///
/// Screens translate component events into modals and commands. They only
/// reach the modal stack through the [`ModalAccessor`] handed to them, and
/// only while no modal is capturing input.
pub trait Screen {
    /// Handle a key event, opening modals through `modals` when needed.
    fn handle_key(
        &mut self,
        key: KeyEvent,
        modals: &mut ModalAccessor<'_>,
    ) -> Result<EventResult<()>>;

    /// Handle a pointer event that no modal claimed.
    fn handle_mouse(&mut self, mouse: MouseEvent) -> EventResult<()> {
        _ = mouse;
        EventResult::Ignored
    }

    /// Apply a command drained from the app channel.
    fn apply(&mut self, command: Command, modals: &mut ModalAccessor<'_>) -> Result<()>;

    /// Called on each tick for time-based updates.
    fn on_tick(&mut self) {}

    /// Render the screen to the frame.
    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme);
}
