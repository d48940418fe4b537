//! Reusable UI building blocks.
//!
//! - [`Component`] - interactive widgets owned by screens
//! - [`EventResult`] - outcome of handing an input event to a widget
//! - dialog, form and text contents that can be placed inside a modal

mod dialog;
mod form;
mod table;
mod text;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;

pub use color_eyre::Result;

use crate::Theme;

pub use dialog::{ConfirmDialog, DialogKind};
pub use form::StudentForm;
pub use table::{ColumnDef, TableComponent, TableEvent, TableRow};
pub use text::TextContent;

/// Result of handling an input event.
///
/// - `Ignored` - the handler didn't recognise the input, the parent should process it
/// - `Consumed` - the input was handled without producing anything
/// - `Event(E)` - the input was handled and produced an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventResult<E> {
    Ignored,
    Consumed,
    Event(E),
}

impl<E> EventResult<E> {
    /// Returns true if the input was consumed (either with or without an event).
    pub const fn is_consumed(&self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

impl<E> From<E> for EventResult<E> {
    fn from(event: E) -> Self {
        Self::Event(event)
    }
}

/// Extension trait for processing `Result<EventResult<T>>` from handlers.
pub trait EventResultExt<T> {
    /// Split into `(was_consumed, optional_event)`.
    ///
    /// Errors are logged and count as consumed so a failing handler never
    /// leaks its key to whatever sits underneath it.
    fn process(self) -> (bool, Option<T>);
}

impl<T> EventResultExt<T> for Result<EventResult<T>> {
    fn process(self) -> (bool, Option<T>) {
        match self {
            Ok(EventResult::Event(event)) => (true, Some(event)),
            Ok(EventResult::Consumed) => (true, None),
            Ok(EventResult::Ignored) => (false, None),
            Err(error) => {
                tracing::error!(%error, "Input handler failed");
                (true, None)
            }
        }
    }
}

/// Interactive UI building block owned by a screen.
pub trait Component {
    type Output;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        _ = key;
        Ok(EventResult::Ignored)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme);
}

#[cfg(test)]
mod tests {
    use color_eyre::eyre::eyre;

    use super::*;

    #[test]
    fn test_process_splits_results() {
        assert_eq!(Ok(EventResult::Event(3)).process(), (true, Some(3)));
        assert_eq!(Ok(EventResult::<u8>::Consumed).process(), (true, None));
        assert_eq!(Ok(EventResult::<u8>::Ignored).process(), (false, None));
    }

    #[test]
    fn test_errors_count_as_consumed() {
        let result: Result<EventResult<u8>> = Err(eyre!("boom"));
        assert_eq!(result.process(), (true, None));
    }
}
