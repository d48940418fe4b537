use std::fmt;

use crossterm::event::KeyEvent;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use uuid::Uuid;

use crate::Theme;
use crate::ui::{EventResult, Result};

/// Identifier of one open modal.
///
/// Generated by the store when the modal is opened and never reused for
/// another open modal while this one is active.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModalId(String);

impl ModalId {
    pub(super) fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }
}

impl fmt::Display for ModalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
impl From<&str> for ModalId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Rendering hint for the panel width.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ModalSize {
    Small,
    #[default]
    Medium,
    Large,
    ExtraLarge,
    /// Half of the viewport width.
    Half,
    /// Viewport width minus a small margin on each side.
    Full,
}

/// Request emitted by modal content after handling a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalAction {
    /// Close the modal that owns the content.
    Close,
    /// Close every open modal.
    CloseAll,
}

/// Opaque payload displayed in a modal body.
///
/// The store never looks inside the content. The renderer asks it for its
/// height, draws it into an off-screen buffer and shows the visible slice, so
/// content taller than the body scrolls without knowing about it.
pub trait ModalContent {
    /// Rows needed to show the whole content at the given width.
    fn height(&self, width: u16) -> u16;

    /// Draw the content. `area` always starts at the origin and is as tall as
    /// [`ModalContent::height`] requested (or the body, whichever is larger).
    fn render(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme);

    /// Handle a key while this content belongs to the topmost modal.
    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<ModalAction>> {
        _ = key;
        Ok(EventResult::Ignored)
    }
}

/// Callback fired once when a modal leaves the stack.
pub type OnClose = Box<dyn FnOnce()>;

/// A modal that has not been opened yet.
///
/// Every configuration field is optional. Missing fields are filled in by
/// [`ModalRequest::with_defaults`] before the modal becomes active.
pub struct ModalRequest {
    pub title: Option<String>,
    pub content: Box<dyn ModalContent>,
    pub size: Option<ModalSize>,
    pub on_close: Option<OnClose>,
    pub close_on_overlay_click: Option<bool>,
    pub close_on_escape: Option<bool>,
    pub show_close_button: Option<bool>,
}

impl ModalRequest {
    pub fn new(content: impl ModalContent + 'static) -> Self {
        Self {
            title: None,
            content: Box::new(content),
            size: None,
            on_close: None,
            close_on_overlay_click: None,
            close_on_escape: None,
            show_close_button: None,
        }
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub const fn size(mut self, size: ModalSize) -> Self {
        self.size = Some(size);
        self
    }

    #[must_use]
    pub fn on_close(mut self, callback: impl FnOnce() + 'static) -> Self {
        self.on_close = Some(Box::new(callback));
        self
    }

    #[must_use]
    pub const fn close_on_overlay_click(mut self, enabled: bool) -> Self {
        self.close_on_overlay_click = Some(enabled);
        self
    }

    #[must_use]
    pub const fn close_on_escape(mut self, enabled: bool) -> Self {
        self.close_on_escape = Some(enabled);
        self
    }

    #[must_use]
    pub const fn show_close_button(mut self, enabled: bool) -> Self {
        self.show_close_button = Some(enabled);
        self
    }

    /// Fill every unset field with its default. Fields already set win.
    #[must_use]
    pub fn with_defaults(mut self) -> Self {
        self.size.get_or_insert(ModalSize::Medium);
        self.close_on_overlay_click.get_or_insert(true);
        self.close_on_escape.get_or_insert(true);
        self.show_close_button.get_or_insert(true);
        self
    }

    pub(super) fn into_descriptor(self, id: ModalId) -> ModalDescriptor {
        let request = self.with_defaults();
        ModalDescriptor {
            id,
            title: request.title,
            content: request.content,
            size: request.size.unwrap_or_default(),
            on_close: request.on_close,
            close_on_overlay_click: request.close_on_overlay_click.unwrap_or(true),
            close_on_escape: request.close_on_escape.unwrap_or(true),
            show_close_button: request.show_close_button.unwrap_or(true),
            scroll: 0,
        }
    }
}

impl fmt::Debug for ModalRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModalRequest")
            .field("title", &self.title)
            .field("size", &self.size)
            .field("on_close", &self.on_close.is_some())
            .field("close_on_overlay_click", &self.close_on_overlay_click)
            .field("close_on_escape", &self.close_on_escape)
            .field("show_close_button", &self.show_close_button)
            .finish_non_exhaustive()
    }
}

/// One active modal.
pub struct ModalDescriptor {
    id: ModalId,
    title: Option<String>,
    content: Box<dyn ModalContent>,
    size: ModalSize,
    on_close: Option<OnClose>,
    close_on_overlay_click: bool,
    close_on_escape: bool,
    show_close_button: bool,
    scroll: u16,
}

impl ModalDescriptor {
    pub const fn id(&self) -> &ModalId {
        &self.id
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub const fn size(&self) -> ModalSize {
        self.size
    }

    pub const fn close_on_overlay_click(&self) -> bool {
        self.close_on_overlay_click
    }

    pub const fn close_on_escape(&self) -> bool {
        self.close_on_escape
    }

    pub const fn show_close_button(&self) -> bool {
        self.show_close_button
    }

    /// First visible row of the body.
    pub const fn scroll(&self) -> u16 {
        self.scroll
    }

    pub(super) const fn set_scroll(&mut self, scroll: u16) {
        self.scroll = scroll;
    }

    pub fn content(&self) -> &dyn ModalContent {
        self.content.as_ref()
    }

    pub fn content_mut(&mut self) -> &mut dyn ModalContent {
        self.content.as_mut()
    }

    pub(super) fn take_on_close(&mut self) -> Option<OnClose> {
        self.on_close.take()
    }
}

impl fmt::Debug for ModalDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModalDescriptor")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("size", &self.size)
            .field("on_close", &self.on_close.is_some())
            .field("close_on_overlay_click", &self.close_on_overlay_click)
            .field("close_on_escape", &self.close_on_escape)
            .field("show_close_button", &self.show_close_button)
            .field("scroll", &self.scroll)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modal::testing::Lines;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let descriptor = ModalRequest::new(Lines { rows: 1 }).into_descriptor(ModalId::from("a"));
        assert_eq!(descriptor.size(), ModalSize::Medium);
        assert!(descriptor.close_on_overlay_click());
        assert!(descriptor.close_on_escape());
        assert!(descriptor.show_close_button());
        assert_eq!(descriptor.title(), None);
    }

    #[test]
    fn test_caller_fields_take_precedence() {
        let request = ModalRequest::new(Lines { rows: 1 })
            .size(ModalSize::Half)
            .close_on_escape(false)
            .show_close_button(false)
            .with_defaults();
        assert_eq!(request.size, Some(ModalSize::Half));
        assert_eq!(request.close_on_escape, Some(false));
        assert_eq!(request.show_close_button, Some(false));
        assert_eq!(request.close_on_overlay_click, Some(true));
    }

    #[test]
    fn test_generated_ids_differ() {
        assert_ne!(ModalId::generate(), ModalId::generate());
    }
}
