//! Drawing and pointer hit-testing for the modal stack.

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Margin, Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, Widget};

use super::descriptor::{ModalDescriptor, ModalId, ModalSize};
use super::store::ModalStore;
use crate::Theme;
use crate::ui::EventResult;

/// Columns left free on each side of a full-size panel.
const FULL_MARGIN: u16 = 2;
const CLOSE_LABEL: &str = "[x]";
const CLOSE_LABEL_WIDTH: u16 = 3;
const WHEEL_STEP: i32 = 3;

/// Panel width in columns for a size hint, never wider than the viewport.
pub const fn panel_width(size: ModalSize, viewport_width: u16) -> u16 {
    let width = match size {
        ModalSize::Small => 40,
        ModalSize::Medium => 56,
        ModalSize::Large => 72,
        ModalSize::ExtraLarge => 96,
        ModalSize::Half => viewport_width / 2,
        ModalSize::Full => viewport_width.saturating_sub(FULL_MARGIN * 2),
    };
    if width < viewport_width { width } else { viewport_width }
}

/// Where one modal ended up on screen during the last frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PanelLayout {
    panel: Rect,
    body: Rect,
    close_button: Option<Rect>,
    max_scroll: u16,
}

impl PanelLayout {
    fn compute(descriptor: &ModalDescriptor, viewport: Rect) -> Self {
        let width = panel_width(descriptor.size(), viewport.width);
        let content_height = descriptor.content().height(width.saturating_sub(2));
        // At most 90% of the viewport height.
        let max_height = viewport.height - viewport.height / 10;
        let height = content_height.saturating_add(2).min(max_height.max(3));

        let panel = viewport
            .centered(Constraint::Length(width), Constraint::Length(height))
            .intersection(viewport);
        let body = panel.inner(Margin::new(1, 1));

        let close_button = (descriptor.show_close_button() && panel.width >= CLOSE_LABEL_WIDTH + 2)
            .then(|| {
                let x = panel.right() - 1 - CLOSE_LABEL_WIDTH;
                Rect::new(x, panel.y, CLOSE_LABEL_WIDTH, 1)
            });

        Self {
            panel,
            body,
            close_button,
            max_scroll: content_height.saturating_sub(body.height),
        }
    }
}

/// Draws every open modal as a stacked overlay and routes pointer input to
/// the topmost one.
///
/// Hit-testing uses the panel positions of the most recent [`render`] call.
///
/// [`render`]: ModalRenderer::render
#[derive(Debug, Default)]
pub struct ModalRenderer {
    layouts: Vec<(ModalId, PanelLayout)>,
}

impl ModalRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, area: Rect, buf: &mut Buffer, store: &mut ModalStore, theme: &Theme) {
        self.layouts.clear();
        for descriptor in store.descriptors_mut() {
            let layout = PanelLayout::compute(descriptor, area);
            descriptor.set_scroll(descriptor.scroll().min(layout.max_scroll));

            render_backdrop(area, buf, theme);
            render_panel(descriptor, &layout, buf, theme);
            self.layouts.push((descriptor.id().clone(), layout));
        }
    }

    /// Route a mouse event to the topmost modal.
    ///
    /// Returns `Ignored` only when no modal is open; the screen below never
    /// sees pointer input while the stack is non-empty.
    pub fn handle_mouse(&self, mouse: MouseEvent, store: &mut ModalStore) -> EventResult<()> {
        let Some(top) = store.topmost() else {
            return EventResult::Ignored;
        };
        let Some(layout) = self.layout_of(top.id()) else {
            // Opened since the last frame; nothing to hit-test against yet.
            return EventResult::Consumed;
        };

        let position = Position::new(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let id = top.id().clone();
                let on_close_button = layout.close_button.is_some_and(|r| r.contains(position));
                let outside = !layout.panel.contains(position);
                if on_close_button || (outside && top.close_on_overlay_click()) {
                    store.close(Some(&id));
                }
            }
            MouseEventKind::ScrollDown if layout.panel.contains(position) => {
                self.scroll(store, WHEEL_STEP);
            }
            MouseEventKind::ScrollUp if layout.panel.contains(position) => {
                self.scroll(store, -WHEEL_STEP);
            }
            _ => {}
        }
        EventResult::Consumed
    }

    /// Scroll the topmost body by `delta` rows.
    pub fn scroll(&self, store: &mut ModalStore, delta: i32) {
        let Some(top) = store.topmost_mut() else {
            return;
        };
        let max_scroll = self.layout_of(top.id()).map_or(0, |l| l.max_scroll);
        let next = (i32::from(top.scroll()) + delta).clamp(0, i32::from(max_scroll));
        top.set_scroll(u16::try_from(next).unwrap_or(max_scroll));
    }

    /// Rows of the topmost body visible at once, for page-wise scrolling.
    pub fn page_height(&self, store: &ModalStore) -> u16 {
        store
            .topmost()
            .and_then(|top| self.layout_of(top.id()))
            .map_or(1, |l| l.body.height.max(1))
    }

    fn layout_of(&self, id: &ModalId) -> Option<PanelLayout> {
        self.layouts
            .iter()
            .rev()
            .find(|(candidate, _)| candidate == id)
            .map(|(_, layout)| *layout)
    }
}

/// Dim everything drawn so far, including lower modals.
fn render_backdrop(area: Rect, buf: &mut Buffer, theme: &Theme) {
    buf.set_style(
        area,
        Style::default()
            .fg(theme.backdrop_fg())
            .bg(theme.backdrop_bg())
            .remove_modifier(Modifier::BOLD),
    );
}

fn render_panel(descriptor: &mut ModalDescriptor, layout: &PanelLayout, buf: &mut Buffer, theme: &Theme) {
    Clear.render(layout.panel, buf);

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_type(theme.border_type)
        .border_style(Style::default().fg(theme.panel_border()))
        .style(Style::default().bg(theme.base()).fg(theme.text()));

    if let Some(title) = descriptor.title() {
        block = block.title(Line::styled(
            format!(" {title} "),
            Style::default()
                .fg(theme.mauve())
                .add_modifier(Modifier::BOLD),
        ));
    }
    if layout.close_button.is_some() {
        block = block.title(
            Line::styled(CLOSE_LABEL, Style::default().fg(theme.overlay1())).right_aligned(),
        );
    }
    if layout.max_scroll > 0 {
        let shown = descriptor.scroll() + layout.body.height;
        let total = layout.max_scroll + layout.body.height;
        block = block.title_bottom(
            Line::styled(format!(" {shown}/{total} "), Style::default().fg(theme.overlay0()))
                .right_aligned(),
        );
    }
    block.render(layout.panel, buf);

    render_body(descriptor, layout.body, buf, theme);
}

/// Draw the content off-screen at full height and copy the visible rows.
fn render_body(descriptor: &mut ModalDescriptor, body: Rect, buf: &mut Buffer, theme: &Theme) {
    if body.is_empty() {
        return;
    }

    let content_height = descriptor.content().height(body.width).max(body.height);
    let mut scratch = Buffer::empty(Rect::new(0, 0, body.width, content_height));
    scratch.set_style(scratch.area, Style::default().bg(theme.base()).fg(theme.text()));
    descriptor.content_mut().render(scratch.area, &mut scratch, theme);

    let offset = descriptor.scroll();
    for y in 0..body.height {
        for x in 0..body.width {
            if let (Some(src), Some(dst)) = (
                scratch.cell(Position::new(x, y + offset)),
                buf.cell_mut(Position::new(body.x + x, body.y + y)),
            ) {
                *dst = src.clone();
            }
        }
    }
}
