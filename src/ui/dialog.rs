use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget, Wrap};
use tokio::sync::mpsc::UnboundedSender;

use crate::Theme;
use crate::command::Command;
use crate::config::{DialogAction, KeyResolver};
use crate::modal::{ModalAction, ModalContent};
use crate::ui::{EventResult, Result};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    #[default]
    Info,
    Warning,
    Success,
    /// Destructive action, shown in red.
    Danger,
}

impl DialogKind {
    const fn default_labels(self) -> (&'static str, &'static str) {
        match self {
            Self::Danger => ("Delete", "Cancel"),
            Self::Success => ("Confirm", "Cancel"),
            Self::Warning => ("Proceed", "Cancel"),
            Self::Info => ("OK", "Cancel"),
        }
    }

    const fn icon(self) -> &'static str {
        match self {
            Self::Info => "ℹ",
            Self::Warning => "⚠",
            Self::Success => "✓",
            Self::Danger => "✗",
        }
    }

    const fn color(self, theme: &Theme) -> ratatui::style::Color {
        match self {
            Self::Info => theme.info(),
            Self::Warning => theme.warning(),
            Self::Success => theme.success(),
            Self::Danger => theme.danger(),
        }
    }
}

/// Confirmation dialog placed in a modal body.
///
/// Confirming or cancelling sends the matching command (if any) on the app
/// command channel and asks the stack to close the owning modal. The dialog
/// never touches the modal store itself.
pub struct ConfirmDialog {
    kind: DialogKind,
    heading: String,
    message: String,
    confirm_label: Option<String>,
    cancel_label: Option<String>,
    acknowledge_only: bool,
    on_confirm: Option<Command>,
    on_cancel: Option<Command>,
    commands: UnboundedSender<Command>,
    resolver: Arc<KeyResolver>,
}

impl ConfirmDialog {
    pub fn new(
        kind: DialogKind,
        heading: impl Into<String>,
        message: impl Into<String>,
        resolver: Arc<KeyResolver>,
        commands: UnboundedSender<Command>,
    ) -> Self {
        Self {
            kind,
            heading: heading.into(),
            message: message.into(),
            confirm_label: None,
            cancel_label: None,
            acknowledge_only: false,
            on_confirm: None,
            on_cancel: None,
            commands,
            resolver,
        }
    }

    /// Danger dialog asking to delete `item_name`.
    pub fn delete(
        item_name: &str,
        resolver: Arc<KeyResolver>,
        commands: UnboundedSender<Command>,
    ) -> Self {
        let message =
            format!("Are you sure you want to delete \"{item_name}\"? This action cannot be undone.");
        Self::new(DialogKind::Danger, "Confirm Deletion", message, resolver, commands)
            .with_confirm_label("Delete")
            .with_cancel_label("Cancel")
    }

    /// Single-button dialog reporting a success.
    pub fn success(
        message: impl Into<String>,
        resolver: Arc<KeyResolver>,
        commands: UnboundedSender<Command>,
    ) -> Self {
        Self::new(DialogKind::Success, "Success", message, resolver, commands)
            .with_confirm_label("OK")
            .acknowledge_only()
    }

    /// Single-button informational dialog.
    pub fn info(
        message: impl Into<String>,
        resolver: Arc<KeyResolver>,
        commands: UnboundedSender<Command>,
    ) -> Self {
        Self::new(DialogKind::Info, "Information", message, resolver, commands)
            .with_confirm_label("OK")
            .acknowledge_only()
    }

    #[must_use]
    pub fn with_confirm_label(mut self, label: impl Into<String>) -> Self {
        self.confirm_label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_cancel_label(mut self, label: impl Into<String>) -> Self {
        self.cancel_label = Some(label.into());
        self
    }

    /// Only offer the confirm action. Cancel keys are left to the modal stack.
    #[must_use]
    pub const fn acknowledge_only(mut self) -> Self {
        self.acknowledge_only = true;
        self
    }

    #[must_use]
    pub fn on_confirm(mut self, command: Command) -> Self {
        self.on_confirm = Some(command);
        self
    }

    #[must_use]
    pub fn on_cancel(mut self, command: Command) -> Self {
        self.on_cancel = Some(command);
        self
    }

    fn confirm_label(&self) -> &str {
        self.confirm_label
            .as_deref()
            .unwrap_or_else(|| self.kind.default_labels().0)
    }

    fn cancel_label(&self) -> &str {
        self.cancel_label
            .as_deref()
            .unwrap_or_else(|| self.kind.default_labels().1)
    }

    fn message_paragraph(&self) -> Paragraph<'_> {
        Paragraph::new(self.message.as_str()).wrap(Wrap { trim: true })
    }

    fn heading_line(&self, theme: &Theme) -> Line<'_> {
        let style = Style::default()
            .fg(self.kind.color(theme))
            .add_modifier(Modifier::BOLD);
        Line::from(vec![
            Span::styled(self.kind.icon(), style),
            Span::raw(" "),
            Span::styled(self.heading.as_str(), style),
        ])
    }

    fn buttons_line(&self, theme: &Theme) -> Line<'_> {
        let key_style = Style::default()
            .fg(theme.peach())
            .add_modifier(Modifier::BOLD);
        let confirm_style = Style::default()
            .fg(self.kind.color(theme))
            .add_modifier(Modifier::BOLD);
        let cancel_style = Style::default()
            .fg(theme.overlay1())
            .add_modifier(Modifier::BOLD);

        let mut spans = Vec::with_capacity(7);
        if !self.acknowledge_only {
            spans.extend([
                Span::styled(
                    format!("[{}]", self.resolver.display_dialog(DialogAction::Cancel)),
                    key_style,
                ),
                Span::raw(" "),
                Span::styled(self.cancel_label(), cancel_style),
                Span::raw("    "),
            ]);
        }
        spans.extend([
            Span::styled(
                format!("[{}]", self.resolver.display_dialog(DialogAction::Confirm)),
                key_style,
            ),
            Span::raw(" "),
            Span::styled(self.confirm_label(), confirm_style),
        ]);
        Line::from(spans)
    }

    fn send(&mut self, command: Option<Command>) -> Result<()> {
        if let Some(command) = command {
            self.commands.send(command)?;
        }
        Ok(())
    }
}

impl ModalContent for ConfirmDialog {
    fn height(&self, width: u16) -> u16 {
        let message = u16::try_from(self.message_paragraph().line_count(width)).unwrap_or(u16::MAX);
        // heading, gap, message, gap, buttons
        message.saturating_add(4)
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        let message_height = self.height(area.width).saturating_sub(4);
        let [heading, _, message, _, buttons] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(message_height),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);

        self.heading_line(theme).render(heading, buf);
        self.message_paragraph()
            .style(Style::default().fg(theme.text()))
            .render(message, buf);
        Paragraph::new(self.buttons_line(theme))
            .alignment(Alignment::Right)
            .render(buttons, buf);
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<ModalAction>> {
        if self.resolver.matches_dialog(&key, DialogAction::Confirm) {
            let command = self.on_confirm.take();
            self.send(command)?;
            return Ok(ModalAction::Close.into());
        }
        if !self.acknowledge_only && self.resolver.matches_dialog(&key, DialogAction::Cancel) {
            let command = self.on_cancel.take();
            self.send(command)?;
            return Ok(ModalAction::Close.into());
        }
        Ok(EventResult::Ignored)
    }
}
