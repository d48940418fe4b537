//! Student roster with detail, form, delete and status dialogs.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyEvent, MouseEvent, MouseEventKind};
use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Paragraph};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

use crate::Theme;
use crate::command::Command;
use crate::config::{GlobalAction, KeyResolver, RosterAction, SearchAction};
use crate::modal::{
    ModalAccessor, ModalAction, ModalContent, ModalRequest, ModalSize, ScrollLock,
};
use crate::model::Student;
use crate::screen::Screen;
use crate::ui::{
    ColumnDef, Component, ConfirmDialog, DialogKind, EventResult, EventResultExt, Result,
    StudentForm, TableComponent, TableEvent, TableRow, TextContent,
};

const STATUS_TTL: Duration = Duration::from_secs(3);

impl TableRow for Student {
    fn columns() -> &'static [ColumnDef] {
        const COLUMNS: &[ColumnDef] = &[
            ColumnDef::new("Name", Constraint::Fill(2)),
            ColumnDef::new("Email", Constraint::Fill(3)),
            ColumnDef::new("Instrument", Constraint::Fill(1)),
            ColumnDef::new("Status", Constraint::Length(10)),
        ];
        COLUMNS
    }

    fn render_cells(&self, theme: &Theme) -> Vec<Cell<'static>> {
        let status_color = if self.active {
            theme.success()
        } else {
            theme.overlay1()
        };
        vec![
            Cell::from(self.name.clone()),
            Cell::from(self.email.clone()),
            Cell::from(self.instrument.clone()),
            Cell::from(self.status_label()).style(Style::default().fg(status_color)),
        ]
    }

    fn search_texts(&self) -> Vec<&str> {
        vec![&self.name, &self.email, &self.instrument]
    }
}

/// Roster table. Every student action is confirmed or displayed in a modal.
pub struct RosterScreen {
    table: TableComponent<Student>,
    resolver: Arc<KeyResolver>,
    commands: UnboundedSender<Command>,
    scroll_lock: ScrollLock,
    /// Email of the student whose details modal is open.
    viewing: Option<String>,
    status: Option<(String, Instant)>,
}

impl RosterScreen {
    pub fn new(
        students: Vec<Student>,
        resolver: Arc<KeyResolver>,
        commands: UnboundedSender<Command>,
        scroll_lock: ScrollLock,
    ) -> Self {
        Self {
            table: TableComponent::new(students, resolver.clone()).with_title("Students"),
            resolver,
            commands,
            scroll_lock,
            viewing: None,
            status: None,
        }
    }

    pub fn students(&self) -> &[Student] {
        self.table.items()
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some((message.into(), Instant::now()));
    }

    fn open_details(&mut self, student: &Student, modals: &mut ModalAccessor<'_>) {
        let email = student.email.clone();
        let commands = self.commands.clone();
        let details = StudentDetails {
            email: email.clone(),
            text: details_content(student),
            resolver: self.resolver.clone(),
            commands: self.commands.clone(),
        };
        let id = modals.open(
            ModalRequest::new(details)
                .title(student.name.clone())
                .size(ModalSize::Half)
                .on_close(move || {
                    if let Err(error) = commands.send(Command::DetailsClosed(email)) {
                        warn!(%error, "Failed to report closed details");
                    }
                }),
        );
        debug!(modal = %id, email = %student.email, "Opened student details");
        self.viewing = Some(student.email.clone());
    }

    fn open_delete(&self, student: &Student, modals: &mut ModalAccessor<'_>) {
        let dialog = ConfirmDialog::delete(&student.name, self.resolver.clone(), self.commands.clone())
            .on_confirm(Command::DeleteStudent(student.email.clone()))
            .on_cancel(Command::Status(format!("{} was kept", student.name)));
        modals.open(
            ModalRequest::new(dialog)
                .title("Delete Student")
                .size(ModalSize::Small),
        );
    }

    /// Open the student form, empty or filled with `student`.
    fn open_form(&self, student: Option<&Student>, modals: &mut ModalAccessor<'_>) {
        let (form, title) = match student {
            Some(student) => (
                StudentForm::edit(student, self.commands.clone()),
                format!("Edit {}", student.name),
            ),
            None => (StudentForm::create(self.commands.clone()), "New Student".to_string()),
        };
        modals.open(ModalRequest::new(form).title(title).close_on_overlay_click(false));
    }

    fn save_student(&mut self, original: Option<&str>, student: Student) {
        let mut students = self.table.items().to_vec();
        if students
            .iter()
            .any(|s| s.email == student.email && Some(s.email.as_str()) != original)
        {
            warn!(email = %student.email, "Rejected duplicate student email");
            self.set_status(format!("{} is already on the roster", student.email));
            return;
        }

        let message = match original {
            Some(email) => {
                let Some(existing) = students.iter_mut().find(|s| s.email == email) else {
                    warn!(%email, "Edit submitted for unknown student");
                    return;
                };
                *existing = student.clone();
                format!("Saved {}", student.name)
            }
            None => {
                let message = format!("Added {}", student.name);
                students.push(student.clone());
                message
            }
        };
        info!(email = %student.email, edited = original.is_some(), "Saved student");
        self.table.set_items(students);
        self.set_status(message);
    }

    fn open_toggle_active(&self, student: &Student, modals: &mut ModalAccessor<'_>) {
        let (heading, message) = if student.active {
            (
                "Deactivate Student",
                format!("{} will be marked inactive and removed from class lists.", student.name),
            )
        } else {
            (
                "Reactivate Student",
                format!("{} will be marked active again.", student.name),
            )
        };
        let dialog = ConfirmDialog::new(
            DialogKind::Warning,
            heading,
            message,
            self.resolver.clone(),
            self.commands.clone(),
        )
        .on_confirm(Command::ToggleActive(student.email.clone()));
        modals.open(
            ModalRequest::new(dialog)
                .title("Change Status")
                .size(ModalSize::Small),
        );
    }

    fn open_info(&self, modals: &mut ModalAccessor<'_>) {
        let students = self.table.items();
        let active = students.iter().filter(|s| s.active).count();
        let message = format!(
            "{} students on the roster, {active} active. {} shown with the current filter.",
            students.len(),
            self.table.visible_len(),
        );
        let dialog = ConfirmDialog::info(message, self.resolver.clone(), self.commands.clone());
        modals.open(ModalRequest::new(dialog).title("Roster").size(ModalSize::Small));
    }

    fn delete_student(&mut self, email: &str, modals: &mut ModalAccessor<'_>) {
        let mut students = self.table.items().to_vec();
        let Some(index) = students.iter().position(|s| s.email == email) else {
            warn!(%email, "Delete requested for unknown student");
            return;
        };
        let removed = students.remove(index);
        self.table.set_items(students);
        info!(email = %removed.email, "Deleted student");

        let dialog = ConfirmDialog::success(
            format!("{} has been removed from the roster.", removed.name),
            self.resolver.clone(),
            self.commands.clone(),
        );
        modals.open(
            ModalRequest::new(dialog)
                .title("Student Deleted")
                .size(ModalSize::Small)
                .show_close_button(false)
                .close_on_overlay_click(false)
                .close_on_escape(false),
        );
    }

    fn toggle_active(&mut self, email: &str) {
        let mut students = self.table.items().to_vec();
        let Some(student) = students.iter_mut().find(|s| s.email == email) else {
            warn!(%email, "Status change requested for unknown student");
            return;
        };
        student.active = !student.active;
        let message = format!("{} is now {}", student.name, student.status_label().to_lowercase());
        info!(%email, active = student.active, "Changed student status");
        self.table.set_items(students);
        self.set_status(message);
    }

    fn footer(&self, theme: &Theme) -> Line<'_> {
        if let Some((message, _)) = &self.status {
            return Line::styled(message.as_str(), Style::default().fg(theme.success()));
        }

        let viewing = self.viewing.as_deref().map(|email| {
            Span::styled(format!("viewing {email}  "), Style::default().fg(theme.info()))
        });
        let key_style = Style::default()
            .fg(theme.peach())
            .add_modifier(Modifier::BOLD);
        let desc_style = Style::default().fg(theme.subtext0());
        let hints = [
            (self.resolver.display_roster(RosterAction::Add), "add"),
            (self.resolver.display_roster(RosterAction::Edit), "edit"),
            (self.resolver.display_roster(RosterAction::Details), "details"),
            (self.resolver.display_roster(RosterAction::Delete), "delete"),
            (self.resolver.display_roster(RosterAction::ToggleActive), "status"),
            (self.resolver.display_roster(RosterAction::Info), "info"),
            (self.resolver.display_search(SearchAction::Toggle), "search"),
            (self.resolver.display_global(GlobalAction::Help), "help"),
            (self.resolver.display_global(GlobalAction::Quit), "quit"),
        ];

        let spans = hints.into_iter().flat_map(|(key, desc)| {
            [
                Span::styled(key, key_style),
                Span::styled(format!(" {desc}  "), desc_style),
            ]
        });
        Line::from(viewing.into_iter().chain(spans).collect::<Vec<_>>())
    }
}

impl Screen for RosterScreen {
    fn handle_key(
        &mut self,
        key: KeyEvent,
        modals: &mut ModalAccessor<'_>,
    ) -> Result<EventResult<()>> {
        if self.scroll_lock.is_engaged() {
            return Ok(EventResult::Ignored);
        }

        let (consumed, event) = self.table.handle_key(key).process();
        match event {
            Some(TableEvent::Activated(student)) => {
                self.open_details(&student, modals);
                return Ok(EventResult::Consumed);
            }
            Some(TableEvent::SearchChanged(query)) => {
                debug!(%query, visible = self.table.visible_len(), "Roster filter changed");
                return Ok(EventResult::Consumed);
            }
            None if consumed => return Ok(EventResult::Consumed),
            None => {}
        }

        if self.resolver.matches_roster(&key, RosterAction::Add) {
            self.open_form(None, modals);
            return Ok(EventResult::Consumed);
        }

        let Some(student) = self.table.selected_item().cloned() else {
            if self.resolver.matches_roster(&key, RosterAction::Info) {
                self.open_info(modals);
                return Ok(EventResult::Consumed);
            }
            return Ok(EventResult::Ignored);
        };

        if self.resolver.matches_roster(&key, RosterAction::Details) {
            self.open_details(&student, modals);
        } else if self.resolver.matches_roster(&key, RosterAction::Edit) {
            self.open_form(Some(&student), modals);
        } else if self.resolver.matches_roster(&key, RosterAction::Delete) {
            self.open_delete(&student, modals);
        } else if self.resolver.matches_roster(&key, RosterAction::ToggleActive) {
            self.open_toggle_active(&student, modals);
        } else if self.resolver.matches_roster(&key, RosterAction::Info) {
            self.open_info(modals);
        } else {
            return Ok(EventResult::Ignored);
        }
        Ok(EventResult::Consumed)
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> EventResult<()> {
        if self.scroll_lock.is_engaged() {
            return EventResult::Ignored;
        }
        match mouse.kind {
            MouseEventKind::ScrollDown => self.table.move_selection(1),
            MouseEventKind::ScrollUp => self.table.move_selection(-1),
            _ => return EventResult::Ignored,
        }
        EventResult::Consumed
    }

    fn apply(&mut self, command: Command, modals: &mut ModalAccessor<'_>) -> Result<()> {
        match command {
            Command::DeleteStudent(email) => self.delete_student(&email, modals),
            Command::EditStudent(email) => {
                match self.table.items().iter().find(|s| s.email == email).cloned() {
                    Some(student) => self.open_form(Some(&student), modals),
                    None => warn!(%email, "Edit requested for unknown student"),
                }
            }
            Command::SaveStudent { original, student } => {
                self.save_student(original.as_deref(), student);
            }
            Command::ToggleActive(email) => self.toggle_active(&email),
            Command::DetailsClosed(email) => {
                if self.viewing.as_deref() == Some(email.as_str()) {
                    self.viewing = None;
                }
                debug!(%email, "Closed student details");
            }
            Command::Status(message) => self.set_status(message),
            Command::Quit | Command::Suspend | Command::DisplayHelp => {}
        }
        Ok(())
    }

    fn on_tick(&mut self) {
        if self
            .status
            .as_ref()
            .is_some_and(|(_, shown_at)| shown_at.elapsed() >= STATUS_TTL)
        {
            self.status = None;
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let [table_area, footer_area] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);
        self.table.render(frame, table_area, theme);
        frame.render_widget(Paragraph::new(self.footer(theme)), footer_area);
    }
}

/// Details body. The edit key opens the form on top of it.
struct StudentDetails {
    email: String,
    text: TextContent,
    resolver: Arc<KeyResolver>,
    commands: UnboundedSender<Command>,
}

impl ModalContent for StudentDetails {
    fn height(&self, width: u16) -> u16 {
        self.text.height(width)
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        self.text.render(area, buf, theme);
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<ModalAction>> {
        if self.resolver.matches_roster(&key, RosterAction::Edit) {
            self.commands.send(Command::EditStudent(self.email.clone()))?;
            return Ok(EventResult::Consumed);
        }
        Ok(EventResult::Ignored)
    }
}

fn details_content(student: &Student) -> TextContent {
    let label = Style::default().add_modifier(Modifier::BOLD);
    let field = |name: &'static str, value: String| {
        Line::from(vec![Span::styled(format!("{name:<12}"), label), Span::raw(value)])
    };

    let mut lines = vec![
        field("Email", student.email.clone()),
        field("Instrument", student.instrument.clone()),
        field("Status", student.status_label().to_string()),
        field(
            "Roll number",
            student.roll_number.clone().unwrap_or_else(|| "-".to_string()),
        ),
        Line::default(),
        Line::styled("Classes", label),
    ];
    if student.classes.is_empty() {
        lines.push(Line::raw("  Not enrolled in any class"));
    } else {
        lines.extend(student.classes.iter().map(|class| Line::raw(format!("  • {class}"))));
    }
    TextContent::from_lines(lines)
}
