use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Paragraph, Widget};
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::Theme;
use crate::command::Command;
use crate::modal::{ModalAction, ModalContent};
use crate::model::Student;
use crate::ui::{EventResult, Result};

const LABEL_WIDTH: usize = 13;

/// Single-line text field. The cursor counts characters, not bytes.
pub struct TextInput {
    label: &'static str,
    value: String,
    cursor: usize,
    placeholder: Option<&'static str>,
}

impl TextInput {
    pub const fn new(label: &'static str) -> Self {
        Self {
            label,
            value: String::new(),
            cursor: 0,
            placeholder: None,
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self.cursor = self.value.chars().count();
        self
    }

    #[must_use]
    pub const fn with_placeholder(mut self, placeholder: &'static str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    fn byte_index(&self, cursor: usize) -> usize {
        self.value
            .char_indices()
            .nth(cursor)
            .map_or(self.value.len(), |(index, _)| index)
    }

    fn len(&self) -> usize {
        self.value.chars().count()
    }

    fn insert_char(&mut self, c: char) {
        let index = self.byte_index(self.cursor);
        self.value.insert(index, c);
        self.cursor += 1;
    }

    fn delete_char_before_cursor(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let index = self.byte_index(self.cursor);
            self.value.remove(index);
        }
    }

    fn delete_char_at_cursor(&mut self) {
        if self.cursor < self.len() {
            let index = self.byte_index(self.cursor);
            self.value.remove(index);
        }
    }

    fn delete_word_before_cursor(&mut self) {
        let chars: Vec<char> = self.value.chars().collect();
        let mut pos = self.cursor;
        while pos > 0 && chars[pos - 1] == ' ' {
            pos -= 1;
        }
        while pos > 0 && chars[pos - 1] != ' ' {
            pos -= 1;
        }
        let (start, end) = (self.byte_index(pos), self.byte_index(self.cursor));
        self.value.drain(start..end);
        self.cursor = pos;
    }

    /// Apply an editing key. Returns false for keys that are not edits.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        match (key.code, key.modifiers) {
            (KeyCode::Backspace, KeyModifiers::ALT) => self.delete_word_before_cursor(),
            (KeyCode::Backspace, _) => self.delete_char_before_cursor(),
            (KeyCode::Delete, _) => self.delete_char_at_cursor(),
            (KeyCode::Left, _) => self.cursor = self.cursor.saturating_sub(1),
            (KeyCode::Right, _) => self.cursor = (self.cursor + 1).min(self.len()),
            (KeyCode::Home, _) | (KeyCode::Char('a'), KeyModifiers::CONTROL) => self.cursor = 0,
            (KeyCode::End, _) | (KeyCode::Char('e'), KeyModifiers::CONTROL) => {
                self.cursor = self.len();
            }
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => {
                self.value.clear();
                self.cursor = 0;
            }
            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => self.insert_char(c),
            _ => return false,
        }
        true
    }

    fn line(&self, focused: bool, theme: &Theme) -> Line<'_> {
        let label_style = if focused {
            Style::default()
                .fg(theme.mauve())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.subtext0())
        };
        let input_style = Style::default().fg(theme.text());
        let cursor_style = Style::default()
            .fg(theme.base())
            .bg(theme.text())
            .add_modifier(Modifier::BOLD);

        let mut spans = vec![Span::styled(
            format!("{:<LABEL_WIDTH$}", self.label),
            label_style,
        )];

        if !focused {
            match self.placeholder {
                Some(placeholder) if self.value.is_empty() => spans.push(Span::styled(
                    placeholder,
                    Style::default().fg(theme.overlay0()),
                )),
                _ => spans.push(Span::styled(self.value.as_str(), input_style)),
            }
            return Line::from(spans);
        }

        let split = self.byte_index(self.cursor);
        let (before, after) = self.value.split_at(split);
        let mut rest = after.chars();
        let under_cursor = rest.next().unwrap_or(' ');
        spans.extend([
            Span::styled(before, input_style),
            Span::styled(under_cursor.to_string(), cursor_style),
            Span::styled(rest.as_str(), input_style),
        ]);
        Line::from(spans)
    }
}

const NAME: usize = 0;
const EMAIL: usize = 1;
const INSTRUMENT: usize = 2;
const ROLL_NUMBER: usize = 3;

/// Create or edit form for one student.
///
/// Submitting a valid form sends [`Command::SaveStudent`] and closes every
/// open modal, including a details modal the form was opened from. Escape and
/// the close-all key are left to the modal stack.
pub struct StudentForm {
    original: Option<Student>,
    fields: [TextInput; 4],
    focus: usize,
    error: Option<String>,
    commands: UnboundedSender<Command>,
}

impl StudentForm {
    /// Empty form for a new student.
    pub fn create(commands: UnboundedSender<Command>) -> Self {
        Self {
            original: None,
            fields: [
                TextInput::new("Name"),
                TextInput::new("Email"),
                TextInput::new("Instrument"),
                TextInput::new("Roll number").with_placeholder("optional"),
            ],
            focus: NAME,
            error: None,
            commands,
        }
    }

    /// Form filled with `student`'s current values.
    pub fn edit(student: &Student, commands: UnboundedSender<Command>) -> Self {
        let mut form = Self::create(commands);
        form.fields[NAME] = TextInput::new("Name").with_value(student.name.as_str());
        form.fields[EMAIL] = TextInput::new("Email").with_value(student.email.as_str());
        form.fields[INSTRUMENT] =
            TextInput::new("Instrument").with_value(student.instrument.as_str());
        form.fields[ROLL_NUMBER] = TextInput::new("Roll number")
            .with_placeholder("optional")
            .with_value(student.roll_number.clone().unwrap_or_default());
        form.original = Some(student.clone());
        form
    }

    fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.fields.len();
    }

    fn focus_previous(&mut self) {
        self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
    }

    fn field(&self, index: usize) -> &str {
        self.fields[index].value().trim()
    }

    fn validate(&self) -> std::result::Result<Student, (usize, &'static str)> {
        if self.field(NAME).is_empty() {
            return Err((NAME, "Name is required"));
        }
        let email = self.field(EMAIL);
        if email.is_empty() {
            return Err((EMAIL, "Email is required"));
        }
        if !email.contains('@') {
            return Err((EMAIL, "Email must contain @"));
        }
        if self.field(INSTRUMENT).is_empty() {
            return Err((INSTRUMENT, "Instrument is required"));
        }

        let roll_number = Some(self.field(ROLL_NUMBER))
            .filter(|value| !value.is_empty())
            .map(str::to_string);
        let (active, classes) = self
            .original
            .as_ref()
            .map_or((true, Vec::new()), |s| (s.active, s.classes.clone()));
        Ok(Student {
            name: self.field(NAME).to_string(),
            email: email.to_string(),
            instrument: self.field(INSTRUMENT).to_string(),
            active,
            roll_number,
            classes,
        })
    }

    fn submit(&mut self) -> Result<EventResult<ModalAction>> {
        match self.validate() {
            Ok(student) => {
                let original = self.original.as_ref().map(|s| s.email.clone());
                debug!(email = %student.email, editing = original.is_some(), "Submitted student form");
                self.commands.send(Command::SaveStudent { original, student })?;
                Ok(ModalAction::CloseAll.into())
            }
            Err((field, message)) => {
                self.focus = field;
                self.error = Some(message.to_string());
                Ok(EventResult::Consumed)
            }
        }
    }

    fn hint_line(&self, theme: &Theme) -> Line<'_> {
        if let Some(error) = &self.error {
            return Line::styled(error.as_str(), Style::default().fg(theme.danger()));
        }
        let key_style = Style::default()
            .fg(theme.peach())
            .add_modifier(Modifier::BOLD);
        let desc_style = Style::default().fg(theme.subtext0());
        Line::from(vec![
            Span::styled("tab", key_style),
            Span::styled(" next field  ", desc_style),
            Span::styled("enter", key_style),
            Span::styled(" save  ", desc_style),
            Span::styled("esc", key_style),
            Span::styled(" cancel", desc_style),
        ])
    }
}

impl ModalContent for StudentForm {
    fn height(&self, _width: u16) -> u16 {
        // one row per field, gap, hint
        u16::try_from(self.fields.len() + 2).unwrap_or(u16::MAX)
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        let mut lines: Vec<Line<'_>> = self
            .fields
            .iter()
            .enumerate()
            .map(|(index, field)| field.line(index == self.focus, theme))
            .collect();
        lines.push(Line::default());
        lines.push(self.hint_line(theme));
        Paragraph::new(Text::from(lines)).render(area, buf);
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<ModalAction>> {
        match (key.code, key.modifiers) {
            (KeyCode::Enter, _) => return self.submit(),
            (KeyCode::Tab | KeyCode::Down, _) => self.focus_next(),
            (KeyCode::BackTab | KeyCode::Up, _) => self.focus_previous(),
            _ => {
                if !self.fields[self.focus].handle_key(key) {
                    return Ok(EventResult::Ignored);
                }
                self.error = None;
            }
        }
        Ok(EventResult::Consumed)
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;
    use crate::model::sample_roster;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(form: &mut StudentForm, text: &str) {
        for c in text.chars() {
            form.handle_key(key(KeyCode::Char(c))).unwrap();
        }
    }

    #[test]
    fn test_text_input_edits_at_cursor() {
        let mut input = TextInput::new("Name").with_value("Jón Bø");
        assert!(input.handle_key(key(KeyCode::Left)));
        assert!(input.handle_key(key(KeyCode::Backspace)));
        assert_eq!(input.value(), "Jón ø");

        input.handle_key(key(KeyCode::Home));
        input.handle_key(key(KeyCode::Delete));
        input.handle_key(key(KeyCode::Char('D')));
        assert_eq!(input.value(), "Dón ø");

        input.handle_key(key(KeyCode::End));
        input.handle_key(KeyEvent::new(KeyCode::Backspace, KeyModifiers::ALT));
        assert_eq!(input.value(), "Dón ");

        input.handle_key(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
        assert_eq!(input.value(), "");
        assert!(!input.handle_key(key(KeyCode::Esc)));
    }

    #[test]
    fn test_fields_are_filled_in_order() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut form = StudentForm::create(tx);

        type_text(&mut form, "Ada Byron");
        form.handle_key(key(KeyCode::Tab)).unwrap();
        type_text(&mut form, "ada@example.com");
        form.handle_key(key(KeyCode::Down)).unwrap();
        type_text(&mut form, "Cello");
        form.handle_key(key(KeyCode::BackTab)).unwrap();
        form.handle_key(key(KeyCode::End)).unwrap();
        type_text(&mut form, "x");

        assert_eq!(form.fields[NAME].value(), "Ada Byron");
        assert_eq!(form.fields[INSTRUMENT].value(), "Cello");
        assert_eq!(form.focus, EMAIL);
        assert_eq!(form.fields[EMAIL].value(), "ada@example.comx");
    }

    #[test]
    fn test_submit_sends_student_and_closes_all() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut form = StudentForm::create(tx);
        type_text(&mut form, "Ada Byron");
        form.handle_key(key(KeyCode::Tab)).unwrap();
        type_text(&mut form, " ada@example.com ");
        form.handle_key(key(KeyCode::Tab)).unwrap();
        type_text(&mut form, "Cello");

        let result = form.handle_key(key(KeyCode::Enter)).unwrap();

        assert_eq!(result, EventResult::Event(ModalAction::CloseAll));
        let Command::SaveStudent { original, student } = rx.try_recv().unwrap() else {
            panic!("expected a save command");
        };
        assert_eq!(original, None);
        assert_eq!(student.email, "ada@example.com");
        assert!(student.active);
        assert_eq!(student.roll_number, None);
    }

    #[test]
    fn test_invalid_submit_stays_open() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut form = StudentForm::create(tx);
        type_text(&mut form, "Ada");
        form.handle_key(key(KeyCode::Tab)).unwrap();
        type_text(&mut form, "not-an-email");

        assert_eq!(form.handle_key(key(KeyCode::Enter)).unwrap(), EventResult::Consumed);
        assert_eq!(form.error.as_deref(), Some("Email must contain @"));
        assert_eq!(form.focus, EMAIL);
        assert!(rx.try_recv().is_err());

        type_text(&mut form, "@");
        assert!(form.error.is_none());
    }

    #[test]
    fn test_edit_keeps_unlisted_fields() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut original = sample_roster()[0].clone();
        original.active = false;
        original.classes = vec!["Orchestra".to_string()];
        let mut form = StudentForm::edit(&original, tx);

        form.focus = INSTRUMENT;
        form.handle_key(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL))
            .unwrap();
        type_text(&mut form, "Harp");
        form.handle_key(key(KeyCode::Enter)).unwrap();

        let Command::SaveStudent { original: email, student } = rx.try_recv().unwrap() else {
            panic!("expected a save command");
        };
        assert_eq!(email.as_deref(), Some(original.email.as_str()));
        assert_eq!(student.instrument, "Harp");
        assert!(!student.active);
        assert_eq!(student.classes, original.classes);
    }

    #[test]
    fn test_cancel_keys_are_left_to_the_stack() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut form = StudentForm::create(tx);
        type_text(&mut form, "Ada");

        assert_eq!(form.handle_key(key(KeyCode::Esc)).unwrap(), EventResult::Ignored);
        assert_eq!(
            form.handle_key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CONTROL))
                .unwrap(),
            EventResult::Ignored
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_height_fits_fields_and_hint() {
        let (tx, _rx) = mpsc::unbounded_channel();
        assert_eq!(StudentForm::create(tx).height(40), 6);
    }
}
