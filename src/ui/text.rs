use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Text};
use ratatui::widgets::{Paragraph, Widget, Wrap};

use crate::Theme;
use crate::modal::ModalContent;

/// Read-only wrapped text shown in a modal body.
pub struct TextContent {
    text: Text<'static>,
}

impl TextContent {
    pub fn new(text: impl Into<Text<'static>>) -> Self {
        Self { text: text.into() }
    }

    pub fn from_lines(lines: Vec<Line<'static>>) -> Self {
        Self {
            text: Text::from(lines),
        }
    }

    fn paragraph(&self) -> Paragraph<'_> {
        Paragraph::new(self.text.clone()).wrap(Wrap { trim: false })
    }
}

impl ModalContent for TextContent {
    fn height(&self, width: u16) -> u16 {
        if width == 0 {
            return 0;
        }
        u16::try_from(self.paragraph().line_count(width)).unwrap_or(u16::MAX)
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        self.paragraph()
            .style(Style::default().fg(theme.text()))
            .render(area, buf);
    }
}
