use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};

use crate::Theme;
use crate::config::{KeyResolver, NavAction, SearchAction};
use crate::search::Matcher;
use crate::ui::{Component, EventResult, Result};

const PAGE_STEP: usize = 10;

pub enum TableEvent<T> {
    Activated(T),
    SearchChanged(String),
}

pub struct ColumnDef {
    pub header: &'static str,
    pub constraint: Constraint,
}

impl ColumnDef {
    pub const fn new(header: &'static str, constraint: Constraint) -> Self {
        Self { header, constraint }
    }
}

pub trait TableRow {
    fn columns() -> &'static [ColumnDef];
    fn render_cells(&self, theme: &Theme) -> Vec<Cell<'static>>;
    /// Texts the search query is matched against.
    fn search_texts(&self) -> Vec<&str>;
}

/// Selectable table with `/` search over its rows.
pub struct TableComponent<T: TableRow + Clone> {
    items: Vec<T>,
    filtered: Vec<usize>,
    state: TableState,
    title: Option<String>,
    searching: bool,
    query: String,
    matcher: Matcher,
    resolver: Arc<KeyResolver>,
}

impl<T: TableRow + Clone> TableComponent<T> {
    pub fn new(items: Vec<T>, resolver: Arc<KeyResolver>) -> Self {
        let mut table = Self {
            items,
            filtered: Vec::new(),
            state: TableState::default(),
            title: None,
            searching: false,
            query: String::new(),
            matcher: Matcher::new(),
            resolver,
        };
        table.update_filter();
        table
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Replace the rows, keeping the current query.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.update_filter();
    }

    pub fn selected_item(&self) -> Option<&T> {
        let selected = self.state.selected()?;
        let &index = self.filtered.get(selected)?;
        self.items.get(index)
    }

    /// Number of rows that pass the current query.
    pub const fn visible_len(&self) -> usize {
        self.filtered.len()
    }

    pub const fn is_searching(&self) -> bool {
        self.searching
    }

    /// Move the selection by `delta` rows, clamped to the visible rows.
    pub fn move_selection(&mut self, delta: isize) {
        if self.filtered.is_empty() {
            return;
        }
        let last = self.filtered.len() - 1;
        let current = self.state.selected().unwrap_or(0);
        let next = current.saturating_add_signed(delta).min(last);
        self.state.select(Some(next));
    }

    fn update_filter(&mut self) {
        let query = self.query.as_str();
        let matcher = &self.matcher;
        self.filtered = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| query.is_empty() || matcher.matches_any(item.search_texts(), query))
            .map(|(i, _)| i)
            .collect();

        if self.filtered.is_empty() {
            self.state.select(None);
        } else if self.state.selected().is_none_or(|i| i >= self.filtered.len()) {
            self.state.select(Some(0));
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> EventResult<TableEvent<T>> {
        if self.resolver.matches_search(&key, SearchAction::Exit) {
            self.searching = false;
            self.query.clear();
            self.update_filter();
            return TableEvent::SearchChanged(String::new()).into();
        }
        if self.resolver.matches_nav(&key, NavAction::Select) {
            self.searching = false;
            return EventResult::Consumed;
        }

        match key.code {
            KeyCode::Backspace => {
                self.query.pop();
            }
            KeyCode::Char(c) => self.query.push(c),
            _ => return EventResult::Consumed,
        }
        self.update_filter();
        TableEvent::SearchChanged(self.query.clone()).into()
    }

    fn handle_navigation_key(&mut self, key: KeyEvent) -> EventResult<TableEvent<T>> {
        let step = isize::try_from(PAGE_STEP).unwrap_or(isize::MAX);
        if self.resolver.matches_nav(&key, NavAction::Down) {
            self.move_selection(1);
        } else if self.resolver.matches_nav(&key, NavAction::Up) {
            self.move_selection(-1);
        } else if self.resolver.matches_nav(&key, NavAction::PageDown) {
            self.move_selection(step);
        } else if self.resolver.matches_nav(&key, NavAction::PageUp) {
            self.move_selection(-step);
        } else if self.resolver.matches_nav(&key, NavAction::Home) {
            self.move_selection(isize::MIN);
        } else if self.resolver.matches_nav(&key, NavAction::End) {
            self.move_selection(isize::MAX);
        } else if self.resolver.matches_nav(&key, NavAction::Select) {
            return self
                .selected_item()
                .map_or(EventResult::Ignored, |item| TableEvent::Activated(item.clone()).into());
        } else if self.resolver.matches_search(&key, SearchAction::Toggle) {
            self.searching = true;
        } else if self.resolver.matches_search(&key, SearchAction::Exit) && !self.query.is_empty() {
            self.query.clear();
            self.update_filter();
            return TableEvent::SearchChanged(String::new()).into();
        } else {
            return EventResult::Ignored;
        }
        EventResult::Consumed
    }
}

impl<T: TableRow + Clone> Component for TableComponent<T> {
    type Output = TableEvent<T>;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        Ok(if self.searching {
            self.handle_search_key(key)
        } else {
            self.handle_navigation_key(key)
        })
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let has_search_bar = self.searching || !self.query.is_empty();
        let [table_area, search_area] = if has_search_bar {
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area)
        } else {
            [area, Rect::default()]
        };

        let columns = T::columns();
        let header_style = Style::default()
            .fg(theme.header())
            .add_modifier(Modifier::BOLD);
        let header = Row::new(columns.iter().map(|c| Cell::from(c.header).style(header_style)))
            .style(Style::default().bg(theme.surface0()));

        let rows = self.filtered.iter().map(|&i| {
            Row::new(self.items[i].render_cells(theme)).style(Style::default().fg(theme.text()))
        });

        let mut table = Table::new(rows, columns.iter().map(|c| c.constraint))
            .header(header)
            .row_highlight_style(
                Style::default()
                    .bg(theme.selection_bg())
                    .fg(theme.lavender())
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");

        if let Some(title) = &self.title {
            table = table.block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(theme.border_type)
                    .border_style(Style::default().fg(theme.border()))
                    .title(format!(" {title} "))
                    .title_style(
                        Style::default()
                            .fg(theme.mauve())
                            .add_modifier(Modifier::BOLD),
                    ),
            );
        }

        frame.render_stateful_widget(table, table_area, &mut self.state);

        if has_search_bar {
            let (text, style) = if self.searching {
                (format!("/{}_", self.query), Style::default().fg(theme.yellow()))
            } else {
                (
                    format!("/{} ({} matches)", self.query, self.filtered.len()),
                    Style::default().fg(theme.subtext0()),
                )
            };
            frame.render_widget(Paragraph::new(text).style(style), search_area);
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;

    use super::*;
    use crate::config::keybindings::KeybindingsConfig;

    #[derive(Clone, Debug, PartialEq)]
    struct Name(&'static str);

    impl TableRow for Name {
        fn columns() -> &'static [ColumnDef] {
            const COLUMNS: &[ColumnDef] = &[ColumnDef::new("Name", Constraint::Fill(1))];
            COLUMNS
        }

        fn render_cells(&self, _theme: &Theme) -> Vec<Cell<'static>> {
            vec![Cell::from(self.0)]
        }

        fn search_texts(&self) -> Vec<&str> {
            vec![self.0]
        }
    }

    fn table() -> TableComponent<Name> {
        let resolver = Arc::new(KeyResolver::new(Arc::new(KeybindingsConfig::default())));
        TableComponent::new(vec![Name("alice"), Name("bob"), Name("carol")], resolver)
    }

    fn press(table: &mut TableComponent<Name>, code: KeyCode) {
        table.handle_key(KeyEvent::new(code, KeyModifiers::NONE)).unwrap();
    }

    #[test]
    fn test_navigation_clamps() {
        let mut table = table();
        press(&mut table, KeyCode::Up);
        assert_eq!(table.selected_item(), Some(&Name("alice")));
        press(&mut table, KeyCode::End);
        assert_eq!(table.selected_item(), Some(&Name("carol")));
        press(&mut table, KeyCode::Down);
        assert_eq!(table.selected_item(), Some(&Name("carol")));
        press(&mut table, KeyCode::Home);
        assert_eq!(table.selected_item(), Some(&Name("alice")));
    }

    #[test]
    fn test_search_filters_rows() {
        let mut table = table();
        press(&mut table, KeyCode::Char('/'));
        assert!(table.is_searching());
        press(&mut table, KeyCode::Char('c'));
        press(&mut table, KeyCode::Char('r'));
        assert_eq!(table.visible_len(), 1);
        assert_eq!(table.selected_item(), Some(&Name("carol")));

        press(&mut table, KeyCode::Esc);
        assert!(!table.is_searching());
        assert_eq!(table.visible_len(), 3);
    }

    #[test]
    fn test_set_items_keeps_selection_valid() {
        let mut table = table();
        press(&mut table, KeyCode::End);
        table.set_items(vec![Name("dave")]);
        assert_eq!(table.selected_item(), Some(&Name("dave")));
        table.set_items(Vec::new());
        assert_eq!(table.selected_item(), None);
    }
}
