use crate::tui::{Action, Component, Focusable, Theme};
use color_eyre::Result;
use ratatui::{
    layout::Rect,
    text::Line,
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

/// Sidebar listing every table in the store
#[derive(Debug, Default)]
pub struct TableList {
    names: Vec<String>,
    state: ListState,
    focused: bool,
}

impl TableList {
    pub fn new(names: Vec<String>) -> Self {
        let mut list = Self::default();
        list.set_tables(names);
        list
    }

    /// Replace the list, keeping the current selection when it still exists
    pub fn set_tables(&mut self, names: Vec<String>) {
        let previous = self.selected().map(str::to_string);
        self.names = names;
        let index = previous
            .and_then(|name| self.names.iter().position(|n| *n == name))
            .or(if self.names.is_empty() { None } else { Some(0) });
        self.state.select(index);
    }

    pub fn tables(&self) -> &[String] {
        &self.names
    }

    pub fn selected(&self) -> Option<&str> {
        self.state
            .selected()
            .and_then(|i| self.names.get(i))
            .map(String::as_str)
    }

    /// Select a table by name; returns false if it is not listed
    pub fn select(&mut self, name: &str) -> bool {
        match self.names.iter().position(|n| n == name) {
            Some(i) => {
                self.state.select(Some(i));
                true
            }
            None => false,
        }
    }

    fn select_index(&mut self, index: usize) {
        if !self.names.is_empty() {
            self.state.select(Some(index.min(self.names.len() - 1)));
        }
    }
}

impl Component for TableList {
    fn handle_action(&mut self, action: Action) -> Result<bool> {
        let current = self.state.selected().unwrap_or(0);
        match action {
            Action::MoveUp => self.select_index(current.saturating_sub(1)),
            Action::MoveDown => self.select_index(current + 1),
            Action::GoToTop => self.select_index(0),
            Action::GoToBottom => self.select_index(self.names.len().saturating_sub(1)),
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" Tables ({}) ", self.names.len()))
            .border_style(theme.border_style(self.focused));

        if self.names.is_empty() {
            let hint = List::new(vec![ListItem::new(Line::styled(
                "No tables yet, press u to upload",
                theme.muted_style(),
            ))])
            .block(block);
            frame.render_widget(hint, area);
            return;
        }

        let items: Vec<ListItem> = self
            .names
            .iter()
            .map(|name| ListItem::new(name.as_str()))
            .collect();
        let list = List::new(items)
            .block(block)
            .style(theme.normal_style())
            .highlight_style(theme.selected_style())
            .highlight_symbol("> ");

        frame.render_stateful_widget(list, area, &mut self.state);
    }

    fn key_hints(&self) -> &[Action] {
        &[Action::MoveDown, Action::Upload, Action::Refresh]
    }

    fn name(&self) -> &str {
        "TableList"
    }
}

impl Focusable for TableList {
    fn is_focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_first_table_selected() {
        let list = TableList::new(names(&["a_1", "b_2"]));
        assert_eq!(list.selected(), Some("a_1"));
        assert_eq!(TableList::new(Vec::new()).selected(), None);
    }

    #[test]
    fn test_navigation_clamps() {
        let mut list = TableList::new(names(&["a_1", "b_2", "c_3"]));

        list.handle_action(Action::MoveUp).unwrap();
        assert_eq!(list.selected(), Some("a_1"));

        list.handle_action(Action::GoToBottom).unwrap();
        list.handle_action(Action::MoveDown).unwrap();
        assert_eq!(list.selected(), Some("c_3"));
    }

    #[test]
    fn test_refresh_keeps_selection() {
        let mut list = TableList::new(names(&["a_1", "b_2"]));
        assert!(list.select("b_2"));

        list.set_tables(names(&["a_1", "b_2", "c_3"]));
        assert_eq!(list.selected(), Some("b_2"));

        list.set_tables(names(&["c_3"]));
        assert_eq!(list.selected(), Some("c_3"));
        assert!(!list.select("a_1"));
    }
}
