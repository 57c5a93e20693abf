//! Upload dialog
//!
//! A one-line path prompt shown over the dashboard. Keys are fed in raw
//! because every printable character belongs to the path being typed.

use crate::tui::{Action, Component, Theme};
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use std::path::PathBuf;

/// What the app should do after a key reached the dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadInput {
    /// Keep the dialog open
    Editing,
    /// Import the file at this path
    Submit(PathBuf),
    /// Close without importing
    Cancel,
}

#[derive(Debug, Default)]
pub struct UploadDialog {
    input: String,
    /// Cursor position in chars, not bytes
    cursor: usize,
    error: Option<String>,
}

impl UploadDialog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input(input: &str) -> Self {
        Self {
            input: input.to_string(),
            cursor: input.chars().count(),
            error: None,
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Show a failed upload under the prompt; the typed path is kept
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> UploadInput {
        match key.code {
            KeyCode::Esc => return UploadInput::Cancel,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return UploadInput::Cancel;
            }
            KeyCode::Enter => return self.submit(),
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.input.clear();
                self.cursor = 0;
            }
            KeyCode::Char(c) => self.insert_char(c),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.char_len()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.char_len(),
            _ => {}
        }
        UploadInput::Editing
    }

    fn submit(&mut self) -> UploadInput {
        let trimmed = self.input.trim();
        if trimmed.is_empty() {
            self.set_error("Type the path of a .csv file");
            return UploadInput::Editing;
        }
        self.error = None;
        UploadInput::Submit(PathBuf::from(trimmed))
    }

    fn char_len(&self) -> usize {
        self.input.chars().count()
    }

    fn byte_index(&self, char_pos: usize) -> usize {
        self.input
            .char_indices()
            .nth(char_pos)
            .map(|(i, _)| i)
            .unwrap_or(self.input.len())
    }

    fn insert_char(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.input.insert(at, c);
        self.cursor += 1;
        self.error = None;
    }

    fn backspace(&mut self) {
        if self.cursor > 0 {
            let at = self.byte_index(self.cursor - 1);
            self.input.remove(at);
            self.cursor -= 1;
        }
    }

    fn delete(&mut self) {
        if self.cursor < self.char_len() {
            let at = self.byte_index(self.cursor);
            self.input.remove(at);
        }
    }

    /// Centered rectangle for the dialog
    pub fn area(outer: Rect) -> Rect {
        let width = outer.width.saturating_sub(4).min(72);
        let height = 7.min(outer.height);
        Rect {
            x: outer.x + (outer.width.saturating_sub(width)) / 2,
            y: outer.y + (outer.height.saturating_sub(height)) / 2,
            width,
            height,
        }
    }
}

impl Component for UploadDialog {
    fn handle_action(&mut self, action: Action) -> Result<bool> {
        match action {
            Action::MoveLeft => self.cursor = self.cursor.saturating_sub(1),
            Action::MoveRight => self.cursor = (self.cursor + 1).min(self.char_len()),
            Action::GoToTop => self.cursor = 0,
            Action::GoToBottom => self.cursor = self.char_len(),
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let area = Self::area(area);
        frame.render_widget(Clear, area);

        let block = Block::default()
            .title(" Upload CSV ")
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(theme.border_style(true));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [label_area, input_area, message_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .areas(inner);

        frame.render_widget(
            Paragraph::new("Path to a .csv file (comma, semicolon or tab separated):")
                .style(theme.muted_style()),
            label_area,
        );

        let cursor_style = theme.selected_style();
        let mut spans = vec![Span::styled("> ", theme.header_style())];
        let chars: Vec<char> = self.input.chars().collect();
        let before: String = chars[..self.cursor.min(chars.len())].iter().collect();
        spans.push(Span::raw(before));
        match chars.get(self.cursor) {
            Some(c) => {
                spans.push(Span::styled(c.to_string(), cursor_style));
                let after: String = chars[self.cursor + 1..].iter().collect();
                spans.push(Span::raw(after));
            }
            None => spans.push(Span::styled(" ", cursor_style)),
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), input_area);

        let message = match &self.error {
            Some(err) => Line::styled(err.clone(), theme.error_style()),
            None => Line::styled(
                "Enter to upload, Esc to cancel",
                Style::default().add_modifier(Modifier::ITALIC),
            ),
        };
        frame.render_widget(Paragraph::new(message).wrap(Wrap { trim: true }), message_area);
    }

    fn key_hints(&self) -> &[Action] {
        &[Action::Confirm, Action::Cancel]
    }

    fn name(&self) -> &str {
        "UploadDialog"
    }
}
