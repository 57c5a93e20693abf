use crate::tui::{Action, KeyBindings, Theme};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Severity of the message in the status bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub level: StatusLevel,
    pub text: String,
}

/// Bottom line: the latest message on the left, key hints on the right
#[derive(Debug, Default)]
pub struct StatusBar {
    message: Option<StatusMessage>,
}

impl StatusBar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, level: StatusLevel, text: impl Into<String>) {
        self.message = Some(StatusMessage {
            level,
            text: text.into(),
        });
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.set(StatusLevel::Info, text);
    }

    pub fn success(&mut self, text: impl Into<String>) {
        self.set(StatusLevel::Success, text);
    }

    pub fn warning(&mut self, text: impl Into<String>) {
        self.set(StatusLevel::Warning, text);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.set(StatusLevel::Error, text);
    }

    pub fn clear(&mut self) {
        self.message = None;
    }

    pub fn message(&self) -> Option<&StatusMessage> {
        self.message.as_ref()
    }

    /// "c chart type · x X axis" style hints for the focused panel
    pub fn hints(actions: &[Action], keybindings: &KeyBindings) -> String {
        actions
            .iter()
            .chain([Action::ToggleHelp, Action::Quit].iter())
            .filter_map(|action| {
                keybindings
                    .keys_for_action(*action)
                    .into_iter()
                    .next()
                    .map(|key| format!("{} {}", key, action.description().to_lowercase()))
            })
            .collect::<Vec<_>>()
            .join(" · ")
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        area: Rect,
        theme: &Theme,
        hints: &str,
    ) {
        let mut spans = Vec::new();
        if let Some(message) = &self.message {
            let (icon, style) = match message.level {
                StatusLevel::Info => ("ℹ", theme.info_style()),
                StatusLevel::Success => ("✔", theme.success_style()),
                StatusLevel::Warning => ("⚠", theme.warning_style()),
                StatusLevel::Error => ("✖", theme.error_style()),
            };
            spans.push(Span::styled(format!("{} {}", icon, message.text), style));
        }

        let used: usize = spans.iter().map(|s| s.width()).sum();
        let room = (area.width as usize).saturating_sub(used + 2);
        if room > 0 && !hints.is_empty() {
            let hint: String = if hints.chars().count() > room {
                hints.chars().take(room).collect()
            } else {
                hints.to_string()
            };
            let pad = room - hint.chars().count();
            spans.push(Span::raw(" ".repeat(pad + 2)));
            spans.push(Span::styled(hint, Style::default().fg(theme.muted)));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}
