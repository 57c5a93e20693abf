use crate::tui::{Action, ActionCategory, KeyBindings, Theme};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

/// One help entry: keys joined with " / " and what they do
pub fn help_lines(keybindings: &KeyBindings) -> Vec<(ActionCategory, String, &'static str)> {
    let mut lines = Vec::new();
    for category in ActionCategory::all() {
        for action in Action::all().into_iter().filter(|a| a.category() == category) {
            let keys = keybindings.keys_for_action(action);
            if !keys.is_empty() {
                lines.push((category, keys.join(" / "), action.description()));
            }
        }
    }
    lines
}

/// Overlay listing every bound key, grouped by category
pub fn render_help(frame: &mut Frame, area: Rect, keybindings: &KeyBindings, theme: &Theme) {
    let width = area.width.saturating_sub(4).min(64);
    let height = area.height.saturating_sub(2);
    let popup = Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    };

    let mut text = Vec::new();
    let mut current: Option<ActionCategory> = None;
    for (category, keys, description) in help_lines(keybindings) {
        if current != Some(category) {
            if current.is_some() {
                text.push(Line::default());
            }
            text.push(Line::styled(category.to_string(), theme.header_style()));
            current = Some(category);
        }
        text.push(Line::from(vec![
            Span::styled(format!("  {:<22}", keys), theme.info_style()),
            Span::styled(description, theme.normal_style()),
        ]));
    }

    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(text).block(
            Block::default()
                .title(" Keys (? to close) ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(theme.border_style(true)),
        ),
        popup,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_lines_grouped_by_category() {
        let lines = help_lines(&KeyBindings::default());

        assert_eq!(lines[0].0, ActionCategory::Data);
        assert!(lines
            .iter()
            .any(|(_, keys, desc)| keys == "u / o" && *desc == "Upload a CSV file"));

        // Categories appear as contiguous blocks
        let mut seen = Vec::new();
        for (category, _, _) in &lines {
            if seen.last() != Some(category) {
                assert!(!seen.contains(category));
                seen.push(*category);
            }
        }
    }
}
