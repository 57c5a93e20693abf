use crate::tui::{action::Action, theme::Theme};
use color_eyre::Result;
use ratatui::{layout::Rect, Frame};

/// Base trait for the dashboard panels
pub trait Component {
    /// Handle an action
    ///
    /// Returns Ok(true) when the action was consumed, Ok(false) when it
    /// should fall through to the app.
    fn handle_action(&mut self, action: Action) -> Result<bool>;

    /// Draw the panel inside `area`
    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme);

    /// Actions worth advertising in the status bar while this panel has focus
    fn key_hints(&self) -> &[Action];

    fn name(&self) -> &str;
}

/// Panels that can receive keyboard focus
pub trait Focusable: Component {
    fn is_focused(&self) -> bool;

    fn set_focused(&mut self, focused: bool);
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter {
        focused: bool,
        value: i32,
    }

    impl Component for Counter {
        fn handle_action(&mut self, action: Action) -> Result<bool> {
            match action {
                Action::MoveUp => self.value += 1,
                Action::MoveDown => self.value -= 1,
                _ => return Ok(false),
            }
            Ok(true)
        }

        fn render(&mut self, _frame: &mut Frame, _area: Rect, _theme: &Theme) {}

        fn key_hints(&self) -> &[Action] {
            &[Action::MoveUp, Action::MoveDown]
        }

        fn name(&self) -> &str {
            "counter"
        }
    }

    impl Focusable for Counter {
        fn is_focused(&self) -> bool {
            self.focused
        }

        fn set_focused(&mut self, focused: bool) {
            self.focused = focused;
        }
    }

    #[test]
    fn test_unhandled_actions_fall_through() {
        let mut counter = Counter { focused: false, value: 0 };

        assert!(counter.handle_action(Action::MoveUp).unwrap());
        assert!(counter.handle_action(Action::MoveUp).unwrap());
        assert!(!counter.handle_action(Action::Quit).unwrap());
        assert_eq!(counter.value, 2);
    }

    #[test]
    fn test_focus_through_trait_object() {
        let mut panel: Box<dyn Focusable> = Box::new(Counter { focused: false, value: 0 });

        panel.set_focused(true);
        assert!(panel.is_focused());
        assert_eq!(panel.name(), "counter");
        assert_eq!(panel.key_hints().len(), 2);
    }
}
