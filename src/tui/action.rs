use serde::{Deserialize, Serialize};
use std::fmt;

/// All possible actions in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum Action {
    // Navigation
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    PageUp,
    PageDown,
    GoToTop,
    GoToBottom,

    // Panels
    NextPanel,
    PrevPanel,

    // Data
    Upload,
    Refresh,

    // Chart
    IncreaseRows,
    DecreaseRows,
    IncreaseRowsPage,
    DecreaseRowsPage,
    NextXAxis,
    NextYAxis,
    NextChartType,
    PrevChartType,

    // View
    ToggleHelp,

    // Application
    Quit,
    Confirm,
    Cancel,
}

impl Action {
    /// Get human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Action::MoveUp => "Move cursor up",
            Action::MoveDown => "Move cursor down",
            Action::MoveLeft => "Move cursor left",
            Action::MoveRight => "Move cursor right",
            Action::PageUp => "Page up",
            Action::PageDown => "Page down",
            Action::GoToTop => "Go to first row",
            Action::GoToBottom => "Go to last row",
            Action::NextPanel => "Focus next panel",
            Action::PrevPanel => "Focus previous panel",
            Action::Upload => "Upload a CSV file",
            Action::Refresh => "Reload the table list",
            Action::IncreaseRows => "Chart one more row",
            Action::DecreaseRows => "Chart one fewer row",
            Action::IncreaseRowsPage => "Chart ten more rows",
            Action::DecreaseRowsPage => "Chart ten fewer rows",
            Action::NextXAxis => "Next X axis column",
            Action::NextYAxis => "Next Y axis column",
            Action::NextChartType => "Next chart type",
            Action::PrevChartType => "Previous chart type",
            Action::ToggleHelp => "Toggle help screen",
            Action::Quit => "Quit application",
            Action::Confirm => "Confirm action",
            Action::Cancel => "Cancel action",
        }
    }

    /// Get category for grouping in help screen
    pub fn category(&self) -> ActionCategory {
        match self {
            Action::MoveUp
            | Action::MoveDown
            | Action::MoveLeft
            | Action::MoveRight
            | Action::PageUp
            | Action::PageDown
            | Action::GoToTop
            | Action::GoToBottom => ActionCategory::Navigation,

            Action::NextPanel | Action::PrevPanel => ActionCategory::Panels,

            Action::Upload | Action::Refresh => ActionCategory::Data,

            Action::IncreaseRows
            | Action::DecreaseRows
            | Action::IncreaseRowsPage
            | Action::DecreaseRowsPage
            | Action::NextXAxis
            | Action::NextYAxis
            | Action::NextChartType
            | Action::PrevChartType => ActionCategory::Chart,

            Action::ToggleHelp => ActionCategory::View,

            Action::Quit | Action::Confirm | Action::Cancel => ActionCategory::Application,
        }
    }

    /// Get all possible actions (for validation and the help screen)
    pub fn all() -> Vec<Action> {
        vec![
            Action::MoveUp,
            Action::MoveDown,
            Action::MoveLeft,
            Action::MoveRight,
            Action::PageUp,
            Action::PageDown,
            Action::GoToTop,
            Action::GoToBottom,
            Action::NextPanel,
            Action::PrevPanel,
            Action::Upload,
            Action::Refresh,
            Action::IncreaseRows,
            Action::DecreaseRows,
            Action::IncreaseRowsPage,
            Action::DecreaseRowsPage,
            Action::NextXAxis,
            Action::NextYAxis,
            Action::NextChartType,
            Action::PrevChartType,
            Action::ToggleHelp,
            Action::Quit,
            Action::Confirm,
            Action::Cancel,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionCategory {
    Navigation,
    Panels,
    Data,
    Chart,
    View,
    Application,
}

impl ActionCategory {
    /// Order used by the help screen
    pub fn all() -> [ActionCategory; 6] {
        [
            ActionCategory::Data,
            ActionCategory::Chart,
            ActionCategory::Navigation,
            ActionCategory::Panels,
            ActionCategory::View,
            ActionCategory::Application,
        ]
    }
}

impl fmt::Display for ActionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionCategory::Navigation => write!(f, "Navigation"),
            ActionCategory::Panels => write!(f, "Panels"),
            ActionCategory::Data => write!(f, "Data"),
            ActionCategory::Chart => write!(f, "Chart"),
            ActionCategory::View => write!(f, "View"),
            ActionCategory::Application => write!(f, "Application"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_actions_have_descriptions() {
        for action in Action::all() {
            assert!(!action.description().is_empty());
        }
    }

    #[test]
    fn test_every_action_has_a_listed_category() {
        let categories = ActionCategory::all();
        for action in Action::all() {
            assert!(categories.contains(&action.category()));
        }
    }

    #[test]
    fn test_action_serialization() {
        let action = Action::NextChartType;
        let json = serde_json::to_string(&action).unwrap();
        assert_eq!(json, "\"NextChartType\"");

        let restored: Action = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, action);
    }
}
