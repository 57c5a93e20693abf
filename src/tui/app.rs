use crate::config::Config;
use crate::core::ImportSummary;
use crate::services::DataService;
use crate::tui::components::{
    help_dialog::render_help, ChartPanel, DataTable, StatusBar, TableList, UploadDialog,
    UploadInput,
};
use crate::tui::{Action, ActionCategory, Component, Focusable, KeyBindings, Theme};
use color_eyre::Result;
use crossterm::event::{KeyEvent, KeyEventKind};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::path::Path;
use tracing::{error, info, warn};

/// Panels that can hold keyboard focus, in Tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Tables,
    Data,
    Chart,
}

impl Panel {
    fn next(self) -> Self {
        match self {
            Panel::Tables => Panel::Data,
            Panel::Data => Panel::Chart,
            Panel::Chart => Panel::Tables,
        }
    }

    fn prev(self) -> Self {
        match self {
            Panel::Tables => Panel::Chart,
            Panel::Data => Panel::Tables,
            Panel::Chart => Panel::Data,
        }
    }
}

/// Application state
///
/// Owns the store and every panel, routes key events to actions and actions
/// to the focused panel.
pub struct App {
    /// Store used for uploads and table reads
    data_service: DataService,

    config: Config,

    table_list: TableList,

    /// Preview of the selected table
    data_table: Option<DataTable>,

    /// Chart controls for the selected table
    chart_panel: Option<ChartPanel>,

    /// Path prompt (when open)
    upload_dialog: Option<UploadDialog>,

    status: StatusBar,
    show_help: bool,
    focus: Panel,
    keybindings: KeyBindings,
    theme: Theme,
    should_quit: bool,
}

impl App {
    pub fn new(data_service: DataService, config: Config) -> Result<Self> {
        let keybindings = match &config.keybindings_file {
            Some(path) => match KeyBindings::load_from_file(path) {
                Ok(bindings) => {
                    for problem in bindings.validate() {
                        warn!("{}: {}", path.display(), problem);
                    }
                    bindings
                }
                Err(e) => {
                    warn!("Using default keys, could not load {}: {}", path.display(), e);
                    KeyBindings::default()
                }
            },
            None => KeyBindings::default(),
        };
        let theme = Theme::from(config.theme);

        let mut app = Self {
            data_service,
            config,
            table_list: TableList::default(),
            data_table: None,
            chart_panel: None,
            upload_dialog: None,
            status: StatusBar::new(),
            show_help: false,
            focus: Panel::Tables,
            keybindings,
            theme,
            should_quit: false,
        };
        app.reload_tables()?;
        if app.table_list.tables().is_empty() {
            app.status.info("Press u to upload a CSV file");
        }
        Ok(app)
    }

    /// Re-read the catalog and reopen the selection if it changed
    pub fn reload_tables(&mut self) -> Result<()> {
        let names = self.data_service.list_tables()?;
        self.table_list.set_tables(names);
        self.open_selected()
    }

    fn open_selected(&mut self) -> Result<()> {
        let selected = self.table_list.selected().map(str::to_string);
        let current = self.data_table.as_ref().map(|t| t.table().name().to_string());
        if selected == current {
            return Ok(());
        }
        match selected {
            Some(name) => self.open_table(&name),
            None => {
                self.data_table = None;
                self.chart_panel = None;
                Ok(())
            }
        }
    }

    /// Show a stored table in the preview and chart panels
    pub fn open_table(&mut self, name: &str) -> Result<()> {
        let table = self.data_service.get_table(name)?;
        let data_table = DataTable::new(table.clone(), self.config.page_size)?;
        let chart_panel = ChartPanel::new(
            table,
            self.config.default_row_limit,
            self.config.chart_options(),
        )?;
        self.data_table = Some(data_table);
        self.chart_panel = Some(chart_panel);
        self.table_list.select(name);
        self.apply_focus();
        info!("Opened table {}", name);
        Ok(())
    }

    /// Import a file and select the new table
    pub fn upload(&mut self, path: &Path) -> Result<ImportSummary> {
        let summary = self.data_service.import_csv(path)?;
        self.table_list.set_tables(self.data_service.list_tables()?);
        self.open_table(&summary.table_name)?;

        let saved = format!(
            "Data saved in table `{}` ({} rows, {} separated)",
            summary.table_name, summary.rows, summary.delimiter
        );
        if summary.skipped_rows > 0 {
            self.status.warning(format!(
                "{}; {} malformed rows skipped",
                saved, summary.skipped_rows
            ));
        } else {
            self.status.success(saved);
        }
        Ok(summary)
    }

    /// Handle a key event
    ///
    /// Errors from actions end up in the status bar; the app keeps running.
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        // The open dialog takes raw keys so any character can be typed
        if let Some(dialog) = &mut self.upload_dialog {
            match dialog.handle_key(key) {
                UploadInput::Editing => {}
                UploadInput::Cancel => self.upload_dialog = None,
                UploadInput::Submit(path) => match self.upload(&path) {
                    Ok(_) => self.upload_dialog = None,
                    Err(e) => {
                        error!("Upload of {} failed: {}", path.display(), e);
                        if let Some(dialog) = &mut self.upload_dialog {
                            dialog.set_error(e.to_string());
                        }
                    }
                },
            }
            return Ok(());
        }

        if let Some(action) = self.keybindings.get_action(&key) {
            if let Err(e) = self.handle_action(action) {
                error!("{:?} failed: {}", action, e);
                self.status.error(e.to_string());
            }
        }
        Ok(())
    }

    /// Handle an action
    pub fn handle_action(&mut self, action: Action) -> Result<()> {
        if self.show_help {
            match action {
                Action::ToggleHelp | Action::Cancel | Action::Confirm => self.show_help = false,
                Action::Quit => self.should_quit = true,
                _ => {}
            }
            return Ok(());
        }

        match action {
            Action::Quit => {
                self.should_quit = true;
                return Ok(());
            }
            Action::ToggleHelp => {
                self.show_help = true;
                return Ok(());
            }
            Action::Upload => {
                self.upload_dialog = Some(UploadDialog::new());
                return Ok(());
            }
            Action::Refresh => {
                self.reload_tables()?;
                self.status
                    .info(format!("{} tables in the store", self.table_list.tables().len()));
                return Ok(());
            }
            Action::NextPanel => {
                self.focus = self.focus.next();
                self.apply_focus();
                return Ok(());
            }
            Action::PrevPanel => {
                self.focus = self.focus.prev();
                self.apply_focus();
                return Ok(());
            }
            Action::Cancel => {
                self.status.clear();
                return Ok(());
            }
            _ => {}
        }

        let handled = match self.focus {
            Panel::Tables => {
                if self.table_list.handle_action(action)? {
                    self.open_selected()?;
                    true
                } else if action == Action::Confirm && self.data_table.is_some() {
                    self.focus = Panel::Data;
                    self.apply_focus();
                    true
                } else {
                    false
                }
            }
            Panel::Data => match &mut self.data_table {
                Some(table) => table.handle_action(action)?,
                None => false,
            },
            Panel::Chart => match &mut self.chart_panel {
                Some(chart) => chart.handle_action(action)?,
                None => false,
            },
        };

        // Chart keys work whichever panel has focus
        if !handled && action.category() == ActionCategory::Chart {
            if let Some(chart) = &mut self.chart_panel {
                chart.handle_action(action)?;
            }
        }
        Ok(())
    }

    fn apply_focus(&mut self) {
        self.table_list.set_focused(self.focus == Panel::Tables);
        if let Some(table) = &mut self.data_table {
            table.set_focused(self.focus == Panel::Data);
        }
        if let Some(chart) = &mut self.chart_panel {
            chart.set_focused(self.focus == Panel::Chart);
        }
    }

    fn focused_hints(&self) -> &[Action] {
        match self.focus {
            Panel::Tables => self.table_list.key_hints(),
            Panel::Data => self.data_table.as_ref().map(|t| t.key_hints()).unwrap_or(&[]),
            Panel::Chart => self.chart_panel.as_ref().map(|c| c.key_hints()).unwrap_or(&[]),
        }
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let [main_area, status_area] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);
        let [sidebar, content] =
            Layout::horizontal([Constraint::Length(32), Constraint::Min(20)]).areas(main_area);
        let [data_area, chart_area] =
            Layout::vertical([Constraint::Percentage(40), Constraint::Percentage(60)])
                .areas(content);

        self.table_list.render(frame, sidebar, &self.theme);

        match &mut self.data_table {
            Some(table) => table.render(frame, data_area, &self.theme),
            None => render_placeholder(frame, data_area, " Data ", self.focus == Panel::Data, &self.theme),
        }
        match &mut self.chart_panel {
            Some(chart) => chart.render(frame, chart_area, &self.theme),
            None => render_placeholder(frame, chart_area, " Chart ", self.focus == Panel::Chart, &self.theme),
        }

        let hints = StatusBar::hints(self.focused_hints(), &self.keybindings);
        self.status.render(frame, status_area, &self.theme, &hints);

        if let Some(dialog) = &mut self.upload_dialog {
            dialog.render(frame, main_area, &self.theme);
        }
        if self.show_help {
            render_help(frame, main_area, &self.keybindings, &self.theme);
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn focus(&self) -> Panel {
        self.focus
    }

    pub fn status(&self) -> &StatusBar {
        &self.status
    }

    pub fn table_list(&self) -> &TableList {
        &self.table_list
    }

    pub fn data_table(&self) -> Option<&DataTable> {
        self.data_table.as_ref()
    }

    pub fn chart_panel(&self) -> Option<&ChartPanel> {
        self.chart_panel.as_ref()
    }

    pub fn upload_dialog(&self) -> Option<&UploadDialog> {
        self.upload_dialog.as_ref()
    }

    pub fn help_visible(&self) -> bool {
        self.show_help
    }

    pub fn data_service(&self) -> &DataService {
        &self.data_service
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn keybindings(&self) -> &KeyBindings {
        &self.keybindings
    }
}

fn render_placeholder(frame: &mut Frame, area: Rect, title: &str, focused: bool, theme: &Theme) {
    frame.render_widget(
        Paragraph::new(Line::styled(
            "Select a table, or press u to upload one.",
            theme.muted_style(),
        ))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title.to_string())
                .border_style(theme.border_style(focused)),
        ),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{ChartKind, ChartOutcome};
    use crate::tui::components::StatusLevel;
    use crossterm::event::{KeyCode, KeyModifiers};
    use pretty_assertions::assert_eq;
    use ratatui::{backend::TestBackend, Terminal};
    use std::io::Write;
    use tempfile::TempDir;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key_event(key(KeyCode::Char(c))).unwrap();
        }
    }

    fn write_csv(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, "{}", body).unwrap();
        path
    }

    fn create_test_app() -> App {
        App::new(DataService::open_in_memory().unwrap(), Config::default()).unwrap()
    }

    #[test]
    fn test_empty_store() {
        let app = create_test_app();

        assert!(!app.should_quit());
        assert!(app.data_table().is_none());
        assert!(app.chart_panel().is_none());
        assert_eq!(app.focus(), Panel::Tables);
        assert_eq!(app.status().message().map(|m| m.level), Some(StatusLevel::Info));
    }

    #[test]
    fn test_upload_through_dialog() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(dir.path(), "ventas.csv", "region;units\nnorth;3\nsouth;5\n");
        let mut app = create_test_app();

        app.handle_key_event(key(KeyCode::Char('u'))).unwrap();
        assert!(app.upload_dialog().is_some());

        // 'q' is typed into the path, not treated as Quit
        type_str(&mut app, &path.display().to_string());
        app.handle_key_event(key(KeyCode::Enter)).unwrap();

        assert!(!app.should_quit());
        assert!(app.upload_dialog().is_none());
        let selected = app.table_list().selected().unwrap().to_string();
        assert!(selected.starts_with("ventas_"));
        assert_eq!(app.data_table().unwrap().row_count(), 2);

        let message = app.status().message().unwrap();
        assert_eq!(message.level, StatusLevel::Success);
        assert!(message.text.contains(&selected));
    }

    #[test]
    fn test_failed_upload_keeps_dialog_open() {
        let dir = TempDir::new().unwrap();
        let mut app = create_test_app();

        app.handle_action(Action::Upload).unwrap();
        type_str(&mut app, &dir.path().join("missing.csv").display().to_string());
        app.handle_key_event(key(KeyCode::Enter)).unwrap();

        let dialog = app.upload_dialog().unwrap();
        assert!(dialog.error().unwrap().contains("I/O error"));

        app.handle_key_event(key(KeyCode::Esc)).unwrap();
        assert!(app.upload_dialog().is_none());
    }

    #[test]
    fn test_skipped_rows_are_reported() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(dir.path(), "bad.csv", "a,b\n1,2\n3\n4,5\n");
        let mut app = create_test_app();

        let summary = app.upload(&path).unwrap();
        assert_eq!(summary.skipped_rows, 1);
        assert_eq!(app.status().message().unwrap().level, StatusLevel::Warning);
    }

    #[test]
    fn test_table_selection_follows_list() {
        let mut app = create_test_app();
        let first = app
            .data_service()
            .import_bytes("one.csv", b"x\n1\n")
            .unwrap()
            .table_name;
        let second = app
            .data_service()
            .import_bytes("two.csv", b"y\n1\n2\n")
            .unwrap()
            .table_name;

        app.handle_action(Action::Refresh).unwrap();
        assert_eq!(app.table_list().selected(), Some(first.as_str()));

        app.handle_key_event(key(KeyCode::Down)).unwrap();
        assert_eq!(app.data_table().unwrap().table().name(), second);
        assert_eq!(app.chart_panel().unwrap().window().total(), 2);
    }

    #[test]
    fn test_chart_keys_work_from_any_panel() {
        let mut app = create_test_app();
        app.data_service()
            .import_bytes("sales.csv", b"region,units\nnorth,3\nsouth,5\n")
            .unwrap();
        app.reload_tables().unwrap();

        app.handle_key_event(key(KeyCode::Char('c'))).unwrap();
        assert_eq!(app.chart_panel().unwrap().kind(), ChartKind::Scatter);
        assert!(matches!(
            app.chart_panel().unwrap().outcome(),
            Some(ChartOutcome::Warning(_))
        ));
    }

    #[test]
    fn test_focus_cycles() {
        let mut app = create_test_app();

        app.handle_key_event(key(KeyCode::Tab)).unwrap();
        assert_eq!(app.focus(), Panel::Data);
        app.handle_key_event(KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT))
            .unwrap();
        app.handle_key_event(KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT))
            .unwrap();
        assert_eq!(app.focus(), Panel::Chart);
    }

    #[test]
    fn test_help_swallows_actions() {
        let mut app = create_test_app();

        app.handle_key_event(KeyEvent::new(KeyCode::Char('?'), KeyModifiers::SHIFT))
            .unwrap();
        assert!(app.help_visible());

        app.handle_key_event(key(KeyCode::Tab)).unwrap();
        assert_eq!(app.focus(), Panel::Tables);

        app.handle_key_event(key(KeyCode::Esc)).unwrap();
        assert!(!app.help_visible());
    }

    #[test]
    fn test_quit_action() {
        let mut app = create_test_app();
        app.handle_key_event(key(KeyCode::Char('q'))).unwrap();
        assert!(app.should_quit());
    }

    #[test]
    fn test_render_smoke() {
        let mut app = create_test_app();
        app.data_service()
            .import_bytes("sales.csv", b"region,units\nnorth,3\nsouth,5\n")
            .unwrap();
        app.reload_tables().unwrap();
        app.handle_action(Action::ToggleHelp).unwrap();

        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(text.contains("Tables (1)"));
        assert!(text.contains("Keys (? to close)"));
    }
}
