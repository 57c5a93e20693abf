use crate::core::{RowWindow, StoredTable};
use crate::services::chart_service::{dispatch, ChartKind, ChartOptions, ChartOutcome, ChartRequest};
use crate::tui::components::chart_view::{render_chart, render_warning};
use crate::tui::{Action, Component, Focusable, Theme};
use color_eyre::Result;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tracing::debug;

/// Label of the empty Y axis choice
pub const NO_Y_AXIS: &str = "(none)";

const ROW_PAGE_STEP: usize = 10;

/// Chart controls plus the chart itself for one stored table
pub struct ChartPanel {
    table: StoredTable,
    window: RowWindow,
    kind: ChartKind,
    x_index: usize,
    /// Index into [`ChartPanel::y_options`]; 0 is "(none)"
    y_index: usize,
    options: ChartOptions,
    /// `None` while the table has no rows
    outcome: Option<ChartOutcome>,
    focused: bool,
}

impl ChartPanel {
    pub fn new(table: StoredTable, default_row_limit: usize, options: ChartOptions) -> Result<Self> {
        let window = RowWindow::new(table.row_count()?, default_row_limit);
        let mut panel = Self {
            table,
            window,
            kind: ChartKind::default(),
            x_index: 0,
            y_index: 0,
            options,
            outcome: None,
            focused: false,
        };
        panel.refresh()?;
        Ok(panel)
    }

    pub fn window(&self) -> &RowWindow {
        &self.window
    }

    pub fn kind(&self) -> ChartKind {
        self.kind
    }

    pub fn outcome(&self) -> Option<&ChartOutcome> {
        self.outcome.as_ref()
    }

    pub fn x_axis(&self) -> &str {
        &self.table.schema().columns[self.x_index].name
    }

    /// Y axis choices: "(none)" followed by the numeric columns
    pub fn y_options(&self) -> Vec<Option<String>> {
        std::iter::once(None)
            .chain(self.table.numeric_columns().into_iter().map(Some))
            .collect()
    }

    pub fn y_axis(&self) -> Option<String> {
        self.y_options().into_iter().nth(self.y_index).flatten()
    }

    pub fn request(&self) -> ChartRequest {
        ChartRequest::new(self.kind, self.x_axis(), self.y_axis())
    }

    pub fn set_kind(&mut self, kind: ChartKind) -> Result<()> {
        self.kind = kind;
        self.refresh()
    }

    pub fn set_rows(&mut self, rows: usize) -> Result<()> {
        self.window.set(rows);
        self.refresh()
    }

    /// Pick the X column by name; unknown names leave the panel unchanged
    pub fn set_x_axis(&mut self, name: &str) -> Result<bool> {
        match self.table.schema().columns.iter().position(|c| c.name == name) {
            Some(i) => {
                self.x_index = i;
                self.refresh()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Pick the Y column by name (`None` for "(none)"); only numeric columns qualify
    pub fn set_y_axis(&mut self, name: Option<&str>) -> Result<bool> {
        let wanted = name.map(str::to_string);
        match self.y_options().iter().position(|o| *o == wanted) {
            Some(i) => {
                self.y_index = i;
                self.refresh()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Rebuild the chart from the first `window.selected()` rows
    pub fn refresh(&mut self) -> Result<()> {
        if self.window.is_empty() {
            self.outcome = None;
            return Ok(());
        }
        let frame = self.table.head(self.window.selected())?;
        let request = self.request();
        debug!(
            table = self.table.name(),
            kind = %request.kind,
            rows = frame.row_count(),
            "refreshing chart"
        );
        self.outcome = Some(dispatch(&frame, &request, &self.options)?);
        Ok(())
    }

    fn cycle_x(&mut self) {
        let count = self.table.column_count().max(1);
        self.x_index = (self.x_index + 1) % count;
    }

    fn cycle_y(&mut self) {
        let count = self.y_options().len();
        self.y_index = (self.y_index + 1) % count;
    }

    fn controls_line(&self, theme: &Theme) -> Line<'static> {
        let label = theme.muted_style();
        let value = theme.header_style();
        let y = self.y_axis().unwrap_or_else(|| NO_Y_AXIS.to_string());
        Line::from(vec![
            Span::styled("Rows ", label),
            Span::styled(
                format!("{}/{}", self.window.selected(), self.window.total()),
                value,
            ),
            Span::styled("   X ", label),
            Span::styled(self.x_axis().to_string(), value),
            Span::styled("   Y ", label),
            Span::styled(y, value),
            Span::styled("   Type ", label),
            Span::styled(self.kind.to_string(), value),
        ])
    }
}

impl Component for ChartPanel {
    fn handle_action(&mut self, action: Action) -> Result<bool> {
        match action {
            Action::IncreaseRows | Action::MoveUp => self.window.increase(1),
            Action::DecreaseRows | Action::MoveDown => self.window.decrease(1),
            Action::IncreaseRowsPage | Action::PageUp => self.window.increase(ROW_PAGE_STEP),
            Action::DecreaseRowsPage | Action::PageDown => self.window.decrease(ROW_PAGE_STEP),
            Action::GoToTop => self.window.set(self.window.total()),
            Action::GoToBottom => self.window.set(1),
            Action::NextXAxis => self.cycle_x(),
            Action::NextYAxis => self.cycle_y(),
            Action::NextChartType | Action::MoveRight => self.kind = self.kind.next(),
            Action::PrevChartType | Action::MoveLeft => self.kind = self.kind.prev(),
            _ => return Ok(false),
        }
        self.refresh()?;
        Ok(true)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" Chart: {} ", self.table.name()))
            .border_style(theme.border_style(self.focused));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [controls_area, chart_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Min(1)]).areas(inner);
        frame.render_widget(Paragraph::new(self.controls_line(theme)), controls_area);

        match &self.outcome {
            Some(ChartOutcome::Chart(spec)) => render_chart(frame, chart_area, spec, theme),
            Some(ChartOutcome::Warning(message)) => render_warning(frame, chart_area, message, theme),
            None => frame.render_widget(
                Paragraph::new(Line::styled("This table has no rows to chart.", theme.muted_style())),
                chart_area,
            ),
        }
    }

    fn key_hints(&self) -> &[Action] {
        &[
            Action::NextChartType,
            Action::NextXAxis,
            Action::NextYAxis,
            Action::IncreaseRows,
            Action::DecreaseRows,
        ]
    }

    fn name(&self) -> &str {
        "ChartPanel"
    }
}

impl Focusable for ChartPanel {
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
    use crate::services::chart_service::{ChartSpec, MISSING_Y_WARNING};
    use crate::services::DataService;
    use pretty_assertions::assert_eq;

    const SALES: &[u8] = b"region,product,units\nnorth,a,3\nsouth,b,5\nnorth,c,2\n";

    fn panel(service: &DataService, bytes: &[u8], limit: usize) -> ChartPanel {
        let summary = service.import_bytes("sales.csv", bytes).unwrap();
        let table = service.get_table(&summary.table_name).unwrap();
        ChartPanel::new(table, limit, ChartOptions::default()).unwrap()
    }

    #[test]
    fn test_defaults() {
        let service = DataService::open_in_memory().unwrap();
        let panel = panel(&service, SALES, 100);

        assert_eq!(panel.window().selected(), 3);
        assert_eq!(panel.kind(), ChartKind::Bar);
        assert_eq!(panel.x_axis(), "region");
        assert_eq!(panel.y_axis(), None);
        assert_eq!(
            panel.outcome(),
            Some(&ChartOutcome::Chart(ChartSpec::Bars {
                x_label: "region".to_string(),
                y_label: "count".to_string(),
                bars: vec![("north".to_string(), 2.0), ("south".to_string(), 1.0)],
            }))
        );
    }

    #[test]
    fn test_y_options_are_numeric_only() {
        let service = DataService::open_in_memory().unwrap();
        let panel = panel(&service, SALES, 100);
        assert_eq!(panel.y_options(), vec![None, Some("units".to_string())]);
    }

    #[test]
    fn test_scatter_without_y_warns() {
        let service = DataService::open_in_memory().unwrap();
        let mut panel = panel(&service, SALES, 100);

        panel.set_kind(ChartKind::Scatter).unwrap();
        assert_eq!(
            panel.outcome(),
            Some(&ChartOutcome::Warning(MISSING_Y_WARNING.to_string()))
        );

        panel.handle_action(Action::NextYAxis).unwrap();
        assert_eq!(panel.y_axis(), Some("units".to_string()));
        assert!(matches!(
            panel.outcome(),
            Some(ChartOutcome::Chart(ChartSpec::Scatter { .. }))
        ));
    }

    #[test]
    fn test_row_window_limits_chart() {
        let service = DataService::open_in_memory().unwrap();
        let mut panel = panel(&service, SALES, 1);
        panel.set_kind(ChartKind::Pie).unwrap();

        assert_eq!(
            panel.outcome(),
            Some(&ChartOutcome::Chart(ChartSpec::Pie {
                label: "region".to_string(),
                slices: vec![("north".to_string(), 1)],
            }))
        );

        panel.handle_action(Action::IncreaseRowsPage).unwrap();
        assert_eq!(panel.window().selected(), 3);
        panel.handle_action(Action::DecreaseRowsPage).unwrap();
        assert_eq!(panel.window().selected(), 1);
    }

    #[test]
    fn test_cycling_wraps() {
        let service = DataService::open_in_memory().unwrap();
        let mut panel = panel(&service, SALES, 100);

        for _ in 0..3 {
            panel.handle_action(Action::NextXAxis).unwrap();
        }
        assert_eq!(panel.x_axis(), "region");

        panel.handle_action(Action::PrevChartType).unwrap();
        assert_eq!(panel.kind(), ChartKind::Boxplot);
    }

    #[test]
    fn test_set_axes_by_name() {
        let service = DataService::open_in_memory().unwrap();
        let mut panel = panel(&service, SALES, 100);

        assert!(panel.set_x_axis("product").unwrap());
        assert!(!panel.set_x_axis("missing").unwrap());
        assert!(!panel.set_y_axis(Some("region")).unwrap());
        assert!(panel.set_y_axis(Some("units")).unwrap());
        assert_eq!(
            panel.request(),
            ChartRequest::new(ChartKind::Bar, "product", Some("units".to_string()))
        );
    }

    #[test]
    fn test_empty_table_has_no_chart() {
        let service = DataService::open_in_memory().unwrap();
        let mut panel = panel(&service, b"a,b\n", 100);

        assert!(panel.window().is_empty());
        assert_eq!(panel.outcome(), None);
        panel.handle_action(Action::IncreaseRows).unwrap();
        assert_eq!(panel.window().selected(), 0);
    }
}
