use crate::core::{CellValue, StoredTable};
use crate::tui::{Action, Component, Focusable, Theme};
use color_eyre::Result;
use ratatui::{
    layout::{Constraint, Rect},
    widgets::{Block, Borders, Cell, Row, Table},
    Frame,
};
use tracing::error;

const MIN_COLUMN_WIDTH: u16 = 12;

/// Position in the table (row, column)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

/// Visible window into the stored table
#[derive(Debug, Clone)]
pub struct Viewport {
    pub top: usize,
    pub left: usize,
    pub height: usize,
    pub width: usize,
}

/// Scrollable preview of a stored table
///
/// Rows are fetched a page at a time with `LIMIT/OFFSET`, so large tables
/// never have to fit in memory.
pub struct DataTable {
    table: StoredTable,
    row_count: usize,
    cursor: Position,
    viewport: Viewport,
    focused: bool,
}

impl DataTable {
    pub fn new(table: StoredTable, page_size: usize) -> Result<Self> {
        let row_count = table.row_count()?;
        Ok(Self {
            table,
            row_count,
            cursor: Position::default(),
            viewport: Viewport {
                top: 0,
                left: 0,
                // Replaced with the real height on first render
                height: page_size.max(1),
                width: 1,
            },
            focused: false,
        })
    }

    pub fn table(&self) -> &StoredTable {
        &self.table
    }

    pub fn cursor(&self) -> Position {
        self.cursor
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Value under the cursor, fetched on demand
    pub fn current_value(&self) -> Result<Option<CellValue>> {
        let page = self.table.get_page(self.cursor.row, 1)?;
        Ok(page
            .into_iter()
            .next()
            .and_then(|row| row.into_iter().nth(self.cursor.col)))
    }

    fn update_viewport(&mut self, area: Rect) {
        // Borders plus header row
        self.viewport.height = area.height.saturating_sub(3).max(1) as usize;
        self.viewport.width = (area.width.saturating_sub(2) / MIN_COLUMN_WIDTH).max(1) as usize;
        self.ensure_cursor_visible();
    }

    fn ensure_cursor_visible(&mut self) {
        if self.cursor.row < self.viewport.top {
            self.viewport.top = self.cursor.row;
        } else if self.cursor.row >= self.viewport.top + self.viewport.height {
            self.viewport.top = self.cursor.row + 1 - self.viewport.height;
        }

        if self.cursor.col < self.viewport.left {
            self.viewport.left = self.cursor.col;
        } else if self.cursor.col >= self.viewport.left + self.viewport.width {
            self.viewport.left = self.cursor.col + 1 - self.viewport.width;
        }
    }

    fn last_row(&self) -> usize {
        self.row_count.saturating_sub(1)
    }

    fn last_col(&self) -> usize {
        self.table.column_count().saturating_sub(1)
    }

    fn move_to(&mut self, row: usize, col: usize) {
        self.cursor.row = row.min(self.last_row());
        self.cursor.col = col.min(self.last_col());
        self.ensure_cursor_visible();
    }

    fn visible_rows(&self, theme: &Theme) -> Vec<Row<'static>> {
        let first_col = self.viewport.left;
        let last_col = (first_col + self.viewport.width).min(self.table.column_count());

        match self.table.get_page(self.viewport.top, self.viewport.height) {
            Ok(page) => page
                .into_iter()
                .enumerate()
                .map(|(i, values)| {
                    let row_idx = self.viewport.top + i;
                    let cells: Vec<Cell> = values
                        .get(first_col..last_col)
                        .unwrap_or(&[])
                        .iter()
                        .enumerate()
                        .map(|(j, value)| {
                            let cell = Cell::from(value.label());
                            if row_idx == self.cursor.row && first_col + j == self.cursor.col {
                                cell.style(theme.selected_style())
                            } else {
                                cell
                            }
                        })
                        .collect();
                    let style = if row_idx % 2 == 1 {
                        theme.alt_row_style()
                    } else {
                        theme.normal_style()
                    };
                    Row::new(cells).style(style)
                })
                .collect(),
            Err(e) => {
                error!("Failed to read page from {}: {}", self.table.name(), e);
                vec![Row::new(vec![Cell::from("Error loading data")]).style(theme.error_style())]
            }
        }
    }
}

impl Component for DataTable {
    fn handle_action(&mut self, action: Action) -> Result<bool> {
        let Position { row, col } = self.cursor;
        match action {
            Action::MoveUp => self.move_to(row.saturating_sub(1), col),
            Action::MoveDown => self.move_to(row + 1, col),
            Action::MoveLeft => self.move_to(row, col.saturating_sub(1)),
            Action::MoveRight => self.move_to(row, col + 1),
            Action::PageUp => self.move_to(row.saturating_sub(self.viewport.height), col),
            Action::PageDown => self.move_to(row + self.viewport.height, col),
            Action::GoToTop => self.move_to(0, col),
            Action::GoToBottom => self.move_to(self.last_row(), col),
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        self.update_viewport(area);

        let first_col = self.viewport.left;
        let last_col = (first_col + self.viewport.width).min(self.table.column_count());
        let schema = self.table.schema();
        let header = Row::new(
            schema.columns[first_col..last_col]
                .iter()
                .map(|c| Cell::from(format!("{} ({})", c.name, c.column_type))),
        )
        .style(theme.header_style());

        let shown = (last_col - first_col).max(1);
        let widths = vec![Constraint::Ratio(1, shown as u32); shown];

        let title = if self.row_count == 0 {
            format!(" {} [empty] ", self.table.name())
        } else {
            format!(
                " {} [{}/{}] ",
                self.table.name(),
                self.cursor.row + 1,
                self.row_count
            )
        };

        let table = Table::new(self.visible_rows(theme), widths).header(header).block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(theme.border_style(self.focused)),
        );

        frame.render_widget(table, area);
    }

    fn key_hints(&self) -> &[Action] {
        &[Action::MoveDown, Action::PageDown, Action::GoToBottom]
    }

    fn name(&self) -> &str {
        "DataTable"
    }
}

impl Focusable for DataTable {
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
    use crate::services::DataService;
    use pretty_assertions::assert_eq;

    fn create_test_table(service: &DataService) -> StoredTable {
        let summary = service
            .import_bytes("people.csv", b"id,name,value\n1,Alice,100\n2,Bob,200\n3,Charlie,300\n")
            .unwrap();
        service.get_table(&summary.table_name).unwrap()
    }

    #[test]
    fn test_cursor_movement() {
        let service = DataService::open_in_memory().unwrap();
        let mut table = DataTable::new(create_test_table(&service), 50).unwrap();

        assert_eq!(table.cursor(), Position { row: 0, col: 0 });

        table.handle_action(Action::MoveDown).unwrap();
        table.handle_action(Action::MoveRight).unwrap();
        assert_eq!(table.cursor(), Position { row: 1, col: 1 });

        table.handle_action(Action::MoveUp).unwrap();
        table.handle_action(Action::MoveLeft).unwrap();
        table.handle_action(Action::MoveLeft).unwrap();
        assert_eq!(table.cursor(), Position { row: 0, col: 0 });
    }

    #[test]
    fn test_cursor_stays_in_bounds() {
        let service = DataService::open_in_memory().unwrap();
        let mut table = DataTable::new(create_test_table(&service), 50).unwrap();

        table.handle_action(Action::PageDown).unwrap();
        assert_eq!(table.cursor().row, 2);

        for _ in 0..5 {
            table.handle_action(Action::MoveRight).unwrap();
        }
        assert_eq!(table.cursor().col, 2);

        table.handle_action(Action::GoToTop).unwrap();
        assert_eq!(table.cursor().row, 0);
        table.handle_action(Action::GoToBottom).unwrap();
        assert_eq!(table.cursor().row, 2);
    }

    #[test]
    fn test_current_value_follows_cursor() {
        let service = DataService::open_in_memory().unwrap();
        let mut table = DataTable::new(create_test_table(&service), 50).unwrap();

        table.handle_action(Action::MoveDown).unwrap();
        table.handle_action(Action::MoveRight).unwrap();
        assert_eq!(
            table.current_value().unwrap(),
            Some(CellValue::Text("Bob".to_string()))
        );
    }

    #[test]
    fn test_chart_actions_fall_through() {
        let service = DataService::open_in_memory().unwrap();
        let mut table = DataTable::new(create_test_table(&service), 50).unwrap();

        assert!(!table.handle_action(Action::NextChartType).unwrap());
        assert!(!table.handle_action(Action::Upload).unwrap());
    }
}
