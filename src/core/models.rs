use crate::core::types::{CellValue, ColumnType, Delimiter};
use serde::{Deserialize, Serialize};

/// Rows parsed from an upload, before anything is written to the store
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadedDataset {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Records dropped at parse time (wrong field count or invalid UTF-8)
    pub skipped_rows: usize,
}

impl UploadedDataset {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            columns,
            rows,
            skipped_rows: 0,
        }
    }

    /// Raw values of one column, in row order
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .map(move |row| row.get(index).map(String::as_str).unwrap_or(""))
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Name and inferred type of a stored column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub name: String,
    pub column_type: ColumnType,
}

impl ColumnSchema {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}

/// Column layout of a stored table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<ColumnSchema>,
}

impl TableSchema {
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn numeric_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.column_type.is_numeric())
            .map(|c| c.name.clone())
            .collect()
    }
}

/// Outcome of a successful upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub table_name: String,
    pub delimiter: Delimiter,
    pub rows: usize,
    pub skipped_rows: usize,
    pub schema: TableSchema,
}

/// Rows read back from a stored table, typed by the table's schema
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableFrame {
    pub columns: Vec<ColumnSchema>,
    pub rows: Vec<Vec<CellValue>>,
}

impl TableFrame {
    pub fn new(columns: Vec<ColumnSchema>, rows: Vec<Vec<CellValue>>) -> Self {
        Self { columns, rows }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Values of one column in row order
    pub fn values(&self, index: usize) -> impl Iterator<Item = &CellValue> {
        self.rows.iter().map(move |row| row.get(index).unwrap_or(&CellValue::Null))
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Leading rows only, as the chart row window does
    pub fn head(&self, n: usize) -> TableFrame {
        TableFrame {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }
}

/// Leading subset of rows a chart is drawn over.
///
/// Bounded to `1..=total` when the table has rows, zero otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowWindow {
    total: usize,
    selected: usize,
}

impl RowWindow {
    pub fn new(total: usize, default_limit: usize) -> Self {
        let selected = if total == 0 {
            0
        } else {
            default_limit.clamp(1, total)
        };
        Self { total, selected }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn set(&mut self, n: usize) {
        if self.total > 0 {
            self.selected = n.clamp(1, self.total);
        }
    }

    pub fn increase(&mut self, step: usize) {
        self.set(self.selected.saturating_add(step));
    }

    pub fn decrease(&mut self, step: usize) {
        self.set(self.selected.saturating_sub(step));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_window_defaults() {
        assert_eq!(RowWindow::new(500, 100).selected(), 100);
        assert_eq!(RowWindow::new(42, 100).selected(), 42);
        assert_eq!(RowWindow::new(0, 100).selected(), 0);
        assert!(RowWindow::new(0, 100).is_empty());
    }

    #[test]
    fn test_row_window_bounds() {
        let mut window = RowWindow::new(10, 100);
        window.increase(5);
        assert_eq!(window.selected(), 10);
        window.decrease(50);
        assert_eq!(window.selected(), 1);
        window.set(7);
        assert_eq!(window.selected(), 7);
    }

    #[test]
    fn test_frame_head() {
        let frame = TableFrame::new(
            vec![ColumnSchema::new("n", ColumnType::Integer)],
            (0..5).map(|i| vec![CellValue::Integer(i)]).collect(),
        );
        let head = frame.head(2);
        assert_eq!(head.row_count(), 2);
        assert_eq!(head.rows[1][0], CellValue::Integer(1));
        assert_eq!(frame.column_index("n"), Some(0));
        assert_eq!(frame.column_index("missing"), None);
    }

    #[test]
    fn test_schema_numeric_columns() {
        let schema = TableSchema {
            name: "t".to_string(),
            columns: vec![
                ColumnSchema::new("region", ColumnType::Text),
                ColumnSchema::new("units", ColumnType::Integer),
                ColumnSchema::new("price", ColumnType::Real),
            ],
        };
        assert_eq!(schema.numeric_columns(), vec!["units", "price"]);
        assert_eq!(schema.column_names().len(), 3);
    }
}
