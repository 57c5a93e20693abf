use crate::core::error::ImportError;
use crate::core::models::{ColumnSchema, TableFrame, TableSchema};
use crate::core::naming::quote_identifier;
use crate::core::types::{CellValue, ColumnType};
use rusqlite::Connection;
use std::rc::Rc;

/// Handle to a table in the store.
///
/// Shares the process-wide connection and reads rows lazily; nothing is
/// cached beyond the schema captured when the handle is opened.
#[derive(Clone)]
pub struct StoredTable {
    conn: Rc<Connection>,
    schema: TableSchema,
}

impl StoredTable {
    /// Open a handle to an existing table
    pub fn open(conn: Rc<Connection>, name: &str) -> Result<Self, ImportError> {
        let schema = read_schema(&conn, name)?;
        Ok(Self { conn, schema })
    }

    pub fn name(&self) -> &str {
        &self.schema.name
    }

    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    pub fn column_names(&self) -> Vec<String> {
        self.schema.column_names()
    }

    pub fn column_count(&self) -> usize {
        self.schema.columns.len()
    }

    /// Columns offered for a numeric chart axis
    pub fn numeric_columns(&self) -> Vec<String> {
        self.schema.numeric_columns()
    }

    /// Get total row count
    pub fn row_count(&self) -> Result<usize, ImportError> {
        let query = format!("SELECT COUNT(*) FROM {}", quote_identifier(self.name()));
        let count: i64 = self.conn.query_row(&query, [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Get a page of rows in insertion order
    pub fn get_page(&self, offset: usize, limit: usize) -> Result<Vec<Vec<CellValue>>, ImportError> {
        let query = format!(
            "SELECT * FROM {} ORDER BY rowid LIMIT ? OFFSET ?",
            quote_identifier(self.name())
        );
        let width = self.column_count();
        let mut stmt = self.conn.prepare(&query)?;
        let rows = stmt.query_map([limit as i64, offset as i64], |row| {
            (0..width)
                .map(|i| row.get::<_, CellValue>(i))
                .collect::<rusqlite::Result<Vec<_>>>()
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// First `n` rows together with the column layout
    pub fn head(&self, n: usize) -> Result<TableFrame, ImportError> {
        Ok(TableFrame::new(self.schema.columns.clone(), self.get_page(0, n)?))
    }

    /// Every row of the table
    pub fn read_all(&self) -> Result<TableFrame, ImportError> {
        let total = self.row_count()?;
        self.head(total)
    }
}

/// Read a table's columns and declared types from the catalog
pub fn read_schema(conn: &Connection, name: &str) -> Result<TableSchema, ImportError> {
    let query = format!("PRAGMA table_info({})", quote_identifier(name));
    let mut stmt = conn.prepare(&query)?;
    let columns = stmt
        .query_map([], |row| {
            let column_name: String = row.get(1)?;
            let declared: String = row.get(2)?;
            Ok(ColumnSchema::new(column_name, ColumnType::from_declared(&declared)))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    if columns.is_empty() {
        return Err(ImportError::TableNotFound(name.to_string()));
    }

    Ok(TableSchema {
        name: name.to_string(),
        columns,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_table() -> Rc<Connection> {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE "people" ("id" INTEGER, "name" TEXT, "score" REAL);
            INSERT INTO "people" VALUES (1, 'Alice', 9.5), (2, 'Bob', NULL), (3, 'Charlie', 7.0);
            "#,
        )
        .unwrap();
        Rc::new(conn)
    }

    #[test]
    fn test_stored_table_schema() {
        let table = StoredTable::open(create_test_table(), "people").unwrap();

        assert_eq!(table.column_names(), vec!["id", "name", "score"]);
        assert_eq!(table.numeric_columns(), vec!["id", "score"]);
        assert_eq!(table.schema().columns[1].column_type, ColumnType::Text);
    }

    #[test]
    fn test_stored_table_row_count() {
        let table = StoredTable::open(create_test_table(), "people").unwrap();
        assert_eq!(table.row_count().unwrap(), 3);
    }

    #[test]
    fn test_stored_table_pagination() {
        let table = StoredTable::open(create_test_table(), "people").unwrap();

        let page1 = table.get_page(0, 2).unwrap();
        assert_eq!(page1.len(), 2);
        assert_eq!(page1[0][1], CellValue::Text("Alice".to_string()));

        let page2 = table.get_page(2, 2).unwrap();
        assert_eq!(page2.len(), 1);
        assert_eq!(page2[0][0], CellValue::Integer(3));
    }

    #[test]
    fn test_stored_table_nulls() {
        let table = StoredTable::open(create_test_table(), "people").unwrap();
        let frame = table.read_all().unwrap();
        assert_eq!(frame.rows[1][2], CellValue::Null);
    }

    #[test]
    fn test_missing_table() {
        let result = StoredTable::open(create_test_table(), "nope");
        assert!(matches!(result, Err(ImportError::TableNotFound(_))));
    }
}
