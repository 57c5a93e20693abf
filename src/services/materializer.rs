use crate::core::error::ImportError;
use crate::core::inference::infer_column_type;
use crate::core::models::{ColumnSchema, TableSchema, UploadedDataset};
use crate::core::naming::{normalize_column_name, quote_identifier, unique_table_name};
use crate::core::types::CellValue;
use rusqlite::Connection;
use tracing::info;

/// Infer the schema an uploaded dataset will be stored with
pub fn infer_schema(table_name: &str, dataset: &UploadedDataset) -> TableSchema {
    let columns = dataset
        .columns
        .iter()
        .enumerate()
        .map(|(index, name)| {
            ColumnSchema::new(
                normalize_column_name(name),
                infer_column_type(dataset.column_values(index)),
            )
        })
        .collect();

    TableSchema {
        name: table_name.to_string(),
        columns,
    }
}

/// Build the CREATE TABLE statement for a schema
pub fn create_table_sql(schema: &TableSchema) -> String {
    let columns = schema
        .columns
        .iter()
        .map(|c| format!("{} {}", quote_identifier(&c.name), c.column_type.as_sql()))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "CREATE TABLE IF NOT EXISTS {} ({});",
        quote_identifier(&schema.name),
        columns
    )
}

/// Persist an uploaded dataset as a new, uniquely named table.
///
/// The table is created and filled inside one transaction: either every row
/// is committed or the store's error is returned and nothing is kept. The
/// connection is shared with open table handles, hence the unchecked
/// transaction.
pub fn materialize(
    conn: &Connection,
    dataset: &UploadedDataset,
    file_name: &str,
) -> Result<TableSchema, ImportError> {
    let table_name = unique_table_name(file_name);
    let schema = infer_schema(&table_name, dataset);

    let tx = conn.unchecked_transaction()?;
    tx.execute(&create_table_sql(&schema), [])?;

    {
        let placeholders = vec!["?"; schema.columns.len()].join(", ");
        let insert_sql = format!(
            "INSERT INTO {} VALUES ({});",
            quote_identifier(&schema.name),
            placeholders
        );
        let mut stmt = tx.prepare(&insert_sql)?;
        for row in &dataset.rows {
            let values: Vec<CellValue> = row
                .iter()
                .zip(&schema.columns)
                .map(|(raw, column)| CellValue::from_raw(raw, column.column_type))
                .collect();
            stmt.execute(rusqlite::params_from_iter(values.iter()))?;
        }
    }

    tx.commit()?;

    info!(
        table = %schema.name,
        rows = dataset.rows.len(),
        columns = schema.columns.len(),
        "materialized upload"
    );

    Ok(schema)
}
