use crate::core::{
    error::ImportError,
    naming::has_csv_extension,
    sniffer::detect_delimiter_bytes,
    ImportSummary, StoredTable,
};
use crate::services::csv_reader::CsvReader;
use crate::services::materializer::materialize;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::info;

/// DataService owns the store connection and runs uploads against it
///
/// This service is responsible for:
/// - Sniffing, parsing and materializing uploaded CSV files
/// - Listing the tables in the store catalog
/// - Handing out [`StoredTable`] handles that share the connection
pub struct DataService {
    /// The single SQLite connection used for every operation
    conn: Rc<Connection>,

    /// Path of the database file, `None` for in-memory stores
    db_path: Option<PathBuf>,
}

impl DataService {
    /// Open (or create) the store at the given path
    pub fn open(db_path: &Path) -> Result<Self, ImportError> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(db_path)?;
        info!("Opened store at {}", db_path.display());
        Ok(Self {
            conn: Rc::new(conn),
            db_path: Some(db_path.to_owned()),
        })
    }

    /// Open a throwaway in-memory store
    pub fn open_in_memory() -> Result<Self, ImportError> {
        Ok(Self {
            conn: Rc::new(Connection::open_in_memory()?),
            db_path: None,
        })
    }

    /// Import a CSV file from disk
    pub fn import_csv(&self, path: &Path) -> Result<ImportSummary, ImportError> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unnamed.csv")
            .to_string();
        if !has_csv_extension(&file_name) {
            return Err(ImportError::UnsupportedExtension(file_name));
        }
        let bytes = std::fs::read(path)?;
        self.import_bytes(&file_name, &bytes)
    }

    /// Import an upload given its file name and raw contents
    ///
    /// This method:
    /// 1. Sniffs the delimiter from the full text
    /// 2. Parses rows, skipping malformed ones
    /// 3. Creates a uniquely named, typed table and commits every row
    pub fn import_bytes(&self, file_name: &str, bytes: &[u8]) -> Result<ImportSummary, ImportError> {
        if !has_csv_extension(file_name) {
            return Err(ImportError::UnsupportedExtension(file_name.to_string()));
        }

        let delimiter = detect_delimiter_bytes(bytes);
        let dataset = CsvReader::new(delimiter).parse(bytes)?;
        let schema = materialize(&self.conn, &dataset, file_name)?;

        info!(
            "Imported {} as {} ({} rows, {} skipped, {} delimiter)",
            file_name,
            schema.name,
            dataset.row_count(),
            dataset.skipped_rows,
            delimiter
        );

        Ok(ImportSummary {
            table_name: schema.name.clone(),
            delimiter,
            rows: dataset.row_count(),
            skipped_rows: dataset.skipped_rows,
            schema,
        })
    }

    /// List all tables in the store, oldest first
    pub fn list_tables(&self) -> Result<Vec<String>, ImportError> {
        let mut stmt = self.conn.prepare(
            "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' ORDER BY rowid",
        )?;
        let names = stmt.query_map([], |row| row.get::<_, String>(0))?;
        names.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Get a handle to a stored table by name
    pub fn get_table(&self, name: &str) -> Result<StoredTable, ImportError> {
        StoredTable::open(self.conn.clone(), name)
    }

    /// Get the database path (None when in memory)
    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }
}
