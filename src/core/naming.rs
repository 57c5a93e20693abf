use std::path::Path;
use uuid::Uuid;

const CSV_EXTENSION: &str = ".csv";

/// Derive the table identifier from an upload's file name, before suffixing.
///
/// Only the final path component is used. A trailing `.csv` is stripped
/// (case-insensitively) and spaces and hyphens become underscores.
pub fn base_table_name(file_name: &str) -> String {
    let file_name = Path::new(file_name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(file_name);

    let stem = if file_name.len() >= CSV_EXTENSION.len()
        && file_name.is_char_boundary(file_name.len() - CSV_EXTENSION.len())
        && file_name[file_name.len() - CSV_EXTENSION.len()..].eq_ignore_ascii_case(CSV_EXTENSION)
    {
        &file_name[..file_name.len() - CSV_EXTENSION.len()]
    } else {
        file_name
    };

    stem.replace([' ', '-'], "_")
}

/// Short lowercase hexadecimal token appended to every table name
pub fn random_suffix() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

/// Final, practically unique table name for an upload
pub fn unique_table_name(file_name: &str) -> String {
    format!("{}_{}", base_table_name(file_name), random_suffix())
}

/// Column names only have spaces replaced; no other sanitization is done
pub fn normalize_column_name(name: &str) -> String {
    name.replace(' ', "_")
}

/// Whether the file name carries the `.csv` extension uploads are limited to
pub fn has_csv_extension(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
}

/// Quote an identifier for SQLite, doubling embedded quotes
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
