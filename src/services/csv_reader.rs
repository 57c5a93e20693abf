use crate::core::error::ImportError;
use crate::core::models::UploadedDataset;
use crate::core::types::Delimiter;
use csv::{ByteRecord, ReaderBuilder, StringRecord, Trim};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Parses delimited text into an [`UploadedDataset`].
///
/// The first record is the header. Records with a different field count, or
/// that are not valid UTF-8, are skipped rather than failing the upload.
#[derive(Debug, Clone, Default)]
pub struct CsvReader {
    delimiter: Delimiter,
}

impl CsvReader {
    pub fn new(delimiter: Delimiter) -> Self {
        Self { delimiter }
    }

    /// Parse raw upload bytes
    pub fn parse(&self, bytes: &[u8]) -> Result<UploadedDataset, ImportError> {
        let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);

        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter.as_byte())
            .trim(Trim::All)
            .has_headers(false)
            .flexible(true)
            .from_reader(bytes);

        let mut records = reader.byte_records();

        let header = loop {
            match records.next() {
                None => return Err(ImportError::EmptyInput),
                Some(Ok(record)) if is_blank(&record) => continue,
                Some(Ok(record)) => break record,
                Some(Err(e)) => return Err(e.into()),
            }
        };
        let columns = header_names(&header);

        let mut rows = Vec::new();
        let mut skipped_rows = 0;

        for (index, result) in records.enumerate() {
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    warn!("Skipping unreadable record {}: {}", index + 1, e);
                    skipped_rows += 1;
                    continue;
                }
            };
            if is_blank(&record) {
                continue;
            }
            if record.len() != columns.len() {
                warn!(
                    "Skipping record {}: expected {} fields, found {}",
                    index + 1,
                    columns.len(),
                    record.len()
                );
                skipped_rows += 1;
                continue;
            }
            match StringRecord::from_byte_record(record) {
                Ok(record) => rows.push(record.iter().map(str::to_string).collect()),
                Err(e) => {
                    warn!("Skipping record {}: {}", index + 1, e);
                    skipped_rows += 1;
                }
            }
        }

        debug!(
            columns = columns.len(),
            rows = rows.len(),
            skipped_rows,
            "parsed upload"
        );

        Ok(UploadedDataset {
            columns,
            rows,
            skipped_rows,
        })
    }
}

/// A record holding a single empty field comes from a blank line
fn is_blank(record: &ByteRecord) -> bool {
    record.len() == 1 && record[0].is_empty()
}

/// Decode header names, filling empty names and disambiguating duplicates.
///
/// Empty names become `Unnamed: <index>`; a repeated name gets `.1`, `.2`, ...
fn header_names(header: &ByteRecord) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut names = Vec::with_capacity(header.len());

    for (index, raw) in header.iter().enumerate() {
        let name = String::from_utf8_lossy(raw).into_owned();
        let name = if name.is_empty() {
            format!("Unnamed: {}", index)
        } else {
            name
        };

        let mut candidate = name.clone();
        while let Some(count) = seen.get_mut(&candidate) {
            *count += 1;
            candidate = format!("{}.{}", name, count);
        }
        seen.insert(candidate.clone(), 0);
        names.push(candidate);
    }

    names
}
