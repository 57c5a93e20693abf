use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// SQL storage class inferred for a column at table creation time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    Integer,
    Real,
    Text,
}

impl ColumnType {
    /// Type name used in the CREATE TABLE statement
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Integer => "INTEGER",
            Self::Real => "REAL",
            Self::Text => "TEXT",
        }
    }

    /// Whether values of this type can be plotted on a numeric axis
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer | Self::Real)
    }

    /// Map a declared SQLite column type back to a column type.
    ///
    /// Follows SQLite's affinity rules loosely: anything containing "INT" is
    /// an integer, REAL/FLOA/DOUB are reals, everything else is text.
    pub fn from_declared(declared: &str) -> Self {
        let upper = declared.to_ascii_uppercase();
        if upper.contains("INT") {
            Self::Integer
        } else if upper.contains("REAL") || upper.contains("FLOA") || upper.contains("DOUB") {
            Self::Real
        } else {
            Self::Text
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_sql())
    }
}

impl FromStr for ColumnType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "INTEGER" => Ok(Self::Integer),
            "REAL" => Ok(Self::Real),
            "TEXT" => Ok(Self::Text),
            _ => Err(format!("Unknown column type: {}", s)),
        }
    }
}

/// Field separator picked for an upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Delimiter {
    Comma,
    Semicolon,
    Tab,
}

impl Delimiter {
    pub fn as_char(&self) -> char {
        match self {
            Self::Comma => ',',
            Self::Semicolon => ';',
            Self::Tab => '\t',
        }
    }

    pub fn as_byte(&self) -> u8 {
        self.as_char() as u8
    }

    /// Human-readable name for status messages
    pub fn name(&self) -> &'static str {
        match self {
            Self::Comma => "comma",
            Self::Semicolon => "semicolon",
            Self::Tab => "tab",
        }
    }
}

impl Default for Delimiter {
    fn default() -> Self {
        Self::Comma
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Parse a finite float.
///
/// `nan`, `inf` and `infinity` in any case are rejected, so values such as
/// `Nan` or `Inf` stay text.
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|x| x.is_finite())
}

/// A single scalar stored in, or read back from, a table cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl CellValue {
    /// Convert a raw CSV field into a value of the given column type.
    ///
    /// Empty fields become NULL. A field that does not parse under the
    /// column's type is kept as text; inference guarantees this does not
    /// happen for numeric columns.
    pub fn from_raw(raw: &str, column_type: ColumnType) -> Self {
        if raw.is_empty() {
            return Self::Null;
        }
        match column_type {
            ColumnType::Integer => raw
                .parse::<i64>()
                .map(Self::Integer)
                .unwrap_or_else(|_| Self::Text(raw.to_string())),
            ColumnType::Real => parse_number(raw)
                .map(Self::Real)
                .unwrap_or_else(|| Self::Text(raw.to_string())),
            ColumnType::Text => Self::Text(raw.to_string()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Numeric view of the value, if it has one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(n) => Some(*n as f64),
            Self::Real(x) => Some(*x),
            Self::Text(s) => parse_number(s.trim()),
            Self::Null => None,
        }
    }

    /// Label used when the value is a category (bar label, pie slice, group)
    pub fn label(&self) -> String {
        match self {
            Self::Null => "NULL".to_string(),
            Self::Integer(n) => n.to_string(),
            Self::Real(x) => format!("{:?}", x),
            Self::Text(s) => s.clone(),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl rusqlite::ToSql for CellValue {
    fn to_sql(&self) -> rusqlite::Result<rusqlite::types::ToSqlOutput<'_>> {
        use rusqlite::types::{ToSqlOutput, Value, ValueRef};
        Ok(match self {
            Self::Null => ToSqlOutput::Owned(Value::Null),
            Self::Integer(n) => ToSqlOutput::Owned(Value::Integer(*n)),
            Self::Real(x) => ToSqlOutput::Owned(Value::Real(*x)),
            Self::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
        })
    }
}

impl rusqlite::types::FromSql for CellValue {
    fn column_result(value: rusqlite::types::ValueRef<'_>) -> rusqlite::types::FromSqlResult<Self> {
        use rusqlite::types::ValueRef;
        Ok(match value {
            ValueRef::Null => Self::Null,
            ValueRef::Integer(n) => Self::Integer(n),
            ValueRef::Real(x) => Self::Real(x),
            ValueRef::Text(bytes) => Self::Text(String::from_utf8_lossy(bytes).into_owned()),
            ValueRef::Blob(bytes) => Self::Text(format!("<{} bytes>", bytes.len())),
        })
    }
}
