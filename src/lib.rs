#![allow(clippy::collapsible_if)]
#![allow(clippy::collapsible_match)]
#![allow(clippy::collapsible_else_if)]

pub mod config;
pub mod core;
pub mod logging;
pub mod services;
pub mod tui;

// Re-export commonly used types
pub use core::{CellValue, ColumnType, Delimiter, ImportError, ImportSummary, StoredTable};
pub use services::{ChartKind, ChartOutcome, ChartRequest, DataService};
pub use tui::{Action, ActionCategory};
