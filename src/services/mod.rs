pub mod chart_service;
pub mod csv_reader;
pub mod data_service;
pub mod materializer;

pub use chart_service::{ChartKind, ChartOptions, ChartOutcome, ChartRequest, ChartSpec};
pub use csv_reader::CsvReader;
pub use data_service::DataService;
