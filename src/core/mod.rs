pub mod error;
pub mod inference;
pub mod models;
pub mod naming;
pub mod sniffer;
pub mod stored_table;
pub mod types;

pub use error::{ChartError, ImportError};
pub use models::*;
pub use stored_table::StoredTable;
pub use types::*;
