pub mod chart_panel;
pub mod chart_view;
pub mod data_table;
pub mod help_dialog;
pub mod status_bar;
pub mod table_list;
pub mod upload_dialog;

pub use chart_panel::ChartPanel;
pub use data_table::DataTable;
pub use status_bar::{StatusBar, StatusLevel, StatusMessage};
pub use table_list::TableList;
pub use upload_dialog::{UploadDialog, UploadInput};
