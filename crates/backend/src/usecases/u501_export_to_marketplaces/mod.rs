pub mod executor;
pub mod store;

pub use executor::{ExportExecutor, ExportPolicy};
pub use store::{DbExportStore, ExportStore};
