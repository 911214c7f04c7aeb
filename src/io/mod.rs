pub mod export;

pub use export::{Exporter, LedgerSnapshot, workbook_filename};
