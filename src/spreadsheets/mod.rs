pub mod records_xlsx;

pub use records_xlsx::{export_filename, export_records_xlsx};
