pub mod connection;
pub mod ids;
pub mod records;

pub use connection::{init_db, Database};
pub use records::{RecordRepository, SqliteRecords, StoredRecord};
