// errors.rs
use thiserror::Error;

use crate::domain::view::InvalidConfiguration;

/// Errors originating from either the server logic
/// (routing, missing records, bad forms) or downstream layers (DB, XLSX).
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Not Found")]
    NotFound,

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Invalid filter or sort: {0}")]
    InvalidConfiguration(#[from] InvalidConfiguration),

    #[error("Database Error: {0}")]
    DbError(String),

    #[error("Spreadsheet Error: {0}")]
    XlsxError(String),

    #[error("Internal Server Error")]
    InternalError,
}
