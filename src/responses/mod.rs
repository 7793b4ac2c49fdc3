pub mod html;
pub mod json;
pub mod static_files;
pub mod xlsx;

use crate::errors::ServerError;
use astra::Response;

/// Alias used by every route handler.
pub type ResultResp = Result<Response, ServerError>;

pub use html::{html_response, redirect};
pub use json::json_response;
pub use static_files::static_file_response;
pub use xlsx::xlsx_response;
