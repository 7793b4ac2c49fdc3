pub mod error;
pub mod filter_panel;
pub mod record_card;
pub mod record_form;

pub use error::html_error_response;
pub use filter_panel::filter_panel;
pub use record_card::record_card;
pub use record_form::record_form_modal;
