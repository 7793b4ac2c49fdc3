pub mod components;
pub mod layouts;
pub mod pages;

// Re-exports for convenience
pub use components::{html_error_response, record_form_modal};
pub use layouts::mobile::mobile_layout;
