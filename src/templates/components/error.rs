use crate::errors::ServerError;
use crate::templates::mobile_layout;
use astra::{Body, Response, ResponseBuilder};
use maud::html;

/// Convert a ServerError into a proper HTML response page
pub fn html_error_response(err: ServerError) -> Response {
    match err {
        ServerError::NotFound => render_error(404, "Not Found"),

        ServerError::BadRequest(msg) => render_error(400, &msg),

        ServerError::InvalidConfiguration(e) => {
            render_error(400, &format!("Invalid filter or sort: {e}"))
        }

        ServerError::DbError(msg) => {
            tracing::error!(error = %msg, "repository call failed");
            render_error(500, "Could not reach the database. Please try again.")
        }

        ServerError::XlsxError(msg) => {
            tracing::error!(error = %msg, "spreadsheet export failed");
            render_error(500, &format!("Spreadsheet Error: {msg}"))
        }

        ServerError::InternalError => render_error(500, "Internal Server Error"),
    }
}

/// Build a basic HTML error page
fn render_error(status: u16, message: &str) -> Response {
    let page = mobile_layout(
        &format!("Error {status}"),
        html! {
            h1 class="text-2xl font-bold" { "Error " (status) }
            p class="error-message" { (message) }
            p { a href="/" { "← Back to the list" } }
        },
    );

    ResponseBuilder::new()
        .status(status)
        .header("Content-Type", "text/html; charset=utf-8")
        .body(Body::from(page.into_string()))
        .unwrap_or_else(|_| Response::new(Body::from("Internal Server Error")))
}
