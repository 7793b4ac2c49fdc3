// responses/static_files.rs
use crate::errors::ServerError;
use crate::responses::ResultResp;
use astra::{Body, ResponseBuilder};
use mime::Mime;
use std::path::Path;

/// Serve a single file from `dir`. Only plain file names are accepted.
pub fn static_file_response(dir: &Path, name: &str) -> ResultResp {
    if name.is_empty() || name.starts_with('.') || name.contains(['/', '\\']) {
        return Err(ServerError::NotFound);
    }

    let bytes = std::fs::read(dir.join(name)).map_err(|_| ServerError::NotFound)?;

    ResponseBuilder::new()
        .status(200)
        .header("Content-Type", content_type(name).as_ref())
        .header("Cache-Control", "public, max-age=3600")
        .body(Body::from(bytes))
        .map_err(|_| ServerError::InternalError)
}

fn content_type(name: &str) -> Mime {
    let ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    match ext.as_str() {
        "css" => mime::TEXT_CSS_UTF_8,
        "js" => mime::APPLICATION_JAVASCRIPT_UTF_8,
        "svg" => mime::IMAGE_SVG,
        "png" => mime::IMAGE_PNG,
        "html" => mime::TEXT_HTML_UTF_8,
        "ico" => "image/x-icon".parse().unwrap_or(mime::APPLICATION_OCTET_STREAM),
        _ => mime::APPLICATION_OCTET_STREAM,
    }
}
