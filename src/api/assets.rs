//! Embedded page assets
//!
//! The page ships inside the binary; a filesystem fallback keeps
//! development edits visible without a rebuild.

use axum::{
    body::Body,
    http::{header, Request, Response, StatusCode},
    response::IntoResponse,
};
use rust_embed::Embed;
use std::path::Path;

#[derive(Embed)]
#[folder = "ui/dist"]
struct Assets;

/// Look up an asset by its path relative to `ui/dist`, embedded
/// first, filesystem second.
fn load(path: &str) -> Option<Vec<u8>> {
    if let Some(content) = Assets::get(path) {
        return Some(content.data.to_vec());
    }
    std::fs::read(Path::new("ui/dist").join(path)).ok()
}

/// Serve a static file under `/assets/`
pub async fn serve_static(req: Request<Body>) -> impl IntoResponse {
    let path = req.uri().path().trim_start_matches('/');

    match load(path) {
        Some(bytes) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, mime.as_ref())
                .body(Body::from(bytes))
                .unwrap()
        }
        None => Response::builder()
            .status(StatusCode::NOT_FOUND)
            .body(Body::from("Not found"))
            .unwrap(),
    }
}

/// The chat page itself
pub fn get_index_html() -> Option<String> {
    load("index.html").and_then(|bytes| String::from_utf8(bytes).ok())
}
