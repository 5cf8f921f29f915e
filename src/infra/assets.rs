//! Embedded single-page client serving.

use axum::{
    body::Body,
    extract::Path,
    http::{HeaderValue, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use include_dir::{Dir, include_dir};
use mime_guess::{Mime, MimeGuess};

use crate::application::error::HttpError;
use crate::infra::http::api::error::ApiError;

static CLIENT_ASSETS: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/static");

const INDEX_FILE: &str = "index.html";
const API_PREFIX: &str = "/api/";

const IMMUTABLE_CACHE: &str = "public, max-age=31536000, immutable";
const NO_CACHE: &str = "no-cache";

/// Serve an embedded asset below `/static/`.
pub async fn serve_static(path: Option<Path<String>>) -> Response {
    let captured = path.map(|Path(value)| value);
    match resolve_asset(&CLIENT_ASSETS, captured) {
        Some(asset) => asset.into_response(),
        None => HttpError::new(
            "infra::assets::serve_static",
            StatusCode::NOT_FOUND,
            "Not found",
            "Static asset not found",
        )
        .into_response(),
    }
}

/// Serve the client shell. Unknown `/api/` paths stay JSON 404s so the
/// client never parses HTML as an API reply.
pub async fn serve_index(uri: Uri) -> Response {
    if uri.path().starts_with(API_PREFIX) {
        return ApiError::not_found("Route not found", format!("no route for {}", uri.path()))
            .into_response();
    }

    match CLIENT_ASSETS.get_file(INDEX_FILE) {
        Some(file) => build_response(
            Bytes::from_static(file.contents()),
            mime_guess::mime::TEXT_HTML_UTF_8,
            NO_CACHE,
        ),
        None => HttpError::new(
            "infra::assets::serve_index",
            StatusCode::INTERNAL_SERVER_ERROR,
            "Client unavailable",
            "index.html is missing from the embedded bundle",
        )
        .into_response(),
    }
}

struct Asset {
    contents: &'static [u8],
    mime: MimeGuess,
}

fn resolve_asset(bundle: &'static Dir<'static>, path: Option<String>) -> Option<Asset> {
    let candidate = path.unwrap_or_default();
    let candidate = candidate.trim_start_matches('/');

    if candidate.is_empty() || candidate.ends_with('/') || candidate.contains("..") {
        return None;
    }

    let file = bundle.get_file(candidate)?;
    Some(Asset {
        contents: file.contents(),
        mime: mime_guess::from_path(candidate),
    })
}

impl IntoResponse for Asset {
    fn into_response(self) -> Response {
        build_response(
            Bytes::from_static(self.contents),
            self.mime.first_or_octet_stream(),
            IMMUTABLE_CACHE,
        )
    }
}

fn build_response(bytes: Bytes, mime: Mime, cache_control: &'static str) -> Response {
    let len = bytes.len();
    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = StatusCode::OK;

    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(mime.as_ref()) {
        headers.insert(header::CONTENT_TYPE, value);
    }
    if let Ok(value) = HeaderValue::from_str(&len.to_string()) {
        headers.insert(header::CONTENT_LENGTH, value);
    }
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(cache_control));

    response
}
