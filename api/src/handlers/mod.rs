//! HTTP handlers
//!
//! Axum request handlers for the API endpoints.
//! Supports content negotiation: Accept: application/json for JSON, otherwise text/plain.

pub mod books;
pub mod loans;
pub mod members;
pub mod session;

use axum::{
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

pub use books::{borrow_book, create_book, get_book, list_books, return_book};
pub use loans::list_loans;
pub use members::{get_member, register_member};
pub use session::login;

/// Check if the client wants JSON response
fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains("application/json"))
        .unwrap_or(false)
}

/// Respond with `value` as JSON or with its plain-text rendering
fn negotiate<T: Serialize>(
    headers: &HeaderMap,
    status: StatusCode,
    value: &T,
    text: impl FnOnce() -> String,
) -> Response {
    if wants_json(headers) {
        (status, Json(value)).into_response()
    } else {
        (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            text(),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn json_only_when_asked_for() {
        let mut headers = HeaderMap::new();
        assert!(!wants_json(&headers));

        headers.insert(header::ACCEPT, HeaderValue::from_static("text/plain"));
        assert!(!wants_json(&headers));

        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("application/json, text/plain;q=0.5"),
        );
        assert!(wants_json(&headers));
    }

    #[test]
    fn negotiate_picks_content_type() {
        let mut headers = HeaderMap::new();
        let text = negotiate(&headers, StatusCode::CREATED, &"B1", || "B1\n".to_string());
        assert_eq!(text.status(), StatusCode::CREATED);
        assert_eq!(
            text.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );

        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        let json = negotiate(&headers, StatusCode::OK, &"B1", || unreachable!());
        assert_eq!(json.headers()[header::CONTENT_TYPE], "application/json");
    }
}
