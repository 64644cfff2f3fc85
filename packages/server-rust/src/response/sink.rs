//! The transport capability the writer renders into.
//!
//! [`ResponseSink`] models the three things a response stream allows: set
//! the status once, set headers before the body, append body bytes.
//! [`BufferedResponse`] is the in-memory implementation used for axum
//! handlers and tests; it turns into an `axum::response::Response`.

use std::io;

use axum::body::Body;
use axum::http::header::{HeaderName, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use bytes::{Bytes, BytesMut};
use tracing::warn;

/// Writable side of an HTTP response.
pub trait ResponseSink {
    /// Sets the status code. Only the first call has an effect.
    fn set_status(&mut self, status: StatusCode);

    /// Sets a header, replacing earlier values for `name`.
    ///
    /// Headers set after the first body byte are dropped.
    fn set_header(&mut self, name: HeaderName, value: HeaderValue);

    /// Appends bytes to the body. Implies status 200 if none was set.
    ///
    /// # Errors
    ///
    /// Returns the transport's I/O error.
    fn write_body(&mut self, chunk: &[u8]) -> io::Result<()>;
}

/// Collects a whole response in memory.
#[derive(Debug, Default)]
pub struct BufferedResponse {
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: BytesMut,
    body_started: bool,
}

impl BufferedResponse {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Status written so far, 200 when none was set.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::OK)
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The `Content-Type` header as a string, if present and valid.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
    }

    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Whether anything at all has been written.
    #[must_use]
    pub fn is_untouched(&self) -> bool {
        self.status.is_none() && self.headers.is_empty() && !self.body_started
    }

    /// Splits into status, headers and frozen body.
    #[must_use]
    pub fn into_parts(self) -> (StatusCode, HeaderMap, Bytes) {
        (
            self.status.unwrap_or(StatusCode::OK),
            self.headers,
            self.body.freeze(),
        )
    }
}

impl ResponseSink for BufferedResponse {
    fn set_status(&mut self, status: StatusCode) {
        if let Some(current) = self.status {
            warn!(%current, ignored = %status, "status already set");
            return;
        }
        self.status = Some(status);
    }

    fn set_header(&mut self, name: HeaderName, value: HeaderValue) {
        if self.body_started {
            warn!(header = %name, "header set after body was written, dropping");
            return;
        }
        self.headers.insert(name, value);
    }

    fn write_body(&mut self, chunk: &[u8]) -> io::Result<()> {
        if self.status.is_none() {
            self.status = Some(StatusCode::OK);
        }
        self.body_started = true;
        self.body.extend_from_slice(chunk);
        Ok(())
    }
}

impl IntoResponse for BufferedResponse {
    fn into_response(self) -> Response {
        let (status, headers, body) = self.into_parts();
        let mut response = Response::new(Body::from(body));
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        response
    }
}

#[cfg(test)]
mod tests {
    use axum::http::header::CACHE_CONTROL;

    use super::*;

    #[test]
    fn defaults_to_200_and_empty() {
        let sink = BufferedResponse::new();
        assert!(sink.is_untouched());
        assert_eq!(sink.status(), StatusCode::OK);
        assert!(sink.body().is_empty());
        assert!(sink.content_type().is_none());
    }

    #[test]
    fn first_status_wins() {
        let mut sink = BufferedResponse::new();
        sink.set_status(StatusCode::NOT_FOUND);
        sink.set_status(StatusCode::OK);
        assert_eq!(sink.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn body_write_implies_200() {
        let mut sink = BufferedResponse::new();
        sink.write_body(b"x").unwrap();
        sink.set_status(StatusCode::CREATED);
        assert_eq!(sink.status(), StatusCode::OK);
    }

    #[test]
    fn headers_after_body_are_dropped() {
        let mut sink = BufferedResponse::new();
        sink.set_header(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        sink.write_body(b"hello").unwrap();
        sink.set_header(CACHE_CONTROL, HeaderValue::from_static("no-store"));

        assert_eq!(sink.content_type(), Some("text/plain"));
        assert!(sink.headers().get(CACHE_CONTROL).is_none());
    }

    #[test]
    fn body_chunks_are_appended() {
        let mut sink = BufferedResponse::new();
        sink.write_body(b"hel").unwrap();
        sink.write_body(b"lo").unwrap();
        assert_eq!(sink.body(), b"hello");
    }

    #[test]
    fn into_response_carries_everything() {
        let mut sink = BufferedResponse::new();
        sink.set_status(StatusCode::ACCEPTED);
        sink.set_header(CONTENT_TYPE, HeaderValue::from_static("application/custom"));
        sink.write_body(b"body").unwrap();

        let response = sink.into_response();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            "application/custom"
        );
    }
}
