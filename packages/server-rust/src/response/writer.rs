//! Renders handler outcomes into responses.
//!
//! The writer turns an [`Outcome`] into a status, an optional content type and
//! an optional body, then commits them to a [`ResponseSink`] in that order.
//! Every body is fully prepared in memory before the first call on the sink,
//! so a serialization or stream failure leaves the sink untouched.
//!
//! Per-shape rules:
//!
//! | Shape | Body | Content-Type |
//! |---|---|---|
//! | `Empty` | none | none |
//! | `Plain` | the bytes | text default, always |
//! | `Text` | content, none when empty | override, else text default; none when empty |
//! | `Binary` / `Stream` | content, none when empty | override only; none when empty |
//! | `Negotiated` | serialized content, none when absent | override, else serializer's; none when absent |
//!
//! Status is the shape's explicit status, else 200.

use std::io::{self, Read};
use std::sync::Arc;

use axum::http::header::{ACCEPT, CONTENT_TYPE};
use axum::http::request::Parts;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use courier_core::media::TEXT_PLAIN_UTF8;
use courier_core::{ContentNegotiator, SerializationFailure, SerializerRegistry};
use tracing::{error, trace, warn};

use super::outcome::{BinaryResult, NegotiatedResult, Outcome, StreamResult, TextResult};
use super::sink::{BufferedResponse, ResponseSink};

/// Errors from [`ResponseWriter::write`].
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error(transparent)]
    Serialization(#[from] SerializationFailure),
    #[error("failed to read stream content")]
    StreamRead(#[source] io::Error),
    #[error("failed to write response body")]
    Sink(#[source] io::Error),
    #[error("self-handling result failed: {0}")]
    SelfHandled(#[from] anyhow::Error),
}

/// Everything needed to commit one response.
struct Rendered {
    status: StatusCode,
    content_type: Option<String>,
    body: Bytes,
}

impl Rendered {
    fn empty(status: Option<StatusCode>) -> Self {
        Self {
            status: status.unwrap_or(StatusCode::OK),
            content_type: None,
            body: Bytes::new(),
        }
    }

    fn commit(self, sink: &mut dyn ResponseSink) -> Result<(), WriteError> {
        sink.set_status(self.status);

        if let Some(content_type) = self.content_type {
            match HeaderValue::try_from(content_type) {
                Ok(value) => sink.set_header(CONTENT_TYPE, value),
                Err(err) => warn!(error = %err, "invalid content type, header omitted"),
            }
        }

        if !self.body.is_empty() {
            sink.write_body(&self.body).map_err(WriteError::Sink)?;
        }
        Ok(())
    }
}

/// Treats `Some("")` the same as `None`.
fn non_empty(content_type: Option<String>) -> Option<String> {
    content_type.filter(|value| !value.is_empty())
}

/// Renders outcomes, negotiating serializers from the request's `Accept`.
///
/// Cheap to clone; the registry behind it is shared and read-only.
#[derive(Debug, Clone)]
pub struct ResponseWriter {
    negotiator: ContentNegotiator,
}

impl ResponseWriter {
    #[must_use]
    pub fn new(registry: Arc<SerializerRegistry>) -> Self {
        Self {
            negotiator: ContentNegotiator::new(registry),
        }
    }

    #[must_use]
    pub fn negotiator(&self) -> &ContentNegotiator {
        &self.negotiator
    }

    /// Writes `outcome` to `sink`.
    ///
    /// A self-handling outcome receives `sink` and `request` unchanged and
    /// nothing else happens. For all other shapes the response is prepared
    /// in memory first and committed status, content type, body.
    ///
    /// # Errors
    ///
    /// - [`WriteError::Serialization`] if negotiated content cannot be encoded
    /// - [`WriteError::StreamRead`] if stream content cannot be drained
    /// - [`WriteError::Sink`] if the sink rejects the body
    /// - whatever a self-handling outcome returns
    ///
    /// The first two happen before the sink is touched.
    pub fn write(
        &self,
        sink: &mut dyn ResponseSink,
        request: &Parts,
        outcome: impl Into<Outcome>,
    ) -> Result<(), WriteError> {
        let outcome = outcome.into();
        trace!(kind = outcome.kind(), "writing outcome");

        let rendered = match outcome {
            Outcome::SelfHandled(handler) => return handler.serve(sink, request),
            Outcome::Empty => Rendered::empty(None),
            Outcome::Plain(body) => Rendered {
                status: StatusCode::OK,
                content_type: Some(TEXT_PLAIN_UTF8.to_string()),
                body,
            },
            Outcome::Text(text) => render_text(text),
            Outcome::Binary(binary) => render_binary(binary),
            Outcome::Stream(stream) => render_stream(stream)?,
            Outcome::Negotiated(negotiated) => self.render_negotiated(negotiated, request)?,
        };

        rendered.commit(sink)
    }

    /// Writes `outcome` into a fresh [`BufferedResponse`] and converts it.
    ///
    /// Failures are logged and answered with an empty 500.
    pub fn render(&self, request: &Parts, outcome: impl Into<Outcome>) -> Response {
        let mut sink = BufferedResponse::new();
        match self.write(&mut sink, request, outcome) {
            Ok(()) => sink.into_response(),
            Err(err) => {
                error!(error = %err, uri = %request.uri, "failed to write response");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }

    fn render_negotiated(
        &self,
        negotiated: NegotiatedResult,
        request: &Parts,
    ) -> Result<Rendered, WriteError> {
        let Some(content) = negotiated.content else {
            return Ok(Rendered::empty(negotiated.status));
        };

        let accept = request
            .headers
            .get(ACCEPT)
            .and_then(|value| value.to_str().ok());
        let mut serializer = self.negotiator.negotiate(accept);

        let mut body = Vec::new();
        serializer.serialize(&mut body, &*content)?;

        let content_type = non_empty(negotiated.content_type)
            .unwrap_or_else(|| serializer.content_type().to_string());

        Ok(Rendered {
            status: negotiated.status.unwrap_or(StatusCode::OK),
            content_type: Some(content_type),
            body: Bytes::from(body),
        })
    }
}

fn render_text(text: TextResult) -> Rendered {
    if text.content.is_empty() {
        return Rendered::empty(text.status);
    }
    Rendered {
        status: text.status.unwrap_or(StatusCode::OK),
        content_type: Some(
            non_empty(text.content_type).unwrap_or_else(|| TEXT_PLAIN_UTF8.to_string()),
        ),
        body: Bytes::from(text.content),
    }
}

fn render_binary(binary: BinaryResult) -> Rendered {
    render_bytes(binary.status, binary.content_type, binary.content)
}

fn render_stream(stream: StreamResult) -> Result<Rendered, WriteError> {
    let mut body = Vec::new();
    if let Some(mut content) = stream.content {
        content
            .read_to_end(&mut body)
            .map_err(WriteError::StreamRead)?;
    }
    Ok(render_bytes(stream.status, stream.content_type, Bytes::from(body)))
}

/// Shared rule for binary and stream content: no default content type.
fn render_bytes(
    status: Option<StatusCode>,
    content_type: Option<String>,
    body: Bytes,
) -> Rendered {
    if body.is_empty() {
        return Rendered::empty(status);
    }
    Rendered {
        status: status.unwrap_or(StatusCode::OK),
        content_type: non_empty(content_type),
        body,
    }
}
