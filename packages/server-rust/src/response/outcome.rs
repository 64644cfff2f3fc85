//! Result shapes a handler can return.
//!
//! [`Outcome`] is the closed set of shapes the writer knows how to render.
//! Handlers rarely build it by hand: bare scalars, `()`, `Option`, and the
//! `*Result` structs all convert into it, and any other serializable value
//! goes through [`Outcome::negotiated`].

use std::fmt;
use std::io::Read;

use axum::http::request::Parts;
use axum::http::StatusCode;
use bytes::Bytes;
use courier_core::Payload;
use serde::Serialize;

use super::sink::ResponseSink;
use super::writer::WriteError;

/// A value that produces the entire response on its own.
///
/// The writer checks for this before anything else and hands over the sink
/// and request untouched.
pub trait SelfHandling: Send {
    /// Writes the full response.
    ///
    /// # Errors
    ///
    /// Returns whatever the implementation fails with; the writer passes it
    /// through unchanged.
    fn serve(self: Box<Self>, sink: &mut dyn ResponseSink, request: &Parts)
        -> Result<(), WriteError>;
}

/// Text content, `text/plain; charset=utf-8` unless overridden.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextResult {
    /// Response status; 200 when `None`.
    pub status: Option<StatusCode>,
    /// Replaces the text default when non-empty.
    pub content_type: Option<String>,
    /// Body. Empty content means no body and no content type.
    pub content: String,
}

/// Raw bytes. No content type is sent unless one is given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BinaryResult {
    /// Response status; 200 when `None`.
    pub status: Option<StatusCode>,
    /// Sent only together with non-empty content.
    pub content_type: Option<String>,
    /// Body. Empty content means no body and no content type.
    pub content: Bytes,
}

/// A byte source drained completely into the response body.
#[derive(Default)]
pub struct StreamResult {
    /// Response status; 200 when `None`.
    pub status: Option<StatusCode>,
    /// Sent only when the drained content is non-empty.
    pub content_type: Option<String>,
    /// Read once, to the end, while the response is being written.
    pub content: Option<Box<dyn Read + Send>>,
}

/// A value encoded by whichever serializer the request's `Accept` selects.
#[derive(Default)]
pub struct NegotiatedResult {
    /// Response status; 200 when `None`.
    pub status: Option<StatusCode>,
    /// Replaces the negotiated serializer's content type when non-empty.
    pub content_type: Option<String>,
    /// Value to encode. `None` means no body and no content type.
    pub content: Option<Box<dyn Payload>>,
}

macro_rules! result_builders {
    ($ty:ty) => {
        impl $ty {
            #[must_use]
            pub fn with_status(mut self, status: StatusCode) -> Self {
                self.status = Some(status);
                self
            }

            #[must_use]
            pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
                self.content_type = Some(content_type.into());
                self
            }
        }
    };
}

result_builders!(TextResult);
result_builders!(BinaryResult);
result_builders!(StreamResult);
result_builders!(NegotiatedResult);

impl TextResult {
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }
}

impl BinaryResult {
    #[must_use]
    pub fn new(content: impl Into<Bytes>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }
}

impl StreamResult {
    #[must_use]
    pub fn new(content: impl Read + Send + 'static) -> Self {
        Self {
            content: Some(Box::new(content)),
            ..Self::default()
        }
    }
}

impl NegotiatedResult {
    #[must_use]
    pub fn new(content: impl Serialize + Send + 'static) -> Self {
        Self {
            content: Some(Box::new(content)),
            ..Self::default()
        }
    }
}

impl fmt::Debug for StreamResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamResult")
            .field("status", &self.status)
            .field("content_type", &self.content_type)
            .field("has_content", &self.content.is_some())
            .finish()
    }
}

impl fmt::Debug for NegotiatedResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NegotiatedResult")
            .field("status", &self.status)
            .field("content_type", &self.content_type)
            .field("has_content", &self.content.is_some())
            .finish()
    }
}

/// Classification of a handler's return value.
pub enum Outcome {
    /// Nothing to send: 200, no content type, no body.
    Empty,
    /// A bare scalar rendered as text with the text default content type.
    Plain(Bytes),
    Text(TextResult),
    Binary(BinaryResult),
    Stream(StreamResult),
    Negotiated(NegotiatedResult),
    /// Bypasses all shape handling.
    SelfHandled(Box<dyn SelfHandling>),
}

impl Outcome {
    /// Wraps an arbitrary serializable value with no status or content type
    /// override.
    #[must_use]
    pub fn negotiated(value: impl Serialize + Send + 'static) -> Self {
        Self::Negotiated(NegotiatedResult::new(value))
    }

    /// Wraps a value that writes the response itself.
    #[must_use]
    pub fn self_handled(handler: impl SelfHandling + 'static) -> Self {
        Self::SelfHandled(Box::new(handler))
    }

    /// Short name of the shape, for log fields.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Plain(_) => "plain",
            Self::Text(_) => "text",
            Self::Binary(_) => "binary",
            Self::Stream(_) => "stream",
            Self::Negotiated(_) => "negotiated",
            Self::SelfHandled(_) => "self-handled",
        }
    }
}

impl fmt::Debug for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("Empty"),
            Self::Plain(bytes) => f.debug_tuple("Plain").field(bytes).finish(),
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Binary(binary) => f.debug_tuple("Binary").field(binary).finish(),
            Self::Stream(stream) => f.debug_tuple("Stream").field(stream).finish(),
            Self::Negotiated(value) => f.debug_tuple("Negotiated").field(value).finish(),
            Self::SelfHandled(_) => f.write_str("SelfHandled(..)"),
        }
    }
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

impl From<()> for Outcome {
    fn from((): ()) -> Self {
        Self::Empty
    }
}

impl<T: Into<Outcome>> From<Option<T>> for Outcome {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Empty, Into::into)
    }
}

impl From<&str> for Outcome {
    fn from(value: &str) -> Self {
        Self::Plain(Bytes::copy_from_slice(value.as_bytes()))
    }
}

impl From<String> for Outcome {
    fn from(value: String) -> Self {
        Self::Plain(Bytes::from(value))
    }
}

impl From<&'static [u8]> for Outcome {
    fn from(value: &'static [u8]) -> Self {
        Self::Plain(Bytes::from_static(value))
    }
}

impl From<Vec<u8>> for Outcome {
    fn from(value: Vec<u8>) -> Self {
        Self::Plain(Bytes::from(value))
    }
}

impl From<Bytes> for Outcome {
    fn from(value: Bytes) -> Self {
        Self::Plain(value)
    }
}

impl From<bool> for Outcome {
    fn from(value: bool) -> Self {
        Self::Plain(Bytes::from_static(if value { b"true" } else { b"false" }))
    }
}

impl From<TextResult> for Outcome {
    fn from(value: TextResult) -> Self {
        Self::Text(value)
    }
}

impl From<BinaryResult> for Outcome {
    fn from(value: BinaryResult) -> Self {
        Self::Binary(value)
    }
}

impl From<StreamResult> for Outcome {
    fn from(value: StreamResult) -> Self {
        Self::Stream(value)
    }
}

impl From<NegotiatedResult> for Outcome {
    fn from(value: NegotiatedResult) -> Self {
        Self::Negotiated(value)
    }
}
