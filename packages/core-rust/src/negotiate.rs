//! `Accept` header negotiation against a [`SerializerRegistry`].
//!
//! Only the first `Accept` value is looked at. Everything from its first `;`
//! on is dropped and the remainder is matched exactly. Quality values are
//! never compared and comma-separated alternatives are not split. Anything
//! that does not match degrades to the registry's default serializer, so
//! negotiation never fails.

use std::sync::Arc;

use tracing::trace;

use crate::codec::Serializer;
use crate::registry::SerializerRegistry;

/// Reduces an `Accept` value to the media type used as registry key.
///
/// ```
/// use courier_core::negotiate::media_type;
///
/// assert_eq!(media_type(" application/xml ;q=0.8"), "application/xml");
/// assert_eq!(media_type("text/html"), "text/html");
/// ```
#[must_use]
pub fn media_type(accept: &str) -> &str {
    let base = match accept.find(';') {
        Some(end) => &accept[..end],
        None => accept,
    };
    base.trim()
}

/// Resolves `Accept` values to fresh serializers.
#[derive(Debug, Clone)]
pub struct ContentNegotiator {
    registry: Arc<SerializerRegistry>,
}

impl ContentNegotiator {
    #[must_use]
    pub fn new(registry: Arc<SerializerRegistry>) -> Self {
        Self { registry }
    }

    /// The registry this negotiator resolves against.
    #[must_use]
    pub fn registry(&self) -> &SerializerRegistry {
        &self.registry
    }

    /// Picks a serializer for the given `Accept` value.
    ///
    /// `None` and the empty string select the default entry, as does any
    /// media type the registry does not know.
    #[must_use]
    pub fn negotiate(&self, accept: Option<&str>) -> Box<dyn Serializer> {
        let requested = accept.map(media_type).unwrap_or_default();

        let factory = if requested.is_empty() {
            self.registry.default_factory()
        } else if let Some(factory) = self.registry.get(requested) {
            factory
        } else {
            trace!(media_type = requested, "no serializer registered, using default");
            self.registry.default_factory()
        };

        let serializer = factory();
        trace!(
            requested,
            content_type = serializer.content_type(),
            "negotiated serializer"
        );
        serializer
    }
}
