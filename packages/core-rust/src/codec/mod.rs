//! Serializer and deserializer contract plus the built-in codecs.
//!
//! A [`Serializer`] turns any [`Payload`] into bytes on a stream and names
//! the content type it produces. A [`Deserializer`] does the reverse for
//! inbound bodies. Both report failures through opaque sentinels and must
//! stay usable after a failed call: nothing from a broken stream or an
//! unencodable value may leak into the next call.
//!
//! Serializers take `&mut self` so an implementation may keep scratch state
//! between the phases of a single call. Registries hand out a fresh instance
//! per response, so implementations never need to be reentrant.

pub mod json;
pub mod msgpack;

pub use json::{JsonDeserializer, JsonSerializer};
pub use msgpack::{MsgPackDeserializer, MsgPackSerializer};

use std::fmt::Display;
use std::io::{Read, Write};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::{DeserializationFailure, SerializationFailure};

/// Object-safe view of a serializable value.
///
/// Implemented for every `T: Serialize + Send`, so handlers hand over their
/// own types and the negotiated serializer runs its own `serde` serializer
/// on the original value. `dyn Payload` implements [`Serialize`].
pub trait Payload: erased_serde::Serialize + Send {}

impl<T> Payload for T where T: Serialize + Send {}

erased_serde::serialize_trait_object!(Payload);

/// Encodes outbound values for one content type.
pub trait Serializer: Send {
    /// The `Content-Type` this serializer produces.
    fn content_type(&self) -> &str;

    /// Encodes `value` completely and writes it to `writer`.
    ///
    /// Implementations encode into memory first, so a value that cannot be
    /// encoded leaves `writer` untouched.
    ///
    /// # Errors
    ///
    /// Returns [`SerializationFailure`] if encoding or writing fails.
    fn serialize(
        &mut self,
        writer: &mut dyn Write,
        value: &dyn Payload,
    ) -> Result<(), SerializationFailure>;
}

/// Decodes inbound bodies.
pub trait Deserializer {
    /// Decodes one full value from `reader` into `target`.
    ///
    /// `target` is only assigned after a successful decode.
    ///
    /// # Errors
    ///
    /// Returns [`DeserializationFailure`] on malformed input or a failed read.
    fn deserialize<T: DeserializeOwned>(
        &mut self,
        target: &mut T,
        reader: &mut dyn Read,
    ) -> Result<(), DeserializationFailure>;
}

pub(crate) fn encode_failed(err: impl Display) -> SerializationFailure {
    debug!(error = %err, "serialization failed");
    SerializationFailure
}

pub(crate) fn decode_failed(err: impl Display) -> DeserializationFailure {
    debug!(error = %err, "deserialization failed");
    DeserializationFailure
}


#[cfg(test)]
mod tests {
    use super::test_support::Unencodable;
    use super::*;

    #[test]
    fn boxed_payload_serializes_like_the_value() {
        #[derive(Serialize)]
        struct Greeting {
            text: &'static str,
            count: u32,
        }

        let boxed: Box<dyn Payload> = Box::new(Greeting { text: "hi", count: 2 });

        assert_eq!(
            serde_json::to_string(&*boxed).unwrap(),
            r#"{"text":"hi","count":2}"#
        );
    }

    #[test]
    fn boxed_payload_forwards_serialize_errors() {
        let boxed: Box<dyn Payload> = Box::new(Unencodable);
        assert!(serde_json::to_vec(&*boxed).is_err());
    }

    #[test]
    fn boxed_payload_keeps_wide_integers() {
        let boxed: Box<dyn Payload> = Box::new(u128::MAX);
        assert_eq!(
            serde_json::to_string(&*boxed).unwrap(),
            u128::MAX.to_string()
        );
    }
}
