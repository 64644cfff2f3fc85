//! `MsgPack` codec backed by `rmp-serde`.
//!
//! Structs are written as named maps (`write_named`), matching what
//! `rmp_serde::to_vec_named()` produces, so non-Rust peers see field names.

use std::io::{Read, Write};

use serde::de::DeserializeOwned;

use super::{decode_failed, encode_failed, Deserializer, Payload, Serializer};
use crate::error::{DeserializationFailure, SerializationFailure};
use crate::media::APPLICATION_MSGPACK;

/// Encodes values as a single `MsgPack` document.
#[derive(Debug, Default)]
pub struct MsgPackSerializer {
    scratch: Vec<u8>,
}

impl MsgPackSerializer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Serializer for MsgPackSerializer {
    fn content_type(&self) -> &str {
        APPLICATION_MSGPACK
    }

    fn serialize(
        &mut self,
        writer: &mut dyn Write,
        value: &dyn Payload,
    ) -> Result<(), SerializationFailure> {
        self.scratch.clear();

        rmp_serde::encode::write_named(&mut self.scratch, value).map_err(encode_failed)?;

        writer.write_all(&self.scratch).map_err(encode_failed)
    }
}

/// Decodes one `MsgPack` document.
#[derive(Debug, Default, Clone, Copy)]
pub struct MsgPackDeserializer;

impl MsgPackDeserializer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Deserializer for MsgPackDeserializer {
    fn deserialize<T: DeserializeOwned>(
        &mut self,
        target: &mut T,
        reader: &mut dyn Read,
    ) -> Result<(), DeserializationFailure> {
        *target = rmp_serde::decode::from_read(reader).map_err(decode_failed)?;
        Ok(())
    }
}
