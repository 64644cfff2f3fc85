//! JSON codec backed by `serde_json`.

use std::io::{Read, Write};

use serde::de::DeserializeOwned;

use super::{decode_failed, encode_failed, Deserializer, Payload, Serializer};
use crate::error::{DeserializationFailure, SerializationFailure};
use crate::media::APPLICATION_JSON_UTF8;

/// Encodes values as a single JSON document followed by a newline.
#[derive(Debug, Default)]
pub struct JsonSerializer {
    /// Encode buffer, cleared at the start of every call.
    scratch: Vec<u8>,
}

impl JsonSerializer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Serializer for JsonSerializer {
    fn content_type(&self) -> &str {
        APPLICATION_JSON_UTF8
    }

    fn serialize(
        &mut self,
        writer: &mut dyn Write,
        value: &dyn Payload,
    ) -> Result<(), SerializationFailure> {
        self.scratch.clear();

        serde_json::to_writer(&mut self.scratch, value).map_err(encode_failed)?;
        self.scratch.push(b'\n');

        writer.write_all(&self.scratch).map_err(encode_failed)
    }
}

/// Decodes one JSON document.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonDeserializer;

impl JsonDeserializer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Deserializer for JsonDeserializer {
    fn deserialize<T: DeserializeOwned>(
        &mut self,
        target: &mut T,
        reader: &mut dyn Read,
    ) -> Result<(), DeserializationFailure> {
        *target = serde_json::from_reader(reader).map_err(decode_failed)?;
        Ok(())
    }
}
