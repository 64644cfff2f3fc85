//! Opaque codec failures.
//!
//! Both sentinels carry no cause. Encoders and decoders report the underlying
//! error as a `tracing` event where it happens.

/// Encoding a value, or writing the encoded bytes, failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("serialization failure")]
pub struct SerializationFailure;

/// Reading or decoding an inbound value failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("deserialization failure")]
pub struct DeserializationFailure;
