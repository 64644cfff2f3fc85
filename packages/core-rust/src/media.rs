//! Media type strings shared by the codecs, the registry, and the writer.

/// Default content type for text results and bare scalar values.
pub const TEXT_PLAIN_UTF8: &str = "text/plain; charset=utf-8";

/// Registry key under which the JSON serializer is reachable by `Accept`.
pub const APPLICATION_JSON: &str = "application/json";

/// Content type produced by [`JsonSerializer`](crate::codec::JsonSerializer).
pub const APPLICATION_JSON_UTF8: &str = "application/json; charset=utf-8";

/// Registry key and produced content type of the `MsgPack` codec.
pub const APPLICATION_MSGPACK: &str = "application/msgpack";
