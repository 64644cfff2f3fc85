//! Courier core: serializer contract, JSON and `MsgPack` codecs, the
//! serializer registry, and `Accept` negotiation.

pub mod codec;
pub mod error;
pub mod input_error;
pub mod media;
pub mod negotiate;
pub mod registry;

pub use codec::{
    Deserializer, JsonDeserializer, JsonSerializer, MsgPackDeserializer, MsgPackSerializer,
    Payload, Serializer,
};
pub use error::{DeserializationFailure, SerializationFailure};
pub use input_error::{FieldSource, InputError};
pub use negotiate::ContentNegotiator;
pub use registry::{RegistryError, SerializerFactory, SerializerRegistry};
