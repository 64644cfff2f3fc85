//! Echo and hello demo routes.

use axum::extract::State;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::Response;
use bytes::Bytes;
use courier_core::{Deserializer, FieldSource, InputError, JsonDeserializer};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::AppState;
use crate::response::NegotiatedResult;

/// JSON body accepted by `POST /echo`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EchoRequest {
    pub message: String,
}

/// Reply to `POST /echo`, encoded per `Accept`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EchoResponse {
    pub echo: String,
    /// Length of `echo` in characters.
    pub length: usize,
}

/// Decodes a JSON [`EchoRequest`] and echoes the message back.
///
/// A body that fails to decode, or carries an empty message, yields 422 with
/// an [`InputError`] naming the `body:message` field.
pub async fn echo_handler(State(state): State<AppState>, parts: Parts, body: Bytes) -> Response {
    let outcome = match decode_request(&body) {
        Ok(request) => NegotiatedResult::new(EchoResponse {
            length: request.message.chars().count(),
            echo: request.message,
        }),
        Err(error) => NegotiatedResult::new(error).with_status(StatusCode::UNPROCESSABLE_ENTITY),
    };

    state.writer.render(&parts, outcome)
}

fn decode_request(body: &[u8]) -> Result<EchoRequest, InputError> {
    let mut request = EchoRequest::default();

    if JsonDeserializer::new()
        .deserialize(&mut request, &mut &body[..])
        .is_err()
    {
        debug!(len = body.len(), "rejecting undecodable echo body");
        return Err(InputError::new("request body must be a JSON object")
            .with_name("invalid_body")
            .with_field(FieldSource::Body, "message"));
    }

    if request.message.is_empty() {
        return Err(InputError::new("message must not be empty")
            .with_name("empty_message")
            .with_field(FieldSource::Body, "message"));
    }

    Ok(request)
}

/// Plain-text greeting.
pub async fn hello_handler(State(state): State<AppState>, parts: Parts) -> Response {
    state.writer.render(&parts, "hello from courier")
}
