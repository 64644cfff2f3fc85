//! Courier server: renders handler results into HTTP responses, negotiating
//! the body format from `Accept`, and a small axum demo server built on it.

pub mod cli;
pub mod network;
pub mod response;

pub use response::{
    BinaryResult, BufferedResponse, NegotiatedResult, Outcome, ResponseSink, ResponseWriter,
    SelfHandling, StreamResult, TextResult, WriteError,
};
