//! Turning handler results into HTTP responses.
//!
//! 1. **Shapes** (`outcome`): the closed set of result shapes and the
//!    conversions into it
//! 2. **Sink** (`sink`): the response capability the writer renders into
//! 3. **Writer** (`writer`): per-shape status/content-type/body rules and
//!    `Accept` negotiation

pub mod outcome;
pub mod sink;
pub mod writer;

pub use outcome::{
    BinaryResult, NegotiatedResult, Outcome, SelfHandling, StreamResult, TextResult,
};
pub use sink::{BufferedResponse, ResponseSink};
pub use writer::{ResponseWriter, WriteError};
