//! Demo HTTP handlers.
//!
//! Every handler extracts the request `Parts` and returns whatever the
//! [`ResponseWriter`] renders, so all routes share one set of
//! status/content-type/body rules and the same `Accept` negotiation.

pub mod echo;
pub mod health;

pub use echo::{echo_handler, hello_handler};
pub use health::{health_handler, liveness_handler};

use std::time::Instant;

use crate::response::ResponseWriter;

/// Shared application state passed to all axum handlers via `State` extraction.
///
/// Cloning is cheap: the writer shares its registry through an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Renders handler outcomes.
    pub writer: ResponseWriter,
    /// Server process start time, used for uptime calculation.
    pub start_time: Instant,
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;
    use std::time::Instant;

    use axum::body::to_bytes;
    use axum::http::header::ACCEPT;
    use axum::http::request::Parts;
    use axum::http::Request;
    use axum::response::Response;
    use courier_core::SerializerRegistry;

    use super::AppState;
    use crate::response::ResponseWriter;

    pub fn test_state() -> AppState {
        AppState {
            writer: ResponseWriter::new(Arc::new(SerializerRegistry::default())),
            start_time: Instant::now(),
        }
    }

    pub fn parts(method: &str, accept: Option<&str>) -> Parts {
        let mut builder = Request::builder().method(method).uri("/");
        if let Some(accept) = accept {
            builder = builder.header(ACCEPT, accept);
        }
        builder.body(()).unwrap().into_parts().0
    }

    pub async fn body_bytes(response: Response) -> Vec<u8> {
        to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("collect body")
            .to_vec()
    }
}
