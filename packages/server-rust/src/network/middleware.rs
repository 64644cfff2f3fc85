//! Tower middleware wrapped around every route.
//!
//! Each layer is switched by [`NetworkConfig`]: CORS only when origins are
//! configured, gzip only when `compress_responses` is set. The request
//! timeout and tracing always apply. The writer never sees these layers.

use std::time::Duration;

use axum::body::Body;
use axum::http::header::{ACCEPT, CONTENT_TYPE};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info_span, Span};

use super::config::NetworkConfig;

/// Wraps `router` in the layers `config` asks for.
///
/// Outermost to innermost: trace, gzip, CORS, timeout (408).
pub fn with_http_layers<S>(router: Router<S>, config: &NetworkConfig) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let mut router = router.layer(TimeoutLayer::with_status_code(
        StatusCode::REQUEST_TIMEOUT,
        config.request_timeout,
    ));

    if let Some(cors) = build_cors_layer(&config.cors_origins) {
        router = router.layer(cors);
    }
    if config.compress_responses {
        router = router.layer(CompressionLayer::new());
    }

    router.layer(TraceLayer::new_for_http().make_span_with(request_span))
}

/// One span per request, carrying the `Accept` value negotiation will see.
fn request_span(request: &Request<Body>) -> Span {
    let accept = request
        .headers()
        .get(ACCEPT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");

    info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        accept,
    )
}

/// CORS for the configured origins, `None` when there are none.
///
/// Browsers must be allowed to send `Accept` and `Content-Type`, since
/// negotiation and body decoding depend on them.
fn build_cors_layer(origins: &[String]) -> Option<CorsLayer> {
    if origins.is_empty() {
        return None;
    }

    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let parsed: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        AllowOrigin::list(parsed)
    };

    Some(
        CorsLayer::new()
            .allow_origin(allow_origin)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([ACCEPT, CONTENT_TYPE])
            .max_age(Duration::from_secs(600)),
    )
}

#[cfg(test)]
mod tests {
    use axum::http::header::{
        ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_REQUEST_METHOD, ACCEPT_ENCODING,
        CONTENT_ENCODING, ORIGIN,
    };
    use axum::response::Response;
    use axum::routing::get;
    use tower::ServiceExt;

    use super::*;

    fn app(config: &NetworkConfig) -> Router {
        let router = Router::new()
            .route("/big", get(|| async { "x".repeat(4096) }))
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    "late"
                }),
            );
        with_http_layers(router, config)
    }

    async fn call(config: &NetworkConfig, request: Request<Body>) -> Response {
        app(config).oneshot(request).await.unwrap()
    }

    fn preflight() -> Request<Body> {
        Request::builder()
            .method(Method::OPTIONS)
            .uri("/big")
            .header(ORIGIN, "http://localhost:3000")
            .header(ACCESS_CONTROL_REQUEST_METHOD, "GET")
            .body(Body::empty())
            .unwrap()
    }

    fn gzip_request() -> Request<Body> {
        Request::get("/big")
            .header(ACCEPT_ENCODING, "gzip")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn cors_answers_preflight_for_listed_origin() {
        let config = NetworkConfig {
            cors_origins: vec!["http://localhost:3000".to_string()],
            ..NetworkConfig::default()
        };

        let response = call(&config, preflight()).await;

        assert_eq!(
            response.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:3000"
        );
    }

    #[tokio::test]
    async fn no_origins_means_no_cors_headers() {
        let config = NetworkConfig {
            cors_origins: Vec::new(),
            ..NetworkConfig::default()
        };

        let response = call(&config, preflight()).await;

        assert!(response.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }

    #[test]
    fn unparsable_origins_are_skipped() {
        let origins = vec![
            "http://localhost:3000".to_string(),
            "not a header\nvalue".to_string(),
        ];
        assert!(build_cors_layer(&origins).is_some());
    }

    #[tokio::test]
    async fn gzip_when_enabled() {
        let response = call(&NetworkConfig::default(), gzip_request()).await;

        assert_eq!(response.headers().get(CONTENT_ENCODING).unwrap(), "gzip");
    }

    #[tokio::test]
    async fn plain_body_when_compression_disabled() {
        let config = NetworkConfig {
            compress_responses: false,
            ..NetworkConfig::default()
        };

        let response = call(&config, gzip_request()).await;

        assert!(response.headers().get(CONTENT_ENCODING).is_none());
    }

    #[tokio::test]
    async fn slow_requests_time_out_with_408() {
        let config = NetworkConfig {
            request_timeout: Duration::from_millis(20),
            ..NetworkConfig::default()
        };

        let response = call(
            &config,
            Request::get("/slow").body(Body::empty()).unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    }
}
