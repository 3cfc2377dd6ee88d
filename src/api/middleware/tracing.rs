//! HTTP request/response tracing middleware.

use axum::extract::MatchedPath;
use axum::http::Request;
use tower_http::LatencyUnit;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, MakeSpan, TraceLayer};
use tracing::{Level, Span};

/// Span factory for incoming requests.
///
/// Records the route template (`/{alias}`, `/api/url/{alias}`) next to the
/// concrete path, so redirect traffic groups under one route in log queries.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestSpan;

impl<B> MakeSpan<B> for RequestSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        let route = request
            .extensions()
            .get::<MatchedPath>()
            .map(MatchedPath::as_str)
            .unwrap_or("unmatched");

        tracing::info_span!(
            "http_request",
            method = %request.method(),
            route,
            path = %request.uri().path(),
        )
    }
}

/// Creates the tracing middleware applied to every route.
///
/// One `INFO` span per request, closed by a response event with status and
/// latency in milliseconds:
///
/// ```text
/// INFO http_request{method=GET route=/{alias} path=/bGKXWuqfNR}: finished processing request latency=1 ms status=307
/// INFO http_request{method=POST route=/api/save path=/api/save}: finished processing request latency=4 ms status=200
/// ```
pub fn layer()
-> TraceLayer<SharedClassifier<ServerErrorsAsFailures>, RequestSpan, DefaultOnRequest, DefaultOnResponse>
{
    TraceLayer::new_for_http()
        .make_span_with(RequestSpan)
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        )
}
