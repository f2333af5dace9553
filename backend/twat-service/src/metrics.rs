//! Prometheus metrics for twat-service.
//!
//! Exposes RPC and media-upload collectors and an HTTP handler for the `/metrics` endpoint.

use actix_web::HttpResponse;
use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec, IntCounterVec,
    TextEncoder,
};

lazy_static! {
    /// RPC calls by procedure path and result code (`OK` or an error code).
    pub static ref RPC_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "rpc_requests_total",
        "Total RPC calls segmented by procedure and result code",
        &["procedure", "code"]
    )
    .expect("failed to register rpc_requests_total");

    /// RPC call latency by procedure path.
    pub static ref RPC_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "rpc_request_duration_seconds",
        "RPC call duration segmented by procedure",
        &["procedure"]
    )
    .expect("failed to register rpc_request_duration_seconds");

    /// Media uploads by outcome (success/error).
    pub static ref MEDIA_UPLOADS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "media_uploads_total",
        "Media upload attempts segmented by outcome",
        &["result"]
    )
    .expect("failed to register media_uploads_total");
}

/// Actix handler that renders Prometheus metrics in text format.
pub async fn serve_metrics() -> HttpResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        return HttpResponse::InternalServerError().body(err.to_string());
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}
