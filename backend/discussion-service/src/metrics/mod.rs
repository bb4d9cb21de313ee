//! Prometheus metrics for discussion-service.
//!
//! Exposes content collectors and an HTTP handler for the `/metrics` endpoint.

use actix_web::HttpResponse;
use lazy_static::lazy_static;
use prometheus::{
    register_int_counter, register_int_counter_vec, Encoder, IntCounter, IntCounterVec,
    TextEncoder,
};

use crate::error::ContentError;

lazy_static! {
    /// Posts created.
    pub static ref POSTS_CREATED_TOTAL: IntCounter = register_int_counter!(
        "discussion_posts_created_total",
        "Total posts created"
    )
    .expect("failed to register discussion_posts_created_total");

    /// Comments created, segmented by root/reply.
    pub static ref COMMENTS_CREATED_TOTAL: IntCounterVec = register_int_counter_vec!(
        "discussion_comments_created_total",
        "Total comments created segmented by kind",
        &["kind"]
    )
    .expect("failed to register discussion_comments_created_total");

    /// Failed service operations, segmented by operation and error code.
    pub static ref CONTENT_ERRORS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "discussion_content_errors_total",
        "Failed content operations segmented by operation and error code",
        &["operation", "code"]
    )
    .expect("failed to register discussion_content_errors_total");
}

/// Count a failed operation. Returns the error so it can be used inside `map_err`.
pub fn record_error(operation: &str, err: ContentError) -> ContentError {
    CONTENT_ERRORS_TOTAL
        .with_label_values(&[operation, err.code()])
        .inc();
    err
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
