use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

static REQUEST_COUNT: AtomicU64 = AtomicU64::new(0);
static ERROR_COUNT: AtomicU64 = AtomicU64::new(0);
static ASSIGNMENT_COUNT: AtomicU64 = AtomicU64::new(0);
static ASSIGNMENT_FAILURE_COUNT: AtomicU64 = AtomicU64::new(0);

pub fn increment_request_count() {
    REQUEST_COUNT.fetch_add(1, Ordering::Relaxed);
}

pub fn increment_error_count() {
    ERROR_COUNT.fetch_add(1, Ordering::Relaxed);
}

pub fn increment_assignment_count() {
    ASSIGNMENT_COUNT.fetch_add(1, Ordering::Relaxed);
}

/// Swallowed assigner failures land here so they stay queryable instead of
/// only being printed to the log.
pub fn increment_assignment_failure_count() {
    ASSIGNMENT_FAILURE_COUNT.fetch_add(1, Ordering::Relaxed);
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct MetricsResponse {
    pub http_requests_total: u64,
    pub http_errors_total: u64,
    pub student_id_assignments_total: u64,
    pub student_id_assignment_failures_total: u64,
}

#[utoipa::path(
    get,
    path = "/metrics",
    tag = "Health",
    responses(
        (status = 200, description = "System metrics", body = MetricsResponse)
    )
)]
pub async fn get_metrics() -> HttpResponse {
    let requests = REQUEST_COUNT.load(Ordering::Relaxed);
    let errors = ERROR_COUNT.load(Ordering::Relaxed);
    let assignments = ASSIGNMENT_COUNT.load(Ordering::Relaxed);
    let assignment_failures = ASSIGNMENT_FAILURE_COUNT.load(Ordering::Relaxed);

    let metrics = format!(
        "# HELP http_requests_total Total number of HTTP requests\n\
         # TYPE http_requests_total counter\n\
         http_requests_total {}\n\
         \n\
         # HELP http_errors_total Total number of HTTP errors\n\
         # TYPE http_errors_total counter\n\
         http_errors_total {}\n\
         \n\
         # HELP student_id_assignments_total Total number of student IDs assigned\n\
         # TYPE student_id_assignments_total counter\n\
         student_id_assignments_total {}\n\
         \n\
         # HELP student_id_assignment_failures_total Total number of swallowed assignment failures\n\
         # TYPE student_id_assignment_failures_total counter\n\
         student_id_assignment_failures_total {}\n",
        requests, errors, assignments, assignment_failures
    );

    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(metrics)
}
