use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, register_int_gauge, Encoder, HistogramVec,
    IntCounterVec, IntGauge, TextEncoder,
};

lazy_static! {
    // HTTP Metrics
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "http_requests_total",
        "Total number of HTTP requests",
        &["method", "path", "status"]
    )
    .unwrap();

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "path"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .unwrap();

    // Store Metrics (MongoDB)
    pub static ref DB_OPERATIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "db_operations_total",
        "Total number of database operations",
        &["operation", "collection", "status"]
    )
    .unwrap();

    pub static ref DB_OPERATION_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "db_operation_duration_seconds",
        "Database operation duration in seconds",
        &["operation", "collection"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]
    )
    .unwrap();

    // Game Metrics
    pub static ref GAME_SESSIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "game_sessions_total",
        "Game sessions by lifecycle event",
        &["status"]
    )
    .unwrap();

    pub static ref GAME_SESSIONS_ACTIVE: IntGauge = register_int_gauge!(
        "game_sessions_active",
        "Game sessions started and not yet ended by this process"
    )
    .unwrap();

    pub static ref ANSWERS_SUBMITTED_TOTAL: IntCounterVec = register_int_counter_vec!(
        "answers_submitted_total",
        "Total number of answers submitted",
        &["outcome"]
    )
    .unwrap();

    pub static ref LIFELINES_USED_TOTAL: IntCounterVec = register_int_counter_vec!(
        "lifelines_used_total",
        "Lifelines consumed by players",
        &["lifeline"]
    )
    .unwrap();

    pub static ref QUESTION_GENERATION_FAILURES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "question_generation_failures_total",
        "Question generations that ran out of content",
        &["stage"]
    )
    .unwrap();
}

/// Renders all metrics in Prometheus text format
pub fn render_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|e| prometheus::Error::Msg(format!("Failed to convert metrics to UTF-8: {}", e)))
}

/// Helper: track database operation with metrics
pub async fn track_db_operation<F, T>(
    operation: &str,
    collection: &str,
    future: F,
) -> Result<T, anyhow::Error>
where
    F: std::future::Future<Output = Result<T, anyhow::Error>>,
{
    let start = std::time::Instant::now();
    let result = future.await;
    let duration = start.elapsed().as_secs_f64();

    let status = if result.is_ok() { "success" } else { "error" };

    DB_OPERATIONS_TOTAL
        .with_label_values(&[operation, collection, status])
        .inc();

    DB_OPERATION_DURATION_SECONDS
        .with_label_values(&[operation, collection])
        .observe(duration);

    result
}

pub fn record_session_started() {
    GAME_SESSIONS_TOTAL.with_label_values(&["started"]).inc();
    GAME_SESSIONS_ACTIVE.inc();
}

pub fn record_session_ended(reason: &str) {
    GAME_SESSIONS_TOTAL.with_label_values(&[reason]).inc();
    GAME_SESSIONS_ACTIVE.dec();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_registration() {
        let _ = ANSWERS_SUBMITTED_TOTAL
            .with_label_values(&["correct"])
            .get();
    }

    #[test]
    fn test_render_metrics() {
        LIFELINES_USED_TOTAL.with_label_values(&["skip"]).inc();

        let result = render_metrics();
        assert!(result.is_ok());
        let output = result.unwrap();
        assert!(output.contains("lifelines_used_total"));
    }

    #[tokio::test]
    async fn track_db_operation_counts_failures() {
        let before = DB_OPERATIONS_TOTAL
            .with_label_values(&["find", "metrics_test", "error"])
            .get();

        let res: anyhow::Result<()> = track_db_operation("find", "metrics_test", async {
            Err(anyhow::anyhow!("down"))
        })
        .await;

        assert!(res.is_err());
        let after = DB_OPERATIONS_TOTAL
            .with_label_values(&["find", "metrics_test", "error"])
            .get();
        assert_eq!(after, before + 1);
    }
}
