use lazy_static::lazy_static;
use prometheus::{
    Counter, CounterVec, Gauge, Histogram, register_counter, register_counter_vec, register_gauge,
    register_histogram,
};


lazy_static! {
    pub static ref REPORTS_TOTAL: Counter =
        register_counter!("relay_reports_total", "Total number of reports received").unwrap();
    pub static ref REPORTS_REJECTED: CounterVec = register_counter_vec!(
        "relay_reports_rejected_total",
        "Reports that ended in an error response",
        &["reason"]
    )
    .unwrap();
    pub static ref REPORTS_FORWARDED: Counter =
        register_counter!("relay_reports_forwarded_total", "Reports accepted by the sink").unwrap();
    pub static ref SINK_LATENCY: Histogram = register_histogram!(
        "relay_sink_latency_seconds",
        "Latency of the outbound sink call in seconds"
    )
    .unwrap();
    pub static ref TRACKED_CLIENTS: Gauge =
        register_gauge!("relay_tracked_clients", "Clients currently held by the burst tracker").unwrap();
}

pub fn record_rejected(reason: &str) {
    REPORTS_REJECTED.with_label_values(&[reason]).inc();
}
