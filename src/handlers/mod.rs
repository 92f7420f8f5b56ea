mod health;
mod metrics;
mod report;

pub use health::health_handler;
pub use metrics::metrics_handler;
pub use report::report_handler;
