//! Observability
//!
//! In-process counters and duration histograms recorded by the scenario
//! executor. Logging goes through `tracing` directly.

pub mod metrics;

pub use metrics::{names, Counter, Histogram, Metrics, MetricsCollector, MetricsSnapshot};
