//! # vse-metrics
//!
//! Scores generated text against a packet and tracks the scores over time.
//!
//! - [`engine`]: SCM, δ, SemCoh, ℜ and ℜ_net, plus [`MetricComputer`]
//! - [`snapshot`]: [`MetricSnapshot`] and the health predicate
//! - [`monitor`]: [`MetricMonitor`], a FIFO window with OLS trends and alerts
//! - [`config`]: TOML-loadable thresholds and monitor settings
//!
//! ```rust
//! use vse_metrics::{MetricMonitor, MetricSnapshot, TrendDirection};
//!
//! let mut monitor = MetricMonitor::with_window(3).unwrap();
//! for d in [0.1, 0.2, 0.3, 0.4] {
//!     monitor.record(MetricSnapshot::new(0.9, d, 0.8, 0.9));
//! }
//! assert_eq!(monitor.len(), 3);
//! assert_eq!(monitor.trend_by_name("divergence").unwrap().direction, TrendDirection::Rising);
//! ```

#![deny(unsafe_code)]

pub mod config;
pub mod engine;
pub mod error;
pub mod monitor;
pub mod snapshot;

pub use config::MetricsConfig;
pub use engine::{
    coherence, constraint_match, constraint_satisfied, cosine_similarity, divergence,
    network_resonance, resonance, Embedder, MetricComputer,
};
pub use error::{MetricsError, MetricsResult};
pub use monitor::{
    AlertKind, MetricField, MetricMonitor, MonitorAlert, MonitorConfig, Trend, TrendDirection,
};
pub use snapshot::{HealthThresholds, MetricSnapshot};
