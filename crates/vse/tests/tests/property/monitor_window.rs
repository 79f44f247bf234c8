//! Property tests: the monitor window is a bounded FIFO.

use proptest::prelude::*;
use vse_metrics::{MetricField, MetricMonitor, MetricSnapshot, TrendDirection};

proptest! {
    #[test]
    fn window_keeps_last_n(
        window in 1usize..20,
        values in prop::collection::vec(0.0f64..=1.0, 0..50),
    ) {
        let mut monitor = MetricMonitor::with_window(window).unwrap();
        for d in &values {
            monitor.record(MetricSnapshot::new(0.9, *d, 0.8, 0.9));
        }

        let expected: Vec<f64> = values.iter().rev().take(window).rev().copied().collect();
        let kept: Vec<f64> = monitor.snapshots().map(|s| s.divergence).collect();
        prop_assert_eq!(monitor.len(), values.len().min(window));
        prop_assert_eq!(kept, expected);
        prop_assert_eq!(monitor.latest().map(|s| s.divergence), values.last().copied());
    }

    #[test]
    fn constant_series_is_stable(window in 2usize..20, v in 0.0f64..=1.0, n in 2usize..30) {
        let mut monitor = MetricMonitor::with_window(window).unwrap();
        for _ in 0..n {
            monitor.record(MetricSnapshot::new(v, v, v, v));
        }
        for field in MetricField::ALL {
            prop_assert_eq!(monitor.trend(field).direction, TrendDirection::Stable);
        }
    }

    #[test]
    fn divergence_alert_matches_is_diverging(
        values in prop::collection::vec(0.0f64..=1.0, 0..15),
    ) {
        let mut monitor = MetricMonitor::default();
        for d in &values {
            monitor.record(MetricSnapshot::new(0.9, *d, 0.8, 0.9));
        }
        let threshold = monitor.config().divergence_threshold;
        let alerted = monitor
            .evaluate()
            .iter()
            .any(|a| a.kind == vse_metrics::AlertKind::Divergence);
        prop_assert_eq!(alerted, monitor.is_diverging(threshold));
    }
}
