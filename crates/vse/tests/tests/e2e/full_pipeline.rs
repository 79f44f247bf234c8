//! E2E: construct → validate → migrate → score → monitor → bridge.

use vse_bridge::{
    cost_fidelity, run_pipeline, simulated_cost, DriftWatchdog, HistoryEntry, PacketHandler,
    SimulationEnvelope,
};
use vse_metrics::{
    AlertKind, Embedder, MetricComputer, MetricField, MetricMonitor, MetricsConfig,
    TrendDirection,
};
use vse_migration::{analyze_migration, migrate};
use vse_packet::Layer;
use vse_tests::v13_packet;
use vse_validator::Validator;

/// Maps each output to a fixed point on a circle so divergence is
/// controlled by the test.
struct AngleEmbedder;

impl Embedder for AngleEmbedder {
    fn embed(&self, text: &str) -> Vec<f64> {
        let angle: f64 = text
            .strip_prefix("angle=")
            .and_then(|a| a.parse().ok())
            .unwrap_or(0.0);
        vec![angle.cos(), angle.sin()]
    }
}

#[test]
fn drifting_outputs_raise_alerts() {
    let packet = v13_packet("summarize_report", 0.2).unwrap();
    assert!(Validator::lenient().validate(&packet).is_valid());

    let analysis = analyze_migration(&packet);
    assert!(analysis.can_upgrade_to_gregarious);

    let upgraded = migrate(&packet, Layer::Gregarious);
    let report = Validator::lenient().validate(&upgraded);
    assert!(report.is_valid(), "{}", report);
    assert_eq!(report.layer, Layer::Gregarious);

    let config = MetricsConfig::from_toml_str("[monitor]\nwindow_size = 4\n").unwrap();
    let computer = MetricComputer::new(config.health);
    let mut monitor = MetricMonitor::new(config.monitor).unwrap();

    // The intent embeds at angle 0; outputs rotate away from it.
    let mut intent_packet = upgraded.clone();
    intent_packet.intent = "angle=0".into();
    for angle in [0.0, 0.3, 0.6, 0.9, 1.2] {
        let output = format!("angle={}", angle);
        let snapshot = computer
            .snapshot_with(&AngleEmbedder, &output, &intent_packet, None)
            .unwrap();
        monitor.record(snapshot);
    }

    assert_eq!(monitor.len(), 4);
    assert_eq!(monitor.trend(MetricField::Divergence).direction, TrendDirection::Rising);
    assert_eq!(monitor.trend(MetricField::Resonance).direction, TrendDirection::Falling);
    assert!(monitor.is_diverging(0.3));

    let alerts = monitor.evaluate();
    let kinds: Vec<(AlertKind, MetricField)> = alerts.iter().map(|a| (a.kind, a.field)).collect();
    assert!(kinds.contains(&(AlertKind::Divergence, MetricField::Divergence)));
    assert!(kinds.contains(&(AlertKind::Trend, MetricField::Divergence)));
    assert!(kinds.contains(&(AlertKind::Trend, MetricField::Resonance)));
    assert!(alerts.iter().all(|a| (0.0..=1.0).contains(&a.severity)));
}

struct Scorer {
    delta: f64,
}

impl PacketHandler for Scorer {
    fn handle(&self, mut envelope: SimulationEnvelope) -> SimulationEnvelope {
        envelope.observe_delta(self.delta);
        envelope.cost = simulated_cost(2);
        envelope.record(HistoryEntry::new("score"));
        envelope
    }
}

#[test]
fn agents_exchange_envelopes() {
    let packet = migrate(&v13_packet("route_claims", 0.3).unwrap(), Layer::Gregarious);

    let steady = Scorer { delta: 0.1 };
    let wild = Scorer { delta: 0.6 };

    let a = run_pipeline(&[&steady], SimulationEnvelope::new(packet.clone()));
    let b = run_pipeline(&[&wild], SimulationEnvelope::new(packet.clone()));

    assert_eq!(a.last_operation(), Some("score"));
    assert!(cost_fidelity(&a, 0.9) > cost_fidelity(&b, 0.9));

    let report = DriftWatchdog::default().inspect(&[a.clone(), b]);
    assert!(report.diverging);
    assert!(!DriftWatchdog::default().inspect(&[a.clone(), a]).diverging);
}
