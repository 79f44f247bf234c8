//! E2E: the reference scenarios for packets, validation, migration and the
//! monitor.

use vse_metrics::{MetricMonitor, MetricSnapshot, TrendDirection};
use vse_migration::{migrate, migrate_to};
use vse_packet::{FoundationAnchor, Kbm, Layer, Packet, PacketError};
use vse_tests::kinetic_packet;
use vse_validator::validate;

#[test]
fn out_of_range_divergence_fails_construction() {
    let err = Packet::builder("x").divergence(1.5).build().unwrap_err();
    assert!(matches!(err, PacketError::InvalidPacket(_)));
}

#[test]
fn formal_academic_intent_migrates_with_gravitas() {
    let p = Packet::builder("write_formal_academic_paper")
        .version("1.3")
        .constraint("professional_tone")
        .divergence(0.15)
        .build()
        .unwrap();

    let m = migrate_to(&p, "1.4").unwrap();
    assert!(m
        .foundation
        .as_ref()
        .is_some_and(|f| f.contains(&FoundationAnchor::Gravitas)));
    assert_eq!(m.kbm, Some(Kbm::new(0.90, 0.95)));
    assert_eq!(m.kbm.unwrap().coherence_vector, vec![0.90, 0.95]);
}

#[test]
fn empty_intent_and_divergence_both_reported() {
    let mut p = Packet::builder("x").build().unwrap();
    p.intent = String::new();
    p.divergence = 1.5;

    let r = validate(&p, false);
    assert!(!r.valid);
    assert!(r.errors.iter().any(|e| e.contains("Intent cannot be empty")));
    assert!(r.errors.iter().any(|e| e.contains("Divergence must be in [0.0, 1.0]")));
}

#[test]
fn monitor_window_three_reports_rising() {
    let mut monitor = MetricMonitor::with_window(3).unwrap();
    for d in [0.1, 0.2, 0.3, 0.4] {
        monitor.record(MetricSnapshot::new(0.9, d, 0.8, 0.9));
    }
    assert_eq!(monitor.len(), 3);
    let trend = monitor.trend_by_name("divergence").unwrap();
    assert_eq!(trend.direction, TrendDirection::Rising);
    assert_eq!(trend.direction.to_string(), "rising");
}

#[test]
fn health_predicate_reference_values() {
    assert!(MetricSnapshot::new(0.9, 0.1, 0.8, 0.9).is_healthy());
    assert!(!MetricSnapshot::new(0.9, 0.35, 0.8, 0.9).is_healthy());
}

#[test]
fn downgrade_then_upgrade_is_lossy() {
    let original = kinetic_packet().unwrap();
    let round_trip = migrate(&migrate(&original, Layer::V13), Layer::Kinetic);

    assert_eq!(round_trip.layer(), Layer::Kinetic);
    assert!(round_trip.c_tvm.is_none());
    // Anchors are re-inferred from the text, not restored.
    assert_eq!(round_trip.foundation, Some(vec![FoundationAnchor::Gravitas]));
    assert_ne!(round_trip.foundation, original.foundation);
    assert_ne!(round_trip, original);
}

#[test]
fn labelled_v13_with_kinetic_fields_is_kinetic() {
    let p = Packet::builder("x")
        .version("1.3")
        .kbm(Kbm::new(0.5, 0.9))
        .build()
        .unwrap();
    assert_eq!(p.layer(), Layer::Kinetic);
    // Upgrading to kinetic is a no-op despite the label.
    assert_eq!(migrate(&p, Layer::Kinetic), p);
}
