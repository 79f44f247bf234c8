//! E2E: both serializations for packets at every layer.

use serde_json::Value;
use vse_packet::{parse_packet, Layer, Packet, PacketError};
use vse_tests::{gregarious_packet, kinetic_packet, v13_packet};

#[test]
fn every_layer_roundtrips_through_text() {
    for packet in [
        v13_packet("summarize_report", 0.2).unwrap(),
        kinetic_packet().unwrap(),
        gregarious_packet().unwrap(),
    ] {
        let spaced = parse_packet(&packet.to_text()).unwrap();
        let compact = parse_packet(&packet.to_text_compact()).unwrap();
        assert_eq!(spaced, packet);
        assert_eq!(compact, packet);
        assert_eq!(spaced.layer(), packet.layer());
    }
}

#[test]
fn every_layer_roundtrips_through_json() {
    for packet in [
        v13_packet("summarize_report", 0.2).unwrap(),
        kinetic_packet().unwrap(),
        gregarious_packet().unwrap(),
    ] {
        let json = packet.to_json_pretty().unwrap();
        assert_eq!(Packet::from_json(&json).unwrap(), packet);
    }
}

#[test]
fn json_omits_unset_fields() {
    let json = v13_packet("x", 0.2).unwrap().to_json().unwrap();
    let value: Value = serde_json::from_str(&json).unwrap();
    let obj = value.as_object().unwrap();
    for absent in ["kbm", "c_tvm", "foundation", "mu_loop", "gsn", "evf"] {
        assert!(!obj.contains_key(absent), "{} should be omitted", absent);
    }
    assert_eq!(obj["version"], "1.3");
}

#[test]
fn json_absent_and_empty_are_equivalent() {
    let a = Packet::from_json(r#"{"intent": "x"}"#).unwrap();
    let b = Packet::from_json(r#"{"intent": "x", "constraints": [], "immune": []}"#).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.layer(), Layer::V13);
}

#[test]
fn json_extras_survive() {
    let p = Packet::from_json(r#"{"intent": "x", "priority": 3}"#).unwrap();
    assert_eq!(p.extras["priority"], 3);
    let back = Packet::from_json(&p.to_json().unwrap()).unwrap();
    assert_eq!(back, p);
}

#[test]
fn unknown_text_keys_survive() {
    let p = parse_packet("<VSE v1.4 | intent: x | divergence: 0.30 | audience: board>").unwrap();
    assert_eq!(p.extras["audience"], "board");
    let again = parse_packet(&p.to_text()).unwrap();
    assert_eq!(again, p);
}

#[test]
fn json_shape_violations_are_parse_errors() {
    for bad in [
        r#"{"intent": "x", "c_tvm": ["p", "c"]}"#,
        r#"{"intent": "x", "evf": ["seed", "wide", 3]}"#,
        r#"{"intent": "x", "gsn": {"link_vectors": "not-a-list"}}"#,
    ] {
        let err = Packet::from_json(bad).unwrap_err();
        assert!(matches!(err, PacketError::Parse(_)), "{}", bad);
    }
}

#[test]
fn json_invariants_checked_on_decode() {
    let err = Packet::from_json(r#"{"intent": "x", "divergence": 2.0}"#).unwrap_err();
    assert!(matches!(err, PacketError::InvalidPacket(_)));
}

#[test]
fn grammar_characters_survive_text() {
    let p = Packet::builder("compare A | B")
        .constraints(["tone, formal", "avoid_\"jargon", "a] | divergence: 0.99 | z: [b"])
        .divergence(0.15)
        .build()
        .unwrap();
    let back = parse_packet(&p.to_text()).unwrap();
    assert_eq!(back, p);
    assert_eq!(back.divergence, 0.15);
    assert!(back.extras.is_empty());
}

#[test]
fn codec_field_names_cannot_be_extras() {
    let err = Packet::from_json(r#"{"intent": "x", "urp": "enabled"}"#).unwrap_err();
    assert!(matches!(err, PacketError::Parse(_)));

    let err = parse_packet("<VSE v1.4 | intent: x | urp_enabled: yes>").unwrap_err();
    assert!(matches!(err, PacketError::Parse(_)));
}
