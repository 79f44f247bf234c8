//! Property tests: the text form round-trips core fields, and JSON
//! round-trips everything.

use proptest::prelude::*;
use vse_packet::{Packet, PacketBuilder};

fn arb_core_packet() -> impl Strategy<Value = Packet> {
    (
        r#"[A-Za-z0-9 \t|\[\]{}",.:<>'\\_-]{0,30}"#,
        prop::collection::vec(r#"[A-Za-z0-9 \t|\[\]{}",.:<>'\\_-]{0,12}"#, 0..5),
        0.0f64..=1.0,
        prop::collection::vec(r#"[A-Za-z0-9 |\[\]{}",.:<>'-]{1,20}"#, 0..4),
    )
        .prop_map(|(intent, constraints, divergence, immune)| {
            let builder = immune
                .into_iter()
                .fold(PacketBuilder::new(intent), |b, s| b.immune(s));
            builder
                .constraints(constraints)
                .divergence(divergence)
                .build()
                .unwrap()
        })
}

fn arb_extras() -> impl Strategy<Value = Vec<(String, serde_json::Value)>> {
    prop::collection::vec(
        (
            "[a-z][a-z_]{0,8}x",
            prop_oneof![
                r#"[A-Za-z0-9 |\[\]",:]{0,12}"#.prop_map(serde_json::Value::from),
                any::<i32>().prop_map(serde_json::Value::from),
                any::<bool>().prop_map(serde_json::Value::from),
            ],
        ),
        0..3,
    )
}

proptest! {
    #[test]
    fn extras_survive_both_codecs(p in arb_core_packet(), extras in arb_extras()) {
        let p = extras
            .into_iter()
            .fold(p, |mut p, (k, v)| { p.extras.insert(k, v); p });
        prop_assert!(p.check_extra_keys().is_ok());
        let via_text = Packet::from_text(&p.to_text()).unwrap();
        prop_assert_eq!(&via_text, &p);
        let via_json = Packet::from_json(&via_text.to_json().unwrap()).unwrap();
        prop_assert_eq!(via_json.layer(), p.layer());
        prop_assert_eq!(via_json, p);
    }

    #[test]
    fn text_roundtrip_preserves_core(p in arb_core_packet()) {
        let parsed: Packet = p.to_text().parse().unwrap();
        prop_assert_eq!(&parsed.intent, &p.intent);
        prop_assert_eq!(&parsed.constraints, &p.constraints);
        prop_assert_eq!(parsed.divergence, p.divergence);
        prop_assert_eq!(&parsed.immune, &p.immune);
    }

    #[test]
    fn compact_text_roundtrip_is_identity(p in arb_core_packet()) {
        let parsed = Packet::from_text(&p.to_text_compact()).unwrap();
        prop_assert_eq!(parsed, p);
    }

    #[test]
    fn json_roundtrip_is_identity(p in arb_core_packet()) {
        let json = p.to_json().unwrap();
        prop_assert_eq!(Packet::from_json(&json).unwrap(), p);
    }

    #[test]
    fn content_hash_is_deterministic(p in arb_core_packet()) {
        prop_assert_eq!(p.content_hash(), p.clone().content_hash());
    }
}
