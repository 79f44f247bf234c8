//! Property tests: migration is deterministic, idempotent and pure.

use proptest::prelude::*;
use vse_migration::{migrate, migrate_to};
use vse_packet::{Layer, Packet};

fn arb_v13_packet() -> impl Strategy<Value = Packet> {
    (
        "[a-z][a-z_ ]{0,40}",
        prop::collection::vec("[a-z_]{1,16}", 0..4),
        0.0f64..=1.0,
    )
        .prop_map(|(intent, constraints, divergence)| {
            Packet::builder(intent)
                .version("1.3")
                .constraints(constraints)
                .divergence(divergence)
                .build()
                .unwrap()
        })
}

fn arb_layer() -> impl Strategy<Value = Layer> {
    prop_oneof![Just(Layer::V13), Just(Layer::Kinetic), Just(Layer::Gregarious)]
}

proptest! {
    #[test]
    fn upgrade_is_idempotent(p in arb_v13_packet()) {
        let once = migrate_to(&p, "1.4").unwrap();
        let twice = migrate_to(&once, "1.4").unwrap();
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn any_target_is_idempotent(p in arb_v13_packet(), target in arb_layer()) {
        let once = migrate(&p, target);
        prop_assert_eq!(migrate(&once, target), once.clone());
        prop_assert_eq!(once.layer(), target);
    }

    #[test]
    fn migration_never_touches_input(p in arb_v13_packet(), target in arb_layer()) {
        let before = p.clone();
        let k = migrate(&p, Layer::Kinetic);
        let _ = migrate(&k, target);
        prop_assert_eq!(&p, &before);
        prop_assert!(k.gsn.is_none());
    }

    #[test]
    fn upgraded_packets_keep_core_fields(p in arb_v13_packet(), target in arb_layer()) {
        let m = migrate(&p, target);
        prop_assert_eq!(&m.intent, &p.intent);
        prop_assert_eq!(&m.constraints, &p.constraints);
        prop_assert_eq!(m.divergence, p.divergence);
        prop_assert_eq!(&m.immune, &p.immune);
    }

    #[test]
    fn migrated_packets_satisfy_invariants(p in arb_v13_packet(), target in arb_layer()) {
        prop_assert!(migrate(&p, target).check_invariants().is_ok());
    }
}
