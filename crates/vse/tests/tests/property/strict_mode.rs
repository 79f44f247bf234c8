//! Property tests: strict mode only ever promotes warnings.

use proptest::prelude::*;
use vse_packet::{Kbm, Packet};
use vse_validator::{validate, ValidationResult};

fn arb_packet() -> impl Strategy<Value = Packet> {
    (
        "[ a-z]{0,30}",
        prop::collection::vec("[ a-z_]{0,10}", 0..4),
        -0.5f64..1.5,
        prop::collection::vec("[a-z]{0,8}", 0..3),
        prop::option::of((0.0f64..=1.0, 0.0f64..=1.0)),
    )
        .prop_map(|(intent, constraints, divergence, immune, kbm)| {
            let mut p = Packet::builder("placeholder").build().unwrap();
            p.intent = intent;
            p.constraints = constraints;
            p.divergence = divergence;
            p.immune = immune;
            p.kbm = kbm.map(|(a, b)| Kbm::new(a.min(b), a.max(b)));
            p
        })
}

fn both(p: &Packet) -> (ValidationResult, ValidationResult) {
    (validate(p, false), validate(p, true))
}

proptest! {
    #[test]
    fn strict_errors_are_lenient_errors_plus_warnings(p in arb_packet()) {
        let (lenient, strict) = both(&p);
        let mut expected = lenient.errors.clone();
        expected.extend(lenient.warnings.iter().cloned());
        prop_assert_eq!(strict.errors, expected);
        prop_assert!(strict.warnings.is_empty());
    }

    #[test]
    fn strict_unchanged_without_warnings(p in arb_packet()) {
        let (lenient, strict) = both(&p);
        if lenient.warnings.is_empty() {
            prop_assert_eq!(strict.errors, lenient.errors);
            prop_assert_eq!(strict.valid, lenient.valid);
        } else {
            prop_assert!(!strict.valid);
        }
    }

    #[test]
    fn valid_iff_no_errors(p in arb_packet(), strict in any::<bool>()) {
        let r = validate(&p, strict);
        prop_assert_eq!(r.valid, r.errors.is_empty());
        prop_assert_eq!(r.layer, p.layer());
    }
}
