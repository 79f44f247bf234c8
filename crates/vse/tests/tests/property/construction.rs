//! Property tests: construction accepts exactly the divergences in [0, 1].

use proptest::prelude::*;
use vse_packet::{Kbm, Packet, PacketError};

proptest! {
    #[test]
    fn divergence_in_range_builds(d in 0.0f64..=1.0) {
        let packet = Packet::builder("x").divergence(d).build();
        prop_assert!(packet.is_ok());
        prop_assert_eq!(packet.unwrap().divergence, d);
    }

    #[test]
    fn divergence_above_range_fails(d in 1.0f64..1e6) {
        prop_assume!(d > 1.0);
        let err = Packet::builder("x").divergence(d).build().unwrap_err();
        prop_assert!(matches!(err, PacketError::InvalidPacket(_)));
    }

    #[test]
    fn divergence_below_range_fails(d in -1e6f64..0.0) {
        prop_assert!(Packet::builder("x").divergence(d).build().is_err());
    }

    #[test]
    fn kbm_ordering_enforced(a in 0.0f64..=1.0, b in 0.0f64..=1.0) {
        let result = Packet::builder("x").kbm(Kbm::new(a, b)).build();
        prop_assert_eq!(result.is_ok(), a <= b);
    }
}

#[test]
fn nan_divergence_fails() {
    assert!(Packet::builder("x").divergence(f64::NAN).build().is_err());
}
