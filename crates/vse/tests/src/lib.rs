//! Shared fixtures for the VSE integration tests.

use vse_packet::{CTvm, Evf, Gsn, Kbm, MuLoop, Packet, PacketResult};

/// Core-only packet labelled "1.3".
pub fn v13_packet(intent: &str, divergence: f64) -> PacketResult<Packet> {
    Packet::builder(intent)
        .version("1.3")
        .constraints(["3_sentences", "formal_tone"])
        .divergence(divergence)
        .immune("Q3 revenue")
        .build()
}

/// Packet with every kinetic field set.
pub fn kinetic_packet() -> PacketResult<Packet> {
    Packet::builder("draft_policy_memo")
        .constraints(["formal_tone", "chronological"])
        .divergence(0.25)
        .kbm(Kbm::new(0.75, 0.9))
        .c_tvm(CTvm::new("premise_1", "conclusion_1", 800))
        .foundation(["Gravitas", "Fulcrum"])
        .mu_loop(MuLoop::new(10, 0.25))
        .build()
}

/// Packet with kinetic and gregarious fields set.
pub fn gregarious_packet() -> PacketResult<Packet> {
    Packet::builder("explore_market_entry")
        .constraints(["5_sentences"])
        .divergence(0.4)
        .immune("ACME Corp")
        .kbm(Kbm::new(0.6, 0.85))
        .mu_loop(MuLoop::new(8, 0.4))
        .gsn(
            Gsn::new("market-net")
                .with_curiosity(0.4)
                .with_links(vec!["peer-a".into(), "peer-b".into()]),
        )
        .evf(Evf::new("seed_entry", 0.5, 6))
        .urp_enabled(true)
        .build()
}
