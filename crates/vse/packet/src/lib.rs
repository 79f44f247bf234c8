//! # vse-packet
//!
//! Vector-Space Esperanto control packets.
//!
//! A [`Packet`] carries an intent, constraint tokens, an allowed semantic drift
//! (`divergence`) and protected strings, plus two optional extension groups:
//!
//! - **Kinetic**: [`Kbm`], [`CTvm`], [`FoundationAnchor`]s, [`MuLoop`]
//! - **Gregarious**: [`Gsn`], [`Evf`], the URP flag
//!
//! The capability [`Layer`] is always derived from which groups are populated;
//! the `version` string is a display label.
//!
//! Two serializations are supported: the bracketed text form
//! (`<VSE v1.4 | intent: … | divergence: 0.30>`) and JSON.
//!
//! ```rust
//! use vse_packet::{Kbm, Layer, Packet};
//!
//! let packet = Packet::builder("summarize_report")
//!     .constraints(["3_sentences", "formal_tone"])
//!     .divergence(0.2)
//!     .kbm(Kbm::new(0.8, 0.95))
//!     .build()
//!     .unwrap();
//! assert_eq!(packet.layer(), Layer::Kinetic);
//!
//! let parsed: Packet = packet.to_text().parse().unwrap();
//! assert_eq!(parsed, packet);
//! ```

#![deny(unsafe_code)]

pub mod error;
pub mod hash;
pub mod packet;
pub mod text;
pub mod types;

pub use error::{PacketError, PacketResult};
pub use hash::ContentHash;
pub use packet::{Packet, PacketBuilder, DEFAULT_DIVERGENCE, DEFAULT_VERSION, RESERVED_KEYS};
pub use text::parse_text;
pub use types::{CTvm, Evf, FoundationAnchor, Gsn, Kbm, Layer, MuLoop};

/// Parse a packet from its text form.
pub fn parse_packet(input: &str) -> PacketResult<Packet> {
    parse_text(input)
}
