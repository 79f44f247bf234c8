//! Layer transitions.
//!
//! Every transition returns a new packet; the input is never touched.
//! [`upgrade_in_place`] is the only mutating entry point.

use tracing::{debug, info};
use vse_packet::{Gsn, Kbm, Layer, MuLoop, Packet};

use crate::error::{MigrationError, MigrationResult};
use crate::foundation::infer_foundation;

/// Window size given to the μ-Loop of an upgraded packet.
pub const DEFAULT_MU_WINDOW: i64 = 10;

/// Upper bound on the curiosity factor of an auto-joined network.
pub const MAX_AUTO_CURIOSITY: f64 = 0.5;

/// Coherence bounds implied by a divergence setting.
pub fn kbm_for_divergence(divergence: f64) -> Kbm {
    if divergence < 0.2 {
        Kbm::new(0.90, 0.95)
    } else if divergence < 0.4 {
        Kbm::new(0.75, 0.90)
    } else {
        Kbm::new(0.60, 0.85)
    }
}

/// Conservative GSN block for a packet joining a network automatically.
///
/// The network id is derived from a stable hash of the intent, so the same
/// intent always lands on the same network across runs.
pub fn auto_gsn(packet: &Packet) -> Gsn {
    Gsn::new(format!("auto-{}", packet.stable_intent_hash() % 10_000))
        .with_curiosity(packet.divergence.min(MAX_AUTO_CURIOSITY))
}

/// Move `packet` to `target`.
///
/// - A `V13` target strips every extension from a higher-layer packet and
///   relabels it as "1.3".
/// - An upgrade target above the current layer adds inferred fields.
/// - Any other target, including `V13` for a packet already at `V13`, returns
///   an unchanged clone.
pub fn migrate(packet: &Packet, target: Layer) -> Packet {
    let current = packet.layer();

    if target == Layer::V13 && current != Layer::V13 {
        info!(from = %current, to = %target, "downgrading packet");
        return packet.core_only(Layer::V13.version_label());
    }

    if target <= current {
        debug!(layer = %current, target = %target, "migration is a no-op");
        return packet.clone();
    }

    info!(from = %current, to = %target, "upgrading packet");
    match (current, target) {
        (Layer::V13, Layer::Kinetic) => to_kinetic(packet),
        (Layer::V13, Layer::Gregarious) => {
            let mut upgraded = to_kinetic(packet);
            upgraded.gsn = Some(auto_gsn(packet));
            upgraded
        }
        _ => {
            let mut upgraded = packet.clone();
            upgraded.gsn = Some(auto_gsn(packet));
            upgraded
        }
    }
}

/// Parse `target` as a version or layer name and migrate.
pub fn migrate_to(packet: &Packet, target: &str) -> MigrationResult<Packet> {
    let layer: Layer = target
        .parse()
        .map_err(|_| MigrationError::UnknownTarget(target.to_string()))?;
    Ok(migrate(packet, layer))
}

/// Replace `packet` with its migration to `target`. Returns the resulting layer.
pub fn upgrade_in_place(packet: &mut Packet, target: Layer) -> Layer {
    *packet = migrate(packet, target);
    packet.layer()
}

fn to_kinetic(packet: &Packet) -> Packet {
    let mut upgraded = packet.core_only(Layer::Kinetic.version_label());
    upgraded.kbm = Some(kbm_for_divergence(packet.divergence));
    upgraded.foundation = infer_foundation(&packet.intent, &packet.constraints);
    upgraded.mu_loop = Some(MuLoop::new(DEFAULT_MU_WINDOW, packet.divergence));
    upgraded
}
