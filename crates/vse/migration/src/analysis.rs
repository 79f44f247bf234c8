//! Migration planning.

use serde::{Deserialize, Serialize};
use vse_packet::{Layer, Packet};

/// A possible upgrade and what it unlocks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedUpgrade {
    pub target: Layer,
    pub benefits: Vec<String>,
}

impl SuggestedUpgrade {
    fn new(target: Layer, benefits: &[&str]) -> Self {
        Self {
            target,
            benefits: benefits.iter().map(|b| b.to_string()).collect(),
        }
    }
}

/// What migrating a packet would do, without doing it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationAnalysis {
    pub current_layer: Layer,
    pub version: String,
    pub can_upgrade_to_kinetic: bool,
    pub can_upgrade_to_gregarious: bool,
    pub suggested_upgrades: Vec<SuggestedUpgrade>,
}

pub fn analyze_migration(packet: &Packet) -> MigrationAnalysis {
    let current = packet.layer();

    let suggested_upgrades = match current {
        Layer::V13 => vec![
            SuggestedUpgrade::new(
                Layer::Kinetic,
                &[
                    "Dynamic coherence control via KBM",
                    "Real-time monitoring with μ-Loop",
                    "Foundation anchors for semantic stability",
                ],
            ),
            SuggestedUpgrade::new(
                Layer::Gregarious,
                &[
                    "Network-scale coordination via GSN",
                    "Exploratory vector fields for discovery",
                    "Universal Resonance Protocol for stability",
                ],
            ),
        ],
        Layer::Kinetic => vec![SuggestedUpgrade::new(
            Layer::Gregarious,
            &[
                "Multi-agent semantic coordination",
                "Curiosity-driven exploration",
                "Network resonance measurement",
            ],
        )],
        Layer::Gregarious => Vec::new(),
    };

    MigrationAnalysis {
        current_layer: current,
        version: packet.version.clone(),
        can_upgrade_to_kinetic: current < Layer::Kinetic,
        can_upgrade_to_gregarious: current < Layer::Gregarious,
        suggested_upgrades,
    }
}
