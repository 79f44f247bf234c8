//! Drift watchdog across agents.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::envelope::SimulationEnvelope;

/// Default max-minus-min spread of observed deltas tolerated across agents.
pub const DEFAULT_DIVERGENCE_SPREAD: f64 = 0.3;

/// Mean of `deltas`, or `None` when there are none.
pub fn evaluate_drift(deltas: &[f64]) -> Option<f64> {
    if deltas.is_empty() {
        return None;
    }
    Some(deltas.iter().sum::<f64>() / deltas.len() as f64)
}

/// True when the spread between the largest and smallest delta exceeds
/// `spread`. Fewer than two deltas never diverge.
pub fn detect_cross_agent_divergence(deltas: &[f64], spread: f64) -> bool {
    let max = deltas.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = deltas.iter().copied().fold(f64::INFINITY, f64::min);
    deltas.len() > 1 && max - min > spread
}

/// Observed deltas of a set of envelopes. Envelopes with nothing observed
/// count as zero drift.
pub fn observed_deltas(envelopes: &[SimulationEnvelope]) -> Vec<f64> {
    envelopes
        .iter()
        .map(|e| e.observed_delta.unwrap_or(0.0))
        .collect()
}

/// Summary of drift across a round of agent outputs.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DriftReport {
    pub mean_delta: Option<f64>,
    pub diverging: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriftWatchdog {
    pub spread: f64,
}

impl Default for DriftWatchdog {
    fn default() -> Self {
        Self {
            spread: DEFAULT_DIVERGENCE_SPREAD,
        }
    }
}

impl DriftWatchdog {
    pub fn new(spread: f64) -> Self {
        Self { spread }
    }

    pub fn inspect(&self, envelopes: &[SimulationEnvelope]) -> DriftReport {
        let deltas = observed_deltas(envelopes);
        let report = DriftReport {
            mean_delta: evaluate_drift(&deltas),
            diverging: detect_cross_agent_divergence(&deltas, self.spread),
        };
        if report.diverging {
            warn!(
                agents = deltas.len(),
                spread = self.spread,
                "cross-agent divergence detected"
            );
        }
        report
    }
}
