//! Semantic cost accounting.
//!
//! Cost fidelity relates output quality to the resources spent producing it:
//! `(scm / δ_observed) · ‖C‖`, where `‖C‖` is a weighted sum of the cost
//! components.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::envelope::SimulationEnvelope;
use crate::error::{BridgeError, BridgeResult};

/// Floor applied to a non-positive constraint match.
const SCM_FLOOR: f64 = 1e-12;

/// Stand-in divergence when none was observed, or it was exactly zero.
const DELTA_FLOOR: f64 = 1e-6;

/// Resources consumed producing one output. All components are non-negative.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SemanticCostVector {
    pub e_cycles: f64,
    pub t_tokens: u64,
    pub m_memory: f64,
    pub a_alloc: f64,
}

impl SemanticCostVector {
    pub fn new(e_cycles: f64, t_tokens: u64, m_memory: f64, a_alloc: f64) -> BridgeResult<Self> {
        for (component, value) in [
            ("e_cycles", e_cycles),
            ("m_memory", m_memory),
            ("a_alloc", a_alloc),
        ] {
            if value.is_nan() || value < 0.0 {
                return Err(BridgeError::NegativeCost { component, value });
            }
        }
        Ok(Self {
            e_cycles,
            t_tokens,
            m_memory,
            a_alloc,
        })
    }

    /// Weighted magnitude `‖C‖`.
    pub fn magnitude(&self, weights: &CostWeights) -> f64 {
        self.e_cycles * weights.e_cycles
            + self.t_tokens as f64 * weights.t_tokens
            + self.m_memory * weights.m_memory
            + self.a_alloc * weights.a_alloc
    }
}

/// Per-component weights for [`SemanticCostVector::magnitude`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostWeights {
    pub e_cycles: f64,
    pub t_tokens: f64,
    pub m_memory: f64,
    pub a_alloc: f64,
}

impl Default for CostWeights {
    fn default() -> Self {
        Self {
            e_cycles: 1.0,
            t_tokens: 0.05,
            m_memory: 2.0,
            a_alloc: 3.0,
        }
    }
}

/// Synthetic cost for a payload of `payload_size` units, for sandbox runs
/// without real telemetry.
pub fn simulated_cost(payload_size: u64) -> SemanticCostVector {
    let cycles = payload_size as f64 * 1e6;
    SemanticCostVector {
        e_cycles: cycles,
        t_tokens: payload_size * 5,
        m_memory: cycles * 1e-4,
        a_alloc: cycles * 1e-6,
    }
}

/// Cost fidelity with the default weights.
pub fn cost_fidelity(envelope: &SimulationEnvelope, scm: f64) -> f64 {
    cost_fidelity_with(envelope, scm, &CostWeights::default())
}

pub fn cost_fidelity_with(envelope: &SimulationEnvelope, scm: f64, weights: &CostWeights) -> f64 {
    let scm = if scm <= 0.0 { SCM_FLOOR } else { scm };
    let fidelity = match envelope.observed_delta {
        Some(delta) if delta != 0.0 => scm / delta,
        _ => scm / DELTA_FLOOR,
    };
    let magnitude = envelope.cost.magnitude(weights);
    debug!(fidelity, magnitude, "computed cost fidelity");
    fidelity * magnitude
}
