//! # vse-bridge
//!
//! Adapter between VSE packets and a multi-agent simulation. Agents exchange
//! [`SimulationEnvelope`]s rather than bare packets; the envelope carries the
//! observed divergence, a [`SemanticCostVector`] and an operation history.
//!
//! Also provides cost fidelity (`(scm / δ) · ‖C‖`) and a cross-agent drift
//! watchdog.

#![deny(unsafe_code)]

pub mod cost;
pub mod drift;
pub mod envelope;
pub mod error;

pub use cost::{cost_fidelity, cost_fidelity_with, simulated_cost, CostWeights, SemanticCostVector};
pub use drift::{
    detect_cross_agent_divergence, evaluate_drift, observed_deltas, DriftReport, DriftWatchdog,
    DEFAULT_DIVERGENCE_SPREAD,
};
pub use envelope::{run_pipeline, HistoryEntry, PacketHandler, SimulationEnvelope};
pub use error::{BridgeError, BridgeResult};
