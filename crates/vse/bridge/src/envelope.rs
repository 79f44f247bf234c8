//! The record agents pass around during a simulation.
//!
//! A [`SimulationEnvelope`] wraps a packet with the mutable state a
//! simulation needs: the divergence actually observed, the resources spent,
//! and an append-only history of operations applied to it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;
use vse_packet::Packet;

use crate::cost::SemanticCostVector;

/// One step in an envelope's history.
///
/// `sigma` and `lambda` are the semantic vectors before and after the
/// operation, kept as free-form JSON maps.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(default)]
    pub sigma: Map<String, Value>,
    #[serde(default)]
    pub lambda: Map<String, Value>,
    pub operation: String,
    #[serde(default)]
    pub meta: Map<String, Value>,
}

impl HistoryEntry {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            ..Default::default()
        }
    }

    pub fn with_sigma(mut self, sigma: Map<String, Value>) -> Self {
        self.sigma = sigma;
        self
    }

    pub fn with_lambda(mut self, lambda: Map<String, Value>) -> Self {
        self.lambda = lambda;
        self
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: Value) -> Self {
        self.meta.insert(key.into(), value);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationEnvelope {
    pub packet: Packet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_delta: Option<f64>,
    #[serde(default)]
    pub cost: SemanticCostVector,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

impl SimulationEnvelope {
    pub fn new(packet: Packet) -> Self {
        Self {
            packet,
            observed_delta: None,
            cost: SemanticCostVector::default(),
            history: Vec::new(),
        }
    }

    pub fn observe_delta(&mut self, delta: f64) {
        self.observed_delta = Some(delta);
    }

    pub fn record(&mut self, entry: HistoryEntry) {
        debug!(
            operation = %entry.operation,
            depth = self.history.len() + 1,
            "envelope history appended"
        );
        self.history.push(entry);
    }

    pub fn last_operation(&self) -> Option<&str> {
        self.history.last().map(|e| e.operation.as_str())
    }

    pub fn into_packet(self) -> Packet {
        self.packet
    }
}

impl From<Packet> for SimulationEnvelope {
    fn from(packet: Packet) -> Self {
        Self::new(packet)
    }
}

/// Implemented by agents that transform envelopes.
pub trait PacketHandler: Send + Sync {
    fn handle(&self, envelope: SimulationEnvelope) -> SimulationEnvelope;
}

/// Pass `envelope` through each handler in order.
pub fn run_pipeline(
    handlers: &[&dyn PacketHandler],
    envelope: SimulationEnvelope,
) -> SimulationEnvelope {
    handlers.iter().fold(envelope, |env, handler| handler.handle(env))
}
