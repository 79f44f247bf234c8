//! Point-in-time metric values and the health predicate over them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Thresholds for the health predicate.
///
/// A snapshot is healthy when `scm > scm_min`, `divergence < divergence_max`,
/// `semcoh > semcoh_min` and `resonance > resonance_min`. `resonance_net_min`
/// only affects the status mark in `Display`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthThresholds {
    pub scm_min: f64,
    pub divergence_max: f64,
    pub semcoh_min: f64,
    pub resonance_min: f64,
    pub resonance_net_min: f64,
}

impl Default for HealthThresholds {
    fn default() -> Self {
        Self {
            scm_min: 0.85,
            divergence_max: 0.30,
            semcoh_min: 0.70,
            resonance_min: 0.85,
            resonance_net_min: 0.80,
        }
    }
}

/// One measurement of the four core metrics, plus network resonance for
/// gregarious packets.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetricSnapshot {
    pub scm: f64,
    pub divergence: f64,
    pub semcoh: f64,
    pub resonance: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resonance_net: Option<f64>,
}

impl MetricSnapshot {
    pub fn new(scm: f64, divergence: f64, semcoh: f64, resonance: f64) -> Self {
        Self {
            scm,
            divergence,
            semcoh,
            resonance,
            resonance_net: None,
        }
    }

    pub fn with_network(mut self, resonance_net: f64) -> Self {
        self.resonance_net = Some(resonance_net);
        self
    }

    pub fn is_healthy(&self) -> bool {
        self.is_healthy_with(&HealthThresholds::default())
    }

    pub fn is_healthy_with(&self, t: &HealthThresholds) -> bool {
        self.scm > t.scm_min
            && self.divergence < t.divergence_max
            && self.semcoh > t.semcoh_min
            && self.resonance > t.resonance_min
    }
}

fn mark(ok: bool) -> &'static str {
    if ok {
        "✓"
    } else {
        "⚠"
    }
}

impl fmt::Display for MetricSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let t = HealthThresholds::default();
        let status = if self.is_healthy_with(&t) {
            "✓ HEALTHY"
        } else {
            "⚠ NEEDS ATTENTION"
        };
        writeln!(f, "{}", status)?;
        writeln!(f, "  SCM:       {:.3} {}", self.scm, mark(self.scm > t.scm_min))?;
        writeln!(
            f,
            "  δ:         {:.3} {}",
            self.divergence,
            mark(self.divergence < t.divergence_max)
        )?;
        writeln!(f, "  SemCoh:    {:.3} {}", self.semcoh, mark(self.semcoh > t.semcoh_min))?;
        writeln!(
            f,
            "  ℜ:         {:.3} {}",
            self.resonance,
            mark(self.resonance > t.resonance_min)
        )?;
        if let Some(net) = self.resonance_net {
            writeln!(f, "  ℜ_net:     {:.3} {}", net, mark(net > t.resonance_net_min))?;
        }
        Ok(())
    }
}
