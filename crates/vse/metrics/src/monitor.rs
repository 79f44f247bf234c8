//! Sliding-window monitor over metric snapshots.

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use vse_packet::MuLoop;

use crate::error::{MetricsError, MetricsResult};
use crate::snapshot::MetricSnapshot;

/// Upper bound on the history buffer reserved up front. Larger windows grow on demand.
const PREALLOCATED_HISTORY: usize = 64;

/// Monitor settings.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Number of snapshots retained.
    pub window_size: usize,
    /// Slopes within ±tolerance are reported as stable.
    pub trend_tolerance: f64,
    /// Latest divergence above this raises an alert.
    pub divergence_threshold: f64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            window_size: 10,
            trend_tolerance: 0.01,
            divergence_threshold: 0.3,
        }
    }
}

impl MonitorConfig {
    pub fn validate(&self) -> MetricsResult<()> {
        if self.window_size == 0 {
            return Err(MetricsError::InvalidWindow(self.window_size));
        }
        Ok(())
    }
}

/// A trendable snapshot field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricField {
    Scm,
    Divergence,
    Semcoh,
    Resonance,
}

impl MetricField {
    pub const ALL: [MetricField; 4] = [
        MetricField::Scm,
        MetricField::Divergence,
        MetricField::Semcoh,
        MetricField::Resonance,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            MetricField::Scm => "scm",
            MetricField::Divergence => "divergence",
            MetricField::Semcoh => "semcoh",
            MetricField::Resonance => "resonance",
        }
    }

    pub fn value(&self, snapshot: &MetricSnapshot) -> f64 {
        match self {
            MetricField::Scm => snapshot.scm,
            MetricField::Divergence => snapshot.divergence,
            MetricField::Semcoh => snapshot.semcoh,
            MetricField::Resonance => snapshot.resonance,
        }
    }

    /// Whether a rising value is good for this field. Divergence is the only
    /// field where lower is better.
    pub fn higher_is_better(&self) -> bool {
        !matches!(self, MetricField::Divergence)
    }
}

impl fmt::Display for MetricField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MetricField {
    type Err = MetricsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scm" => Ok(MetricField::Scm),
            "divergence" | "delta" => Ok(MetricField::Divergence),
            "semcoh" => Ok(MetricField::Semcoh),
            "resonance" => Ok(MetricField::Resonance),
            other => Err(MetricsError::UnknownField(other.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Rising,
    Falling,
    Stable,
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendDirection::Rising => write!(f, "rising"),
            TrendDirection::Falling => write!(f, "falling"),
            TrendDirection::Stable => write!(f, "stable"),
        }
    }
}

/// OLS slope of a field against window position, with its classification.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trend {
    pub slope: f64,
    pub direction: TrendDirection,
}

impl Trend {
    pub const STABLE: Trend = Trend {
        slope: 0.0,
        direction: TrendDirection::Stable,
    };
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertKind {
    /// Latest divergence exceeded the configured threshold.
    Divergence,
    /// A field is trending in its unhealthy direction.
    Trend,
}

/// An alert raised by [`MetricMonitor::evaluate`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MonitorAlert {
    pub kind: AlertKind,
    pub field: MetricField,
    /// Severity in [0.0, 1.0].
    pub severity: f64,
    pub description: String,
    pub current_value: f64,
    pub threshold: f64,
}

impl MonitorAlert {
    pub fn new(
        kind: AlertKind,
        field: MetricField,
        severity: f64,
        description: impl Into<String>,
        current_value: f64,
        threshold: f64,
    ) -> Self {
        Self {
            kind,
            field,
            severity: severity.clamp(0.0, 1.0),
            description: description.into(),
            current_value,
            threshold,
        }
    }
}

/// Fixed-capacity FIFO of snapshots with trend and divergence checks.
///
/// Single writer: `record` takes `&mut self`. Share across threads behind a
/// `Mutex` if needed.
#[derive(Clone, Debug)]
pub struct MetricMonitor {
    config: MonitorConfig,
    history: VecDeque<MetricSnapshot>,
}

impl Default for MetricMonitor {
    fn default() -> Self {
        let config = MonitorConfig::default();
        Self {
            history: VecDeque::with_capacity(config.window_size.min(PREALLOCATED_HISTORY)),
            config,
        }
    }
}

impl MetricMonitor {
    pub fn new(config: MonitorConfig) -> MetricsResult<Self> {
        config.validate()?;
        Ok(Self {
            history: VecDeque::with_capacity(config.window_size.min(PREALLOCATED_HISTORY)),
            config,
        })
    }

    pub fn with_window(window_size: usize) -> MetricsResult<Self> {
        Self::new(MonitorConfig {
            window_size,
            ..Default::default()
        })
    }

    /// Monitor sized and thresholded by a packet's μ-Loop.
    pub fn from_mu_loop(mu_loop: &MuLoop) -> MetricsResult<Self> {
        let window_size = usize::try_from(mu_loop.window_size).unwrap_or(0);
        Self::new(MonitorConfig {
            window_size,
            divergence_threshold: mu_loop.threshold,
            ..Default::default()
        })
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn record(&mut self, snapshot: MetricSnapshot) {
        if self.history.len() == self.config.window_size {
            self.history.pop_front();
        }
        self.history.push_back(snapshot);

        if snapshot.divergence > self.config.divergence_threshold {
            warn!(
                divergence = snapshot.divergence,
                threshold = self.config.divergence_threshold,
                "snapshot exceeds divergence threshold"
            );
        } else {
            debug!(
                divergence = snapshot.divergence,
                samples = self.history.len(),
                "recorded metric snapshot"
            );
        }
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn latest(&self) -> Option<&MetricSnapshot> {
        self.history.back()
    }

    /// Oldest first.
    pub fn snapshots(&self) -> impl Iterator<Item = &MetricSnapshot> {
        self.history.iter()
    }

    pub fn trend(&self, field: MetricField) -> Trend {
        let n = self.history.len();
        if n < 2 {
            return Trend::STABLE;
        }

        let x_mean = (n - 1) as f64 / 2.0;
        let y_mean = self.history.iter().map(|s| field.value(s)).sum::<f64>() / n as f64;

        let (num, den) = self
            .history
            .iter()
            .enumerate()
            .fold((0.0, 0.0), |(num, den), (i, s)| {
                let dx = i as f64 - x_mean;
                (num + dx * (field.value(s) - y_mean), den + dx * dx)
            });

        if den == 0.0 {
            return Trend::STABLE;
        }

        let slope = num / den;
        let tolerance = self.config.trend_tolerance;
        let direction = if slope > tolerance {
            TrendDirection::Rising
        } else if slope < -tolerance {
            TrendDirection::Falling
        } else {
            TrendDirection::Stable
        };
        Trend { slope, direction }
    }

    pub fn trend_by_name(&self, field: &str) -> MetricsResult<Trend> {
        Ok(self.trend(field.parse()?))
    }

    /// Whether the most recent snapshot's divergence exceeds `threshold`.
    pub fn is_diverging(&self, threshold: f64) -> bool {
        self.latest().is_some_and(|s| s.divergence > threshold)
    }

    /// Field-wise mean across the window. `resonance_net` is averaged over the
    /// snapshots that carry it.
    pub fn average(&self) -> Option<MetricSnapshot> {
        if self.history.is_empty() {
            return None;
        }
        let n = self.history.len() as f64;
        let mean = |field: MetricField| self.history.iter().map(|s| field.value(s)).sum::<f64>() / n;

        let nets: Vec<f64> = self.history.iter().filter_map(|s| s.resonance_net).collect();
        let resonance_net = if nets.is_empty() {
            None
        } else {
            Some(nets.iter().sum::<f64>() / nets.len() as f64)
        };

        Some(MetricSnapshot {
            scm: mean(MetricField::Scm),
            divergence: mean(MetricField::Divergence),
            semcoh: mean(MetricField::Semcoh),
            resonance: mean(MetricField::Resonance),
            resonance_net,
        })
    }

    /// Alerts for the current window: a divergence alert when the latest
    /// snapshot exceeds the configured threshold, then one trend alert per
    /// field moving in its unhealthy direction.
    pub fn evaluate(&self) -> Vec<MonitorAlert> {
        let mut alerts = Vec::new();
        let threshold = self.config.divergence_threshold;

        if let Some(latest) = self.latest() {
            if latest.divergence > threshold {
                let severity = if threshold < 1.0 {
                    (latest.divergence - threshold) / (1.0 - threshold)
                } else {
                    1.0
                };
                alerts.push(MonitorAlert::new(
                    AlertKind::Divergence,
                    MetricField::Divergence,
                    severity,
                    format!(
                        "Divergence {:.3} exceeds threshold {:.3}",
                        latest.divergence, threshold
                    ),
                    latest.divergence,
                    threshold,
                ));
            }
        }

        for field in MetricField::ALL {
            let trend = self.trend(field);
            let unhealthy = match trend.direction {
                TrendDirection::Rising => !field.higher_is_better(),
                TrendDirection::Falling => field.higher_is_better(),
                TrendDirection::Stable => false,
            };
            if unhealthy {
                let current = self.latest().map(|s| field.value(s)).unwrap_or_default();
                alerts.push(MonitorAlert::new(
                    AlertKind::Trend,
                    field,
                    trend.slope.abs() * 10.0,
                    format!("{} is {} (slope {:.4})", field, trend.direction, trend.slope),
                    current,
                    self.config.trend_tolerance,
                ));
            }
        }

        if !alerts.is_empty() {
            debug!(alerts = alerts.len(), samples = self.history.len(), "monitor raised alerts");
        }
        alerts
    }
}
