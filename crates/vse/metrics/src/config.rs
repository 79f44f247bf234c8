use serde::{Deserialize, Serialize};

use crate::error::{MetricsError, MetricsResult};
use crate::monitor::MonitorConfig;
use crate::snapshot::HealthThresholds;

/// Combined metrics configuration, loadable from TOML.
///
/// ```toml
/// [health]
/// scm_min = 0.9
///
/// [monitor]
/// window_size = 5
/// divergence_threshold = 0.25
/// ```
///
/// Missing tables and keys take their defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub health: HealthThresholds,
    pub monitor: MonitorConfig,
}

impl MetricsConfig {
    pub fn from_toml_str(s: &str) -> MetricsResult<Self> {
        let config: MetricsConfig =
            toml::from_str(s).map_err(|e| MetricsError::Config(e.to_string()))?;
        config.monitor.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> MetricsResult<String> {
        toml::to_string_pretty(self).map_err(|e| MetricsError::Config(e.to_string()))
    }
}
