use std::fmt;

use serde::{Deserialize, Serialize};
use vse_packet::Layer;

/// Outcome of validating a packet. `valid` is exactly `errors.is_empty()`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub layer: Layer,
}

impl ValidationResult {
    pub fn new(errors: Vec<String>, warnings: Vec<String>, layer: Layer) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
            warnings,
            layer,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.valid {
            write!(f, "Valid VSE {} packet", self.layer)?;
        } else {
            write!(f, "Invalid VSE packet")?;
            write!(f, "\n{} error(s):", self.errors.len())?;
            for e in &self.errors {
                write!(f, "\n  - {}", e)?;
            }
        }
        if !self.warnings.is_empty() {
            write!(f, "\n{} warning(s):", self.warnings.len())?;
            for w in &self.warnings {
                write!(f, "\n  - {}", w)?;
            }
        }
        Ok(())
    }
}
