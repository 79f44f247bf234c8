//! Extension field types and the derived capability layer.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PacketError;

/// Capability tier of a packet, derived from which extension groups are populated.
///
/// Ordered: `V13 < Kinetic < Gregarious`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Layer {
    #[serde(rename = "v1.3")]
    V13,
    #[serde(rename = "v1.4-kinetic")]
    Kinetic,
    #[serde(rename = "v1.4-gregarious")]
    Gregarious,
}

impl Layer {
    pub const fn name(&self) -> &'static str {
        match self {
            Layer::V13 => "v1.3",
            Layer::Kinetic => "v1.4-kinetic",
            Layer::Gregarious => "v1.4-gregarious",
        }
    }

    /// Version label a packet at this layer carries after migration.
    pub const fn version_label(&self) -> &'static str {
        match self {
            Layer::V13 => "1.3",
            Layer::Kinetic | Layer::Gregarious => "1.4",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Layer {
    type Err = PacketError;

    /// Accepts layer names (`v1.4-kinetic`) as well as bare version targets
    /// (`1.3`, `1.4`). A bare `1.4` means the kinetic layer.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        let normalized = normalized.strip_prefix('v').unwrap_or(&normalized);
        match normalized {
            "1.3" => Ok(Layer::V13),
            "1.4" | "1.4-kinetic" | "kinetic" => Ok(Layer::Kinetic),
            "1.4-gregarious" | "gregarious" => Ok(Layer::Gregarious),
            _ => Err(PacketError::Parse(format!("unknown layer: '{}'", s))),
        }
    }
}

/// Kinetic Boundary Management: the coherence interval a generator should stay within.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Kbm {
    /// `[min, max]`.
    pub coherence_vector: Vec<f64>,
}

impl Kbm {
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            coherence_vector: vec![min, max],
        }
    }

    /// `(min, max)` when the vector has the expected shape.
    pub fn bounds(&self) -> Option<(f64, f64)> {
        match self.coherence_vector.as_slice() {
            [min, max] => Some((*min, *max)),
            _ => None,
        }
    }

    pub fn width(&self) -> Option<f64> {
        self.bounds().map(|(min, max)| max - min)
    }
}

/// Contextual token-vector mapping: premise/conclusion references plus a token budget.
///
/// Encoded as a JSON triple `["premise", "conclusion", budget]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "(String, String, i64)", into = "(String, String, i64)")]
pub struct CTvm {
    pub premise: String,
    pub conclusion: String,
    pub token_budget: i64,
}

impl CTvm {
    pub fn new(premise: impl Into<String>, conclusion: impl Into<String>, token_budget: i64) -> Self {
        Self {
            premise: premise.into(),
            conclusion: conclusion.into(),
            token_budget,
        }
    }
}

impl From<(String, String, i64)> for CTvm {
    fn from((premise, conclusion, token_budget): (String, String, i64)) -> Self {
        Self {
            premise,
            conclusion,
            token_budget,
        }
    }
}

impl From<CTvm> for (String, String, i64) {
    fn from(c: CTvm) -> Self {
        (c.premise, c.conclusion, c.token_budget)
    }
}

/// Semantic stability anchor. Open vocabulary with four canonical names.
///
/// Equality and hashing go by [`FoundationAnchor::name`], so a `Custom` holding a
/// canonical name equals the canonical variant. Build anchors with
/// [`FoundationAnchor::new`] to get the canonical variant directly.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FoundationAnchor {
    Milieu,
    Gravitas,
    Fulcrum,
    Ambience,
    Custom(String),
}

impl FoundationAnchor {
    pub const CANONICAL: [FoundationAnchor; 4] = [
        FoundationAnchor::Milieu,
        FoundationAnchor::Gravitas,
        FoundationAnchor::Fulcrum,
        FoundationAnchor::Ambience,
    ];

    /// Anchor named `name`, normalized to the canonical variant when one matches.
    pub fn new(name: impl Into<String>) -> Self {
        FoundationAnchor::from(name.into())
    }

    pub fn name(&self) -> &str {
        match self {
            FoundationAnchor::Milieu => "Milieu",
            FoundationAnchor::Gravitas => "Gravitas",
            FoundationAnchor::Fulcrum => "Fulcrum",
            FoundationAnchor::Ambience => "Ambience",
            FoundationAnchor::Custom(name) => name,
        }
    }

    pub fn is_canonical(&self) -> bool {
        Self::CANONICAL.iter().any(|c| c.name() == self.name())
    }
}

impl PartialEq for FoundationAnchor {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}

impl Eq for FoundationAnchor {}

impl Hash for FoundationAnchor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name().hash(state);
    }
}

impl From<String> for FoundationAnchor {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Milieu" => FoundationAnchor::Milieu,
            "Gravitas" => FoundationAnchor::Gravitas,
            "Fulcrum" => FoundationAnchor::Fulcrum,
            "Ambience" => FoundationAnchor::Ambience,
            _ => FoundationAnchor::Custom(s),
        }
    }
}

impl From<&str> for FoundationAnchor {
    fn from(s: &str) -> Self {
        FoundationAnchor::from(s.to_string())
    }
}

impl From<FoundationAnchor> for String {
    fn from(a: FoundationAnchor) -> Self {
        match a {
            FoundationAnchor::Custom(name) => name,
            other => other.name().to_string(),
        }
    }
}

impl fmt::Display for FoundationAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// μ-Loop: sliding-window drift check configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MuLoop {
    pub window_size: i64,
    pub threshold: f64,
}

impl MuLoop {
    pub fn new(window_size: i64, threshold: f64) -> Self {
        Self {
            window_size,
            threshold,
        }
    }
}

/// Gregarious semantic network descriptor.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Gsn {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curiosity_factor: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_vectors: Option<Vec<String>>,
}

impl Gsn {
    pub fn new(network_id: impl Into<String>) -> Self {
        Self {
            network_id: Some(network_id.into()),
            ..Default::default()
        }
    }

    pub fn with_curiosity(mut self, factor: f64) -> Self {
        self.curiosity_factor = Some(factor);
        self
    }

    pub fn with_links(mut self, links: Vec<String>) -> Self {
        self.link_vectors = Some(links);
        self
    }
}

/// Exploratory vector field: seed reference, radius and branch limit.
///
/// Encoded as a JSON triple `["seed", radius, branch_limit]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "(String, f64, i64)", into = "(String, f64, i64)")]
pub struct Evf {
    pub seed: String,
    pub radius: f64,
    pub branch_limit: i64,
}

impl Evf {
    pub fn new(seed: impl Into<String>, radius: f64, branch_limit: i64) -> Self {
        Self {
            seed: seed.into(),
            radius,
            branch_limit,
        }
    }
}

impl From<(String, f64, i64)> for Evf {
    fn from((seed, radius, branch_limit): (String, f64, i64)) -> Self {
        Self {
            seed,
            radius,
            branch_limit,
        }
    }
}

impl From<Evf> for (String, f64, i64) {
    fn from(e: Evf) -> Self {
        (e.seed, e.radius, e.branch_limit)
    }
}
