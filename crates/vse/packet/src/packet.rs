//! The packet record, its construction-time invariants and JSON mapping.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{PacketError, PacketResult};
use crate::hash::ContentHash;
use crate::types::{CTvm, Evf, FoundationAnchor, Gsn, Kbm, Layer, MuLoop};

/// Default version label for newly constructed packets.
pub const DEFAULT_VERSION: &str = "1.4";
/// Default allowed drift when none is given.
pub const DEFAULT_DIVERGENCE: f64 = 0.3;

/// Field names claimed by the text or JSON codec. None may be used as an extra
/// key, or a packet would change meaning when moved between codecs.
pub const RESERVED_KEYS: [&str; 13] = [
    "version",
    "intent",
    "constraints",
    "divergence",
    "immune",
    "kbm",
    "c_tvm",
    "foundation",
    "mu_loop",
    "gsn",
    "evf",
    "urp",
    "urp_enabled",
];

fn default_version() -> String {
    DEFAULT_VERSION.to_string()
}

fn default_divergence() -> f64 {
    DEFAULT_DIVERGENCE
}

fn is_false(b: &bool) -> bool {
    !*b
}

fn is_none_or_empty<T>(v: &Option<Vec<T>>) -> bool {
    v.as_ref().map_or(true, Vec::is_empty)
}

/// A VSE control packet.
///
/// Fields are public. Only [`Packet::check_invariants`] (run by the builder and
/// both decoders) is enforced at construction; everything else is reported by
/// the validator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Packet {
    /// Display label only. The effective tier is [`Packet::layer`].
    #[serde(default = "default_version")]
    pub version: String,
    pub intent: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<String>,
    #[serde(default = "default_divergence")]
    pub divergence: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub immune: Vec<String>,

    // Kinetic group
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kbm: Option<Kbm>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub c_tvm: Option<CTvm>,
    #[serde(default, skip_serializing_if = "is_none_or_empty")]
    pub foundation: Option<Vec<FoundationAnchor>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mu_loop: Option<MuLoop>,

    // Gregarious group
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gsn: Option<Gsn>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evf: Option<Evf>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub urp_enabled: bool,

    /// Keys this version does not understand, preserved through both codecs.
    #[serde(flatten)]
    pub extras: BTreeMap<String, serde_json::Value>,
}

impl Packet {
    pub fn builder(intent: impl Into<String>) -> PacketBuilder {
        PacketBuilder::new(intent)
    }

    /// Check the construction-time invariants: divergence range, KBM shape and
    /// ordering, and GSN curiosity range.
    pub fn check_invariants(&self) -> PacketResult<()> {
        if !(0.0..=1.0).contains(&self.divergence) {
            return Err(PacketError::InvalidPacket(format!(
                "divergence must be in [0.0, 1.0], got {}",
                self.divergence
            )));
        }

        if let Some(kbm) = &self.kbm {
            match kbm.bounds() {
                Some((min, max)) if min <= max => {}
                _ => {
                    return Err(PacketError::InvalidPacket(format!(
                        "coherence_vector must be [min, max] with min <= max, got {:?}",
                        kbm.coherence_vector
                    )))
                }
            }
        }

        if let Some(cf) = self.gsn.as_ref().and_then(|g| g.curiosity_factor) {
            if !(0.0..=1.0).contains(&cf) {
                return Err(PacketError::InvalidPacket(format!(
                    "curiosity_factor must be in [0.0, 1.0], got {}",
                    cf
                )));
            }
        }

        Ok(())
    }

    /// Reject extra keys that collide with a codec field name or cannot be
    /// written as a text segment key.
    pub fn check_extra_keys(&self) -> PacketResult<()> {
        for key in self.extras.keys() {
            if RESERVED_KEYS.contains(&key.as_str()) {
                return Err(PacketError::Parse(format!(
                    "'{}' is a reserved field name and cannot be an extra key",
                    key
                )));
            }
            if key.is_empty()
                || key.trim() != key.as_str()
                || key.contains(&[':', '|', '[', ']', '{', '}', '"', '<', '>'][..])
            {
                return Err(PacketError::Parse(format!("invalid extra key '{}'", key)));
            }
        }
        Ok(())
    }

    pub fn has_kinetic_fields(&self) -> bool {
        self.kbm.is_some()
            || self.c_tvm.is_some()
            || !is_none_or_empty(&self.foundation)
            || self.mu_loop.is_some()
    }

    pub fn has_gregarious_fields(&self) -> bool {
        self.gsn.is_some() || self.evf.is_some() || self.urp_enabled
    }

    /// Derived capability layer. Gregarious wins when both groups are populated.
    pub fn layer(&self) -> Layer {
        if self.has_gregarious_fields() {
            Layer::Gregarious
        } else if self.has_kinetic_fields() {
            Layer::Kinetic
        } else {
            Layer::V13
        }
    }

    /// Copy of the four core fields with every extension dropped.
    pub fn core_only(&self, version: impl Into<String>) -> Packet {
        Packet {
            version: version.into(),
            intent: self.intent.clone(),
            constraints: self.constraints.clone(),
            divergence: self.divergence,
            immune: self.immune.clone(),
            kbm: None,
            c_tvm: None,
            foundation: None,
            mu_loop: None,
            gsn: None,
            evf: None,
            urp_enabled: false,
            extras: BTreeMap::new(),
        }
    }

    pub fn to_json(&self) -> PacketResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> PacketResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> PacketResult<Packet> {
        let packet: Packet = serde_json::from_str(json)?;
        packet.check_invariants()?;
        packet.check_extra_keys()?;
        tracing::debug!(layer = %packet.layer(), extras = packet.extras.len(), "decoded json packet");
        Ok(packet)
    }

    /// BLAKE3 fingerprint of the canonical (compact JSON) form.
    pub fn content_hash(&self) -> ContentHash {
        ContentHash::hash(&serde_json::to_vec(self).unwrap_or_default())
    }

    /// Deterministic hash of the intent string, stable across processes.
    pub fn stable_intent_hash(&self) -> u64 {
        ContentHash::hash(self.intent.as_bytes()).prefix_u64()
    }
}

/// Fluent constructor that enforces [`Packet::check_invariants`] on `build`.
#[derive(Clone, Debug)]
pub struct PacketBuilder {
    packet: Packet,
}

impl PacketBuilder {
    pub fn new(intent: impl Into<String>) -> Self {
        Self {
            packet: Packet {
                version: default_version(),
                intent: intent.into(),
                constraints: Vec::new(),
                divergence: DEFAULT_DIVERGENCE,
                immune: Vec::new(),
                kbm: None,
                c_tvm: None,
                foundation: None,
                mu_loop: None,
                gsn: None,
                evf: None,
                urp_enabled: false,
                extras: BTreeMap::new(),
            },
        }
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.packet.version = version.into();
        self
    }

    pub fn constraint(mut self, constraint: impl Into<String>) -> Self {
        self.packet.constraints.push(constraint.into());
        self
    }

    pub fn constraints<I, S>(mut self, constraints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.packet
            .constraints
            .extend(constraints.into_iter().map(Into::into));
        self
    }

    pub fn divergence(mut self, divergence: f64) -> Self {
        self.packet.divergence = divergence;
        self
    }

    pub fn immune(mut self, protected: impl Into<String>) -> Self {
        self.packet.immune.push(protected.into());
        self
    }

    pub fn kbm(mut self, kbm: Kbm) -> Self {
        self.packet.kbm = Some(kbm);
        self
    }

    pub fn c_tvm(mut self, c_tvm: CTvm) -> Self {
        self.packet.c_tvm = Some(c_tvm);
        self
    }

    pub fn foundation<I, A>(mut self, anchors: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<FoundationAnchor>,
    {
        self.packet.foundation = Some(anchors.into_iter().map(Into::into).collect());
        self
    }

    pub fn mu_loop(mut self, mu_loop: MuLoop) -> Self {
        self.packet.mu_loop = Some(mu_loop);
        self
    }

    pub fn gsn(mut self, gsn: Gsn) -> Self {
        self.packet.gsn = Some(gsn);
        self
    }

    pub fn evf(mut self, evf: Evf) -> Self {
        self.packet.evf = Some(evf);
        self
    }

    pub fn urp_enabled(mut self, enabled: bool) -> Self {
        self.packet.urp_enabled = enabled;
        self
    }

    pub fn extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.packet.extras.insert(key.into(), value);
        self
    }

    pub fn build(self) -> PacketResult<Packet> {
        self.packet.check_invariants()?;
        self.packet.check_extra_keys()?;
        Ok(self.packet)
    }
}
