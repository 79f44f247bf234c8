//! Rule groups for packet validation.

use tracing::debug;
use vse_packet::Packet;

use crate::result::ValidationResult;

const MAX_INTENT_CHARS: usize = 200;
const MAX_IMMUNE_CHARS: usize = 500;
const HIGH_DIVERGENCE: f64 = 0.7;
const TIGHT_KBM_WIDTH: f64 = 0.05;
const MAX_TOKEN_BUDGET: i64 = 10_000;
const HIGH_CURIOSITY: f64 = 0.8;
const MAX_LINK_VECTORS: usize = 100;
const MAX_BRANCH_LIMIT: i64 = 20;
const CONFLICT_DIVERGENCE: f64 = 0.5;
const CONFLICT_KBM_WIDTH: f64 = 0.1;

fn in_unit_range(x: f64) -> bool {
    (0.0..=1.0).contains(&x)
}

#[derive(Default)]
struct Findings {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl Findings {
    fn error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn warn(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }
}

/// Packet validator.
///
/// Runs four rule groups in order: core fields, kinetic fields (only when any
/// is set), gregarious fields (only when any is set) and cross-field
/// conflicts. In strict mode every warning is moved to the error list after
/// all rules have run; rule evaluation is otherwise identical.
#[derive(Clone, Copy, Debug, Default)]
pub struct Validator {
    strict: bool,
}

impl Validator {
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }

    pub fn lenient() -> Self {
        Self::new(false)
    }

    pub fn strict() -> Self {
        Self::new(true)
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn validate(&self, packet: &Packet) -> ValidationResult {
        let mut findings = Findings::default();

        check_core(packet, &mut findings);
        if packet.has_kinetic_fields() {
            check_kinetic(packet, &mut findings);
        }
        if packet.has_gregarious_fields() {
            check_gregarious(packet, &mut findings);
        }
        check_conflicts(packet, &mut findings);

        let Findings {
            mut errors,
            mut warnings,
        } = findings;
        if self.strict {
            errors.append(&mut warnings);
        }

        let result = ValidationResult::new(errors, warnings, packet.layer());
        debug!(
            layer = %result.layer,
            strict = self.strict,
            errors = result.errors.len(),
            warnings = result.warnings.len(),
            "packet validated"
        );
        result
    }
}

/// Validate `packet`, promoting warnings to errors when `strict` is set.
pub fn validate(packet: &Packet, strict: bool) -> ValidationResult {
    Validator::new(strict).validate(packet)
}

fn check_core(packet: &Packet, out: &mut Findings) {
    // Intent
    if packet.intent.is_empty() {
        out.error("Intent cannot be empty");
    } else {
        let len = packet.intent.chars().count();
        if len > MAX_INTENT_CHARS {
            out.warn(format!("Intent is very long ({} chars)", len));
        }
    }

    // Divergence
    let d = packet.divergence;
    if !in_unit_range(d) {
        out.error(format!("Divergence must be in [0.0, 1.0], got {}", d));
    } else if d > HIGH_DIVERGENCE {
        out.warn(format!("High divergence ({}) may reduce determinism", d));
    }

    // Constraints
    if packet.constraints.is_empty() {
        out.warn("No constraints specified - output may be unconstrained");
    }
    for constraint in &packet.constraints {
        if constraint.trim().is_empty() {
            out.error("Empty constraint found");
        }
    }

    // Immune
    for item in &packet.immune {
        if item.trim().is_empty() {
            out.error("Empty immune string found");
        } else {
            let len = item.chars().count();
            if len > MAX_IMMUNE_CHARS {
                out.warn(format!("Very long immune string ({} chars)", len));
            }
        }
    }
}

fn check_kinetic(packet: &Packet, out: &mut Findings) {
    if let Some(kbm) = &packet.kbm {
        match kbm.bounds() {
            None => out.error("coherence_vector must be [min, max]"),
            Some((min, max)) => {
                if min > max {
                    out.error(format!("coherence_vector min ({}) > max ({})", min, max));
                } else if !(in_unit_range(min) && in_unit_range(max)) {
                    out.error("coherence_vector values must be in [0.0, 1.0]");
                }
                let width = max - min;
                if min <= max && width < TIGHT_KBM_WIDTH {
                    out.warn(format!("Very tight KBM range ({:.2})", width));
                }
            }
        }
    }

    if let Some(c_tvm) = &packet.c_tvm {
        if c_tvm.premise.trim().is_empty() || c_tvm.conclusion.trim().is_empty() {
            out.error("c_tvm must be [premise_id, conclusion_id, token_budget]");
        }
        if c_tvm.token_budget <= 0 {
            out.error(format!(
                "token_budget must be positive integer, got {}",
                c_tvm.token_budget
            ));
        } else if c_tvm.token_budget > MAX_TOKEN_BUDGET {
            out.warn(format!("Very large token budget ({})", c_tvm.token_budget));
        }
    }

    if let Some(anchors) = &packet.foundation {
        for anchor in anchors.iter().filter(|a| !a.is_canonical()) {
            out.warn(format!("Non-standard foundation anchor: '{}'", anchor));
        }
    }

    if let Some(mu) = &packet.mu_loop {
        if mu.window_size <= 0 {
            out.error(format!(
                "window_size must be positive integer, got {}",
                mu.window_size
            ));
        }
        if !in_unit_range(mu.threshold) {
            out.error(format!("threshold must be in [0.0, 1.0], got {}", mu.threshold));
        }
    }
}

fn check_gregarious(packet: &Packet, out: &mut Findings) {
    if let Some(gsn) = &packet.gsn {
        if gsn.network_id.is_none() {
            out.warn("GSN missing network_id - packet cannot join network");
        }

        if let Some(cf) = gsn.curiosity_factor {
            if !in_unit_range(cf) {
                out.error(format!("curiosity_factor must be in [0.0, 1.0], got {}", cf));
            } else if cf > HIGH_CURIOSITY {
                out.warn(format!("High curiosity_factor ({}) may destabilize network", cf));
            }
        }

        if let Some(links) = &gsn.link_vectors {
            if links.len() > MAX_LINK_VECTORS {
                out.warn(format!(
                    "Many link_vectors ({}) may impact performance",
                    links.len()
                ));
            }
        }
    }

    if let Some(evf) = &packet.evf {
        if evf.seed.trim().is_empty() {
            out.error("evf must be [seed_id, exploration_radius, branch_limit]");
        }
        if !in_unit_range(evf.radius) {
            out.error(format!(
                "exploration_radius must be in [0.0, 1.0], got {}",
                evf.radius
            ));
        }
        if evf.branch_limit <= 0 {
            out.error(format!(
                "branch_limit must be positive integer, got {}",
                evf.branch_limit
            ));
        } else if evf.branch_limit > MAX_BRANCH_LIMIT {
            out.warn(format!(
                "High branch_limit ({}) may be computationally expensive",
                evf.branch_limit
            ));
        }
    }
}

fn check_conflicts(packet: &Packet, out: &mut Findings) {
    let high_divergence = packet.divergence > CONFLICT_DIVERGENCE;

    if let Some(width) = packet.kbm.as_ref().and_then(|k| k.width()) {
        if high_divergence && width < CONFLICT_KBM_WIDTH {
            out.warn("High divergence with tight KBM may cause conflicts");
        }
    }

    if packet
        .gsn
        .as_ref()
        .is_some_and(|g| g.curiosity_factor.is_none())
    {
        out.warn("GSN without curiosity_factor - defaulting to 0 (no exploration)");
    }

    if !packet.immune.is_empty() && high_divergence {
        out.warn("High divergence with immune strings may not fully protect content");
    }
}
