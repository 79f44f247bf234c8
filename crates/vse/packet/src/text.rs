//! Bracketed, pipe-delimited text form:
//!
//! ```text
//! <VSE v1.4 | intent: summarize | constraints: [3_sentences, formal_tone] | divergence: 0.30 | immune: ["Q3 revenue"] | kbm: {"coherence_vector":[0.75,0.9]} | urp: enabled>
//! ```
//!
//! Segments are split on `|` outside brackets, braces and JSON strings, then on
//! the first `:`. JSON-valued fields (`kbm`, `c_tvm`, `foundation`, `mu_loop`,
//! `gsn`, `evf`) are embedded JSON literals.
//!
//! The intent and constraints are written bare when that is unambiguous. An
//! intent holding grammar characters or surrounding whitespace is written as a
//! JSON string literal, and a constraint list with any such item is written as a
//! JSON array:
//!
//! ```text
//! <VSE v1.4 | intent: "compare A | B" | constraints: ["tone, formal"] | divergence: 0.30>
//! ```
//!
//! Unknown keys are kept in [`Packet::extras`] and written back after the known
//! fields. A value that parses as JSON is kept as that JSON value; anything else
//! is kept as a string.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::debug;

use crate::error::{PacketError, PacketResult};
use crate::packet::{Packet, PacketBuilder, DEFAULT_VERSION};

const SEPARATOR: &str = " | ";
const COMPACT_SEPARATOR: &str = "|";

/// Characters that force a free-text value into JSON string form.
const TEXT_GRAMMAR: &[char] = &['|', '[', ']', '{', '}', '"'];
/// As [`TEXT_GRAMMAR`], plus the list separator.
const LIST_GRAMMAR: &[char] = &['|', '[', ']', '{', '}', '"', ','];

impl Packet {
    pub fn to_text(&self) -> String {
        self.render(SEPARATOR)
    }

    pub fn to_text_compact(&self) -> String {
        self.render(COMPACT_SEPARATOR)
    }

    pub fn from_text(input: &str) -> PacketResult<Packet> {
        parse_text(input)
    }

    fn render(&self, separator: &str) -> String {
        let mut parts = vec![
            format!("VSE v{}", self.version),
            format!("intent: {}", free_text(&self.intent)),
        ];

        if !self.constraints.is_empty() {
            if self.constraints.iter().all(|c| is_bare_list_item(c)) {
                parts.push(format!("constraints: [{}]", self.constraints.join(", ")));
            } else {
                parts.push(format!("constraints: {}", json_fragment(&self.constraints)));
            }
        }

        parts.push(format!("divergence: {}", format_divergence(self.divergence)));

        if !self.immune.is_empty() {
            let items: Vec<String> = self.immune.iter().map(json_fragment).collect();
            parts.push(format!("immune: [{}]", items.join(", ")));
        }

        if let Some(kbm) = &self.kbm {
            parts.push(format!("kbm: {}", json_fragment(kbm)));
        }
        if let Some(c_tvm) = &self.c_tvm {
            parts.push(format!("c_tvm: {}", json_fragment(c_tvm)));
        }
        if let Some(foundation) = self.foundation.as_ref().filter(|f| !f.is_empty()) {
            parts.push(format!("foundation: {}", json_fragment(foundation)));
        }
        if let Some(mu_loop) = &self.mu_loop {
            parts.push(format!("mu_loop: {}", json_fragment(mu_loop)));
        }
        if let Some(gsn) = &self.gsn {
            parts.push(format!("gsn: {}", json_fragment(gsn)));
        }
        if let Some(evf) = &self.evf {
            parts.push(format!("evf: {}", json_fragment(evf)));
        }
        if self.urp_enabled {
            parts.push("urp: enabled".to_string());
        }

        for (key, value) in &self.extras {
            let rendered = match value {
                serde_json::Value::String(raw) if is_bare_extra(raw) => raw.clone(),
                other => other.to_string(),
            };
            parts.push(format!("{}: {}", key, rendered));
        }

        format!("<{}>", parts.join(separator))
    }
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_text_compact())
    }
}

impl FromStr for Packet {
    type Err = PacketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_text(s)
    }
}

/// Parse the text form into a packet, re-checking construction invariants.
pub fn parse_text(input: &str) -> PacketResult<Packet> {
    let body = input
        .trim()
        .strip_prefix('<')
        .and_then(|s| s.strip_suffix('>'))
        .ok_or_else(|| PacketError::Parse("packet must be wrapped in '<' and '>'".into()))?;

    let segments = split_segments(body)?;
    let (header, fields) = segments
        .split_first()
        .ok_or_else(|| PacketError::Parse("empty packet".into()))?;
    let version = parse_header(header)?;

    let mut intent: Option<String> = None;
    let mut packet = PacketBuilder::new("").version(version).build()?;

    for segment in fields {
        let (key, value) = segment
            .split_once(':')
            .ok_or_else(|| PacketError::Parse(format!("segment without ':': '{}'", segment)))?;
        let key = key.trim();
        let value = value.trim();

        match key {
            "" => return Err(PacketError::Parse(format!("empty key in segment '{}'", segment))),
            "intent" => intent = Some(parse_free_text(value)?),
            "constraints" => packet.constraints = parse_list(value)?,
            "divergence" => {
                packet.divergence = value.parse::<f64>().map_err(|_| {
                    PacketError::Parse(format!("divergence is not a number: '{}'", value))
                })?;
            }
            "immune" => packet.immune = serde_json::from_str(value)?,
            "kbm" => packet.kbm = Some(serde_json::from_str(value)?),
            "c_tvm" => packet.c_tvm = Some(serde_json::from_str(value)?),
            "foundation" => packet.foundation = Some(serde_json::from_str(value)?),
            "mu_loop" => packet.mu_loop = Some(serde_json::from_str(value)?),
            "gsn" => packet.gsn = Some(serde_json::from_str(value)?),
            "evf" => packet.evf = Some(serde_json::from_str(value)?),
            "urp" => {
                packet.urp_enabled = match value.to_ascii_lowercase().as_str() {
                    "enabled" => true,
                    "disabled" => false,
                    other => {
                        return Err(PacketError::Parse(format!(
                            "urp must be 'enabled' or 'disabled', got '{}'",
                            other
                        )))
                    }
                };
            }
            unknown => {
                debug!(key = unknown, "preserving unknown packet key");
                let kept = serde_json::from_str(value)
                    .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));
                packet.extras.insert(unknown.to_string(), kept);
            }
        }
    }

    packet.intent = intent.ok_or_else(|| PacketError::Parse("missing intent".into()))?;
    packet.check_invariants()?;
    packet.check_extra_keys()?;
    debug!(layer = %packet.layer(), version = %packet.version, "parsed text packet");
    Ok(packet)
}

/// Two decimals when exact, otherwise the shortest form that round-trips.
fn format_divergence(d: f64) -> String {
    let fixed = format!("{:.2}", d);
    if fixed.parse::<f64>().ok() == Some(d) {
        fixed
    } else {
        d.to_string()
    }
}

fn json_fragment<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

fn parse_header(header: &str) -> PacketResult<String> {
    let rest = header
        .trim()
        .strip_prefix("VSE")
        .ok_or_else(|| PacketError::Parse(format!("missing VSE header: '{}'", header)))?
        .trim();
    if rest.is_empty() {
        return Ok(DEFAULT_VERSION.to_string());
    }
    match rest.strip_prefix('v') {
        Some(version) if !version.is_empty() && !version.contains(char::is_whitespace) => {
            Ok(version.to_string())
        }
        _ => Err(PacketError::Parse(format!("malformed version tag: '{}'", rest))),
    }
}

fn needs_quoting(s: &str, grammar: &[char]) -> bool {
    s.trim() != s || s.contains(grammar)
}

/// Bare when unambiguous, otherwise a JSON string literal.
fn free_text(s: &str) -> String {
    if needs_quoting(s, TEXT_GRAMMAR) {
        json_fragment(s)
    } else {
        s.to_string()
    }
}

fn is_bare_list_item(s: &str) -> bool {
    !s.is_empty() && !needs_quoting(s, LIST_GRAMMAR)
}

/// A string extra stays bare only if reading it back yields the same string.
fn is_bare_extra(s: &str) -> bool {
    !needs_quoting(s, TEXT_GRAMMAR) && serde_json::from_str::<serde_json::Value>(s).is_err()
}

fn parse_free_text(value: &str) -> PacketResult<String> {
    if value.starts_with('"') {
        Ok(serde_json::from_str(value)?)
    } else {
        Ok(value.to_string())
    }
}

/// `[a, b]` → `["a", "b"]`; `[]` → empty. A list whose first item is quoted is
/// read as a JSON array.
fn parse_list(value: &str) -> PacketResult<Vec<String>> {
    let inner = value
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .ok_or_else(|| PacketError::Parse(format!("expected [..] list, got '{}'", value)))?
        .trim();
    if inner.is_empty() {
        return Ok(Vec::new());
    }
    if inner.starts_with('"') {
        return Ok(serde_json::from_str(value)?);
    }
    Ok(inner.split(',').map(|item| item.trim().to_string()).collect())
}

/// Split on `|` outside brackets, braces and JSON strings.
fn split_segments(body: &str) -> PacketResult<Vec<&str>> {
    let mut segments = Vec::new();
    let mut depth: usize = 0;
    let mut in_string = false;
    let mut escaped = false;
    let mut start = 0;

    for (i, ch) in body.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '[' | '{' => depth += 1,
            ']' | '}' => depth = depth.saturating_sub(1),
            '|' if depth == 0 => {
                segments.push(body[start..i].trim());
                start = i + ch.len_utf8();
            }
            _ => {}
        }
    }

    if depth != 0 || in_string {
        return Err(PacketError::Parse("unbalanced brackets or quotes".into()));
    }
    segments.push(body[start..].trim());
    Ok(segments)
}
