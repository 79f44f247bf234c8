//! Scoring functions: constraint match, divergence, coherence, resonance.
//!
//! All functions are pure. Text heuristics are deliberately lightweight; the
//! vector metrics take embeddings produced by an external [`Embedder`].

use std::collections::HashSet;

use tracing::debug;
use vse_packet::Packet;

use crate::error::{MetricsError, MetricsResult};
use crate::snapshot::{HealthThresholds, MetricSnapshot};

const CONTRACTIONS: [&str; 3] = ["n't", "'ll", "'ve"];
const TIME_MARKERS: [&str; 6] = ["first", "then", "next", "finally", "before", "after"];
const PAST_MARKERS: [&str; 5] = ["was", "were", "had", "did", "went"];
const PRESENT_MARKERS: [&str; 5] = ["is", "are", "have", "do", "goes"];
const PRONOUNS: [&str; 7] = ["he", "she", "it", "they", "him", "her", "them"];
const STOP_WORDS: [&str; 11] = ["the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for"];

/// Minimum average words per sentence for formal tone.
const FORMAL_MIN_SENTENCE_WORDS: f64 = 15.0;

/// Weight of the embedding similarity when explicit feedback is blended in.
const RESONANCE_SIMILARITY_WEIGHT: f64 = 0.7;

/// Source of text embeddings. Implemented outside this crate.
pub trait Embedder: Send + Sync {
    fn embed(&self, text: &str) -> Vec<f64>;
}

/// Cosine similarity. Zero when either vector has zero norm.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> MetricsResult<f64> {
    if a.len() != b.len() {
        return Err(MetricsError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }

    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }
    Ok(dot / (norm_a * norm_b))
}

/// Fraction of `constraints` satisfied by `output`. An empty list scores 1.0.
pub fn constraint_match<S: AsRef<str>>(output: &str, constraints: &[S]) -> f64 {
    if constraints.is_empty() {
        return 1.0;
    }
    let matched = constraints
        .iter()
        .filter(|c| constraint_satisfied(output, c.as_ref()))
        .count();
    matched as f64 / constraints.len() as f64
}

/// Whether a single constraint token holds for `output`.
pub fn constraint_satisfied(output: &str, constraint: &str) -> bool {
    let constraint = constraint.to_lowercase();
    let lower = output.to_lowercase();

    if let Some((count, unit)) = constraint.split_once('_') {
        if let Ok(target) = count.parse::<usize>() {
            match unit {
                "sentences" => {
                    let actual = terminal_punctuation(output);
                    return actual.abs_diff(target) <= 1;
                }
                "words" => {
                    let actual = output.split_whitespace().count();
                    let tolerance = (target as f64 * 0.1).max(5.0);
                    return actual.abs_diff(target) as f64 <= tolerance;
                }
                _ => {}
            }
        }
    }

    match constraint.as_str() {
        "formal_tone" | "formal" => {
            let has_contractions = CONTRACTIONS.iter().any(|c| lower.contains(c));
            let periods = output.matches('.').count().max(1);
            let avg_len = output.split_whitespace().count() as f64 / periods as f64;
            !has_contractions && avg_len > FORMAL_MIN_SENTENCE_WORDS
        }
        "casual_tone" | "casual" => true,
        "chronological" | "temporal" => TIME_MARKERS.iter().any(|m| lower.contains(m)),
        other => lower.contains(&other.replace('_', " ")),
    }
}

/// Semantic drift between output and intent: `1 - cos`, clamped to [0, 1].
pub fn divergence(output_vec: &[f64], intent_vec: &[f64]) -> MetricsResult<f64> {
    let sim = cosine_similarity(output_vec, intent_vec)?;
    Ok((1.0 - sim).clamp(0.0, 1.0))
}

/// Internal consistency of `output`: mean of tense, pronoun and topic scores.
/// Fewer than two sentences score 1.0.
pub fn coherence(output: &str) -> f64 {
    let sentences = split_sentences(output);
    if sentences.len() < 2 {
        return 1.0;
    }

    let scores = [
        tense_consistency(&sentences),
        pronoun_coherence(&sentences),
        topic_continuity(&sentences),
    ];
    scores.iter().sum::<f64>() / scores.len() as f64
}

/// Human-AI alignment: cosine similarity, blended 70/30 with explicit
/// feedback when present. Clamped to [0, 1].
pub fn resonance(
    intent_vec: &[f64],
    output_vec: &[f64],
    feedback: Option<f64>,
) -> MetricsResult<f64> {
    let sim = cosine_similarity(intent_vec, output_vec)?;
    let value = match feedback {
        Some(fb) => RESONANCE_SIMILARITY_WEIGHT * sim + (1.0 - RESONANCE_SIMILARITY_WEIGHT) * fb,
        None => sim,
    };
    Ok(value.clamp(0.0, 1.0))
}

/// Network resonance for gregarious packets.
///
/// Mean of `pairwise` plus `curiosity_bonus * (1 - avg_divergence)`, or
/// `local` when there are no peers. Not clamped: the bonus can push the
/// result above 1.0.
pub fn network_resonance(
    local: f64,
    pairwise: &[f64],
    curiosity_bonus: f64,
    avg_divergence: f64,
) -> f64 {
    if pairwise.is_empty() {
        return local;
    }
    let base = pairwise.iter().sum::<f64>() / pairwise.len() as f64;
    base + curiosity_bonus * (1.0 - avg_divergence)
}

fn terminal_punctuation(text: &str) -> usize {
    text.chars().filter(|c| matches!(c, '.' | '!' | '?')).count()
}

fn split_sentences(text: &str) -> Vec<&str> {
    text.split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

fn words(sentence: &str) -> impl Iterator<Item = String> + '_ {
    sentence
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'').to_lowercase())
        .filter(|w| !w.is_empty())
}

fn has_marker(sentence: &str, markers: &[&str]) -> bool {
    words(sentence).any(|w| markers.contains(&w.as_str()))
}

fn tense_consistency(sentences: &[&str]) -> f64 {
    let past = sentences.iter().filter(|s| has_marker(s, &PAST_MARKERS)).count();
    let present = sentences.iter().filter(|s| has_marker(s, &PRESENT_MARKERS)).count();
    let total = past + present;
    if total == 0 {
        return 1.0;
    }
    past.max(present) as f64 / total as f64
}

fn pronoun_coherence(sentences: &[&str]) -> f64 {
    let opens_with_pronoun = sentences
        .first()
        .and_then(|s| words(s).next())
        .is_some_and(|w| PRONOUNS.contains(&w.as_str()));
    if opens_with_pronoun {
        0.5
    } else {
        1.0
    }
}

fn topic_continuity(sentences: &[&str]) -> f64 {
    let sets: Vec<HashSet<String>> = sentences
        .iter()
        .map(|s| words(s).filter(|w| !STOP_WORDS.contains(&w.as_str())).collect())
        .collect();

    let overlaps: Vec<f64> = sets
        .windows(2)
        .map(|pair| {
            let (a, b) = (&pair[0], &pair[1]);
            if a.is_empty() || b.is_empty() {
                0.5
            } else {
                a.intersection(b).count() as f64 / a.len().max(b.len()) as f64
            }
        })
        .collect();

    if overlaps.is_empty() {
        1.0
    } else {
        overlaps.iter().sum::<f64>() / overlaps.len() as f64
    }
}

/// Builds full snapshots for a generated output against its packet.
#[derive(Clone, Debug, Default)]
pub struct MetricComputer {
    thresholds: HealthThresholds,
}

impl MetricComputer {
    pub fn new(thresholds: HealthThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &HealthThresholds {
        &self.thresholds
    }

    /// Score `output` against `packet` using precomputed embeddings.
    pub fn snapshot(
        &self,
        output: &str,
        packet: &Packet,
        output_vec: &[f64],
        intent_vec: &[f64],
        feedback: Option<f64>,
    ) -> MetricsResult<MetricSnapshot> {
        let snapshot = MetricSnapshot::new(
            constraint_match(output, &packet.constraints),
            divergence(output_vec, intent_vec)?,
            coherence(output),
            resonance(intent_vec, output_vec, feedback)?,
        );
        debug!(
            scm = snapshot.scm,
            divergence = snapshot.divergence,
            semcoh = snapshot.semcoh,
            resonance = snapshot.resonance,
            healthy = snapshot.is_healthy_with(&self.thresholds),
            "computed metric snapshot"
        );
        Ok(snapshot)
    }

    /// Embed the output and the packet intent with `embedder`, then score.
    pub fn snapshot_with<E: Embedder + ?Sized>(
        &self,
        embedder: &E,
        output: &str,
        packet: &Packet,
        feedback: Option<f64>,
    ) -> MetricsResult<MetricSnapshot> {
        let output_vec = embedder.embed(output);
        let intent_vec = embedder.embed(&packet.intent);
        self.snapshot(output, packet, &output_vec, &intent_vec, feedback)
    }

    pub fn is_healthy(&self, snapshot: &MetricSnapshot) -> bool {
        snapshot.is_healthy_with(&self.thresholds)
    }
}
