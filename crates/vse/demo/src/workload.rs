//! Simulated generator outputs and a toy embedder for the demo.
//!
//! Nothing here talks to a model: outputs are canned strings that drift
//! further from the intent as the round number grows.

use vse_metrics::Embedder;
use vse_packet::ContentHash;

const DIMENSIONS: usize = 16;

/// Bag-of-words embedder: each lowercase token is hashed into one of
/// `DIMENSIONS` buckets.
pub struct HashingEmbedder;

impl Embedder for HashingEmbedder {
    fn embed(&self, text: &str) -> Vec<f64> {
        let mut vec = vec![0.0; DIMENSIONS];
        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let bucket = ContentHash::hash(token.to_lowercase().as_bytes()).prefix_u64() as usize
                % DIMENSIONS;
            vec[bucket] += 1.0;
        }
        vec
    }
}

pub struct SimulatedGenerator;

impl SimulatedGenerator {
    /// Output for `round`; early rounds stay on topic, later ones wander.
    pub fn output(round: usize) -> &'static str {
        match round {
            0 => "The quarterly report shows revenue growth. The report notes strong margins. \
                  The summary report confirms the outlook.",
            1 => "The quarterly report shows revenue growth. Margins in the report are stable. \
                  The report summary is positive.",
            2 => "The report mentions revenue. Weather was pleasant at the offsite. \
                  Lunch had several options.",
            3 => "It was a sunny day. The team went hiking. Everyone had fun outdoors.",
            _ => "They enjoyed the mountains. Snow fell overnight. Coffee was served early.",
        }
    }

    /// Explicit reviewer feedback for `round`, when there was any.
    pub fn feedback(round: usize) -> Option<f64> {
        match round {
            0 => Some(0.95),
            1 => Some(0.9),
            2 => None,
            _ => Some(0.3),
        }
    }
}
