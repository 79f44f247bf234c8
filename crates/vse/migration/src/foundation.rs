//! Keyword inference of foundation anchors.

use vse_packet::FoundationAnchor;

/// Keyword families, checked in this order.
const FAMILIES: [(FoundationAnchor, &[&str]); 4] = [
    (
        FoundationAnchor::Milieu,
        &["context", "environment", "setting", "background", "atmosphere"],
    ),
    (
        FoundationAnchor::Gravitas,
        &["formal", "authoritative", "serious", "professional", "academic"],
    ),
    (
        FoundationAnchor::Fulcrum,
        &["argument", "thesis", "main", "core", "central", "key"],
    ),
    (
        FoundationAnchor::Ambience,
        &["mood", "feeling", "sensory", "emotional", "atmospheric"],
    ),
];

/// Infer anchors from case-insensitive substring matches over the intent and
/// the joined constraints. Returns `None` when no family matches.
pub fn infer_foundation<S: AsRef<str>>(
    intent: &str,
    constraints: &[S],
) -> Option<Vec<FoundationAnchor>> {
    let joined = constraints
        .iter()
        .map(|c| c.as_ref())
        .collect::<Vec<_>>()
        .join(" ");
    let text = format!("{} {}", intent, joined).to_lowercase();

    let anchors: Vec<FoundationAnchor> = FAMILIES
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|k| text.contains(k)))
        .map(|(anchor, _)| anchor.clone())
        .collect();

    if anchors.is_empty() {
        None
    } else {
        Some(anchors)
    }
}
