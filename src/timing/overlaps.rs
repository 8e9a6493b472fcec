//! Pairwise overlap detection between impactful signals.
//!
//! Low-impact signals never take part. The scan is quadratic in the number of
//! medium/high signals, which stays small (tens to low hundreds) for a single
//! planning area. An interval sweep would replace it if that stops holding.

use std::collections::HashSet;

use crate::config::EngineConfig;
use crate::types::{ImpactLevel, Signal, SignalOverlap};

/// Find every unordered pair of medium/high signals whose ranges intersect.
///
/// Result is sorted by intersection start, then by pair id.
pub fn find_signal_overlaps(signals: &[Signal], config: &EngineConfig) -> Vec<SignalOverlap> {
    let impactful: Vec<&Signal> = signals
        .iter()
        .filter(|s| matches!(s.impact, ImpactLevel::Medium | ImpactLevel::High))
        .collect();

    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut overlaps = Vec::new();

    for (i, a) in impactful.iter().enumerate() {
        for b in &impactful[i + 1..] {
            if a.id == b.id || !a.overlaps(b.start, b.end) {
                continue;
            }
            let key = pair_key(&a.id, &b.id);
            if !seen.insert(key.clone()) {
                continue;
            }
            overlaps.push(build_overlap(a, b, key, config));
        }
    }

    overlaps.sort_by(|x, y| x.start.cmp(&y.start).then_with(|| x.id.cmp(&y.id)));

    log::debug!(
        "Found {} overlaps among {} impactful signals",
        overlaps.len(),
        impactful.len()
    );
    overlaps
}

/// Order-independent pair key.
fn pair_key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

/// `overlap-<len of first>:<first>-<second>`; the length prefix keeps ids
/// unique when signal ids themselves contain `-`.
fn overlap_id(key: &(String, String)) -> String {
    format!("overlap-{}:{}-{}", key.0.len(), key.0, key.1)
}

fn build_overlap(
    a: &Signal,
    b: &Signal,
    key: (String, String),
    config: &EngineConfig,
) -> SignalOverlap {
    let combined_weight = config
        .impact_weights
        .weight(a.impact)
        .saturating_add(config.impact_weights.weight(b.impact));
    let combined_impact = config.combined_impact.level(combined_weight);

    SignalOverlap {
        id: overlap_id(&key),
        start: a.start.max(b.start),
        end: a.end.min(b.end),
        signal_ids: [a.id.clone(), b.id.clone()],
        explanation: format!(
            "{} coincides with {}. Combined {} impact; the two together may compound disruption.",
            a.description, b.description, combined_impact.as_str()
        ),
        combined_impact,
    }
}
