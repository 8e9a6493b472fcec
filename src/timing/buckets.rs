//! Fixed-width bucket scoring over a planning horizon.

use chrono::{DateTime, Duration, Utc};

use crate::config::EngineConfig;
use crate::types::Signal;

/// One scoring slice. Produced and dropped within a single aggregation call.
#[derive(Debug, Clone)]
pub struct Bucket<'a> {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Sum of impact weights over `signals`.
    pub score: u32,
    /// Signals intersecting the bucket, in input order.
    pub signals: Vec<&'a Signal>,
}

/// End of `[now, now + horizon_days)`, or `None` when the horizon is
/// non-positive or falls outside the representable date range.
pub fn horizon_end(now: DateTime<Utc>, horizon_days: i64) -> Option<DateTime<Utc>> {
    if horizon_days <= 0 {
        return None;
    }
    Duration::try_days(horizon_days).and_then(|span| now.checked_add_signed(span))
}

/// Partition `[now, now + horizon_days)` into buckets and score each one.
///
/// A non-positive or unrepresentable horizon yields no buckets. The last
/// bucket is clipped to the horizon end when the bucket width does not divide
/// it evenly. Scores saturate at `u32::MAX`.
pub fn score_buckets<'a>(
    signals: &'a [Signal],
    horizon_days: i64,
    now: DateTime<Utc>,
    config: &EngineConfig,
) -> Vec<Bucket<'a>> {
    let (Some(horizon_end), Some(width)) = (
        horizon_end(now, horizon_days),
        Duration::try_minutes(config.bucket_minutes).filter(|w| *w > Duration::zero()),
    ) else {
        return Vec::new();
    };
    let mut buckets = Vec::new();
    let mut cursor = now;

    while cursor < horizon_end {
        let end = cursor
            .checked_add_signed(width)
            .map_or(horizon_end, |next| next.min(horizon_end));
        let active: Vec<&Signal> = signals.iter().filter(|s| s.overlaps(cursor, end)).collect();
        let score = active
            .iter()
            .map(|s| config.impact_weights.weight(s.impact))
            .fold(0u32, u32::saturating_add);

        buckets.push(Bucket {
            start: cursor,
            end,
            score,
            signals: active,
        });
        cursor = end;
    }

    log::debug!(
        "Scored {} buckets over {} days from {} signals",
        buckets.len(),
        horizon_days,
        signals.len()
    );
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{at_hour, signal, t0};
    use crate::types::ImpactLevel;

    #[test]
    fn empty_signals_yield_zero_scores() {
        let buckets = score_buckets(&[], 2, t0(), &EngineConfig::default());
        assert_eq!(buckets.len(), 48);
        assert!(buckets.iter().all(|b| b.score == 0 && b.signals.is_empty()));
        assert_eq!(buckets[0].start, t0());
        assert_eq!(buckets[47].end, at_hour(48));
    }

    #[test]
    fn non_positive_horizon_yields_nothing() {
        let config = EngineConfig::default();
        assert!(score_buckets(&[], 0, t0(), &config).is_empty());
        assert!(score_buckets(&[], -3, t0(), &config).is_empty());
    }

    #[test]
    fn scores_sum_impact_weights() {
        let signals = vec![
            signal("a", ImpactLevel::Low, 2, 5),
            signal("b", ImpactLevel::High, 4, 6),
        ];
        let buckets = score_buckets(&signals, 1, t0(), &EngineConfig::default());
        assert_eq!(buckets[1].score, 0);
        assert_eq!(buckets[2].score, 1);
        assert_eq!(buckets[4].score, 4);
        assert_eq!(buckets[5].score, 3);
        assert_eq!(buckets[6].score, 0);
        let ids: Vec<&str> = buckets[4].signals.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn abutting_signal_does_not_count() {
        // Ends exactly where bucket 3 starts.
        let signals = vec![signal("a", ImpactLevel::High, 1, 3)];
        let buckets = score_buckets(&signals, 1, t0(), &EngineConfig::default());
        assert_eq!(buckets[2].score, 3);
        assert_eq!(buckets[3].score, 0);
    }

    #[test]
    fn partial_hour_overlap_counts() {
        let mut s = signal("a", ImpactLevel::Medium, 5, 6);
        s.start = at_hour(5) + Duration::minutes(50);
        let buckets = score_buckets(std::slice::from_ref(&s), 1, t0(), &EngineConfig::default());
        assert_eq!(buckets[5].score, 2);
        assert_eq!(buckets[4].score, 0);
    }

    #[test]
    fn custom_weights_are_honored() {
        let mut config = EngineConfig::default();
        config.impact_weights.low = 0;
        let signals = vec![signal("a", ImpactLevel::Low, 0, 24)];
        let buckets = score_buckets(&signals, 1, t0(), &config);
        assert!(buckets.iter().all(|b| b.score == 0 && b.signals.len() == 1));
    }

    #[test]
    fn unrepresentable_horizon_yields_nothing() {
        let config = EngineConfig::default();
        assert!(horizon_end(t0(), i64::MAX).is_none());
        assert!(horizon_end(t0(), 200_000_000_000_000).is_none());
        assert!(score_buckets(&[], i64::MAX, t0(), &config).is_empty());
        assert_eq!(horizon_end(t0(), 1), Some(at_hour(24)));
    }

    #[test]
    fn huge_weights_saturate() {
        let mut config = EngineConfig::default();
        config.impact_weights.high = u32::MAX / 2 + 1;
        assert!(config.validate().is_ok());
        let signals = vec![
            signal("a", ImpactLevel::High, 0, 4),
            signal("b", ImpactLevel::High, 2, 6),
        ];
        let buckets = score_buckets(&signals, 1, t0(), &config);
        assert_eq!(buckets[3].score, u32::MAX);
        assert_eq!(buckets[0].score, u32::MAX / 2 + 1);
    }

    #[test]
    fn uneven_width_clips_last_bucket() {
        let config = EngineConfig {
            bucket_minutes: 25 * 60,
            ..EngineConfig::default()
        };
        let buckets = score_buckets(&[], 2, t0(), &config);
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[1].end, at_hour(48));
    }
}
