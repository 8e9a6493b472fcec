//! Run-length merge of scored buckets into outreach windows.
//!
//! Consecutive buckets of the same type collapse into one window. Windows
//! shorter than `min_window_minutes` are then folded into their predecessor so
//! the timeline does not fragment into slivers.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use super::buckets::{horizon_end, score_buckets, Bucket};
use super::explain::{explain_window, suggested_approach, summarize_confidence, DriverSet};
use crate::config::EngineConfig;
use crate::types::{OutreachWindow, Signal, WindowType};

/// Compute the classified window partition of `[now, now + horizon_days)`.
///
/// Returns an empty list for a non-positive or unrepresentable horizon.
pub fn compute_outreach_windows(
    signals: &[Signal],
    horizon_days: i64,
    now: DateTime<Utc>,
    config: &EngineConfig,
) -> Vec<OutreachWindow> {
    if horizon_days <= 0 {
        log::warn!(
            "Non-positive horizon ({} days); returning no windows",
            horizon_days
        );
        return Vec::new();
    }
    if horizon_end(now, horizon_days).is_none() {
        log::warn!(
            "Horizon of {} days from {} is out of range; returning no windows",
            horizon_days,
            now
        );
        return Vec::new();
    }

    let buckets = score_buckets(signals, horizon_days, now, config);
    let raw = merge_buckets(&buckets, config);
    let raw_count = raw.len();

    let by_id: HashMap<&str, &Signal> = signals.iter().map(|s| (s.id.as_str(), s)).collect();
    let windows = absorb_fragments(raw, &by_id, config);

    log::debug!(
        "Merged {} buckets into {} windows ({} after fragment cleanup)",
        buckets.len(),
        raw_count,
        windows.len()
    );
    windows
}

/// Window under construction.
struct Accumulator<'a> {
    window_type: WindowType,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    drivers: DriverSet<'a>,
    max_score: u32,
}

impl<'a> Accumulator<'a> {
    fn open(bucket: &Bucket<'a>, window_type: WindowType) -> Self {
        let mut drivers = DriverSet::default();
        drivers.extend(bucket.signals.iter().copied());
        Self {
            window_type,
            start: bucket.start,
            end: bucket.end,
            drivers,
            max_score: bucket.score,
        }
    }

    fn extend(&mut self, bucket: &Bucket<'a>) {
        self.end = bucket.end;
        self.drivers.extend(bucket.signals.iter().copied());
        self.max_score = self.max_score.max(bucket.score);
    }

    fn close(self, config: &EngineConfig) -> OutreachWindow {
        let drivers = self.drivers.signals();
        OutreachWindow {
            id: window_id(self.start),
            window_type: self.window_type,
            start: self.start,
            end: self.end,
            driver_signal_ids: self.drivers.ids(),
            explanation: explain_window(self.window_type, drivers, config.max_explanation_drivers),
            confidence: summarize_confidence(drivers),
            suggested_approach: suggested_approach(self.window_type).to_string(),
            max_score: self.max_score,
        }
    }
}

pub(crate) fn window_id(start: DateTime<Utc>) -> String {
    format!("win-{}", start.format("%Y%m%dT%H%MZ"))
}

/// Collapse runs of same-type buckets.
fn merge_buckets(buckets: &[Bucket<'_>], config: &EngineConfig) -> Vec<OutreachWindow> {
    let mut windows = Vec::new();
    let mut current: Option<Accumulator> = None;

    for bucket in buckets {
        let window_type = config.thresholds.classify(bucket.score);
        if let Some(acc) = current.as_mut() {
            if acc.window_type == window_type {
                acc.extend(bucket);
                continue;
            }
        }
        if let Some(done) = current.replace(Accumulator::open(bucket, window_type)) {
            windows.push(done.close(config));
        }
    }

    if let Some(done) = current {
        windows.push(done.close(config));
    }
    windows
}

/// Fold short windows into their predecessor.
///
/// The predecessor takes on the short window's type, explanation and approach
/// only when the short window has strictly higher priority
/// (`Safer < Caution < HighDisruption`). Neighbours left with the same type
/// afterwards are coalesced.
fn absorb_fragments(
    windows: Vec<OutreachWindow>,
    by_id: &HashMap<&str, &Signal>,
    config: &EngineConfig,
) -> Vec<OutreachWindow> {
    let min_duration = Duration::try_minutes(config.min_window_minutes).unwrap_or(Duration::MAX);
    let mut merged: Vec<OutreachWindow> = Vec::with_capacity(windows.len());

    for window in windows {
        if window.duration() < min_duration {
            if let Some(prev) = merged.last_mut() {
                let escalate = window.window_type.priority() > prev.window_type.priority();
                extend_into(prev, &window, by_id);
                if escalate {
                    prev.window_type = window.window_type;
                    prev.explanation = window.explanation;
                    prev.suggested_approach = window.suggested_approach;
                }
                coalesce_tail(&mut merged, by_id, config);
                continue;
            }
        }
        merged.push(window);
        coalesce_tail(&mut merged, by_id, config);
    }

    merged
}

/// Merge the last two windows while they share a type.
fn coalesce_tail(
    merged: &mut Vec<OutreachWindow>,
    by_id: &HashMap<&str, &Signal>,
    config: &EngineConfig,
) {
    while merged.len() >= 2 {
        let n = merged.len();
        if merged[n - 2].window_type != merged[n - 1].window_type {
            return;
        }
        let Some(last) = merged.pop() else {
            return;
        };
        let Some(prev) = merged.last_mut() else {
            return;
        };
        extend_into(prev, &last, by_id);
        let drivers = resolve_drivers(&prev.driver_signal_ids, by_id);
        prev.explanation =
            explain_window(prev.window_type, &drivers, config.max_explanation_drivers);
    }
}

fn extend_into(prev: &mut OutreachWindow, next: &OutreachWindow, by_id: &HashMap<&str, &Signal>) {
    prev.end = next.end;
    for id in &next.driver_signal_ids {
        if !prev.driver_signal_ids.contains(id) {
            prev.driver_signal_ids.push(id.clone());
        }
    }
    prev.max_score = prev.max_score.max(next.max_score);
    prev.confidence = summarize_confidence(&resolve_drivers(&prev.driver_signal_ids, by_id));
}

fn resolve_drivers<'a>(ids: &[String], by_id: &HashMap<&str, &'a Signal>) -> Vec<&'a Signal> {
    ids.iter()
        .filter_map(|id| by_id.get(id.as_str()).copied())
        .collect()
}
