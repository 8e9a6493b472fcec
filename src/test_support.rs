//! Shared fixtures for unit tests.

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::types::{ConfidenceLevel, ImpactLevel, Signal, SignalCategory};

/// Fixed reference instant: 2026-10-19 08:00 UTC.
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 8, 0, 0).unwrap()
}

pub fn at_hour(hour: i64) -> DateTime<Utc> {
    t0() + Duration::hours(hour)
}

/// High-confidence permitted event spanning `[start_hour, end_hour)` from `t0()`.
pub fn signal(id: &str, impact: ImpactLevel, start_hour: i64, end_hour: i64) -> Signal {
    Signal {
        id: id.to_string(),
        category: SignalCategory::PermittedEvent,
        start: at_hour(start_hour),
        end: at_hour(end_hour),
        impact,
        confidence: ConfidenceLevel::High,
        description: format!("Event {}", id.to_uppercase()),
        interpretation: String::new(),
        latency_hours: 0.0,
        simulated: false,
    }
}
