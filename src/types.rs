use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Signals
// =============================================================================

/// Signal category (closed set supplied by the signal store).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalCategory {
    CleanupCycle,
    PermittedEvent,
    IntakeHours,
    TransitDisruption,
    CapacityBottleneck,
}

impl std::fmt::Display for SignalCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignalCategory::CleanupCycle => write!(f, "cleanup_cycle"),
            SignalCategory::PermittedEvent => write!(f, "permitted_event"),
            SignalCategory::IntakeHours => write!(f, "intake_hours"),
            SignalCategory::TransitDisruption => write!(f, "transit_disruption"),
            SignalCategory::CapacityBottleneck => write!(f, "capacity_bottleneck"),
        }
    }
}

/// Effect of a signal on outreach timing suitability (not personal risk).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactLevel {
    Low,
    Medium,
    High,
}

impl ImpactLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Reliability of the underlying data.
///
/// Ordered so that `min()` yields the conservative aggregate (`Low` dominates).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

impl ConfidenceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// A time-bounded fact about institutional or environmental activity.
///
/// Read-only as far as the engine is concerned. Range ordering (`start < end`)
/// is the signal store's responsibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signal {
    pub id: String,
    pub category: SignalCategory,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub impact: ImpactLevel,
    pub confidence: ConfidenceLevel,
    pub description: String,
    #[serde(default)]
    pub interpretation: String,
    #[serde(default)]
    pub latency_hours: f64,
    #[serde(default)]
    pub simulated: bool,
}

impl Signal {
    /// Open-interval intersection test: touching endpoints do not overlap.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start < end && self.end > start
    }
}

// =============================================================================
// Windows
// =============================================================================

/// Window classification.
///
/// Variant order is the escalation order used when fragments are merged:
/// `Safer < Caution < HighDisruption`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WindowType {
    Safer,
    Caution,
    HighDisruption,
}

impl WindowType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Safer => "safer",
            Self::Caution => "caution",
            Self::HighDisruption => "highDisruption",
        }
    }

    /// Numeric priority used by fragmentation cleanup.
    pub fn priority(&self) -> u8 {
        match self {
            Self::Safer => 0,
            Self::Caution => 1,
            Self::HighDisruption => 2,
        }
    }
}

impl std::fmt::Display for WindowType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A contiguous, classified span of the planning horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutreachWindow {
    pub id: String,
    #[serde(rename = "type")]
    pub window_type: WindowType,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Driver signal ids, de-duplicated, in first-seen order.
    pub driver_signal_ids: Vec<String>,
    pub explanation: String,
    pub confidence: ConfidenceLevel,
    pub suggested_approach: String,
    pub max_score: u32,
}

impl OutreachWindow {
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

// =============================================================================
// Overlaps
// =============================================================================

/// Intersection of two impactful signals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalOverlap {
    pub id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub signal_ids: [String; 2],
    pub explanation: String,
    pub combined_impact: ImpactLevel,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn signal_json() -> &'static str {
        r#"{
            "id": "sig-1",
            "category": "permitted_event",
            "start": "2026-10-19T09:00:00-04:00",
            "end": "2026-10-19T12:00:00-04:00",
            "impact": "medium",
            "confidence": "high",
            "description": "Street Fair on Main",
            "latencyHours": 2.5
        }"#
    }

    #[test]
    fn signal_deserializes_with_offset_and_defaults() {
        let signal: Signal = serde_json::from_str(signal_json()).unwrap();
        assert_eq!(signal.category, SignalCategory::PermittedEvent);
        assert_eq!(signal.start, Utc.with_ymd_and_hms(2026, 10, 19, 13, 0, 0).unwrap());
        assert_eq!(signal.impact, ImpactLevel::Medium);
        assert!(!signal.simulated);
        assert!(signal.interpretation.is_empty());
    }

    #[test]
    fn touching_ranges_do_not_overlap() {
        let signal: Signal = serde_json::from_str(signal_json()).unwrap();
        let end = signal.end;
        assert!(!signal.overlaps(end, end + Duration::hours(1)));
        assert!(signal.overlaps(end - Duration::minutes(1), end + Duration::hours(1)));
    }

    #[test]
    fn window_type_order_escalates() {
        assert!(WindowType::Safer < WindowType::Caution);
        assert!(WindowType::Caution < WindowType::HighDisruption);
        assert_eq!(
            serde_json::to_string(&WindowType::HighDisruption).unwrap(),
            "\"highDisruption\""
        );
    }

    #[test]
    fn low_confidence_dominates_min() {
        let levels = [ConfidenceLevel::High, ConfidenceLevel::Low, ConfidenceLevel::Medium];
        assert_eq!(levels.iter().min(), Some(&ConfidenceLevel::Low));
    }
}
