//! Speculative "what-if" adjustments over computed windows.
//!
//! A scenario compresses safer windows, escalates caution windows and marks
//! everything as speculative. Input windows are never modified.

use chrono::Duration;

use super::explain::suggested_approach;
use crate::config::EngineConfig;
use crate::types::{OutreachWindow, WindowType};

const SPECULATIVE_PREFIX: &str = "SPECULATIVE:";
const SAFER_RATIONALE: &str =
    "Major events typically reduce service availability and shorten quiet periods.";
const CAUTION_ESCALATION: &str = "Moderate activity is likely to escalate to high disruption \
     during major events. Consider alternative timing.";
const HIGH_RATIONALE: &str = "Disruption may intensify further during major events.";

/// A scenario tag resolved against the configured registry.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedScenario {
    /// Normalized tag, used as the id prefix.
    pub key: String,
    pub label: String,
    pub compression_factor: f64,
    /// False when the tag was unknown and defaults were used.
    pub known: bool,
}

/// Resolve a tag case-insensitively; unknown tags fall back to the default factor.
pub fn resolve_scenario(scenario_tag: &str, config: &EngineConfig) -> ResolvedScenario {
    let key = normalize_tag(scenario_tag);

    match config.scenarios.get(&key) {
        Some(def) => ResolvedScenario {
            key,
            label: def.label.clone(),
            compression_factor: def.compression_factor,
            known: true,
        },
        None => {
            log::warn!(
                "Unknown scenario '{}'; using default compression factor {}",
                scenario_tag,
                config.default_compression_factor
            );
            ResolvedScenario {
                label: key.clone(),
                key,
                compression_factor: config.default_compression_factor,
                known: false,
            }
        }
    }
}

fn normalize_tag(tag: &str) -> String {
    let normalized: String = tag
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if normalized.is_empty() {
        "scenario".to_string()
    } else {
        normalized
    }
}

/// Apply a named scenario to a window list, producing new windows.
pub fn apply_scenario_mode(
    windows: &[OutreachWindow],
    scenario_tag: &str,
    config: &EngineConfig,
) -> Vec<OutreachWindow> {
    let scenario = resolve_scenario(scenario_tag, config);
    let transformed: Vec<OutreachWindow> = windows
        .iter()
        .map(|w| transform_window(w, &scenario))
        .collect();

    log::debug!(
        "Applied scenario '{}' (factor {}) to {} windows",
        scenario.key,
        scenario.compression_factor,
        transformed.len()
    );
    transformed
}

fn transform_window(window: &OutreachWindow, scenario: &ResolvedScenario) -> OutreachWindow {
    let mut out = window.clone();
    out.id = format!("{}-{}", scenario.key, window.id);

    match window.window_type {
        WindowType::Safer => {
            out.end = window.start + compressed(window.duration(), scenario.compression_factor);
            out.explanation = speculative(SAFER_RATIONALE, &window.explanation);
            out.suggested_approach = speculative(
                "Plan for shorter quiet periods.",
                &window.suggested_approach,
            );
        }
        WindowType::Caution => {
            out.window_type = WindowType::HighDisruption;
            out.explanation = format!("{} {}", SPECULATIVE_PREFIX, CAUTION_ESCALATION);
            out.suggested_approach = speculative(
                "Treat as high disruption.",
                suggested_approach(WindowType::HighDisruption),
            );
        }
        WindowType::HighDisruption => {
            out.explanation = speculative(HIGH_RATIONALE, &window.explanation);
        }
    }

    out
}

/// Scale a duration by `factor`, clamped to `[0, 1]` so it never grows or goes negative.
fn compressed(duration: Duration, factor: f64) -> Duration {
    let factor = if factor.is_finite() { factor.clamp(0.0, 1.0) } else { 1.0 };
    let seconds = duration.num_seconds().max(0) as f64 * factor;
    Duration::seconds(seconds.round() as i64)
}

fn speculative(rationale: &str, text: &str) -> String {
    format!("{} {} {}", SPECULATIVE_PREFIX, rationale, text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{at_hour, t0};
    use crate::types::ConfidenceLevel;

    fn window(window_type: WindowType, start_hour: i64, end_hour: i64) -> OutreachWindow {
        let start = at_hour(start_hour);
        OutreachWindow {
            id: crate::timing::windows::window_id(start),
            window_type,
            start,
            end: at_hour(end_hour),
            driver_signal_ids: vec!["s1".to_string()],
            explanation: "Base explanation.".to_string(),
            confidence: ConfidenceLevel::Medium,
            suggested_approach: suggested_approach(window_type).to_string(),
            max_score: 1,
        }
    }

    #[test]
    fn olympics_compresses_safer_window() {
        let base = vec![window(WindowType::Safer, 0, 10)];
        let out = apply_scenario_mode(&base, "olympics", &EngineConfig::default());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].start, t0());
        assert_eq!(out[0].duration(), Duration::hours(7));
        assert!(out[0].explanation.starts_with("SPECULATIVE:"));
        assert!(out[0].explanation.ends_with("Base explanation."));
        assert!(out[0].suggested_approach.starts_with("SPECULATIVE:"));
        assert_eq!(out[0].id, "olympics-win-20261019T0800Z");
        // Input untouched.
        assert_eq!(base[0].duration(), Duration::hours(10));
        assert_eq!(base[0].explanation, "Base explanation.");
    }

    #[test]
    fn caution_escalates_to_high_disruption() {
        let base = vec![window(WindowType::Caution, 0, 4)];
        let out = apply_scenario_mode(&base, "Olympics", &EngineConfig::default());
        assert_eq!(out[0].window_type, WindowType::HighDisruption);
        assert_eq!(out[0].end, at_hour(4));
        assert!(out[0].explanation.starts_with("SPECULATIVE:"));
        assert!(out[0].explanation.contains("Consider alternative timing"));
        assert!(!out[0].explanation.contains("Base explanation."));
        assert!(out[0]
            .suggested_approach
            .contains(suggested_approach(WindowType::HighDisruption)));
    }

    #[test]
    fn escalated_caution_drops_moderate_wording() {
        let mut caution = window(WindowType::Caution, 0, 4);
        caution.explanation =
            "Moderate activity expected (road works). Outreach is feasible but may require adjustment."
                .to_string();
        let out = apply_scenario_mode(&[caution], "olympics", &EngineConfig::default());
        assert_eq!(out[0].window_type, WindowType::HighDisruption);
        assert!(!out[0].explanation.contains("Moderate activity expected"));
        assert!(!out[0].explanation.contains("may require adjustment"));
        assert!(out[0].explanation.contains("high disruption"));
    }

    #[test]
    fn high_disruption_keeps_range() {
        let base = vec![window(WindowType::HighDisruption, 2, 6)];
        let out = apply_scenario_mode(&base, "olympics", &EngineConfig::default());
        assert_eq!(out[0].window_type, WindowType::HighDisruption);
        assert_eq!((out[0].start, out[0].end), (base[0].start, base[0].end));
        assert!(out[0].explanation.starts_with("SPECULATIVE:"));
        assert_eq!(out[0].suggested_approach, base[0].suggested_approach);
    }

    #[test]
    fn unknown_tag_uses_default_factor() {
        let base = vec![window(WindowType::Safer, 0, 10)];
        let resolved = resolve_scenario("  Street Festival ", &EngineConfig::default());
        assert!(!resolved.known);
        assert_eq!(resolved.key, "street_festival");
        let out = apply_scenario_mode(&base, "  Street Festival ", &EngineConfig::default());
        assert_eq!(out[0].duration(), Duration::hours(7));
        assert!(out[0].id.starts_with("street_festival-"));
    }

    #[test]
    fn empty_tag_gets_generic_prefix() {
        let base = vec![window(WindowType::Caution, 0, 3)];
        let out = apply_scenario_mode(&base, "", &EngineConfig::default());
        assert!(out[0].id.starts_with("scenario-"));
    }

    #[test]
    fn empty_input_is_empty_output() {
        assert!(apply_scenario_mode(&[], "olympics", &EngineConfig::default()).is_empty());
    }

    #[test]
    fn factor_is_clamped() {
        assert_eq!(compressed(Duration::hours(10), 1.5), Duration::hours(10));
        assert_eq!(compressed(Duration::hours(10), -0.5), Duration::zero());
        assert_eq!(compressed(Duration::hours(10), f64::NAN), Duration::hours(10));
    }
}
