//! Outlook report: windows, overlaps and caveats for one planning request.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use super::overlaps::find_signal_overlaps;
use super::scenario::{apply_scenario_mode, resolve_scenario};
use super::windows::compute_outreach_windows;
use crate::config::EngineConfig;
use crate::types::{ConfidenceLevel, OutreachWindow, Signal, SignalOverlap, WindowType};

#[derive(Debug, Clone)]
pub struct OutlookRequest {
    pub horizon_days: i64,
    pub now: DateTime<Utc>,
    pub scenario: Option<String>,
}

/// Hours spent in each window type.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowTotals {
    pub safer_hours: f64,
    pub caution_hours: f64,
    pub high_disruption_hours: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlookReport {
    pub generated_at: DateTime<Utc>,
    pub horizon_days: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scenario: Option<String>,
    /// Windows to display: scenario-adjusted when a scenario was requested.
    pub windows: Vec<OutreachWindow>,
    /// Unadjusted windows; only present alongside a scenario.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_windows: Option<Vec<OutreachWindow>>,
    pub overlaps: Vec<SignalOverlap>,
    pub totals: WindowTotals,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_safer_window_id: Option<String>,
    pub overall_confidence: ConfidenceLevel,
    pub signal_count: usize,
    pub warnings: Vec<String>,
}

/// Compute everything a planning view needs in one pass.
pub fn build_outlook(
    signals: &[Signal],
    request: &OutlookRequest,
    config: &EngineConfig,
) -> OutlookReport {
    let base = compute_outreach_windows(signals, request.horizon_days, request.now, config);
    let overlaps = find_signal_overlaps(signals, config);
    let mut warnings = data_warnings(signals, config);

    let (windows, base_windows, scenario) = match request.scenario.as_deref() {
        Some(tag) => {
            let resolved = resolve_scenario(tag, config);
            warnings.push(format!(
                "Speculative {} scenario applied (compression factor {}). Not based on observed signals.",
                resolved.label, resolved.compression_factor
            ));
            if !resolved.known {
                warnings.push(format!(
                    "Unknown scenario '{}'; default compression applied.",
                    tag
                ));
            }
            let adjusted = apply_scenario_mode(&base, tag, config);
            (adjusted, Some(base), Some(resolved.key))
        }
        None => (base, None, None),
    };

    let next_safer_window_id = windows
        .iter()
        .find(|w| w.window_type == WindowType::Safer && w.start >= request.now)
        .map(|w| w.id.clone());

    let overall_confidence = windows
        .iter()
        .filter(|w| !w.driver_signal_ids.is_empty())
        .map(|w| w.confidence)
        .min()
        .unwrap_or(ConfidenceLevel::Low);

    OutlookReport {
        generated_at: request.now,
        horizon_days: request.horizon_days,
        scenario,
        totals: totals(&windows),
        windows,
        base_windows,
        overlaps,
        next_safer_window_id,
        overall_confidence,
        signal_count: signals.len(),
        warnings,
    }
}

fn totals(windows: &[OutreachWindow]) -> WindowTotals {
    let mut totals = WindowTotals::default();
    for w in windows {
        let hours = w.duration().num_minutes().max(0) as f64 / 60.0;
        match w.window_type {
            WindowType::Safer => totals.safer_hours += hours,
            WindowType::Caution => totals.caution_hours += hours,
            WindowType::HighDisruption => totals.high_disruption_hours += hours,
        }
    }
    totals
}

/// Caveats about the input data itself.
fn data_warnings(signals: &[Signal], config: &EngineConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if signals.is_empty() {
        warnings.push(
            "No signals available. Windows reflect standard conditions only.".to_string(),
        );
        return warnings;
    }

    let simulated = signals.iter().filter(|s| s.simulated).count();
    if simulated > 0 {
        warnings.push(format!(
            "{} of {} signals are simulated and may not reflect real activity.",
            simulated,
            signals.len()
        ));
    }

    let stalest = signals
        .iter()
        .map(|s| s.latency_hours)
        .fold(0.0_f64, f64::max);
    if stalest > config.stale_after_hours {
        warnings.push(format!(
            "Some signal data is {:.0} hours old. Verify before relying on it.",
            stalest
        ));
    }

    warnings
}

/// Render a window's span in a local timezone, e.g. "Mon Oct 19, 9:00 AM – 1:00 PM".
pub fn format_window_span(window: &OutreachWindow, tz: &Tz) -> String {
    let start = window.start.with_timezone(tz);
    let end = window.end.with_timezone(tz);
    if start.date_naive() == end.date_naive() {
        format!(
            "{}, {} – {}",
            start.format("%a %b %-d"),
            start.format("%-I:%M %p"),
            end.format("%-I:%M %p")
        )
    } else {
        format!(
            "{}, {} – {}, {}",
            start.format("%a %b %-d"),
            start.format("%-I:%M %p"),
            end.format("%a %b %-d"),
            end.format("%-I:%M %p")
        )
    }
}
