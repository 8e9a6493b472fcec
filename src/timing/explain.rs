//! Plain-language window explanations and suggested approaches.
//!
//! Templates are fixed so identical inputs always read identically.

use std::collections::HashSet;

use crate::types::{ConfidenceLevel, Signal, WindowType};

pub const NEUTRAL_EXPLANATION: &str =
    "No significant signals detected during this period. Standard conditions apply.";

/// Insertion-ordered set of driver signals for one accumulating window.
#[derive(Debug, Default, Clone)]
pub struct DriverSet<'a> {
    seen: HashSet<&'a str>,
    signals: Vec<&'a Signal>,
}

impl<'a> DriverSet<'a> {
    pub fn insert(&mut self, signal: &'a Signal) {
        if self.seen.insert(signal.id.as_str()) {
            self.signals.push(signal);
        }
    }

    pub fn extend<I: IntoIterator<Item = &'a Signal>>(&mut self, signals: I) {
        for signal in signals {
            self.insert(signal);
        }
    }

    pub fn signals(&self) -> &[&'a Signal] {
        &self.signals
    }

    pub fn ids(&self) -> Vec<String> {
        self.signals.iter().map(|s| s.id.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }
}

/// Build the explanation for a window from its first `max_drivers` drivers.
pub fn explain_window(window_type: WindowType, drivers: &[&Signal], max_drivers: usize) -> String {
    if drivers.is_empty() {
        return NEUTRAL_EXPLANATION.to_string();
    }

    let listed = drivers
        .iter()
        .take(max_drivers)
        .map(|s| s.description.to_lowercase())
        .collect::<Vec<_>>()
        .join("; ");

    match window_type {
        WindowType::Safer => format!(
            "Only low-impact activity expected ({}). Generally good conditions for outreach.",
            listed
        ),
        WindowType::Caution => format!(
            "Moderate activity expected ({}). Outreach is feasible but may require adjustment.",
            listed
        ),
        WindowType::HighDisruption => format!(
            "Multiple or high-impact signals ({}). Consider alternative timing.",
            listed
        ),
    }
}

/// Suggested approach, keyed only by window type.
pub fn suggested_approach(window_type: WindowType) -> &'static str {
    match window_type {
        WindowType::Safer => {
            "Standard outreach schedule. Good time for routine check-ins and service connections."
        }
        WindowType::Caution => {
            "Proceed with flexibility. Confirm locations in advance and keep a backup plan."
        }
        WindowType::HighDisruption => {
            "Focus on urgent needs only. Consider rescheduling non-essential outreach."
        }
    }
}

/// Conservative confidence: the lowest level among drivers, `Low` when empty.
pub fn summarize_confidence(drivers: &[&Signal]) -> ConfidenceLevel {
    drivers
        .iter()
        .map(|s| s.confidence)
        .min()
        .unwrap_or(ConfidenceLevel::Low)
}
