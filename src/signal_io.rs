//! Signal file loading.
//!
//! Accepts either a bare JSON array of signals or a `{ "signals": [...] }`
//! envelope as written by the signal store export.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::SignalLoadError;
use crate::types::Signal;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SignalFile {
    Bare(Vec<Signal>),
    Envelope { signals: Vec<Signal> },
}

/// Parse signals from a JSON string.
pub fn parse_signals(content: &str) -> Result<Vec<Signal>, SignalLoadError> {
    let file: SignalFile =
        serde_json::from_str(content).map_err(|e| SignalLoadError::Parse(e.to_string()))?;
    Ok(match file {
        SignalFile::Bare(signals) => signals,
        SignalFile::Envelope { signals } => signals,
    })
}

/// Load signals from a JSON file.
pub fn load_signals(path: &Path) -> Result<Vec<Signal>, SignalLoadError> {
    if !path.exists() {
        return Err(SignalLoadError::NotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    let signals = parse_signals(&content)?;
    log::info!("Loaded {} signals from {}", signals.len(), path.display());
    Ok(signals)
}

/// Drop records the engine assumes never arrive: inverted or empty ranges and
/// negative latency.
pub fn retain_well_formed(signals: Vec<Signal>) -> Vec<Signal> {
    signals
        .into_iter()
        .filter(|s| {
            if s.start >= s.end {
                log::warn!(
                    "Dropping signal {}: start {} is not before end {}",
                    s.id,
                    s.start,
                    s.end
                );
                return false;
            }
            if s.latency_hours < 0.0 || !s.latency_hours.is_finite() {
                log::warn!(
                    "Dropping signal {}: invalid latency {}",
                    s.id,
                    s.latency_hours
                );
                return false;
            }
            true
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::signal;
    use crate::types::ImpactLevel;
    use std::io::Write;

    const ONE_SIGNAL: &str = r#"[{
        "id": "s1",
        "category": "cleanup_cycle",
        "start": "2026-10-20T06:00:00Z",
        "end": "2026-10-20T10:00:00Z",
        "impact": "high",
        "confidence": "medium",
        "description": "Scheduled encampment cleanup",
        "interpretation": "Expect displacement near the underpass",
        "latencyHours": 6,
        "simulated": true
    }]"#;

    #[test]
    fn parses_bare_array() {
        let signals = parse_signals(ONE_SIGNAL).unwrap();
        assert_eq!(signals.len(), 1);
        assert!(signals[0].simulated);
        assert!((signals[0].latency_hours - 6.0).abs() < f64::EPSILON);
    }

    #[test]
    fn parses_envelope() {
        let wrapped = format!("{{ \"signals\": {} }}", ONE_SIGNAL);
        assert_eq!(parse_signals(&wrapped).unwrap()[0].id, "s1");
    }

    #[test]
    fn rejects_unknown_category() {
        let bad = ONE_SIGNAL.replace("cleanup_cycle", "weather");
        assert!(matches!(parse_signals(&bad), Err(SignalLoadError::Parse(_))));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(ONE_SIGNAL.as_bytes()).unwrap();
        assert_eq!(load_signals(file.path()).unwrap().len(), 1);
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_signals(&dir.path().join("signals.json"));
        assert!(matches!(result, Err(SignalLoadError::NotFound(_))));
    }

    #[test]
    fn drops_inverted_and_negative_latency() {
        let good = signal("good", ImpactLevel::Low, 0, 2);
        let inverted = signal("inverted", ImpactLevel::Low, 4, 2);
        let empty = signal("empty", ImpactLevel::Low, 3, 3);
        let mut stale = signal("stale", ImpactLevel::Low, 0, 2);
        stale.latency_hours = -1.0;
        let kept = retain_well_formed(vec![good, inverted, empty, stale]);
        let ids: Vec<&str> = kept.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["good"]);
    }
}
