//! Outreach timing engine.
//!
//! Converts discrete, time-bounded activity signals (cleanup cycles, permitted
//! events, intake hours, transit disruptions, capacity bottlenecks) into a
//! labeled partition of a planning horizon, plus the moments where impactful
//! signals coincide.
//!
//! ```no_run
//! use chrono::Utc;
//! use outreach_timing_lib::{compute_outreach_windows, EngineConfig};
//!
//! let config = EngineConfig::default();
//! let windows = compute_outreach_windows(&[], 14, Utc::now(), &config);
//! assert_eq!(windows.len(), 1);
//! ```

pub mod config;
pub mod error;
pub mod signal_io;
pub mod timing;
pub mod types;

#[cfg(test)]
mod test_support;

pub use config::{load_config, load_config_or_default, EngineConfig};
pub use error::{ConfigError, SignalLoadError};
pub use timing::{
    apply_scenario_mode, build_outlook, compute_outreach_windows, find_signal_overlaps,
    OutlookReport, OutlookRequest,
};
pub use types::{
    ConfidenceLevel, ImpactLevel, OutreachWindow, Signal, SignalCategory, SignalOverlap,
    WindowType,
};
