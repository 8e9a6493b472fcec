//! Temporal signal aggregation.
//!
//! Signals are scored into fixed-width buckets, buckets are run-length merged
//! into classified windows, and windows can be re-read under a speculative
//! scenario. Overlap detection runs independently on the raw signals.
//!
//! Every function here is pure: the reference instant is always passed in and
//! nothing is retained between calls.

pub mod buckets;
pub mod explain;
pub mod outlook;
pub mod overlaps;
pub mod scenario;
mod windows;

pub use buckets::{score_buckets, Bucket};
pub use outlook::{build_outlook, format_window_span, OutlookReport, OutlookRequest, WindowTotals};
pub use overlaps::find_signal_overlaps;
pub use scenario::{apply_scenario_mode, resolve_scenario, ResolvedScenario};
pub use windows::compute_outreach_windows;
