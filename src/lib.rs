//! mcmon — worker-count and connectivity gauges for a local stats agent.
//!
//! Provides:
//! - `sampler` — process-table and connectivity sampling, with mocks
//! - `wire` — metric line encoding and UDP emission
//! - `report` — one sampling pass: sample, encode, emit
//! - `fmt` — rounding helpers for log output

pub mod fmt;
pub mod report;
pub mod sampler;
pub mod wire;
