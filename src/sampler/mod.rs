//! Samplers for daemon worker counts and destination connectivity.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                        Samplers                           │
//! │  ┌──────────────────────┐   ┌──────────────────────────┐  │
//! │  │ ProcessCountSampler  │   │   ConnectivitySampler    │  │
//! │  │ - parent by name     │   │ - N probes per pass      │  │
//! │  │ - direct children    │   │ - latency/loss/status    │  │
//! │  └──────────┬───────────┘   └───────────┬──────────────┘  │
//! │             │                           │                 │
//! │      ┌──────▼──────┐             ┌──────▼──────┐          │
//! │      │ProcessTable │ (trait)     │   Pinger    │ (trait)  │
//! │      └──────┬──────┘             └──────┬──────┘          │
//! └─────────────┼───────────────────────────┼─────────────────┘
//!               │                           │
//!        ┌──────┴──────┐             ┌──────┴──────┐
//!        │             │             │             │
//! ┌──────▼─────┐ ┌─────▼─────┐ ┌─────▼──────┐ ┌────▼───────┐
//! │ ProcfsTable│ │ MockTable │ │SystemPinger│ │ MockPinger │
//! │ (Linux)    │ │ (Testing) │ │ (ping cmd) │ │ (Scenarios)│
//! └────────────┘ └───────────┘ └────────────┘ └────────────┘
//! ```
//!
//! Absence never errors: a daemon missing from the table yields a
//! zero-count sample, and a pass where every probe is lost yields a
//! complete sample with status 0.

pub mod connectivity;
pub mod mock;
pub mod ping;
pub mod process;
pub mod procfs;
pub mod traits;

pub use connectivity::{ConnectivitySample, ConnectivitySampler};
pub use mock::{MockPinger, MockTable, NetworkScenario};
pub use ping::SystemPinger;
pub use process::{ProcessCountSampler, ProcessSample};
pub use procfs::ProcfsTable;
pub use traits::{PingOutcome, Pinger, ProcessEntry, ProcessTable};
