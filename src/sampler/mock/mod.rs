//! In-memory mocks for the process table and the echo facility.
//!
//! `MockTable` simulates process-table states; `MockPinger` replays a
//! [`NetworkScenario`] so connectivity behavior can be exercised without
//! touching the network. The pinger is also reachable from the binary via
//! the `--scenario` flag, for demo runs on hosts without real probes.

pub mod pinger;
pub mod scenarios;
pub mod table;

pub use pinger::MockPinger;
pub use scenarios::{NetworkScenario, ScenarioParseError, simulate};
pub use table::MockTable;
