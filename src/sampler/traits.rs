//! Abstractions over the process table and the echo facility.
//!
//! Both traits exist so the samplers can run against the real system in
//! production or against in-memory mocks in tests and simulations.

use std::io;
use std::time::Duration;

/// One live process as seen by the sampler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessEntry {
    pub pid: u32,
    /// Parent PID.
    pub ppid: u32,
    /// Command name (`comm`), without arguments.
    pub comm: String,
    /// Full command line, space-joined. Empty for kernel threads.
    pub cmdline: String,
}

/// Source of process-table snapshots.
pub trait ProcessTable {
    /// Returns all live processes.
    ///
    /// Entries that disappear or fail to parse during enumeration are
    /// skipped; only a failure to enumerate at all is an error.
    fn processes(&self) -> io::Result<Vec<ProcessEntry>>;

    /// PID of the enumerating process itself, excluded from name matches.
    fn self_pid(&self) -> u32 {
        std::process::id()
    }
}

/// Outcome of a single echo probe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PingOutcome {
    /// Round-trip time, present iff the probe got a response.
    pub rtt: Option<Duration>,
}

impl PingOutcome {
    pub fn success(rtt: Duration) -> Self {
        Self { rtt: Some(rtt) }
    }

    pub fn lost() -> Self {
        Self { rtt: None }
    }

    pub fn succeeded(&self) -> bool {
        self.rtt.is_some()
    }
}

/// Issues echo probes one at a time.
///
/// There is no probe-level error type: a spawn failure, a timeout, and an
/// unreachable destination all report as a lost probe. The distinction is
/// not observable in the aggregate sample.
pub trait Pinger {
    fn probe(&mut self, destination: &str) -> PingOutcome;
}

impl<P: Pinger + ?Sized> Pinger for Box<P> {
    fn probe(&mut self, destination: &str) -> PingOutcome {
        (**self).probe(destination)
    }
}
