//! In-memory process table for testing.

use std::io;

use crate::sampler::traits::{ProcessEntry, ProcessTable};

/// Process table built in memory, with prebuilt fixtures for common
/// deployment states.
#[derive(Debug, Clone, Default)]
pub struct MockTable {
    entries: Vec<ProcessEntry>,
    self_pid: Option<u32>,
}

impl MockTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one process.
    pub fn add_process(&mut self, pid: u32, ppid: u32, comm: &str, cmdline: &str) {
        self.entries.push(ProcessEntry {
            pid,
            ppid,
            comm: comm.to_string(),
            cmdline: cmdline.to_string(),
        });
    }

    /// Overrides the PID reported as the enumerating process.
    pub fn set_self_pid(&mut self, pid: u32) {
        self.self_pid = Some(pid);
    }

    /// A host running two of the tracked daemons with workers.
    ///
    /// `mcman` (PID 100) has 3 workers, `mcman-api` (PID 200) has 2.
    pub fn typical_system() -> Self {
        let mut table = Self::base_system();

        table.add_process(100, 1, "mcman", "/usr/bin/mcman --daemon");
        table.add_process(101, 100, "mcman", "mcman: worker 1");
        table.add_process(102, 100, "mcman", "mcman: worker 2");
        table.add_process(103, 100, "mcman", "mcman: worker 3");

        table.add_process(200, 1, "mcman-api", "/usr/bin/mcman-api");
        table.add_process(201, 200, "mcman-api", "mcman-api: handler");
        table.add_process(202, 200, "mcman-api", "mcman-api: handler");

        table
    }

    /// A daemon that is up but has spawned no workers yet.
    pub fn idle_daemon() -> Self {
        let mut table = Self::base_system();
        table.add_process(400, 1, "mcman-sched", "/usr/bin/mcman-sched");
        table
    }

    /// Base system only; none of the tracked daemons are running.
    pub fn without_daemons() -> Self {
        Self::base_system()
    }

    /// Two daemons whose names collide on a common prefix.
    pub fn with_name_collision() -> Self {
        let mut table = Self::typical_system();
        table.add_process(300, 1, "mcman-backup", "/usr/bin/mcman-backup");
        table.add_process(301, 300, "mcman-backup", "mcman-backup: worker");
        table
    }

    fn base_system() -> Self {
        let mut table = Self::new();
        table.add_process(1, 0, "systemd", "/sbin/init");
        table.add_process(50, 1, "sshd", "/usr/sbin/sshd -D");
        table.add_process(1000, 50, "bash", "/bin/bash --login");
        table
    }
}

impl ProcessTable for MockTable {
    fn processes(&self) -> io::Result<Vec<ProcessEntry>> {
        Ok(self.entries.clone())
    }

    fn self_pid(&self) -> u32 {
        // A PID that never appears in the table unless a test plants it.
        self.self_pid.unwrap_or(u32::MAX)
    }
}
