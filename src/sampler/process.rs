//! Worker-count sampler: direct children of a named daemon.

use std::io;

use serde::Serialize;

use crate::sampler::traits::{ProcessEntry, ProcessTable};

/// Worker count for one tracked daemon.
///
/// A count of zero covers both "daemon not running" and "daemon running
/// with no workers spawned"; neither is an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessSample {
    pub name: String,
    pub child_count: u32,
}

/// Counts direct children of named daemons from a process-table snapshot.
pub struct ProcessCountSampler<T: ProcessTable> {
    table: T,
}

impl<T: ProcessTable> ProcessCountSampler<T> {
    pub fn new(table: T) -> Self {
        Self { table }
    }

    /// Samples a single daemon name.
    pub fn sample(&self, name: &str) -> io::Result<ProcessSample> {
        let processes = self.table.processes()?;
        Ok(sample_from(&processes, self.table.self_pid(), name))
    }

    /// Samples several daemon names against one table snapshot.
    pub fn sample_all(&self, names: &[String]) -> io::Result<Vec<ProcessSample>> {
        let processes = self.table.processes()?;
        let self_pid = self.table.self_pid();
        Ok(names
            .iter()
            .map(|name| sample_from(&processes, self_pid, name))
            .collect())
    }
}

/// Resolves `name` to a parent process and counts its direct children.
///
/// The enumerating process itself never matches, so a monitor tracking a
/// daemon it is named after cannot count itself. When several processes
/// match (substring collisions across related daemons), the lowest PID
/// wins; with daemons started before their workers that is the
/// longest-lived candidate.
fn sample_from(processes: &[ProcessEntry], self_pid: u32, name: &str) -> ProcessSample {
    let parent = processes
        .iter()
        .filter(|p| p.pid != self_pid && matches_name(p, name))
        .min_by_key(|p| p.pid);

    let child_count = match parent {
        Some(parent) => processes.iter().filter(|p| p.ppid == parent.pid).count() as u32,
        None => 0,
    };

    ProcessSample {
        name: name.to_string(),
        child_count,
    }
}

/// Matches on exact comm, or on the basename of argv[0] (exact or prefix).
/// comm is truncated to 15 bytes by the kernel, so the cmdline check
/// catches long daemon names.
fn matches_name(entry: &ProcessEntry, name: &str) -> bool {
    if entry.comm == name {
        return true;
    }
    let Some(argv0) = entry.cmdline.split_whitespace().next() else {
        return false;
    };
    let base = argv0.rsplit('/').next().unwrap_or(argv0);
    base == name || base.starts_with(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::mock::MockTable;

    #[test]
    fn counts_direct_children() {
        let table = MockTable::typical_system();
        let sampler = ProcessCountSampler::new(table);

        let sample = sampler.sample("mcman").unwrap();
        assert_eq!(sample.name, "mcman");
        assert_eq!(sample.child_count, 3);
    }

    #[test]
    fn absent_daemon_yields_zero_not_error() {
        let table = MockTable::without_daemons();
        let sampler = ProcessCountSampler::new(table);

        let sample = sampler.sample("mcman").unwrap();
        assert_eq!(sample.child_count, 0);
    }

    #[test]
    fn idle_daemon_yields_zero() {
        let table = MockTable::idle_daemon();
        let sampler = ProcessCountSampler::new(table);

        // Present but no workers spawned yet.
        assert_eq!(sampler.sample("mcman-sched").unwrap().child_count, 0);
    }

    #[test]
    fn grandchildren_are_not_counted() {
        let mut table = MockTable::new();
        table.add_process(100, 1, "mcman", "/usr/bin/mcman");
        table.add_process(101, 100, "mcman", "mcman: worker");
        table.add_process(102, 101, "mcman", "mcman: helper");
        let sampler = ProcessCountSampler::new(table);

        assert_eq!(sampler.sample("mcman").unwrap().child_count, 1);
    }

    #[test]
    fn ambiguous_match_takes_lowest_pid() {
        let table = MockTable::with_name_collision();
        let sampler = ProcessCountSampler::new(table);

        // Both "mcman" (pid 100, 3 workers) and "mcman-backup" (pid 300,
        // 1 worker) match the prefix; the lowest PID is the parent.
        assert_eq!(sampler.sample("mcman").unwrap().child_count, 3);
    }

    #[test]
    fn sampler_never_matches_itself() {
        let mut table = MockTable::new();
        table.add_process(500, 1, "mcmon", "/usr/bin/mcmon --process mcman");
        table.set_self_pid(500);
        let sampler = ProcessCountSampler::new(table);

        // The only candidate for "mcmon" is the sampler itself.
        assert_eq!(sampler.sample("mcmon").unwrap().child_count, 0);
    }

    #[test]
    fn search_tooling_does_not_match() {
        let mut table = MockTable::new();
        // A "grep mcman" process carries the name only in its arguments,
        // not in comm or argv[0], so it never counts as the daemon.
        table.add_process(900, 899, "grep", "grep mcman");
        let sampler = ProcessCountSampler::new(table);

        assert_eq!(sampler.sample("mcman").unwrap().child_count, 0);
    }

    #[test]
    fn matches_truncated_comm_via_cmdline() {
        let mut table = MockTable::new();
        // comm truncated at 15 bytes; full name only in cmdline.
        table.add_process(700, 1, "mcman-long-runn", "/opt/mcman-long-running-daemon");
        table.add_process(701, 700, "worker", "worker");
        let sampler = ProcessCountSampler::new(table);

        assert_eq!(
            sampler.sample("mcman-long-running-daemon").unwrap().child_count,
            1
        );
    }

    #[test]
    fn sample_all_uses_one_snapshot() {
        let table = MockTable::typical_system();
        let sampler = ProcessCountSampler::new(table);

        let names: Vec<String> = ["mcman", "mcman-api", "mcman-queue"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let samples = sampler.sample_all(&names).unwrap();

        assert_eq!(samples.len(), 3);
        assert_eq!(samples[0].child_count, 3);
        assert_eq!(samples[1].child_count, 2);
        assert_eq!(samples[2].child_count, 0);
    }
}
