//! Process table backed by the Linux `/proc` filesystem.

use std::io;
use std::path::PathBuf;

use crate::sampler::traits::{ProcessEntry, ProcessTable};

/// Reads `{pid, ppid, comm, cmdline}` for every live process from a proc
/// root (usually `/proc`, configurable for testing against fixtures).
#[derive(Debug, Clone)]
pub struct ProcfsTable {
    proc_path: PathBuf,
}

impl ProcfsTable {
    pub fn new(proc_path: impl Into<PathBuf>) -> Self {
        Self {
            proc_path: proc_path.into(),
        }
    }

    fn read_entry(&self, pid: u32) -> Option<ProcessEntry> {
        let base = self.proc_path.join(pid.to_string());

        let stat = std::fs::read_to_string(base.join("stat")).ok()?;
        let (stat_pid, comm, ppid) = parse_stat_line(&stat)?;
        if stat_pid != pid {
            return None;
        }

        let cmdline = std::fs::read_to_string(base.join("cmdline"))
            .unwrap_or_default()
            .replace('\0', " ")
            .trim()
            .to_string();

        Some(ProcessEntry {
            pid,
            ppid,
            comm,
            cmdline,
        })
    }
}

impl ProcessTable for ProcfsTable {
    fn processes(&self) -> io::Result<Vec<ProcessEntry>> {
        let mut entries = Vec::new();

        for entry in std::fs::read_dir(&self.proc_path)? {
            let entry = entry?;
            let name = entry.file_name();
            if let Some(name) = name.to_str()
                && let Ok(pid) = name.parse::<u32>()
                // Processes that vanish mid-enumeration simply drop out.
                && let Some(process) = self.read_entry(pid)
            {
                entries.push(process);
            }
        }

        Ok(entries)
    }
}

/// Parses pid, comm, and ppid out of a `/proc/[pid]/stat` line.
///
/// The comm field is wrapped in parentheses and may itself contain spaces
/// and parentheses ("Web Content", "test(1)"), so it is delimited by the
/// first `(` and the last `)`; the ppid is the second field after it.
fn parse_stat_line(content: &str) -> Option<(u32, String, u32)> {
    let open = content.find('(')?;
    let close = content.rfind(')')?;
    if close < open {
        return None;
    }

    let pid = content[..open].trim().parse().ok()?;
    let comm = content[open + 1..close].to_string();

    let mut rest = content[close + 1..].split_whitespace();
    let _state = rest.next()?;
    let ppid = rest.next()?.parse().ok()?;

    Some((pid, comm, ppid))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_stat_line() {
        let line = "1000 (bash) S 999 1000 1000 34816 1001 4194304 5000 50000 0 0 100 50";
        let (pid, comm, ppid) = parse_stat_line(line).unwrap();
        assert_eq!(pid, 1000);
        assert_eq!(comm, "bash");
        assert_eq!(ppid, 999);
    }

    #[test]
    fn parse_stat_line_with_spaces_in_comm() {
        let line = "5000 (Web Content) S 4999 5000 4999 0 -1 4194304";
        let (pid, comm, ppid) = parse_stat_line(line).unwrap();
        assert_eq!(pid, 5000);
        assert_eq!(comm, "Web Content");
        assert_eq!(ppid, 4999);
    }

    #[test]
    fn parse_stat_line_with_parens_in_comm() {
        let line = "5001 (test(1)) S 1 5001 5001 0 -1 4194304";
        let (pid, comm, ppid) = parse_stat_line(line).unwrap();
        assert_eq!(pid, 5001);
        assert_eq!(comm, "test(1)");
        assert_eq!(ppid, 1);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse_stat_line("").is_none());
        assert!(parse_stat_line("not a stat line").is_none());
        assert!(parse_stat_line("12 )backwards( S 1").is_none());
    }

    #[test]
    fn read_entries_from_fixture_dir() {
        let dir = tempfile::tempdir().unwrap();
        let pid_dir = dir.path().join("4242");
        std::fs::create_dir_all(&pid_dir).unwrap();
        std::fs::write(pid_dir.join("stat"), "4242 (mcman) S 1 4242 4242 0 -1 4194304").unwrap();
        std::fs::write(pid_dir.join("cmdline"), "/usr/bin/mcman\0--daemon\0").unwrap();
        // Non-numeric entries like /proc/self are skipped.
        std::fs::create_dir_all(dir.path().join("self")).unwrap();

        let table = ProcfsTable::new(dir.path());
        let entries = table.processes().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].pid, 4242);
        assert_eq!(entries[0].ppid, 1);
        assert_eq!(entries[0].comm, "mcman");
        assert_eq!(entries[0].cmdline, "/usr/bin/mcman --daemon");
    }
}
