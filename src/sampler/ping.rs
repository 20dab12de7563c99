//! Pinger backed by the system `ping` binary.

use std::process::Command;
use std::time::Duration;

use crate::sampler::traits::{PingOutcome, Pinger};

/// Sends one ICMP echo request per probe via `ping -c 1`.
///
/// Anything short of a parsed round-trip time counts as a lost probe:
/// spawn failure, non-zero exit, timeout, unreachable destination. The
/// aggregate sample does not distinguish between them.
#[derive(Debug, Clone)]
pub struct SystemPinger {
    timeout: Duration,
}

impl SystemPinger {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Pinger for SystemPinger {
    fn probe(&mut self, destination: &str) -> PingOutcome {
        // -W takes whole seconds on Linux; enforce at least one.
        let timeout_secs = self.timeout.as_secs().max(1);

        let output = Command::new("ping")
            .arg("-n")
            .arg("-c")
            .arg("1")
            .arg("-W")
            .arg(timeout_secs.to_string())
            .arg(destination)
            .output();

        let output = match output {
            Ok(output) if output.status.success() => output,
            _ => return PingOutcome::lost(),
        };

        match parse_rtt_ms(&String::from_utf8_lossy(&output.stdout)) {
            Some(ms) => PingOutcome::success(Duration::from_secs_f64(ms / 1000.0)),
            None => PingOutcome::lost(),
        }
    }
}

/// Extracts the round-trip time from `ping` output, e.g.
/// `64 bytes from 93.184.216.34: icmp_seq=1 ttl=56 time=25.5 ms`.
fn parse_rtt_ms(output: &str) -> Option<f64> {
    let start = output.find("time=")? + "time=".len();
    let rest = &output[start..];
    let end = rest
        .find(|c: char| c.is_whitespace())
        .unwrap_or(rest.len());
    rest[..end].parse().ok()
}
