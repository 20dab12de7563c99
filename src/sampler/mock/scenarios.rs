//! Simulated network conditions for connectivity sampling.
//!
//! One tagged variant per condition, consumed by a single simulation
//! function. Outcomes are fully deterministic: pseudo-randomness comes
//! from xxh3 hashing of (seed, probe index), never from wall-clock
//! entropy, so tests replay the exact same probe sequence.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use xxhash_rust::xxh3::xxh3_64_with_seed;

use crate::sampler::traits::PingOutcome;

/// Baseline round-trip time for healthy probes, in milliseconds.
const BASE_RTT_MS: f64 = 25.5;

/// Network condition to simulate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NetworkScenario {
    /// Every probe answers at the baseline latency.
    Normal,
    /// No probe answers.
    Timeout,
    /// 3 of every 10 probes lost (indices 2, 5, 8 of each group).
    PartialLoss,
    /// Every probe answers, but slowly.
    Slow,
    /// Every probe answers with heavy latency jitter.
    Unstable,
    /// Each probe independently lost with probability `p`.
    RandomLoss(f64),
    /// A contiguous run of losses (indices 3..=6 of each group of 10).
    BurstLoss,
    /// Every third probe lost.
    IntermittentLoss,
    /// Like `RandomLoss` but reported as a distinct degraded condition;
    /// `p` is expected to be high.
    HighLoss(f64),
}

/// Simulates a full pass of `probe_count` probes.
pub fn simulate(scenario: NetworkScenario, probe_count: u32, seed: u64) -> Vec<PingOutcome> {
    (0..probe_count)
        .map(|index| outcome_for(scenario, index, seed))
        .collect()
}

/// Outcome of the probe at `index` under `scenario`.
pub(crate) fn outcome_for(scenario: NetworkScenario, index: u32, seed: u64) -> PingOutcome {
    let jitter = unit_hash(seed, index);
    match scenario {
        NetworkScenario::Normal => success_ms(BASE_RTT_MS),
        NetworkScenario::Timeout => PingOutcome::lost(),
        NetworkScenario::PartialLoss => match index % 10 {
            2 | 5 | 8 => PingOutcome::lost(),
            _ => success_ms(BASE_RTT_MS + jitter * 5.0),
        },
        NetworkScenario::Slow => success_ms(350.0 + jitter * 50.0),
        NetworkScenario::Unstable => success_ms(20.0 + jitter * 400.0),
        NetworkScenario::RandomLoss(p) | NetworkScenario::HighLoss(p) => {
            if jitter < p {
                PingOutcome::lost()
            } else {
                success_ms(BASE_RTT_MS + jitter * 5.0)
            }
        }
        NetworkScenario::BurstLoss => {
            if (3..=6).contains(&(index % 10)) {
                PingOutcome::lost()
            } else {
                success_ms(BASE_RTT_MS + jitter * 5.0)
            }
        }
        NetworkScenario::IntermittentLoss => {
            if index % 3 == 2 {
                PingOutcome::lost()
            } else {
                success_ms(BASE_RTT_MS + jitter * 5.0)
            }
        }
    }
}

fn success_ms(ms: f64) -> PingOutcome {
    PingOutcome::success(Duration::from_secs_f64(ms / 1000.0))
}

/// Deterministic value in [0, 1) derived from (seed, index).
fn unit_hash(seed: u64, index: u32) -> f64 {
    let hash = xxh3_64_with_seed(&index.to_le_bytes(), seed);
    (hash >> 11) as f64 / (1u64 << 53) as f64
}

impl fmt::Display for NetworkScenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkScenario::Normal => write!(f, "normal"),
            NetworkScenario::Timeout => write!(f, "timeout"),
            NetworkScenario::PartialLoss => write!(f, "partial-loss"),
            NetworkScenario::Slow => write!(f, "slow"),
            NetworkScenario::Unstable => write!(f, "unstable"),
            NetworkScenario::RandomLoss(p) => write!(f, "random-loss:{}", p),
            NetworkScenario::BurstLoss => write!(f, "burst-loss"),
            NetworkScenario::IntermittentLoss => write!(f, "intermittent-loss"),
            NetworkScenario::HighLoss(p) => write!(f, "high-loss:{}", p),
        }
    }
}

/// Error from parsing a scenario spec string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioParseError(String);

impl fmt::Display for ScenarioParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown scenario '{}' (expected normal, timeout, partial-loss, slow, unstable, \
             burst-loss, intermittent-loss, random-loss:<p>, or high-loss:<p>)",
            self.0
        )
    }
}

impl std::error::Error for ScenarioParseError {}

impl FromStr for NetworkScenario {
    type Err = ScenarioParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let spec = s.trim();
        match spec {
            "normal" => return Ok(NetworkScenario::Normal),
            "timeout" => return Ok(NetworkScenario::Timeout),
            "partial-loss" => return Ok(NetworkScenario::PartialLoss),
            "slow" => return Ok(NetworkScenario::Slow),
            "unstable" => return Ok(NetworkScenario::Unstable),
            "burst-loss" => return Ok(NetworkScenario::BurstLoss),
            "intermittent-loss" => return Ok(NetworkScenario::IntermittentLoss),
            _ => {}
        }

        if let Some((kind, prob)) = spec.split_once(':')
            && let Ok(p) = prob.parse::<f64>()
            && (0.0..=1.0).contains(&p)
        {
            match kind {
                "random-loss" => return Ok(NetworkScenario::RandomLoss(p)),
                "high-loss" => return Ok(NetworkScenario::HighLoss(p)),
                _ => {}
            }
        }

        Err(ScenarioParseError(spec.to_string()))
    }
}
