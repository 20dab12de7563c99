//! Pinger that replays a simulated scenario instead of touching the network.

use crate::sampler::mock::scenarios::{self, NetworkScenario};
use crate::sampler::traits::{PingOutcome, Pinger};

/// Replays [`NetworkScenario`] outcomes probe by probe.
///
/// The probe index advances across calls, so consecutive passes continue
/// the scenario's pattern rather than restarting it.
#[derive(Debug, Clone)]
pub struct MockPinger {
    scenario: NetworkScenario,
    seed: u64,
    next_index: u32,
}

impl MockPinger {
    pub fn new(scenario: NetworkScenario) -> Self {
        Self {
            scenario,
            seed: 0,
            next_index: 0,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

impl Pinger for MockPinger {
    fn probe(&mut self, _destination: &str) -> PingOutcome {
        let outcome = scenarios::outcome_for(self.scenario, self.next_index, self.seed);
        self.next_index += 1;
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::mock::simulate;

    #[test]
    fn probes_follow_the_scenario_sequence() {
        let mut pinger = MockPinger::new(NetworkScenario::PartialLoss);
        let probed: Vec<PingOutcome> = (0..10).map(|_| pinger.probe("example.com")).collect();
        assert_eq!(probed, simulate(NetworkScenario::PartialLoss, 10, 0));
    }

    #[test]
    fn index_continues_across_passes() {
        let mut pinger = MockPinger::new(NetworkScenario::IntermittentLoss);
        let first: Vec<PingOutcome> = (0..3).map(|_| pinger.probe("h")).collect();
        let second: Vec<PingOutcome> = (0..3).map(|_| pinger.probe("h")).collect();

        let full = simulate(NetworkScenario::IntermittentLoss, 6, 0);
        assert_eq!(first, full[..3].to_vec());
        assert_eq!(second, full[3..].to_vec());
    }
}
