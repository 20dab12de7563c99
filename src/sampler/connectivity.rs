//! Connectivity sampler: latency, packet loss, and a binary status flag.

use serde::Serialize;

use crate::sampler::traits::{PingOutcome, Pinger};

/// Aggregate of one probing pass against a destination.
///
/// Invariants: `connection_status == 1` iff `probes_succeeded > 0` iff
/// `average_latency_ms` is present; `packet_loss_percent` is
/// `100 * (1 - probes_succeeded / probes_sent)`.
///
/// Status is a threshold, not a quality score: one answered probe out of
/// ten still reports status 1.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectivitySample {
    pub destination: String,
    pub probes_sent: u32,
    pub probes_succeeded: u32,
    /// Mean round-trip time over successful probes only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_latency_ms: Option<f64>,
    pub packet_loss_percent: f64,
    pub connection_status: u8,
}

impl ConnectivitySample {
    /// Reduces a list of probe outcomes to the three gauges.
    ///
    /// Total loss is a valid terminal sample, not an error. An empty
    /// outcome list reports full loss: no probes means no evidence of
    /// connectivity.
    pub fn from_outcomes(destination: impl Into<String>, outcomes: &[PingOutcome]) -> Self {
        let probes_sent = outcomes.len() as u32;
        let rtts_ms: Vec<f64> = outcomes
            .iter()
            .filter_map(|o| o.rtt)
            .map(|rtt| rtt.as_secs_f64() * 1000.0)
            .collect();
        let probes_succeeded = rtts_ms.len() as u32;

        let average_latency_ms = if rtts_ms.is_empty() {
            None
        } else {
            Some(rtts_ms.iter().sum::<f64>() / rtts_ms.len() as f64)
        };

        let packet_loss_percent = if probes_sent == 0 {
            100.0
        } else {
            100.0 * (1.0 - probes_succeeded as f64 / probes_sent as f64)
        };

        Self {
            destination: destination.into(),
            probes_sent,
            probes_succeeded,
            average_latency_ms,
            packet_loss_percent,
            connection_status: if probes_succeeded > 0 { 1 } else { 0 },
        }
    }
}

/// Issues a fixed number of probes through a [`Pinger`] and aggregates
/// the outcomes. Probes run sequentially; only the counts are observable.
pub struct ConnectivitySampler<P: Pinger> {
    pinger: P,
}

impl<P: Pinger> ConnectivitySampler<P> {
    pub fn new(pinger: P) -> Self {
        Self { pinger }
    }

    pub fn sample(&mut self, destination: &str, probe_count: u32) -> ConnectivitySample {
        let outcomes: Vec<PingOutcome> = (0..probe_count)
            .map(|_| self.pinger.probe(destination))
            .collect();
        ConnectivitySample::from_outcomes(destination, &outcomes)
    }
}
