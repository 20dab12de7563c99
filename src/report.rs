//! One sampling pass: sample all tracked daemons and the destination,
//! encode each gauge, emit each line as its own datagram.
//!
//! The pass keeps no ambient state; everything the caller needs comes
//! back in the [`PassSummary`], and the caller accumulates across passes
//! explicitly if it wants history.

use std::io;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::sampler::{
    ConnectivitySample, ConnectivitySampler, Pinger, ProcessCountSampler, ProcessSample,
    ProcessTable,
};
use crate::wire::{Metric, MetricValue, UdpEmitter, encode};

/// Worker-count gauge, one line per tracked daemon (`process` tag).
pub const WORKER_METRIC: &str = "mcman.worker_processes";
/// Mean round-trip time gauge; skipped entirely when every probe is lost.
pub const LATENCY_METRIC: &str = "custom.network.latency";
pub const PACKET_LOSS_METRIC: &str = "custom.network.packet_loss";
pub const CONNECTION_STATUS_METRIC: &str = "custom.network.connection_status";

/// What to sample and how to tag it.
///
/// Names and tag values end up on the wire unescaped, so they must not
/// contain `:`, `|`, or `,`.
#[derive(Debug, Clone)]
pub struct PassConfig {
    /// Daemon names to track.
    pub process_names: Vec<String>,
    /// Destination host for connectivity probes.
    pub destination: String,
    /// Probes per pass.
    pub probe_count: u32,
    /// Value of the `source` tag on connectivity gauges.
    pub source: String,
    /// Encode and log lines without sending them.
    pub dry_run: bool,
}

/// Everything one pass produced.
#[derive(Debug, Clone, Serialize)]
pub struct PassSummary {
    pub timestamp: DateTime<Utc>,
    pub processes: Vec<ProcessSample>,
    pub connectivity: ConnectivitySample,
    pub metrics_sent: u32,
    pub metrics_failed: u32,
}

/// Runs one pass. Only a failure to enumerate the process table aborts
/// the pass; send failures are counted and logged, never retried.
pub fn run_pass<T: ProcessTable, P: Pinger>(
    config: &PassConfig,
    processes: &ProcessCountSampler<T>,
    connectivity: &mut ConnectivitySampler<P>,
    emitter: &UdpEmitter,
) -> io::Result<PassSummary> {
    let timestamp = Utc::now();

    let process_samples = processes.sample_all(&config.process_names)?;
    for sample in &process_samples {
        if sample.child_count == 0 {
            debug!("{}: no workers (daemon absent or idle)", sample.name);
        }
    }

    let connectivity_sample = connectivity.sample(&config.destination, config.probe_count);

    let metrics = build_metrics(config, &process_samples, &connectivity_sample);

    let mut metrics_sent = 0;
    let mut metrics_failed = 0;
    for metric in &metrics {
        let line = encode(metric);
        if config.dry_run {
            info!("dry run: {}", line);
            continue;
        }
        match emitter.emit_line(&line) {
            Ok(()) => {
                metrics_sent += 1;
                debug!("sent {}", line);
            }
            Err(e) => {
                metrics_failed += 1;
                warn!("send failed for {}: {}", line, e);
            }
        }
    }

    Ok(PassSummary {
        timestamp,
        processes: process_samples,
        connectivity: connectivity_sample,
        metrics_sent,
        metrics_failed,
    })
}

/// Turns samples into wire metrics. The latency gauge only exists when at
/// least one probe answered; absence is never sent as a sentinel value.
fn build_metrics(
    config: &PassConfig,
    processes: &[ProcessSample],
    connectivity: &ConnectivitySample,
) -> Vec<Metric> {
    let mut metrics = Vec::with_capacity(processes.len() + 3);

    for sample in processes {
        metrics.push(
            Metric::gauge(WORKER_METRIC, MetricValue::Int(sample.child_count as i64))
                .with_tag("process", &sample.name),
        );
    }

    let tagged = |name: &str, value: MetricValue| {
        Metric::gauge(name, value)
            .with_tag("source", &config.source)
            .with_tag("destination", &config.destination)
    };

    if let Some(latency) = connectivity.average_latency_ms {
        metrics.push(tagged(LATENCY_METRIC, MetricValue::Float(latency)));
    }
    metrics.push(tagged(
        PACKET_LOSS_METRIC,
        MetricValue::Float(connectivity.packet_loss_percent),
    ));
    metrics.push(tagged(
        CONNECTION_STATUS_METRIC,
        MetricValue::Int(connectivity.connection_status as i64),
    ));

    metrics
}
