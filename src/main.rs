//! mcmon - worker-count and connectivity gauge agent.
//!
//! Samples tracked daemons and destination connectivity, then sends each
//! gauge as one line per UDP datagram to a local stats agent. One-shot by
//! default; `--interval` turns it into a loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use clap::Parser;
use tracing::{Level, error, info, warn};
use tracing_subscriber::EnvFilter;

use mcmon::fmt::{format_latency, format_loss, format_status};
use mcmon::report::{PassConfig, PassSummary, run_pass};
use mcmon::sampler::{
    ConnectivitySampler, MockPinger, NetworkScenario, Pinger, ProcessCountSampler, ProcfsTable,
    SystemPinger,
};
use mcmon::wire::UdpEmitter;

/// Worker-count and connectivity gauge agent.
#[derive(Parser)]
#[command(name = "mcmon", about = "Worker-count and connectivity gauge agent", version)]
struct Args {
    /// Stats agent host.
    #[arg(long, default_value = "127.0.0.1")]
    agent_host: String,

    /// Stats agent UDP port.
    #[arg(long, default_value = "8125")]
    agent_port: u16,

    /// Destination host for connectivity probes.
    #[arg(short, long, default_value = "example.com")]
    destination: String,

    /// Echo probes per pass.
    #[arg(long, default_value = "10")]
    probes: u32,

    /// Per-probe timeout in seconds.
    #[arg(long, default_value = "2")]
    probe_timeout: u64,

    /// Daemon name to track (repeatable).
    #[arg(short = 'p', long = "process", value_name = "NAME",
          default_values_t = ["mcman".to_string()])]
    processes: Vec<String>,

    /// Value for the source tag. Defaults to this host's name.
    #[arg(long)]
    source: Option<String>,

    /// Path to proc filesystem (for testing against fixtures).
    #[arg(long, default_value = "/proc")]
    proc_path: String,

    /// Repeat every N seconds instead of sampling once.
    #[arg(short, long, value_name = "SECONDS")]
    interval: Option<u64>,

    /// Simulate probes instead of pinging, e.g. "timeout" or
    /// "random-loss:0.3".
    #[arg(long, value_name = "SCENARIO", value_parser = parse_scenario)]
    scenario: Option<NetworkScenario>,

    /// Seed for simulated probes.
    #[arg(long, default_value = "0")]
    seed: u64,

    /// Encode and log metric lines without sending them.
    #[arg(long)]
    dry_run: bool,

    /// Print each pass summary as JSON on stdout.
    #[arg(long)]
    json: bool,

    /// Increase logging verbosity (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long)]
    quiet: bool,
}

fn parse_scenario(s: &str) -> Result<NetworkScenario, String> {
    s.parse::<NetworkScenario>().map_err(|e| e.to_string())
}

/// Initializes the tracing subscriber with the appropriate log level.
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let filter = EnvFilter::from_default_env()
        .add_directive(format!("mcmon={}", level).parse().unwrap());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// This host's name, for the source tag: kernel hostname, then the
/// HOSTNAME variable, then a fixed fallback.
fn local_hostname() -> String {
    if let Ok(name) = std::fs::read_to_string("/proc/sys/kernel/hostname") {
        let name = name.trim();
        if !name.is_empty() {
            return name.to_string();
        }
    }
    std::env::var("HOSTNAME").unwrap_or_else(|_| "unknown".to_string())
}

fn log_summary(summary: &PassSummary) {
    for sample in &summary.processes {
        info!("{}: {} workers", sample.name, sample.child_count);
    }

    let c = &summary.connectivity;
    info!(
        "{} is {}: latency={}, loss={} ({}/{} probes)",
        c.destination,
        format_status(c.connection_status),
        format_latency(c.average_latency_ms),
        format_loss(c.packet_loss_percent),
        c.probes_succeeded,
        c.probes_sent
    );
    info!(
        "Metrics: {} sent, {} failed",
        summary.metrics_sent, summary.metrics_failed
    );
}

fn print_json(summary: &PassSummary) {
    match serde_json::to_string_pretty(summary) {
        Ok(json) => println!("{}", json),
        Err(e) => error!("failed to serialize summary: {}", e),
    }
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    let source = args.source.clone().unwrap_or_else(local_hostname);

    info!("mcmon {} starting", env!("CARGO_PKG_VERSION"));
    info!(
        "Config: agent={}:{}, destination={}, probes={}, processes=[{}]",
        args.agent_host,
        args.agent_port,
        args.destination,
        args.probes,
        args.processes.join(", ")
    );

    let process_sampler = ProcessCountSampler::new(ProcfsTable::new(&args.proc_path));

    let pinger: Box<dyn Pinger> = match args.scenario {
        Some(scenario) => {
            info!("Probe simulation: {} (seed {})", scenario, args.seed);
            Box::new(MockPinger::new(scenario).with_seed(args.seed))
        }
        None => Box::new(SystemPinger::new(Duration::from_secs(args.probe_timeout))),
    };
    let mut connectivity_sampler = ConnectivitySampler::new(pinger);

    let emitter = UdpEmitter::new(args.agent_host.clone(), args.agent_port);

    let config = PassConfig {
        process_names: args.processes.clone(),
        destination: args.destination.clone(),
        probe_count: args.probes,
        source,
        dry_run: args.dry_run,
    };

    let Some(interval_secs) = args.interval else {
        // One-shot: sample, report, exit.
        match run_pass(&config, &process_sampler, &mut connectivity_sampler, &emitter) {
            Ok(summary) => {
                log_summary(&summary);
                if args.json {
                    print_json(&summary);
                }
                if summary.metrics_failed > 0 {
                    std::process::exit(1);
                }
            }
            Err(e) => {
                error!("Sampling pass failed: {}", e);
                std::process::exit(1);
            }
        }
        return;
    };

    // Loop mode with graceful shutdown.
    let interval = Duration::from_secs(interval_secs);
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    if let Err(e) = ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        r.store(false, Ordering::SeqCst);
    }) {
        warn!("Failed to set Ctrl-C handler: {}", e);
    }

    info!("Starting sampling loop (every {}s)", interval_secs);
    let mut pass_count: u64 = 0;

    while running.load(Ordering::SeqCst) {
        match run_pass(&config, &process_sampler, &mut connectivity_sampler, &emitter) {
            Ok(summary) => {
                pass_count += 1;
                info!("Pass #{}", pass_count);
                log_summary(&summary);
                if args.json {
                    print_json(&summary);
                }
            }
            Err(e) => {
                error!("Sampling pass failed: {}", e);
            }
        }

        // Sleep with periodic checks for the shutdown signal.
        let sleep_interval = Duration::from_millis(100);
        let mut remaining = interval;
        while remaining > Duration::ZERO && running.load(Ordering::SeqCst) {
            let sleep_time = remaining.min(sleep_interval);
            std::thread::sleep(sleep_time);
            remaining = remaining.saturating_sub(sleep_time);
        }
    }

    info!("Shutdown complete after {} passes", pass_count);
}
