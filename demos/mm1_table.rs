//! Simulates a single-server queue and prints the per-customer table, the running averages, and the totals and
//! counts, the way the original teaching tool laid them out.
//!
//! With `--step N` the run advances N customers at a time and prints the table after each batch, mimicking repeated
//! presses of a "next customer" button; without it the run completes in one call.
//!
//! ```bash
//! cargo run --example mm1_table -- --customers 10 --arrival-rate 1.0 --service-rate 2.5 --seed 7
//! RUST_LOG=ssq=trace cargo run --example mm1_table -- --customers 5 --step 1
//! ```

use clap::Parser;
use ssq::{QueueEngine, RngSource, SimulationConfig, SimulationState, RATE_FLOOR};
use tracing_subscriber::EnvFilter;

/// Single-server queue simulation
#[derive(Parser, Debug)]
#[command(name = "mm1-table", about = "Simulate an M/M/1 queue and print per-customer timings.")]
struct Cli {
    /// Number of customers to simulate
    #[arg(short = 'n', long, default_value_t = 50)]
    customers: usize,

    /// Arrival rate (lambda)
    #[arg(long, default_value_t = 1.0, value_parser = parse_rate)]
    arrival_rate: f64,

    /// Service rate (mu)
    #[arg(long, default_value_t = 2.5, value_parser = parse_rate)]
    service_rate: f64,

    /// Seed for a reproducible run; omit for a fresh one
    #[arg(long)]
    seed: Option<u64>,

    /// Advance this many customers between printouts
    #[arg(long)]
    step: Option<usize>,
}

fn parse_rate(s: &str) -> Result<f64, String> {
    let rate: f64 = s.parse().map_err(|e| format!("'{}' is not a number: {}", s, e))?;
    if rate < RATE_FLOOR {
        return Err(format!("rate must be at least {}", RATE_FLOOR));
    }
    Ok(rate)
}

fn print_report(state: &SimulationState) {
    println!(
        "{:>8} {:>17} {:>10} {:>12} {:>18} {:>16} {:>15}",
        "Customer",
        "Interarrival Time",
        "Clock Time",
        "Service Time",
        "Service Start Time",
        "Service End Time",
        "Queue Wait Time"
    );
    for record in state.records() {
        println!(
            "{:>8} {:>17.4} {:>10.4} {:>12.4} {:>18.4} {:>16.4} {:>15.4}",
            record.index,
            record.interarrival_time,
            record.arrival_time,
            record.service_time,
            record.service_start_time,
            record.service_end_time,
            record.queue_wait_time
        );
    }

    println!();
    match state.statistics() {
        Some(stats) => {
            println!("{}", stats);
            if let Some(utilization) = stats.server_utilization() {
                println!("Server Utilization: {:.4}", utilization);
            }
            if let Some(waiting) = stats.probability_of_waiting() {
                println!("Probability of Waiting: {:.4}", waiting);
            }
        },
        None => println!("Averages: not available"),
    }
    println!();
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = SimulationConfig::new(cli.customers, cli.arrival_rate, cli.service_rate)?;
    tracing::info!(%config, rho = config.traffic_intensity(), "starting simulation");

    let source = match cli.seed {
        Some(seed) => RngSource::seeded(seed),
        None => RngSource::from_entropy(),
    };
    let mut engine = QueueEngine::new(config, source);
    let mut state = SimulationState::new();

    match cli.step {
        Some(step) if step > 0 => {
            while engine.advance_by(&mut state, step) > 0 {
                print_report(&state);
            }
        },
        _ => {
            engine.advance_to_completion(&mut state);
            print_report(&state);
        },
    }

    Ok(())
}
