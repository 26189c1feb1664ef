//! linepool CLI: drain an input file through a worker pool, with or without a lock.

use anyhow::Context;
use clap::Parser;
use linepool::config::Config;
use linepool::engine::{self, Jitter};
use linepool::model::{Mode, RunReport};
use linepool::telemetry::{TelemetryConfig, init_telemetry};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "linepool",
    about = "Drain a line file through a pool of worker threads"
)]
struct Cli {
    /// Synchronization mode: "mutex" or "nomutex"
    mode: Mode,
    /// Input file (default: linepool.data)
    #[arg(long)]
    input: Option<PathBuf>,
    /// Output file (default: linepool.<mode>)
    #[arg(long)]
    output: Option<PathBuf>,
    /// Number of worker threads (default: 10)
    #[arg(long)]
    workers: Option<usize>,
    /// Upper bound of the random pause after each line, in milliseconds
    #[arg(long)]
    jitter_ms: Option<u64>,
    /// Seed for the pause generator
    #[arg(long)]
    seed: Option<u64>,
    /// TOML file with job settings
    #[arg(long)]
    config: Option<PathBuf>,
    /// Log filter used when RUST_LOG is unset
    #[arg(long)]
    log_level: Option<String>,
    /// Print the run report as JSON
    #[arg(long)]
    json: bool,
}

impl Cli {
    /// Defaults, then the config file, then the environment, then flags.
    fn resolve_config(&self) -> anyhow::Result<Config> {
        let base = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };
        let mut config = base.with_env()?;

        if let Some(ref input) = self.input {
            config.input = input.clone();
        }
        if let Some(ref output) = self.output {
            config.output = Some(output.clone());
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if let Some(jitter_ms) = self.jitter_ms {
            config.jitter_ms = jitter_ms;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(ref level) = self.log_level {
            config.log_level = level.clone();
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    init_telemetry(TelemetryConfig {
        log_level: config.log_level.clone(),
        compact: true,
    })?;

    let output = config.output_for(cli.mode);
    let report = engine::run(
        &config.input,
        &output,
        cli.mode,
        config.workers,
        Jitter::from_config(&config),
    )
    .with_context(|| {
        format!(
            "{} run from {} to {} failed",
            cli.mode,
            config.input.display(),
            output.display()
        )
    })?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report, &output);
    }
    Ok(())
}

fn print_report(report: &RunReport, output: &std::path::Path) {
    println!("Job:       {}", report.job_id);
    println!("Mode:      {}", report.mode);
    println!("Output:    {}", output.display());
    println!("{:<8}  LINES", "WORKER");
    println!("{}", "-".repeat(16));
    for worker in &report.workers {
        println!("{:<8}  {}", worker.worker, worker.lines);
    }
    println!(
        "\n{} line(s) in {}ms",
        report.total_lines(),
        report.duration_ms()
    );
}
