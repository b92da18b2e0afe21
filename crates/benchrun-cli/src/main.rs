//! benchrun - CPU/GPU micro-benchmark harness.

use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use benchrun_core::ConsoleBuffer;
use benchrun_harness::{BlockingPool, GpuRunner, ParallelRunner, Stage, StagedRunner};

mod config;
mod host;
mod workloads;

use config::Config;
use host::Host;

#[derive(Parser)]
#[command(name = "benchrun", about = "CPU/GPU micro-benchmark harness")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Emit one JSON report object per completed run on stdout.
    #[arg(long)]
    json: bool,

    /// Use heavily reduced workload sizes for a smoke run.
    #[arg(long)]
    quick: bool,

    /// Override the parallel run's worker count.
    #[arg(long)]
    workers: Option<usize>,

    /// Maximum tracing level (error, warn, info, debug, trace).
    #[arg(long, default_value = "warn")]
    log_level: Level,
}

#[derive(Subcommand)]
enum Command {
    /// Run the single-core staged benchmark.
    Single,
    /// Run the multi-worker parallel benchmark.
    Multi,
    /// Run the GPU pass benchmark.
    Gpu,
    /// Run all three benchmarks in sequence.
    All,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = if cli.quick {
        Config::quick()
    } else {
        Config::default()
    };
    if let Some(workers) = cli.workers {
        config.worker_count = workers;
    }

    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    println!("CPU: {} ({cores} cores)", std::env::consts::ARCH);
    info!(
        arch = std::env::consts::ARCH,
        cores,
        worker_count = config.worker_count,
        "Starting benchrun"
    );

    match cli.command {
        Command::Single => run_single(&config, cli.json).await?,
        Command::Multi => run_multi(&config, cli.json).await?,
        Command::Gpu => run_gpu(&config, cli.json).await?,
        Command::All => {
            run_single(&config, cli.json).await?;
            run_multi(&config, cli.json).await?;
            run_gpu(&config, cli.json).await?;
        }
    }

    Ok(())
}

async fn run_single(config: &Config, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let log = Arc::new(ConsoleBuffer::new());
    let runner = StagedRunner::new(log.clone());
    let mut host = Host::new(
        "cpu",
        log,
        Duration::from_millis(config.tick_interval_ms),
        json,
    );

    let math_calls = config.math_calls_single;
    let hash_rounds = config.hash_rounds;
    let encode_rounds = config.encode_rounds;
    let encode_len = config.encode_buffer_len;
    let stages = vec![
        Stage::infallible(
            format!("Running x{math_calls} math function calls"),
            move || {
                workloads::math_chain(math_calls);
            },
        ),
        Stage::infallible(format!("Hashing lorem ipsum x{hash_rounds}"), move || {
            workloads::hash_chain(hash_rounds);
        }),
        Stage::infallible(
            format!("Re-encoding {encode_len} byte buffer x{encode_rounds}"),
            move || {
                workloads::encode_chain(encode_rounds, encode_len);
            },
        ),
    ];

    let report = host
        .run_staged(&runner, "CPU single core analysis", stages)
        .await?;
    host.emit_report(&report);
    Ok(())
}

async fn run_multi(config: &Config, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let log = Arc::new(ConsoleBuffer::new());
    let runner = ParallelRunner::new(Arc::new(BlockingPool::new()), log.clone());
    let mut host = Host::new(
        "cpu",
        log,
        Duration::from_millis(config.tick_interval_ms),
        json,
    );

    let calls = config.math_calls_per_worker;
    let report = host
        .run_parallel(
            &runner,
            "CPU multithread analysis",
            config.worker_count,
            &format!("{calls} math calls"),
            move |_| workloads::timed_math_worker(calls),
        )
        .await?;
    host.emit_report(&report);
    Ok(())
}

async fn run_gpu(config: &Config, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let log = Arc::new(ConsoleBuffer::new());
    let runner = GpuRunner::new(log.clone());
    let mut host = Host::new(
        "gpu",
        log,
        Duration::from_millis(config.tick_interval_ms),
        json,
    );

    // The output buffer outlives all passes and is freed when this function
    // returns; the runner only ever borrows it through the dispatch closure.
    let mut framebuffer =
        vec![0u8; config.gpu_width as usize * config.gpu_height as usize * 4];
    let report = host
        .run_gpu(
            &runner,
            "GPU compute analysis",
            config.gpu_passes,
            config.gpu_width,
            config.gpu_height,
            |params| workloads::simulated_dispatch(&mut framebuffer, &params),
        )
        .await?;
    host.emit_report(&report);
    Ok(())
}
