//! Knapsack benchmark runner
//!
//! Times each operation once per grid point and prints a table or JSON.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use knapq_bench::{
    BenchParams, HarnessConfig, ITEM_COUNTS, KnapsackBenchmarks, MAX_WEIGHTS, Operation,
    OperationOutput,
};
use knapq_demos::{
    Timing, TimingReport, create_progress_bar, print_header, print_info, print_result,
    print_section, print_success, print_warning,
};

#[derive(Parser, Debug)]
#[command(name = "demo-knapsack")]
#[command(about = "Time QUBO generation, QAOA, VQE and Grover search on random knapsacks")]
struct Args {
    /// Item counts to sweep
    #[arg(short, long, value_delimiter = ',', default_values_t = ITEM_COUNTS)]
    items: Vec<usize>,

    /// Value/weight upper bounds to sweep
    #[arg(short = 'w', long, value_delimiter = ',', default_values_t = MAX_WEIGHTS)]
    max_weights: Vec<u64>,

    /// Operations to run (generate_qubo, qaoa, vqe, grover)
    #[arg(short, long, value_delimiter = ',', default_values_t = Operation::ALL)]
    operations: Vec<Operation>,

    /// YAML file with seeds and budgets
    #[arg(short, long, env = "KNAPQ_CONFIG")]
    config: Option<PathBuf>,

    /// Emit the report as JSON on stdout
    #[arg(long)]
    json: bool,
}

fn render(output: &OperationOutput) -> String {
    match output {
        OperationOutput::Qubo(qubo) => format!("qubo with {} variables", qubo.num_vars()),
        OperationOutput::Solution(result) => result.to_string(),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => HarnessConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => HarnessConfig::default(),
    };

    let grid: Vec<BenchParams> = args
        .items
        .iter()
        .flat_map(|&n| args.max_weights.iter().map(move |&w| BenchParams::new(n, w)))
        .collect();

    if !args.json {
        print_header("Knapsack Benchmarks");
        print_section("Setup");
        print_result("Grid points", grid.len());
        print_result(
            "Operations",
            args.operations
                .iter()
                .map(|op| op.name())
                .collect::<Vec<_>>()
                .join(", "),
        );
        print_result("Shots", config.shots);
        print_result("Optimizer budget", config.optimizer_maxiter);
        print_result("Grover iterations", config.grover_iterations);
        print_section("Running");
    }

    let mut report = TimingReport::new(config.clone());
    let pb = create_progress_bar((grid.len() * args.operations.len()) as u64, "timing");
    if args.json {
        pb.set_draw_target(indicatif::ProgressDrawTarget::hidden());
    }

    for params in grid {
        let bench = KnapsackBenchmarks::setup(params, &config)
            .with_context(|| format!("setup failed for {params}"))?;
        debug!(%params, values = ?bench.problem().values, weights = ?bench.problem().weights, "instance");

        for &operation in &args.operations {
            pb.set_message(format!("{operation} {params}"));
            let start = Instant::now();
            let outcome = bench.run(operation);
            let elapsed = start.elapsed();

            let outcome = outcome.as_ref().map(render).map_err(|e| {
                warn!(%operation, %params, error = %e, "operation failed");
                e.to_string()
            });
            report.push(Timing::new(operation, params, elapsed, outcome));
            pb.inc(1);
        }
    }
    pb.finish_and_clear();

    if args.json {
        println!("{}", report.to_json()?);
        return Ok(());
    }

    print_section("Results");
    print!("{report}");

    print_section("Totals");
    for (operation, seconds) in report.totals() {
        print_result(&operation, format!("{:.3} ms", seconds * 1e3));
    }

    println!();
    match report.failures() {
        0 => print_success("All operations completed"),
        n => print_warning(&format!("{n} operations failed")),
    }
    print_info("Use `cargo bench -p knapq-bench` for statistically sound timings");
    Ok(())
}
