//! Command line front end for the Romberg integrator.
//!
//! Usage:
//!     cargo run --release --bin romberg -- --function exp_chain --trace

use anyhow::{Context, bail};
use clap::Parser;
use math_audio_romberg::{
    Integrand, IntegrandRegistry, Integrator, StageRecord, load_integrator,
};
use std::process;

#[derive(Parser, Debug)]
#[command(
    name = "romberg",
    about = "Integrate a reference function with Romberg extrapolation"
)]
struct Cli {
    /// Name of the integrand (use --list-functions to see available options)
    #[arg(long)]
    function: Option<String>,

    /// Lower bound (defaults to the integrand's reference interval)
    #[arg(long, allow_negative_numbers = true)]
    lower: Option<f64>,

    /// Upper bound (defaults to the integrand's reference interval)
    #[arg(long, allow_negative_numbers = true)]
    upper: Option<f64>,

    /// JSON file with integrator thresholds; flags below override it
    #[arg(long)]
    config: Option<String>,

    /// Acceptable absolute error
    #[arg(long)]
    absolute_error: Option<f64>,

    /// Acceptable error relative to the magnitude of the estimate
    #[arg(long)]
    relative_error: Option<f64>,

    /// Minimum number of evaluations before convergence is checked
    #[arg(long)]
    min_calls: Option<usize>,

    /// Evaluation budget (rounded up to the next 2^n + 1)
    #[arg(long)]
    max_calls: Option<usize>,

    /// Print one line per refinement stage
    #[arg(long)]
    trace: bool,

    /// Print the estimate as JSON
    #[arg(long)]
    json: bool,

    /// List all available integrands and exit
    #[arg(long)]
    list_functions: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Cli::parse();

    let registry = IntegrandRegistry::new();

    if args.list_functions {
        list_available_functions(&registry);
        return Ok(());
    }

    let Some(name) = args.function.as_deref().map(str::trim) else {
        eprintln!("Error: --function must be provided unless --list-functions is used.");
        process::exit(2);
    };
    let Some(integrand) = registry.get(name) else {
        bail!("integrand '{name}' not found; use --list-functions to inspect available names");
    };

    let integrator = build_integrator(&args)?;
    let lower = args.lower.unwrap_or(integrand.bounds.0);
    let upper = args.upper.unwrap_or(integrand.bounds.1);

    let (estimate, trace) = integrator
        .integrate_traced(lower, upper, integrand.f)
        .with_context(|| format!("integrating '{name}' over [{lower}, {upper}]"))?;

    if args.trace {
        print_trace(&trace);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&estimate)?);
    } else {
        println!("Integrating '{}' over [{}, {}]", integrand.name, lower, upper);
        println!("{estimate}");
        print_exact(integrand, lower, upper, estimate.value);
    }

    if estimate.aborted {
        process::exit(1);
    }
    Ok(())
}

fn build_integrator(args: &Cli) -> anyhow::Result<Integrator> {
    let mut integrator = match &args.config {
        Some(path) => load_integrator(path).with_context(|| format!("loading config {path}"))?,
        None => Integrator::default(),
    };

    if let Some(v) = args.absolute_error {
        integrator.absolute_error = v;
    }
    if let Some(v) = args.relative_error {
        integrator.relative_error = v;
    }
    if let Some(v) = args.min_calls {
        integrator.min_call_count = v;
    }
    if let Some(v) = args.max_calls {
        integrator.max_call_count = v;
    }
    Ok(integrator)
}

fn list_available_functions(registry: &IntegrandRegistry) {
    println!("Available integrands ({}):", registry.names().len());
    for integrand in registry.iter() {
        let (a, b) = integrand.bounds;
        println!(
            "- {:<14} [{:>8.4}, {:>8.4}]  {}",
            integrand.name, a, b, integrand.description
        );
    }
}

fn print_trace(trace: &[StageRecord]) {
    println!(
        "{:>5} {:>8} {:>12} {:>24} {:>12}",
        "stage", "calls", "step", "estimate", "error"
    );
    for record in trace {
        println!(
            "{:>5} {:>8} {:>12.4e} {:>24.16e} {:>12.3e}",
            record.stage,
            record.call_count,
            record.step,
            record.estimate,
            record.absolute_error_estimate
        );
    }
}

fn print_exact(integrand: &Integrand, lower: f64, upper: f64, value: f64) {
    let (a, b) = if lower <= upper {
        (lower, upper)
    } else {
        (upper, lower)
    };
    if let Some(exact) = integrand.exact(a, b) {
        println!("  Exact:          {:.15e}", exact);
        println!("  True error:     {:.3e}", value - exact);
    }
}
