use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, trace, warn};
use tracing_subscriber::EnvFilter;

use sched_sim::config::{Config, ResourceFile};
use sched_sim::core::{ProcessKey, SimEvent, Ticks};
use sched_sim::metrics::RunSummary;
use sched_sim::{Result, Sim, input, output, validate};

/// Replay a process set under each configured scheduling policy
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the JSON run configuration
    #[arg(value_parser = clap::value_parser!(PathBuf))]
    config: PathBuf,

    /// Log every scheduling event
    #[arg(short, long)]
    trace: bool,
}

fn main() -> ExitCode {
    let cli = Args::parse();
    init_tracing(cli.trace);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::from(e.exit_code())
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("trace")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn run(cli: &Args) -> Result<()> {
    let config = Config::load(&cli.config)?;
    let resources = validate::validate_resources(&ResourceFile::load(&config.resource_file)?)?;
    let processes = validate::validate_processes(input::read_processes(&config.process_file)?, &resources)?;

    // Reject every bad algorithm before running any of them
    let policies = config
        .algorithms
        .iter()
        .map(|algo| algo.policy().map(|policy| (algo, policy)))
        .collect::<Result<Vec<_>>>()?;

    let mut summaries = Vec::with_capacity(policies.len());
    for (algo, policy) in policies {
        let mut sim = Sim::new(policy, processes.clone(), &resources);
        while !sim.all_processes_terminated() {
            let now = sim.now();
            for event in sim.step() {
                trace_event(&sim, now, &event);
            }
        }
        let result = sim.finish();

        for missed in result.deadline_misses() {
            warn!(
                %policy,
                process = %missed.id,
                deadline = missed.deadline,
                end = missed.end_time,
                "deadline missed"
            );
        }

        output::write_global_results(&algo.global_results, &result)?;
        output::write_detailed_results(&algo.detailed_results, &result)?;

        let summary: RunSummary = result.summary(&policy);
        println!(
            "{}: average wait {:.2} ticks, average response {:.2} ticks, makespan {}",
            summary.algorithm, summary.average_wait, summary.average_response, summary.makespan
        );
        summaries.push(summary);
    }

    output::write_summaries(&config.metrics_file, &summaries)?;
    info!(runs = summaries.len(), metrics = %config.metrics_file.display(), "results written");
    Ok(())
}

fn trace_event(sim: &Sim, now: Ticks, event: &SimEvent) {
    let name = move |key: ProcessKey| sim.process(key).id.as_str();
    match *event {
        SimEvent::StateChange { process, from, to } => {
            trace!(t = now, process = name(process), ?from, ?to, "state change")
        }
        SimEvent::CpuCurrentChange { cpu, from, to } => trace!(
            t = now,
            cpu,
            from = from.map(name),
            to = to.map(name),
            "cpu change"
        ),
        SimEvent::AdmissionDeferred {
            process,
            requested,
            available,
        } => trace!(t = now, process = name(process), requested, available, "admission deferred"),
        SimEvent::CpuIdle { cpu } => trace!(t = now, cpu, "cpu idle"),
    }
}
