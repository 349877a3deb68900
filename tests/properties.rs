// Invariants checked over seeded random workloads, for every policy.

use std::collections::HashMap;

use pretty_assertions::assert_eq;
use rand::prelude::*;
use sched_sim::core::{ProcessKey, ProcessState, SimEvent};
use sched_sim::{Policy, ProcessSpec, ResourceSpec, Sim, SimulationResult, run_simulation};

const POLICIES: [Policy; 4] = [
    Policy::Fifo,
    Policy::RoundRobin { quantum: 1 },
    Policy::RoundRobin { quantum: 3 },
    Policy::Priority,
];

fn random_workload(seed: u64, total_memory: u64) -> Vec<ProcessSpec> {
    let mut rng = StdRng::seed_from_u64(seed);
    let count = rng.random_range(1..=25);
    (0..count)
        .map(|i| {
            ProcessSpec::new(
                format!("P{i}"),
                rng.random_range(0..20),
                rng.random_range(1..=8),
                rng.random_range(1..=total_memory),
            )
            .with_priority(rng.random_range(0..5))
        })
        .collect()
}

fn resources(seed: u64) -> ResourceSpec {
    let cpus = 1 + (seed % 3) as usize;
    ResourceSpec::new((1..=cpus).map(|i| format!("CPU{i}")), 1024)
}

#[test]
fn resources_are_conserved_every_tick() {
    for seed in 0..40 {
        let resources = resources(seed);
        for policy in POLICIES {
            let mut sim = Sim::new(policy, random_workload(seed, 1024), &resources);
            while !sim.all_processes_terminated() {
                sim.step();
                let ctx = &sim.core.ctx;
                assert!(ctx.pool.busy_cpus() <= resources.processor_ids.len());
                assert!(ctx.pool.reserved_memory() <= resources.total_memory);
                assert_eq!(ctx.pool.reserved_memory(), ctx.reserved_by_live_processes());
            }
            let observer = sim.core.observer();
            assert!(observer.peak_running <= resources.processor_ids.len());
            assert!(observer.peak_memory_reserved <= resources.total_memory);
            assert!(observer.utilization(resources.processor_ids.len()) <= 1.0);
        }
    }
}

#[test]
fn lifecycle_is_monotonic() {
    for seed in 0..40 {
        let resources = resources(seed);
        for policy in POLICIES {
            let mut sim = Sim::new(policy, random_workload(seed, 1024), &resources);
            let mut executed: HashMap<ProcessKey, u64> = HashMap::new();

            while !sim.all_processes_terminated() {
                for event in sim.step() {
                    if let SimEvent::StateChange { from, to, .. } = event {
                        let allowed = matches!(
                            (from, to),
                            (ProcessState::Pending, ProcessState::Ready)
                                | (ProcessState::Ready, ProcessState::Running)
                                | (ProcessState::Running, ProcessState::Terminated)
                        ) || (matches!(policy, Policy::RoundRobin { .. })
                            && (from, to) == (ProcessState::Running, ProcessState::Ready));
                        assert!(allowed, "{policy}: {from:?} -> {to:?}");
                    }
                }
                for (key, p) in sim.processes() {
                    let before = executed.insert(key, p.executed).unwrap_or(0);
                    assert!(p.executed >= before);
                    assert!(p.executed <= p.run_length);
                }
            }
        }
    }
}

fn check_exactness(result: &SimulationResult, count: usize) {
    assert_eq!(result.terminated.len(), count);
    for p in &result.terminated {
        assert_eq!(p.executed, p.run_length);
        let spans: Vec<_> = result.spans_of(&p.id).collect();
        assert!(spans.iter().all(|s| s.end.is_some()));
        assert_eq!(spans.last().unwrap().end, p.end_time);
        let served: u64 = spans.iter().map(|s| s.duration().unwrap()).sum();
        assert_eq!(served, p.run_length, "{} served {served} ticks", p.id);
    }
    let last_end = result.terminated.iter().filter_map(|p| p.end_time).max().unwrap_or(0);
    assert_eq!(result.makespan, last_end);
}

#[test]
fn every_process_runs_exactly_its_length() {
    for seed in 0..40 {
        let resources = resources(seed);
        for policy in POLICIES {
            let workload = random_workload(seed, 1024);
            let count = workload.len();
            check_exactness(&run_simulation(policy, workload, &resources), count);
        }
    }
}

#[test]
fn round_robin_spans_respect_the_quantum() {
    for seed in 0..40 {
        let resources = resources(seed);
        for quantum in [1, 2, 3] {
            let result = run_simulation(
                Policy::RoundRobin { quantum },
                random_workload(seed, 1024),
                &resources,
            );
            for span in &result.allocation_log {
                let process = result.record(&span.process).unwrap();
                let length = span.duration().unwrap();
                let is_final = span.end == process.end_time;
                assert!(length <= quantum || is_final);
                if !is_final {
                    assert_eq!(length, quantum);
                }
            }
        }
    }
}

#[test]
fn non_preemptive_policies_use_one_span_per_process() {
    for seed in 0..20 {
        let resources = resources(seed);
        for policy in [Policy::Fifo, Policy::Priority] {
            let result = run_simulation(policy, random_workload(seed, 1024), &resources);
            assert_eq!(result.allocation_log.len(), result.terminated.len());
        }
    }
}

#[test]
fn runs_are_deterministic() {
    for seed in 0..20 {
        let resources = resources(seed);
        for policy in POLICIES {
            let first = run_simulation(policy, random_workload(seed, 1024), &resources);
            let second = run_simulation(policy, random_workload(seed, 1024), &resources);
            assert_eq!(first, second);
        }
    }
}
