//! SMT Thread Arbiter (§4.5).
//!
//! The three fetch policies are a closed sum, represented as
//! [`crate::config::FetchKind`]. Rust's exhaustive `match` is the
//! compile-time realization of "tagged variant with exhaustive dispatch":
//! adding a fourth policy without a matching arm here fails to build, which
//! is strictly stronger than a runtime fatal-default arm.

use super::block_path::fetch_thread;
use super::eligibility::can_fetch;
use super::CoreFetchEnv;
use crate::config::FetchKind;
use crate::processor::Core;

/// Runs this core's configured SMT fetch policy for one cycle.
pub fn run_core_fetch(core: &mut Core, env: &mut CoreFetchEnv<'_>) {
    match env.config.fetch.kind {
        FetchKind::Shared => run_shared(core, env),
        FetchKind::Timeslice => run_timeslice(core, env),
        FetchKind::SwitchOnEvent => run_switch_on_event(core, env),
    }
}

fn run_shared(core: &mut Core, env: &mut CoreFetchEnv<'_>) {
    for thread in &mut core.threads {
        if can_fetch(thread, env.cycle, env.config.fetch.queue_size, env.mmu) {
            fetch_thread(thread, env);
        }
    }
}

fn run_timeslice(core: &mut Core, env: &mut CoreFetchEnv<'_>) {
    let num_threads = core.threads.len();
    if num_threads == 0 {
        return;
    }
    for _ in 0..num_threads {
        core.fetch_current = (core.fetch_current + 1) % num_threads;
        let thread = &mut core.threads[core.fetch_current];
        if can_fetch(thread, env.cycle, env.config.fetch.queue_size, env.mmu) {
            fetch_thread(thread, env);
            return;
        }
    }
}

fn run_switch_on_event(core: &mut Core, env: &mut CoreFetchEnv<'_>) {
    let num_threads = core.threads.len();
    if num_threads == 0 {
        return;
    }

    let current = core.fetch_current;
    if core.threads[current].fetch_stall_until >= env.cycle {
        return;
    }

    let quantum = env.config.smt.thread_quantum;
    let switch_penalty = env.config.smt.thread_switch_penalty;

    let current_eligible = can_fetch(
        &core.threads[current],
        env.cycle,
        env.config.fetch.queue_size,
        env.mmu,
    );
    let current_long_latency = env.long_latency.has_long_latency(env.core_idx, current);
    let quantum_expired = env.cycle.saturating_sub(core.fetch_switch_when) > quantum + switch_penalty;
    let must_switch = !current_eligible || quantum_expired || current_long_latency;

    let current_committed = core.threads[current].committed;
    let mut chosen = None;
    let mut candidate = (current + 1) % num_threads;
    while candidate != current {
        let eligible = can_fetch(
            &core.threads[candidate],
            env.cycle,
            env.config.fetch.queue_size,
            env.mmu,
        );
        if eligible {
            if must_switch {
                chosen = Some(candidate);
                break;
            }
            let fair = core.threads[candidate].committed <= current_committed + 100_000;
            let candidate_long_latency = env.long_latency.has_long_latency(env.core_idx, candidate);
            if fair && !candidate_long_latency {
                chosen = Some(candidate);
                break;
            }
        }
        candidate = (candidate + 1) % num_threads;
    }

    if let Some(new_thread) = chosen {
        tracing::debug!(
            core = env.core_idx,
            from = current,
            to = new_thread,
            cycle = env.cycle,
            forced = must_switch,
            "switch-on-event: fetch thread switched"
        );
        core.fetch_current = new_thread;
        core.fetch_switch_when = env.cycle;
        core.threads[new_thread].fetch_stall_until = env.cycle + switch_penalty - 1;
    }

    let active = core.fetch_current;
    if can_fetch(
        &core.threads[active],
        env.cycle,
        env.config.fetch.queue_size,
        env.mmu,
    ) {
        fetch_thread(&mut core.threads[active], env);
    }
}
