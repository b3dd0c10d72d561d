//! Cycle Driver (§4.6).

use super::arbiter::run_core_fetch;
use super::CoreFetchEnv;
use crate::processor::Processor;

/// Runs one fetch cycle across every core of `processor`.
///
/// Tags [`Processor::stage`] as `"fetch"` and delegates to each core's
/// configured SMT arbiter; no other side effects.
pub fn fetch(processor: &mut Processor) {
    processor.stage = "fetch";

    let Processor {
        cores,
        config,
        uop_id_counter,
        mmu,
        register_file,
        long_latency,
        staging,
        cycle,
        trace_enabled,
        ..
    } = processor;
    let trace_enabled = *trace_enabled;

    for (core_idx, core) in cores.iter_mut().enumerate() {
        let mut env = CoreFetchEnv {
            core_idx,
            cycle: *cycle,
            config: &*config,
            uop_id_counter: &mut *uop_id_counter,
            core_uop_id_counter: &mut core.uop_id_counter,
            staging: &mut *staging,
            mmu: mmu.as_mut(),
            register_file: register_file.as_mut(),
            long_latency: long_latency.as_ref(),
            trace_enabled,
        };
        run_core_fetch(core, &mut env);
    }
}
