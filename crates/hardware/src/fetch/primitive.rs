//! Instruction Fetch Primitive (§4.2): functionally executes one
//! macro-instruction and drains its uinsts into the fetch queue.

use super::{trace, CoreFetchEnv};
use crate::thread::Thread;
use crate::uop::{DepCounts, Uop};

/// Functionally executes one macro-instruction on `thread`'s bound context
/// and deposits its uops into the fetch queue.
///
/// Returns the representative uop for this macro-instruction — the first
/// uop produced, unless a later uop in the group is a control uop, in
/// which case that control uop supersedes it (§4.2 step 4) — or `None` if
/// the context produced no uops (an invalid decode, or an unallocated
/// thread).
///
/// # Panics
///
/// Debug builds assert the uinst staging list is empty on entry: a
/// non-empty list here means a previous call did not fully drain, which is
/// a defect in the caller, not a runtime condition this function can
/// recover from (§3.3, §5).
pub fn fetch_inst(thread: &mut Thread, env: &mut CoreFetchEnv<'_>, from_trace_cache: bool) -> Option<Uop> {
    debug_assert!(
        env.staging.is_empty(),
        "uinst staging list must be drained before the next fetch_inst call"
    );

    let ctx = thread.ctx.as_deref_mut()?;

    thread.fetch_eip = thread.fetch_neip;
    ctx.set_eip(thread.fetch_eip);
    ctx.execute(env.staging);

    let inst_size = ctx.last_inst_size();
    thread.fetch_neip = thread.fetch_eip + u64::from(inst_size);

    let uinst_count = env.staging.len() as u32;
    let asid = ctx.asid();
    let neip_after = ctx.eip_after_execute();
    let target_neip = ctx.last_target_eip();
    let specmode = ctx.specmode();
    let macro_asm = ctx.last_inst_asm();

    let mut ret_uop: Option<Uop> = None;

    for (index, mut uinst) in env.staging.drain_all().enumerate() {
        let index = index as u32;
        let id = *env.uop_id_counter;
        *env.uop_id_counter += 1;
        let id_in_core = *env.core_uop_id_counter;
        *env.core_uop_id_counter += 1;

        let mut uop = Uop {
            id,
            id_in_core,
            mop_id: id - u64::from(index),
            mop_count: uinst_count,
            mop_index: index,
            mop_size: inst_size,
            flags: uinst.flags,
            eip: thread.fetch_eip,
            neip: neip_after,
            pred_neip: thread.fetch_neip,
            target_neip,
            phy_addr: None,
            specmode,
            in_fetch_queue: true,
            fetch_trace_cache: from_trace_cache,
            fetch_address: thread.fetch_address,
            fetch_access: thread.fetch_access,
            deps: DepCounts::default(),
            asm: if index == 0 { macro_asm.clone() } else { None },
            uasm: uinst.asm.take(),
        };

        env.register_file.count_deps(&mut uop, &uinst);

        if uop.is_mem() {
            if let Some(address) = uinst.address {
                uop.phy_addr = Some(env.mmu.translate(asid, address));
            }
        }

        if env.trace_enabled {
            trace::emit_new_inst(env.core_idx, &uop);
        }

        thread.fetch_queue.push(uop.clone());
        thread.fetched += 1;
        if from_trace_cache {
            thread.trace_cache_queue_occ += 1;
        }

        if ret_uop.is_none() || uop.is_ctrl() {
            ret_uop = Some(uop);
        }
    }

    if let Some(uop) = &ret_uop {
        if !from_trace_cache {
            thread.fetchq_occ += uop.mop_size;
        }
    }

    ret_uop
}
