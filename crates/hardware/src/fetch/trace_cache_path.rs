//! Trace-Cache Fetch Path (§4.3).

use super::{primitive::fetch_inst, CoreFetchEnv};
use crate::thread::Thread;

/// Attempts a trace-cache bulk fetch for `thread`. Returns `true` on a hit
/// (the whole trail was replayed through the fetch primitive), `false` on a
/// miss or when the path is disabled or the sub-queue is full.
pub fn fetch_thread_trace_cache(thread: &mut Thread, env: &mut CoreFetchEnv<'_>) -> bool {
    if !env.config.trace_cache.present {
        return false;
    }
    if thread.trace_cache_queue_occ >= env.config.trace_cache.queue_size {
        return false;
    }
    let Some(trace_cache) = thread.trace_cache.as_deref_mut() else {
        return false;
    };

    let block_size = thread.inst_mod.block_size();
    let eip_branch = thread.btb.next_branch(thread.fetch_neip, block_size);
    let mpred = eip_branch.map_or(0, |branch_addr| {
        thread
            .direction_predictor
            .lookup_multiple(branch_addr, env.config.trace_cache.branch_max)
    });

    let Some(hit) = trace_cache.lookup(thread.fetch_neip, mpred) else {
        return false;
    };

    let mop_count = hit.mop_addrs.len();
    for (i, &addr) in hit.mop_addrs.iter().enumerate() {
        let Some(ctx) = thread.ctx.as_deref() else {
            break;
        };
        if !ctx.is_running() {
            break;
        }

        thread.fetch_neip = addr;
        let produced = fetch_inst(thread, env, true);

        if let Some(uop) = produced {
            if uop.is_ctrl() {
                thread.direction_predictor.lookup(&uop);
                let successor = hit.mop_addrs.get(i + 1).copied().unwrap_or(hit.neip);
                if let Some(queued) = thread.fetch_queue.last_mut() {
                    queued.pred_neip = successor;
                }
            }
        }

        let _ = mop_count;
    }

    thread.fetch_neip = hit.neip;
    true
}
